//! Mock implementations of session providers for testing
//!
//! These mocks enable comprehensive testing of command handlers without
//! touching the network, the filesystem or real subprocesses.

use crate::application::config::AppConfig;
use crate::application::session::*;
use crate::dataverse::{
    AccessTokenProvider, AuthError, BearerToken, DataverseError, SolutionDirectory, WhoAmI,
};
use crate::display::{DisplayProvider, MockDisplayProvider};
use crate::pac::{ComponentMover, PackageExporter, PacError};
use crate::primitives::PackageType;
use crate::solution::{Component, ComponentTypeSelector, SolutionVersion};
use anyhow::Result;
use reqwest::blocking::Client;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock filesystem provider for testing
#[derive(Clone)]
pub struct MockFileSystemProvider {
    pub current_dir: PathBuf,
    /// In-memory filesystem: path -> content
    pub files: Arc<Mutex<HashMap<PathBuf, String>>>,
    /// Track directories that exist
    pub directories: Arc<Mutex<HashSet<PathBuf>>>,
    /// Every path passed to remove_file / remove_dir_all, in order
    pub removed: Arc<Mutex<Vec<PathBuf>>>,
    /// Every path passed to create_dir_all, in order
    pub created: Arc<Mutex<Vec<PathBuf>>>,
}

impl Default for MockFileSystemProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystemProvider {
    pub fn new() -> Self {
        Self {
            current_dir: PathBuf::from("/test/workdir"),
            files: Arc::new(Mutex::new(HashMap::new())),
            directories: Arc::new(Mutex::new(HashSet::new())),
            removed: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_current_dir(mut self, dir: PathBuf) -> Self {
        self.current_dir = dir.clone();
        self.directories.lock().unwrap().insert(dir);
        self
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.directories
                .lock()
                .unwrap()
                .insert(parent.to_path_buf());
        }
        self.files.lock().unwrap().insert(path, content.to_string());
        self
    }

    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.directories.lock().unwrap().insert(path.into());
        self
    }

    /// Content written to `path`, if any
    pub fn read_written(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn removed_paths(&self) -> Vec<PathBuf> {
        self.removed.lock().unwrap().clone()
    }

    pub fn created_dirs(&self) -> Vec<PathBuf> {
        self.created.lock().unwrap().clone()
    }
}

impl FileSystemProvider for MockFileSystemProvider {
    fn current_dir(&self) -> Result<PathBuf> {
        Ok(self.current_dir.clone())
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
            || path == self.current_dir
            || self.directories.lock().unwrap().contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.created.lock().unwrap().push(path.to_path_buf());
        let mut directories = self.directories.lock().unwrap();
        for ancestor in path.ancestors() {
            directories.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.removed.lock().unwrap().push(path.to_path_buf());
        self.files
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| anyhow::anyhow!("File not found: {}", path.display()))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.removed.lock().unwrap().push(path.to_path_buf());
        self.files.lock().unwrap().retain(|p, _| !p.starts_with(path));
        self.directories
            .lock()
            .unwrap()
            .retain(|p| !p.starts_with(path));
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct MockSolution {
    id: String,
    version: SolutionVersion,
    components: Vec<Component>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    solutions: BTreeMap<String, MockSolution>,
    failures: HashMap<String, (u16, String)>,
    calls: Vec<String>,
}

/// In-memory solution directory. Clones share state, so a test can keep a
/// handle while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct MockSolutionDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

impl MockSolutionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a solution; its id is `id-<unique_name>`
    pub fn with_solution(
        self,
        unique_name: &str,
        version: SolutionVersion,
        components: Vec<Component>,
    ) -> Self {
        self.state.lock().unwrap().solutions.insert(
            unique_name.to_string(),
            MockSolution {
                id: format!("id-{}", unique_name),
                version,
                components,
            },
        );
        self
    }

    /// Make one operation (`resolve_id`, `list_components`, `get_version`,
    /// `set_version`, `delete`, `who_am_i`) fail with an API error
    pub fn with_api_error(self, operation: &str, status: u16, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(operation.to_string(), (status, message.to_string()));
        self
    }

    /// Calls as `operation:argument`, in order
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn version_of(&self, unique_name: &str) -> Option<SolutionVersion> {
        self.state
            .lock()
            .unwrap()
            .solutions
            .get(unique_name)
            .map(|s| s.version)
    }

    pub fn exists(&self, unique_name: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .solutions
            .contains_key(unique_name)
    }

    fn record(&self, operation: &str, argument: &str) -> Result<(), DataverseError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("{}:{}", operation, argument));
        match state.failures.get(operation) {
            Some((status, message)) => Err(DataverseError::Api {
                status: *status,
                code: "0x80040216".to_string(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn with_solution_named<T>(
        &self,
        unique_name: &str,
        f: impl FnOnce(&mut MockSolution) -> T,
    ) -> Result<T, DataverseError> {
        let mut state = self.state.lock().unwrap();
        state
            .solutions
            .get_mut(unique_name)
            .map(f)
            .ok_or_else(|| DataverseError::NotFound {
                solution: unique_name.to_string(),
            })
    }
}

impl SolutionDirectory for MockSolutionDirectory {
    fn resolve_id(&self, unique_name: &str) -> Result<String, DataverseError> {
        self.record("resolve_id", unique_name)?;
        self.with_solution_named(unique_name, |s| s.id.clone())
    }

    fn list_components(&self, solution_id: &str) -> Result<Vec<Component>, DataverseError> {
        self.record("list_components", solution_id)?;
        let state = self.state.lock().unwrap();
        let mut components = state
            .solutions
            .values()
            .find(|s| s.id == solution_id)
            .map(|s| s.components.clone())
            .unwrap_or_default();
        components.sort_by_key(|c| c.component_type);
        Ok(components)
    }

    fn get_version(&self, unique_name: &str) -> Result<SolutionVersion, DataverseError> {
        self.record("get_version", unique_name)?;
        self.with_solution_named(unique_name, |s| s.version)
    }

    fn set_version(
        &self,
        unique_name: &str,
        version: SolutionVersion,
    ) -> Result<(), DataverseError> {
        self.record("set_version", &format!("{}={}", unique_name, version))?;
        self.with_solution_named(unique_name, |s| s.version = version)
    }

    fn delete(&self, unique_name: &str) -> Result<(), DataverseError> {
        self.record("delete", unique_name)?;
        let mut state = self.state.lock().unwrap();
        state
            .solutions
            .remove(unique_name)
            .map(|_| ())
            .ok_or_else(|| DataverseError::NotFound {
                solution: unique_name.to_string(),
            })
    }

    fn who_am_i(&self) -> Result<WhoAmI, DataverseError> {
        self.record("who_am_i", "")?;
        Ok(WhoAmI {
            user_id: "00000000-0000-0000-0000-0000000000aa".to_string(),
            business_unit_id: "00000000-0000-0000-0000-0000000000bb".to_string(),
            organization_id: "00000000-0000-0000-0000-0000000000cc".to_string(),
        })
    }
}

/// Recorded `move_component` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCall {
    pub selector: String,
    pub target: String,
    pub object_id: String,
}

/// Recorded `unpack` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackCall {
    pub archive: PathBuf,
    pub destination: PathBuf,
    pub package: PackageType,
}

#[derive(Debug, Default)]
struct PackageToolState {
    move_failures: HashMap<String, String>,
    export_failures: HashMap<(String, PackageType), String>,
    unpack_failures: HashMap<PackageType, String>,
    moves: Vec<MoveCall>,
    exports: Vec<(String, PackageType)>,
    unpacks: Vec<UnpackCall>,
}

/// In-memory stand-in for `pac` moves, exports and unpacks
#[derive(Debug, Clone, Default)]
pub struct MockPackageTool {
    state: Arc<Mutex<PackageToolState>>,
}

impl MockPackageTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_move_failure(self, object_id: &str, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .move_failures
            .insert(object_id.to_string(), message.to_string());
        self
    }

    pub fn with_export_failure(self, solution: &str, package: PackageType, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .export_failures
            .insert((solution.to_string(), package), message.to_string());
        self
    }

    pub fn with_unpack_failure(self, package: PackageType, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .unpack_failures
            .insert(package, message.to_string());
        self
    }

    pub fn moves(&self) -> Vec<MoveCall> {
        self.state.lock().unwrap().moves.clone()
    }

    pub fn exports(&self) -> Vec<(String, PackageType)> {
        self.state.lock().unwrap().exports.clone()
    }

    pub fn unpacks(&self) -> Vec<UnpackCall> {
        self.state.lock().unwrap().unpacks.clone()
    }
}

fn pac_failure(command: &str, message: &str) -> PacError {
    PacError::CommandFailed {
        command: command.to_string(),
        output: message.to_string(),
    }
}

impl ComponentMover for MockPackageTool {
    fn move_component(
        &self,
        selector: ComponentTypeSelector,
        target_solution: &str,
        object_id: &str,
    ) -> Result<(), PacError> {
        let mut state = self.state.lock().unwrap();
        state.moves.push(MoveCall {
            selector: selector.to_string(),
            target: target_solution.to_string(),
            object_id: object_id.to_string(),
        });
        match state.move_failures.get(object_id) {
            Some(message) => Err(pac_failure("pac solution add-solution-component", message)),
            None => Ok(()),
        }
    }
}

impl PackageExporter for MockPackageTool {
    fn export(&self, solution: &str, package: PackageType, _archive: &Path) -> Result<(), PacError> {
        let mut state = self.state.lock().unwrap();
        state.exports.push((solution.to_string(), package));
        match state.export_failures.get(&(solution.to_string(), package)) {
            Some(message) => Err(pac_failure("pac solution export", message)),
            None => Ok(()),
        }
    }

    fn unpack(
        &self,
        archive: &Path,
        destination: &Path,
        package: PackageType,
    ) -> Result<(), PacError> {
        let mut state = self.state.lock().unwrap();
        state.unpacks.push(UnpackCall {
            archive: archive.to_path_buf(),
            destination: destination.to_path_buf(),
            package,
        });
        match state.unpack_failures.get(&package) {
            Some(message) => Err(pac_failure("pac solution unpack", message)),
            None => Ok(()),
        }
    }
}

/// Token provider returning a fixed token, or a fixed failure
pub struct MockTokenProvider {
    failure: Option<String>,
}

impl AccessTokenProvider for MockTokenProvider {
    fn access_token(&self) -> Result<BearerToken, AuthError> {
        match &self.failure {
            Some(reason) => Err(AuthError::AzureCli {
                reason: reason.clone(),
            }),
            None => Ok(BearerToken::new("mock-token")),
        }
    }

    fn flow_name(&self) -> &'static str {
        "mock"
    }
}

/// Network provider handing out a shared [`MockSolutionDirectory`]
#[derive(Clone, Default)]
pub struct MockNetworkProvider {
    pub directory: MockSolutionDirectory,
    pub auth_failure: Option<String>,
    pub token_requests: Arc<Mutex<usize>>,
}

impl MockNetworkProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(mut self, directory: MockSolutionDirectory) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_auth_failure(mut self, reason: &str) -> Self {
        self.auth_failure = Some(reason.to_string());
        self
    }

    pub fn token_request_count(&self) -> usize {
        *self.token_requests.lock().unwrap()
    }
}

impl NetworkProvider for MockNetworkProvider {
    fn http_client(&self, timeout: Duration) -> Result<Client> {
        Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))
    }

    fn token_provider<'a>(
        &'a self,
        config: &AppConfig,
        _process: &'a dyn ProcessProvider,
        _display: &'a dyn DisplayProvider,
    ) -> Result<Box<dyn AccessTokenProvider + 'a>> {
        config.require_environment_url()?;
        *self.token_requests.lock().unwrap() += 1;
        Ok(Box::new(MockTokenProvider {
            failure: self.auth_failure.clone(),
        }))
    }

    fn solution_directory(
        &self,
        config: &AppConfig,
        _token: BearerToken,
    ) -> Result<Box<dyn SolutionDirectory>> {
        config.require_environment_url()?;
        Ok(Box::new(self.directory.clone()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessCall {
    pub command: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

pub struct MockProcessProvider {
    pub programs: HashSet<String>,
    pub calls: RefCell<Vec<ProcessCall>>,
    pub lookups: RefCell<Vec<String>>,
    pub results: HashMap<(String, Vec<String>), std::result::Result<ProcessOutput, String>>,
    pub default_result: std::result::Result<ProcessOutput, String>,
}

impl Default for MockProcessProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProcessProvider {
    pub fn new() -> Self {
        Self {
            programs: HashSet::new(),
            calls: RefCell::new(Vec::new()),
            lookups: RefCell::new(Vec::new()),
            results: HashMap::new(),
            default_result: Ok(ProcessOutput {
                stdout: String::new(),
                stderr: String::new(),
                success: true,
            }),
        }
    }

    /// Make `find_program` resolve this name
    pub fn with_program(mut self, program: &str) -> Self {
        self.programs.insert(program.to_string());
        self
    }

    pub fn with_result(
        mut self,
        command: &str,
        args: &[&str],
        result: std::result::Result<ProcessOutput, String>,
    ) -> Self {
        self.results.insert(
            (
                command.to_string(),
                args.iter().map(|s| s.to_string()).collect(),
            ),
            result,
        );
        self
    }

    /// Result for every call without a specific entry
    pub fn with_default_result(
        mut self,
        result: std::result::Result<ProcessOutput, String>,
    ) -> Self {
        self.default_result = result;
        self
    }

    pub fn get_calls(&self) -> Vec<ProcessCall> {
        self.calls.borrow().clone()
    }

    pub fn get_calls_for_command(&self, command: &str) -> Vec<ProcessCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.command == command)
            .cloned()
            .collect()
    }

    pub fn verify_call(&self, command: &str, args: &[&str], working_dir: &Path) -> bool {
        let expected_call = ProcessCall {
            command: command.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            working_dir: working_dir.to_path_buf(),
        };

        self.calls.borrow().contains(&expected_call)
    }

    /// Number of `find_program` lookups for this name
    pub fn lookup_count(&self, program: &str) -> usize {
        self.lookups
            .borrow()
            .iter()
            .filter(|name| name.as_str() == program)
            .count()
    }
}

impl ProcessProvider for MockProcessProvider {
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<ProcessOutput> {
        let call = ProcessCall {
            command: command.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            working_dir: working_dir.to_path_buf(),
        };
        let key = (call.command.clone(), call.args.clone());
        self.calls.borrow_mut().push(call);

        match self.results.get(&key).unwrap_or(&self.default_result) {
            Ok(output) => Ok(output.clone()),
            Err(e) => Err(anyhow::anyhow!("{}", e)),
        }
    }

    fn find_program(&self, program: &str) -> Option<PathBuf> {
        self.lookups.borrow_mut().push(program.to_string());
        self.programs
            .contains(program)
            .then(|| PathBuf::from("/mock/bin").join(program))
    }
}

pub struct MockConfigProvider {
    pub app_config: AppConfig,
}

impl MockConfigProvider {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn app_config(&self) -> &AppConfig {
        &self.app_config
    }
}

pub struct MockInteractiveProvider {
    yes_mode: bool,
    pub text_input_calls: Arc<Mutex<Vec<(String, String)>>>, // (prompt, default)
    pub confirm_calls: Arc<Mutex<Vec<(String, bool)>>>,      // (prompt, default)
    pub text_input_response: Arc<Mutex<Option<String>>>,
    pub confirm_response: Arc<Mutex<Option<bool>>>,
}

impl Default for MockInteractiveProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockInteractiveProvider {
    pub fn new() -> Self {
        Self {
            yes_mode: false,
            text_input_calls: Arc::new(Mutex::new(Vec::new())),
            confirm_calls: Arc::new(Mutex::new(Vec::new())),
            text_input_response: Arc::new(Mutex::new(None)),
            confirm_response: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_yes_mode(mut self, yes_mode: bool) -> Self {
        self.yes_mode = yes_mode;
        self
    }

    pub fn with_text_input(self, response: &str) -> Self {
        *self.text_input_response.lock().unwrap() = Some(response.to_string());
        self
    }

    pub fn with_confirm(self, response: bool) -> Self {
        *self.confirm_response.lock().unwrap() = Some(response);
        self
    }

    pub fn get_text_input_calls(&self) -> Vec<(String, String)> {
        self.text_input_calls.lock().unwrap().clone()
    }

    pub fn get_confirm_calls(&self) -> Vec<(String, bool)> {
        self.confirm_calls.lock().unwrap().clone()
    }
}

impl InteractiveProvider for MockInteractiveProvider {
    fn text_input(&self, prompt: &str, default: String) -> Result<String> {
        self.text_input_calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), default.clone()));

        if self.yes_mode {
            return Ok(default);
        }

        if let Some(response) = self.text_input_response.lock().unwrap().clone() {
            Ok(response)
        } else {
            Ok(default)
        }
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        self.confirm_calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), default));

        if self.yes_mode {
            return Ok(default);
        }

        if let Some(response) = *self.confirm_response.lock().unwrap() {
            Ok(response)
        } else {
            Ok(default)
        }
    }

    fn is_interactive(&self) -> bool {
        !self.yes_mode
    }
}

pub struct MockCommandSession {
    pub display_provider: MockDisplayProvider,
    pub filesystem_provider: MockFileSystemProvider,
    pub network_provider: MockNetworkProvider,
    pub process_provider: MockProcessProvider,
    pub config_provider: MockConfigProvider,
    pub interactive_provider: MockInteractiveProvider,
}

impl Default for MockCommandSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCommandSession {
    pub fn new() -> Self {
        Self {
            display_provider: MockDisplayProvider::new(),
            filesystem_provider: MockFileSystemProvider::new(),
            network_provider: MockNetworkProvider::new(),
            process_provider: MockProcessProvider::new(),
            config_provider: MockConfigProvider::new(AppConfig {
                workdir: Some(PathBuf::from("/test/workdir")),
                environment_url: Some("https://org.crm.dynamics.com".to_string()),
                ..AppConfig::default()
            }),
            interactive_provider: MockInteractiveProvider::new(),
        }
    }

    pub fn with_filesystem(mut self, filesystem: MockFileSystemProvider) -> Self {
        self.filesystem_provider = filesystem;
        self
    }

    pub fn with_network(mut self, network: MockNetworkProvider) -> Self {
        self.network_provider = network;
        self
    }

    pub fn with_process(mut self, process: MockProcessProvider) -> Self {
        self.process_provider = process;
        self
    }

    pub fn with_config(mut self, config: MockConfigProvider) -> Self {
        self.config_provider = config;
        self
    }

    pub fn with_interactive(mut self, interactive: MockInteractiveProvider) -> Self {
        self.interactive_provider = interactive;
        self
    }

    /// Recorded display calls, for assertions
    pub fn display_mock(&self) -> &MockDisplayProvider {
        &self.display_provider
    }
}

impl Session for MockCommandSession {
    fn display(&self) -> &dyn DisplayProvider {
        &self.display_provider
    }

    fn filesystem(&self) -> &dyn FileSystemProvider {
        &self.filesystem_provider
    }

    fn network(&self) -> &dyn NetworkProvider {
        &self.network_provider
    }

    fn process(&self) -> &dyn ProcessProvider {
        &self.process_provider
    }

    fn config(&self) -> &dyn ConfigProvider {
        &self.config_provider
    }

    fn interactive(&self) -> &dyn InteractiveProvider {
        &self.interactive_provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_filesystem_tracks_removals() {
        let fs = MockFileSystemProvider::new()
            .with_current_dir(PathBuf::from("/custom/path"))
            .with_file("/custom/path/out/a.zip", "zip");

        assert_eq!(fs.current_dir().unwrap(), PathBuf::from("/custom/path"));
        assert!(fs.exists(Path::new("/custom/path/out")));

        fs.remove_dir_all(Path::new("/custom/path/out")).unwrap();
        assert!(!fs.exists(Path::new("/custom/path/out/a.zip")));
        assert_eq!(fs.removed_paths(), vec![PathBuf::from("/custom/path/out")]);
    }

    #[test]
    fn test_mock_process_provider() {
        let working_dir = PathBuf::from("/test/workdir");
        let provider = MockProcessProvider::new().with_program("pac").with_result(
            "pac",
            &["solution", "list"],
            Err("Mock error".to_string()),
        );

        assert!(provider.find_program("pac").is_some());
        assert!(provider.find_program("az").is_none());
        assert_eq!(provider.lookup_count("pac"), 1);

        let result = provider.execute("pac", &["help"], &working_dir);
        assert!(result.unwrap().success);

        let result = provider.execute("pac", &["solution", "list"], &working_dir);
        assert!(result.is_err());

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].args, vec!["solution", "list"]);
        assert!(provider.verify_call("pac", &["help"], &working_dir));
        assert!(!provider.verify_call("pac", &["auth", "list"], &working_dir));
    }

    #[test]
    fn test_mock_directory_shares_state_across_clones() {
        let directory = MockSolutionDirectory::new().with_solution(
            "flows",
            SolutionVersion::new(1, 0, 0, 0),
            vec![],
        );
        let handle = directory.clone();

        directory
            .set_version("flows", SolutionVersion::new(1, 0, 0, 1))
            .unwrap();
        directory.delete("missing").unwrap_err();

        assert_eq!(handle.version_of("flows"), Some(SolutionVersion::new(1, 0, 0, 1)));
        assert_eq!(handle.calls(), vec!["set_version:flows=1.0.0.1", "delete:missing"]);
    }

    #[test]
    fn test_mock_command_session_defaults() {
        let session = MockCommandSession::new();
        let config = session.config().app_config();

        assert_eq!(
            config.require_environment_url().unwrap(),
            "https://org.crm.dynamics.com"
        );
        assert_eq!(session.workdir().unwrap(), PathBuf::from("/test/workdir"));
    }
}
