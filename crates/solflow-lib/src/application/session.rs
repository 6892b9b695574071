//! Per-command session
//!
//! A `Session` hands each command handler its collaborators: terminal output,
//! filesystem, HTTP and sign-in, subprocesses, configuration and prompts.
//! `CommandSession::new` wires the live ones; tests swap in mocks.

use crate::application::config::AppConfig;
use crate::dataverse::auth::{DEFAULT_DEVICE_TENANT, DEFAULT_PUBLIC_CLIENT_ID};
use crate::dataverse::{
    AccessTokenProvider, AuthError, AzureCliTokenProvider, BearerToken,
    ClientCredentialsTokenProvider, DataverseClient, DeviceCodeTokenProvider, SolutionDirectory,
};
use crate::display::{Display, DisplayProvider, LiveDisplayProvider};
use crate::logger::Logger;
use crate::primitives::AuthMethod;
use crate::terminal::TerminalCapabilities;
use anyhow::{Context, Result};
use dialoguer::{Confirm, Input};
use reqwest::blocking::Client;
use std::env;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::debug;

/// Filesystem access used for reports and export output directories
pub trait FileSystemProvider {
    fn current_dir(&self) -> Result<PathBuf>;

    /// Creates missing parent directories first
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    fn remove_dir_all(&self, path: &Path) -> Result<()>;
}

/// Factories for everything that talks HTTP
pub trait NetworkProvider {
    /// Blocking HTTP client with the configured timeout
    fn http_client(&self, timeout: Duration) -> Result<Client>;

    /// Token strategy selected by `config.auth`
    fn token_provider<'a>(
        &'a self,
        config: &AppConfig,
        process: &'a dyn ProcessProvider,
        display: &'a dyn DisplayProvider,
    ) -> Result<Box<dyn AccessTokenProvider + 'a>>;

    /// Solution directory for the configured environment
    fn solution_directory(
        &self,
        config: &AppConfig,
        token: BearerToken,
    ) -> Result<Box<dyn SolutionDirectory>>;
}

/// Captured result of a finished subprocess
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Subprocess execution (`pac`, `az`)
pub trait ProcessProvider {
    /// Run to completion in `working_dir`, capturing both streams
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<ProcessOutput>;

    /// Resolve a program on PATH
    fn find_program(&self, program: &str) -> Option<PathBuf>;
}

pub trait ConfigProvider {
    fn app_config(&self) -> &AppConfig;
}

/// Operator prompts. Non-interactive implementations answer with the default.
pub trait InteractiveProvider {
    fn text_input(&self, prompt: &str, default: String) -> Result<String>;

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// False when prompts would fall back to defaults (`--yes`, no TTY)
    fn is_interactive(&self) -> bool;
}

/// Collaborators available to a command handler
pub trait Session {
    fn display(&self) -> &dyn DisplayProvider;

    fn filesystem(&self) -> &dyn FileSystemProvider;

    fn network(&self) -> &dyn NetworkProvider;

    fn process(&self) -> &dyn ProcessProvider;

    fn config(&self) -> &dyn ConfigProvider;

    fn interactive(&self) -> &dyn InteractiveProvider;

    /// Working directory for this command: configured, else current
    fn workdir(&self) -> Result<PathBuf> {
        match &self.config().app_config().workdir {
            Some(workdir) => Ok(workdir.clone()),
            None => self.filesystem().current_dir(),
        }
    }
}

pub struct LiveFileSystemProvider;

impl FileSystemProvider for LiveFileSystemProvider {
    fn current_dir(&self) -> Result<PathBuf> {
        env::current_dir().context("Failed to get current directory")
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove file: {}", path.display()))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display()))
    }
}

/// Live network provider: reqwest blocking client, real token flows, Web API client
#[derive(Default)]
pub struct LiveNetworkProvider;

impl LiveNetworkProvider {
    pub fn new() -> Self {
        Self
    }
}

impl NetworkProvider for LiveNetworkProvider {
    fn http_client(&self, timeout: Duration) -> Result<Client> {
        Client::builder()
            .timeout(timeout)
            .user_agent(concat!("solflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")
    }

    fn token_provider<'a>(
        &'a self,
        config: &AppConfig,
        process: &'a dyn ProcessProvider,
        display: &'a dyn DisplayProvider,
    ) -> Result<Box<dyn AccessTokenProvider + 'a>> {
        let resource = config.require_environment_url()?.to_string();
        let workdir = match &config.workdir {
            Some(dir) => dir.clone(),
            None => env::current_dir().context("Failed to get current directory")?,
        };

        let provider: Box<dyn AccessTokenProvider + 'a> = match config.auth {
            AuthMethod::Interactive => Box::new(AzureCliTokenProvider::new(
                process,
                &resource,
                config.tenant_id.clone(),
                workdir,
            )),
            AuthMethod::DeviceCode => {
                let http = self.http_client(config.timeout())?;
                let tenant = config.tenant_id.as_deref().unwrap_or(DEFAULT_DEVICE_TENANT);
                let client_id = config
                    .client_id
                    .as_deref()
                    .unwrap_or(DEFAULT_PUBLIC_CLIENT_ID);
                Box::new(DeviceCodeTokenProvider::new(
                    http,
                    &config.authority_url,
                    tenant,
                    client_id,
                    &resource,
                    Box::new(move |message: &str| display.status().emphasis(message)),
                ))
            }
            AuthMethod::ClientSecret => {
                let tenant = required(&config.tenant_id, "tenant_id", "SOLFLOW_TENANT_ID")?;
                let client_id = required(&config.client_id, "client_id", "SOLFLOW_CLIENT_ID")?;
                let secret =
                    required(&config.client_secret, "client_secret", "SOLFLOW_CLIENT_SECRET")?;
                let http = self.http_client(config.timeout())?;
                Box::new(ClientCredentialsTokenProvider::new(
                    http,
                    &config.authority_url,
                    tenant,
                    client_id,
                    secret,
                    &resource,
                ))
            }
        };
        Ok(provider)
    }

    fn solution_directory(
        &self,
        config: &AppConfig,
        token: BearerToken,
    ) -> Result<Box<dyn SolutionDirectory>> {
        let environment_url = config.require_environment_url()?;
        let http = self.http_client(config.timeout())?;
        Ok(Box::new(DataverseClient::new(http, environment_url, token)))
    }
}

fn required<'c>(
    value: &'c Option<String>,
    setting: &'static str,
    env: &'static str,
) -> Result<&'c str, AuthError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingCredential { setting, env })
}

/// Runs real subprocesses. A `path_override` replaces PATH both for program
/// lookup and for the child environment.
pub struct LiveProcessProvider {
    path_override: Option<String>,
}

impl LiveProcessProvider {
    pub fn new() -> Self {
        Self {
            path_override: None,
        }
    }

    pub fn with_custom_path(path: String) -> Self {
        Self {
            path_override: Some(path),
        }
    }

    fn search_path(&self) -> String {
        self.path_override
            .clone()
            .unwrap_or_else(|| env::var("PATH").unwrap_or_default())
    }
}

impl Default for LiveProcessProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProvider for LiveProcessProvider {
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<ProcessOutput> {
        // Resolve through PATH ourselves so .cmd shims work on Windows
        let program = self
            .find_program(command)
            .unwrap_or_else(|| PathBuf::from(command));

        let mut child = Command::new(&program);
        child.args(args).current_dir(working_dir);
        if let Some(path) = &self.path_override {
            child.env("PATH", path);
        }

        debug!(program = %program.display(), ?args, "Running subprocess");
        let output = child
            .output()
            .with_context(|| format!("Failed to run '{}'", command))?;

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        })
    }

    fn find_program(&self, program: &str) -> Option<PathBuf> {
        let candidate = Path::new(program);
        if candidate.components().count() > 1 {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }

        let extensions: Vec<String> = if cfg!(windows) {
            env::var("PATHEXT")
                .unwrap_or_else(|_| ".EXE;.CMD;.BAT".to_string())
                .split(';')
                .map(|ext| ext.to_lowercase())
                .collect()
        } else {
            vec![String::new()]
        };

        env::split_paths(&self.search_path()).find_map(|dir| {
            extensions
                .iter()
                .map(|ext| dir.join(format!("{}{}", program, ext)))
                .find(|path| path.is_file())
        })
    }
}

pub struct LiveConfigProvider {
    app_config: AppConfig,
}

impl LiveConfigProvider {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }
}

impl ConfigProvider for LiveConfigProvider {
    fn app_config(&self) -> &AppConfig {
        &self.app_config
    }
}

pub struct LiveInteractiveProvider {
    yes_mode: bool,
}

impl LiveInteractiveProvider {
    pub fn new(yes_mode: bool) -> Self {
        Self { yes_mode }
    }

    fn attached_to_terminal() -> bool {
        io::stdin().is_terminal() && io::stdout().is_terminal()
    }
}

impl InteractiveProvider for LiveInteractiveProvider {
    fn text_input(&self, prompt: &str, default: String) -> Result<String> {
        if !self.is_interactive() {
            return Ok(default);
        }
        Input::new()
            .with_prompt(prompt)
            .default(default)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read text input")
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if !self.is_interactive() {
            return Ok(default);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .context("Failed to read confirmation")
    }

    fn is_interactive(&self) -> bool {
        !self.yes_mode && Self::attached_to_terminal()
    }
}

/// Session for one command run. Display is always live; the other
/// collaborators are generic so end-to-end tests can mix live and mock ones.
pub struct CommandSession<F, N, P, C, I>
where
    F: FileSystemProvider,
    N: NetworkProvider,
    P: ProcessProvider,
    C: ConfigProvider,
    I: InteractiveProvider,
{
    display_provider: LiveDisplayProvider,
    filesystem_provider: F,
    network_provider: N,
    process_provider: P,
    config_provider: C,
    interactive_provider: I,
}

impl
    CommandSession<
        LiveFileSystemProvider,
        LiveNetworkProvider,
        LiveProcessProvider,
        LiveConfigProvider,
        LiveInteractiveProvider,
    >
{
    /// Production wiring. Also sets up the global display and logger on
    /// first use; later sessions in the same process reuse them.
    pub fn new(app_config: AppConfig) -> Self {
        if let Ok(caps) = TerminalCapabilities::detect_from_config(&app_config) {
            let _ = Display::init(caps.clone());
            if !Logger::is_initialized() {
                let _ = Logger::init(app_config.to_logger_config(&caps));
            }
        }

        Self {
            display_provider: LiveDisplayProvider::new(),
            filesystem_provider: LiveFileSystemProvider,
            network_provider: LiveNetworkProvider::new(),
            process_provider: LiveProcessProvider::new(),
            interactive_provider: LiveInteractiveProvider::new(app_config.yes),
            config_provider: LiveConfigProvider::new(app_config),
        }
    }
}

impl<F, N, P, C, I> CommandSession<F, N, P, C, I>
where
    F: FileSystemProvider,
    N: NetworkProvider,
    P: ProcessProvider,
    C: ConfigProvider,
    I: InteractiveProvider,
{
    /// Explicit wiring for harnesses; display stays live
    #[cfg(feature = "test-utils")]
    pub fn new_with_providers(
        filesystem_provider: F,
        network_provider: N,
        process_provider: P,
        config_provider: C,
        interactive_provider: I,
    ) -> Self {
        Self {
            display_provider: LiveDisplayProvider::new(),
            filesystem_provider,
            network_provider,
            process_provider,
            config_provider,
            interactive_provider,
        }
    }
}

impl<F, N, P, C, I> Session for CommandSession<F, N, P, C, I>
where
    F: FileSystemProvider,
    N: NetworkProvider,
    P: ProcessProvider,
    C: ConfigProvider,
    I: InteractiveProvider,
{
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
    include!("session.test.rs");
}
