//! Scratch directories with stub executables for end-to-end runs
//!
//! Each stub is a `/bin/sh` script that appends its argument list to a log
//! next to the bin directory, so a test can assert on the exact `pac`
//! invocations a command made without a real CLI installed.

use crate::dataverse_stub::DataverseStub;
use anyhow::Result;
use solflow_lib::application::config::AppConfig;
use solflow_lib::application::session::{
    CommandSession, LiveConfigProvider, LiveFileSystemProvider, LiveNetworkProvider,
    LiveProcessProvider,
};
use solflow_lib::application::session_mocks::MockInteractiveProvider;
use solflow_lib::primitives::AuthMethod;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// What a stub executable does after logging its arguments
#[derive(Debug, Clone)]
pub enum MockBehavior {
    AlwaysSucceed,
    AlwaysFail { error: String },
    SucceedWithOutput { stdout: String, stderr: String },
    /// First matching rule wins; unmatched calls succeed silently
    Conditional { rules: Vec<ConditionalRule> },
}

/// Behavior applied when a call's arguments start with `args_prefix`
#[derive(Debug, Clone)]
pub struct ConditionalRule {
    pub args_prefix: Vec<String>,
    pub behavior: MockBehavior,
}

impl ConditionalRule {
    pub fn new(args_prefix: &[&str], behavior: MockBehavior) -> Self {
        Self {
            args_prefix: args_prefix.iter().map(|s| s.to_string()).collect(),
            behavior,
        }
    }
}

impl MockBehavior {
    /// `pac` stub: prints a version banner for `help`, succeeds for everything else
    pub fn pac() -> Self {
        Self::pac_with(Vec::new())
    }

    /// `pac` stub with extra rules checked before the defaults
    pub fn pac_with(mut rules: Vec<ConditionalRule>) -> Self {
        rules.push(ConditionalRule::new(
            &["help"],
            MockBehavior::SucceedWithOutput {
                stdout: "Microsoft PowerPlatform CLI\nVersion: 1.34.4+stub".to_string(),
                stderr: String::new(),
            },
        ));
        MockBehavior::Conditional { rules }
    }

    fn shell(&self) -> String {
        match self {
            MockBehavior::AlwaysSucceed => "exit 0".to_string(),
            MockBehavior::AlwaysFail { error } => format!("echo '{}'; exit 1", error),
            MockBehavior::SucceedWithOutput { stdout, stderr } => {
                let mut lines = Vec::new();
                if !stdout.is_empty() {
                    lines.push(format!("printf '%s\\n' '{}'", stdout.replace('\n', "' '")));
                }
                if !stderr.is_empty() {
                    lines.push(format!("echo '{}' >&2", stderr));
                }
                lines.push("exit 0".to_string());
                lines.join("; ")
            }
            MockBehavior::Conditional { rules } => {
                let arms: String = rules
                    .iter()
                    .map(|rule| {
                        // Nested conditionals collapse to success
                        let body = match &rule.behavior {
                            MockBehavior::Conditional { .. } => "exit 0".to_string(),
                            other => other.shell(),
                        };
                        format!("  \"{}\"*)\n    {}\n    ;;\n", rule.args_prefix.join(" "), body)
                    })
                    .collect();
                format!("case \"$*\" in\n{}esac\nexit 0", arms)
            }
        }
    }
}

/// Temporary root holding `bin/` for stubs and `work/` for command output
pub struct TestEnvironment {
    _root: TempDir,
    pub bin_path: PathBuf,
    pub work_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let root = TempDir::new()?;
        let bin_path = root.path().join("bin");
        let work_path = root.path().join("work");
        fs::create_dir_all(&bin_path)?;
        fs::create_dir_all(&work_path)?;

        Ok(Self {
            _root: root,
            bin_path,
            work_path,
        })
    }

    fn log_path(&self, name: &str) -> PathBuf {
        self.bin_path.with_file_name(format!("{}.calls", name))
    }

    /// Install `name` into the bin directory
    pub fn add_mock_executable(&self, name: &str, behavior: &MockBehavior) -> Result<()> {
        let script = stub_script(name, behavior, &self.log_path(name));
        let path = self.bin_path.join(name);
        fs::write(&path, script)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        }
        Ok(())
    }

    /// Every call made to `name`, arguments joined by spaces, oldest first
    pub fn get_mock_calls(&self, name: &str) -> Result<Vec<String>> {
        let log = self.log_path(name);
        if !log.exists() {
            return Ok(Vec::new());
        }
        Ok(fs::read_to_string(log)?.lines().map(str::to_string).collect())
    }

    /// Calls whose arguments start with `prefix`
    pub fn calls_starting_with(&self, name: &str, prefix: &[&str]) -> Result<Vec<String>> {
        let prefix = prefix.join(" ");
        let mut calls = self.get_mock_calls(name)?;
        calls.retain(|call| call.starts_with(&prefix));
        Ok(calls)
    }

    /// True if `name` was called with exactly these arguments
    pub fn verify_mock_call(&self, name: &str, args: &[&str]) -> Result<bool> {
        let expected = args.join(" ");
        Ok(self.get_mock_calls(name)?.contains(&expected))
    }
}

fn stub_script(name: &str, behavior: &MockBehavior, log: &Path) -> String {
    format!(
        "#!/bin/sh\n# stub: {}\necho \"$*\" >> \"{}\"\n{}\n",
        name,
        log.display(),
        behavior.shell()
    )
}

type HermeticSession = CommandSession<
    LiveFileSystemProvider,
    LiveNetworkProvider,
    LiveProcessProvider,
    LiveConfigProvider,
    MockInteractiveProvider,
>;

/// Live filesystem and network against a Dataverse stub, live processes
/// against stub executables, scripted prompts
pub struct HermeticSessionBuilder {
    env: TestEnvironment,
    config: AppConfig,
    interactive: MockInteractiveProvider,
}

impl HermeticSessionBuilder {
    pub fn new() -> Result<Self> {
        let env = TestEnvironment::new()?;
        let config = AppConfig {
            workdir: Some(env.work_path.clone()),
            net_timeout: 5,
            ..AppConfig::default()
        };

        Ok(Self {
            env,
            config,
            interactive: MockInteractiveProvider::new(),
        })
    }

    pub fn with_mock_executable(self, name: &str, behavior: MockBehavior) -> Result<Self> {
        self.env.add_mock_executable(name, &behavior)?;
        Ok(self)
    }

    /// Point the session at a Dataverse stub, signing in as a service principal
    pub fn with_dataverse(mut self, stub: &DataverseStub) -> Self {
        self.config.environment_url = Some(stub.url());
        self.config.authority_url = stub.url();
        self.config.auth = AuthMethod::ClientSecret;
        self.config.tenant_id = Some(DataverseStub::TENANT.to_string());
        self.config.client_id = Some("e2e-client".to_string());
        self.config.client_secret = Some("e2e-secret".to_string());
        self
    }

    pub fn with_interactive(mut self, interactive: MockInteractiveProvider) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_config(mut self, update: impl FnOnce(&mut AppConfig)) -> Self {
        update(&mut self.config);
        self
    }

    /// The session plus the environment that must outlive it
    pub fn build(self) -> Result<(HermeticSession, TestEnvironment)> {
        // Only the stub bin directory, so a real pac on the host never runs
        let process =
            LiveProcessProvider::with_custom_path(self.env.bin_path.to_string_lossy().to_string());

        let session = CommandSession::new_with_providers(
            LiveFileSystemProvider,
            LiveNetworkProvider::new(),
            process,
            LiveConfigProvider::new(self.config),
            self.interactive,
        );

        Ok((session, self.env))
    }
}
