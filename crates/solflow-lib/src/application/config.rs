//! Application configuration management
//!
//! Handles config loading, validation, and environment variable processing
//! following the precedence: defaults -> .env -> env vars -> CLI args.

use crate::primitives::*;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default configuration values
pub mod defaults {
    pub const LOG_LEVEL: &str = "0"; // Error-only logging by default
    pub const LOG_FORMAT: &str = "text";
    pub const NET_TIMEOUT: &str = "30";
    pub const LOG_OUTPUT: &str = "stderr";
    pub const COLOR: &str = "auto";
    pub const AUTH: &str = "interactive";
    pub const AUTHORITY_URL: &str = "https://login.microsoftonline.com";
    pub const OUTPUT_DIR: &str = "solutions";
    pub const PAC_PROGRAM: &str = "pac";
}

/// Default value functions for configuration fields
mod default_fns {
    use super::*;

    pub fn log_level() -> u8 {
        0
    }

    pub fn log_format() -> LogFormat {
        LogFormat::Text
    }

    pub fn net_timeout() -> u64 {
        30
    }

    pub fn log_output() -> LogOutput {
        LogOutput::Stderr
    }

    pub fn color_intent() -> ColorIntent {
        ColorIntent::Auto
    }

    pub fn auth() -> AuthMethod {
        AuthMethod::Interactive
    }

    pub fn authority_url() -> String {
        defaults::AUTHORITY_URL.to_string()
    }

    pub fn output_dir() -> PathBuf {
        PathBuf::from(defaults::OUTPUT_DIR)
    }

    pub fn pac_program() -> String {
        defaults::PAC_PROGRAM.to_string()
    }
}

/// Application configuration structure
#[derive(Debug, Clone, Parser, Deserialize)]
pub struct AppConfig {
    /// Working directory (relative output paths resolve against it)
    #[arg(short, long, env = "SOLFLOW_WORKDIR")]
    #[serde(default)]
    pub workdir: Option<PathBuf>,

    /// Dataverse environment URL, e.g. https://org.crm.dynamics.com
    #[arg(short, long, env = "SOLFLOW_ENVIRONMENT_URL")]
    #[serde(default)]
    pub environment_url: Option<String>,

    /// Token flow (interactive, device-code, client-secret)
    #[arg(short, long, env = "SOLFLOW_AUTH", default_value = defaults::AUTH)]
    #[serde(default = "default_fns::auth")]
    pub auth: AuthMethod,

    /// Entra ID tenant id or domain
    #[arg(long, env = "SOLFLOW_TENANT_ID")]
    #[serde(default)]
    pub tenant_id: Option<String>,

    /// App registration (client) id
    #[arg(long, env = "SOLFLOW_CLIENT_ID")]
    #[serde(default)]
    pub client_id: Option<String>,

    /// Client secret for the client-secret flow
    #[arg(long, env = "SOLFLOW_CLIENT_SECRET", hide_env_values = true)]
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Login authority
    #[arg(long, env = "SOLFLOW_AUTHORITY_URL", default_value = defaults::AUTHORITY_URL)]
    #[serde(default = "default_fns::authority_url")]
    pub authority_url: String,

    /// Directory receiving exported and unpacked solutions
    #[arg(short, long, env = "SOLFLOW_OUTPUT_DIR", default_value = defaults::OUTPUT_DIR)]
    #[serde(default = "default_fns::output_dir")]
    pub output_dir: PathBuf,

    /// Power Platform CLI executable
    #[arg(long = "pac", env = "SOLFLOW_PAC", default_value = defaults::PAC_PROGRAM)]
    #[serde(default = "default_fns::pac_program")]
    pub pac_program: String,

    /// HTTP timeout in seconds
    #[arg(short, long, env = "SOLFLOW_NET_TIMEOUT", default_value = defaults::NET_TIMEOUT)]
    #[serde(default = "default_fns::net_timeout")]
    pub net_timeout: u64,

    /// Accept prompt defaults without asking (never deletes the source)
    #[arg(short, long, env = "SOLFLOW_YES")]
    #[serde(default)]
    pub yes: bool,

    /// Verbosity level (0=error, 1=warn, 2=info, 3=debug, 4=trace)
    #[arg(long, env = "SOLFLOW_LOG_LEVEL", default_value = defaults::LOG_LEVEL)]
    #[serde(default = "default_fns::log_level")]
    pub log_level: u8,

    /// Output format (text, json, yaml)
    #[arg(long, env = "SOLFLOW_LOG_FORMAT", default_value = defaults::LOG_FORMAT)]
    #[serde(default = "default_fns::log_format")]
    pub log_format: LogFormat,

    /// Log output stream (stderr, stdout)
    #[arg(long, env = "SOLFLOW_LOG_OUTPUT", default_value = defaults::LOG_OUTPUT)]
    #[serde(default = "default_fns::log_output")]
    pub log_output: LogOutput,

    /// Color output control (auto, always, never)
    #[arg(short, long, env = "SOLFLOW_COLOR", default_value = defaults::COLOR)]
    #[serde(default = "default_fns::color_intent")]
    pub color: ColorIntent,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workdir: None,
            environment_url: None,
            auth: default_fns::auth(),
            tenant_id: None,
            client_id: None,
            client_secret: None,
            authority_url: default_fns::authority_url(),
            output_dir: default_fns::output_dir(),
            pac_program: default_fns::pac_program(),
            net_timeout: default_fns::net_timeout(),
            yes: false,
            log_level: default_fns::log_level(),
            log_format: default_fns::log_format(),
            log_output: default_fns::log_output(),
            color: default_fns::color_intent(),
        }
    }
}

impl AppConfig {
    /// Create LoggerConfig from AppConfig and TerminalCapabilities
    pub fn to_logger_config(
        &self,
        terminal_caps: &crate::terminal::TerminalCapabilities,
    ) -> LoggerConfig {
        LoggerConfig {
            level: LogLevel::from_verbosity(self.log_level),
            format: self.log_format,
            output: self.log_output,
            terminal_caps: terminal_caps.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.net_timeout)
    }

    /// Environment URL without trailing slash, or a `MissingSetting` error
    pub fn require_environment_url(&self) -> Result<&str, ConfigError> {
        self.environment_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingSetting {
                setting: "environment_url",
                env: "SOLFLOW_ENVIRONMENT_URL",
                flag: "environment-url",
            })
    }

    /// Output directory, resolved against `workdir` when relative
    pub fn output_path(&self) -> PathBuf {
        match &self.workdir {
            Some(workdir) if self.output_dir.is_relative() => workdir.join(&self.output_dir),
            _ => self.output_dir.clone(),
        }
    }

    /// Merge this config with another, taking non-default values from other
    pub fn merge_with(mut self, other: Self) -> Self {
        // For Option fields, take other if it's Some
        if other.workdir.is_some() {
            self.workdir = other.workdir;
        }
        if other.environment_url.is_some() {
            self.environment_url = other.environment_url;
        }
        if other.tenant_id.is_some() {
            self.tenant_id = other.tenant_id;
        }
        if other.client_id.is_some() {
            self.client_id = other.client_id;
        }
        if other.client_secret.is_some() {
            self.client_secret = other.client_secret;
        }

        // For primitive fields, take other if it's not the default
        if other.log_level != default_fns::log_level() {
            self.log_level = other.log_level;
        }
        if other.net_timeout != default_fns::net_timeout() {
            self.net_timeout = other.net_timeout;
        }
        if other.authority_url != default_fns::authority_url() {
            self.authority_url = other.authority_url;
        }
        if other.output_dir != default_fns::output_dir() {
            self.output_dir = other.output_dir;
        }
        if other.pac_program != default_fns::pac_program() {
            self.pac_program = other.pac_program;
        }
        if other.yes {
            self.yes = true;
        }

        // For enums, detect if it's non-default
        if other.auth != default_fns::auth() {
            self.auth = other.auth;
        }
        if !matches!(other.log_format, LogFormat::Text) {
            self.log_format = other.log_format;
        }
        if !matches!(other.log_output, LogOutput::Stderr) {
            self.log_output = other.log_output;
        }
        if !matches!(other.color, ColorIntent::Auto) {
            self.color = other.color;
        }

        self
    }

    /// Validate the final configuration
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        match &self.workdir {
            None => {
                self.workdir = Some(
                    std::env::current_dir()
                        .map_err(|e| ConfigError::CurrentDirError { source: e })?,
                );
            }
            Some(dir) if !dir.is_dir() => {
                return Err(ConfigError::InvalidWorkDir {
                    path: dir.display().to_string(),
                });
            }
            Some(_) => {}
        }

        if self.net_timeout == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "net_timeout must be at least 1 second".to_string(),
            });
        }

        if let Some(url) = &self.environment_url {
            let trimmed = url.trim();
            if !trimmed.is_empty()
                && !(trimmed.starts_with("https://") || trimmed.starts_with("http://"))
            {
                return Err(ConfigError::ValidationFailed {
                    reason: format!("environment_url '{}' must start with https://", trimmed),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    include!("config.test.rs");
}
