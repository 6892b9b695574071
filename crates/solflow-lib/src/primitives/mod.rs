//! Shared types: selector enums, logger settings and error enums
//!
//! Every selector is a clap `ValueEnum`, so the aliases declared here are
//! accepted both on the command line and by `str::parse`.

use thiserror::Error;

mod shared;
use shared::impl_fromstr_for_value_enum;

/// Solution lifecycle selectors (increment policy, auth flow, package type)
pub mod solution;
pub use solution::*;

/// Terminal capability levels and detection errors
pub mod terminal;
pub use terminal::*;

/// Stream the log lines are written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stderr,
    Stdout,
}

/// Log verbosity, ordered from quietest to noisiest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum LogLevel {
    #[value(aliases = ["err", "fatal", "critical"])]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warning,
    #[value(alias = "information")]
    Info,
    #[value(alias = "debugging")]
    Debug,
    #[value(aliases = ["tracing", "verbose"])]
    Trace,
}

/// Shape of each log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact single-line text
    #[value(aliases = ["txt", "plain"])]
    Text,
    /// One JSON object per event
    Json,
    /// Multi-line human-oriented layout
    #[value(alias = "yml")]
    Yaml,
}

/// Everything `Logger::init` needs
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    pub terminal_caps: crate::terminal::TerminalCapabilities,
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load environment file '{file}': {source}")]
    EnvFileError {
        file: String,
        source: dotenvy::Error,
    },

    #[error("Display already initialized")]
    AlreadyInitialized,

    #[error("Invalid working directory: {path}")]
    InvalidWorkDir { path: String },

    #[error("Failed to parse environment variables: {source}")]
    EnvironmentParsingFailed {
        #[from]
        source: envy::Error,
    },

    #[error("Missing required setting '{setting}' (set {env} or pass --{flag})")]
    MissingSetting {
        setting: &'static str,
        env: &'static str,
        flag: &'static str,
    },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Failed to get current directory: {source}")]
    CurrentDirError {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration value '{value}': {reason}")]
    ParseError { value: String, reason: String },
}

impl ConfigError {
    /// Troubleshooting checklist shown alongside a fatal configuration error
    pub fn hints(&self) -> Vec<&'static str> {
        match self {
            ConfigError::MissingSetting { .. } => vec![
                "Add the setting to .env or .env.local in the working directory",
                "Or export it in the shell / pipeline variables",
                "Run 'solflow --help' to see every flag and its environment variable",
            ],
            ConfigError::EnvFileError { .. } => vec![
                "Check that .env / .env.local use KEY=value lines",
                "Quote values containing spaces or '#'",
            ],
            _ => vec!["Run 'solflow --help' to review the available settings"],
        }
    }
}

/// Tracing subscriber setup errors
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to initialize tracing subscriber: {reason}")]
    InitializationFailed { reason: String },

    #[error("Logger already initialized")]
    AlreadyInitialized,
}

impl LogLevel {
    /// Map the numeric `--log-level` (0 = errors only) to a level
    pub fn from_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Error,
            1 => LogLevel::Warning,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            4.. => LogLevel::Trace,
        }
    }

    /// Level name as `EnvFilter` spells it
    pub fn as_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl_fromstr_for_value_enum!(LogLevel, "invalid log level");
impl_fromstr_for_value_enum!(LogFormat, "invalid log format");
impl_fromstr_for_value_enum!(LogOutput, "invalid log output stream");

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
