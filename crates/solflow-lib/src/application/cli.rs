use crate::primitives::{ConfigError, IncrementPolicy};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use super::config::AppConfig;

/// solflow CLI - Power Platform solution lifecycle automation
#[derive(Debug, Clone, Parser)]
#[command(name = "solflow")]
#[command(about = "Redistribute, version and export Power Platform solutions")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration options
    #[command(flatten)]
    pub config: AppConfig,

    /// solflow commands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Configuration loaded from CLI
pub struct CliConfig {
    pub app_config: AppConfig,
    pub command: Option<Commands>,
}

impl CliConfig {
    /// Load .env files, parse arguments, then layer the result over defaults
    pub fn load() -> Result<Self, ConfigError> {
        super::loader::load_env_files(super::loader::ENV_FILES)?;
        let cli = Cli::parse();
        Ok(Self {
            app_config: AppConfig::load(cli.config)?,
            command: cli.command,
        })
    }
}

/// Available solflow commands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Check that the Power Platform CLI and Azure CLI are installed
    Requirements,

    /// Sign in and show the identity Dataverse sees
    Whoami,

    /// List a solution's components and where each would move
    Components {
        /// Solution unique name (prompted when omitted)
        solution: Option<String>,
    },

    /// Increment a solution's version without exporting it
    Bump {
        /// Solution unique name (prompted when omitted)
        solution: Option<String>,

        /// Which version part to increment
        #[arg(short, long, value_enum, default_value = "patch")]
        increment: IncrementPolicy,

        /// Show the new version without writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Bump the version, then export and unpack managed and unmanaged packages
    Export {
        /// Solution unique name (prompted when omitted)
        solution: Option<String>,

        /// Which version part to increment
        #[arg(short, long, value_enum, default_value = "patch")]
        increment: IncrementPolicy,
    },

    /// Move a solution's components into their target solutions
    Migrate {
        /// Source solution unique name (prompted when omitted)
        source: Option<String>,

        /// Answer the "proceed" prompt (bare flag means yes)
        #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set)]
        proceed: Option<bool>,

        /// Answer the "export affected targets" prompt
        #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set)]
        export: Option<bool>,

        /// Answer the "delete source solution" prompt
        #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set)]
        delete_source: Option<bool>,

        /// Write a JSON report of the run to this path
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            command: None,
        }
    }
}

#[cfg(test)]
mod tests {
    include!("cli.test.rs");
}
