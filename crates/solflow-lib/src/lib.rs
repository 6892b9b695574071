//! # solflow Library
//!
//! Power Platform solution lifecycle automation: redistribute a feature
//! solution's components into per-type target solutions, bump versions and
//! export managed and unmanaged packages.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Foundation types, errors, and shared coordination
//! - [`terminal`] - Cross-platform terminal capability detection
//! - [`logger`] - Structured logging with progress tracking
//! - [`display`] - User-facing status, progress and tables
//! - [`dataverse`] - Web API client and access-token flows
//! - [`pac`] - Power Platform CLI wrapper
//! - [`solution`] - Classifier, migration orchestrator and export manager
//! - [`application`] - CLI interface, configuration and command handlers
//!
//! ## Quick Start
//!
//! ```no_run
//! // Parse the command line and run the selected command
//! solflow_lib::main().unwrap();
//! ```

pub mod application;
pub mod dataverse;
pub mod display;
pub mod logger;
pub mod pac;
pub mod primitives;
pub mod solution;
pub mod terminal;

// Re-export commonly used types for convenience
pub use application::{AppConfig, Cli, Commands, execute_command};
pub use logger::Logger;
pub use primitives::{
    AuthMethod, ColorIntent, ConfigError, IncrementPolicy, LogFormat, LogLevel, LogOutput,
    LoggerError, PackageType, TerminalColorCaps,
};
pub use terminal::TerminalCapabilities;

// Private imports for the main function
use anyhow::Result;
use application::CliConfig;

pub fn main() -> Result<()> {
    // Load CLI configuration
    let config = CliConfig::load()?;

    // Execute the command
    execute_command(config)
}
