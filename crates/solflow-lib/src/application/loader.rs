//! Configuration loading
//!
//! Coordinates loading configuration from .env files, the process
//! environment and the parsed command line.

use crate::primitives::ConfigError;
use std::path::Path;

use super::{config::AppConfig, env::StandardEnv};

/// Environment files read from the current directory, first match per key wins
pub const ENV_FILES: &[&str] = &[".env.local", ".env"];

/// Load `.env`-style files into the process environment. Missing files are
/// skipped; variables already set are never overwritten.
pub fn load_env_files(files: &[&str]) -> Result<(), ConfigError> {
    for env_file in files {
        load_env_file(Path::new(env_file))?;
    }
    Ok(())
}

fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!(file = %path.display(), "Loaded environment file");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::EnvFileError {
            file: path.display().to_string(),
            source: e,
        }),
    }
}

impl AppConfig {
    /// Load config: defaults -> .env -> env vars -> CLI
    ///
    /// `cli` is the parsed command line, which already carries .env and
    /// `SOLFLOW_*` values through clap's `env` attributes.
    pub fn load(cli: AppConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Standard variables (NO_COLOR, CI, ...) adjust the default colour intent
        let env_config = StandardEnv::load()?;
        config.color = env_config.apply_color_config(config.color);

        config = config.merge_with(cli);
        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    include!("loader.test.rs");
}
