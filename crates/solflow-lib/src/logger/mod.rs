//! Structured logging setup
//!
//! One tracing subscriber per process. Log lines go through the indicatif
//! writers so they never tear an active progress bar.

use crate::primitives::*;
use std::sync::OnceLock;
use tracing::Subscriber;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Noisy transport crates are pinned to warn regardless of verbosity
const QUIET_DEPENDENCIES: &[&str] = &["hyper_util", "reqwest", "h2", "rustls", "mio", "want"];

/// Handle to the process-wide tracing setup
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// Install the subscriber. Fails if one is already installed.
    pub fn init(config: LoggerConfig) -> Result<&'static Self, LoggerError> {
        if GLOBAL_LOGGER.get().is_some() {
            return Err(LoggerError::AlreadyInitialized);
        }

        let indicatif_layer = IndicatifLayer::new();

        // RUST_LOG wins over the configured verbosity
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directives(config.level)));

        let ansi = config.terminal_caps.color != TerminalColorCaps::None;
        let fmt_layer = match config.output {
            LogOutput::Stderr => {
                format_layer(indicatif_layer.get_stderr_writer(), config.format, ansi)
            }
            LogOutput::Stdout => {
                format_layer(indicatif_layer.get_stdout_writer(), config.format, ansi)
            }
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(indicatif_layer)
            .try_init()
            .map_err(|e| LoggerError::InitializationFailed {
                reason: e.to_string(),
            })?;

        GLOBAL_LOGGER
            .set(Logger {
                level: config.level,
            })
            .map_err(|_| LoggerError::AlreadyInitialized)?;

        tracing::debug!(
            level = ?config.level,
            format = ?config.format,
            output = ?config.output,
            color_support = ?config.terminal_caps.color,
            "Logger initialized"
        );

        GLOBAL_LOGGER.get().ok_or(LoggerError::AlreadyInitialized)
    }

    pub fn global() -> Option<&'static Self> {
        GLOBAL_LOGGER.get()
    }

    pub fn is_initialized() -> bool {
        GLOBAL_LOGGER.get().is_some()
    }

    /// Verbosity the logger was initialized with
    pub fn level(&self) -> LogLevel {
        self.level
    }
}

/// `fmt` layer for one writer. JSON lines never carry colour codes.
fn format_layer<S, W>(writer: W, format: LogFormat, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer);
    match format {
        LogFormat::Text => layer.with_ansi(ansi).compact().boxed(),
        LogFormat::Json => layer.with_ansi(false).json().boxed(),
        LogFormat::Yaml => layer.with_ansi(ansi).pretty().boxed(),
    }
}

/// EnvFilter directives: our crates at `level`, transport crates at warn
pub(crate) fn filter_directives(level: LogLevel) -> String {
    let level_str = level.as_filter_directive();
    let mut directives = vec![
        format!("solflow={}", level_str),
        format!("solflow_lib={}", level_str),
    ];
    directives.extend(QUIET_DEPENDENCIES.iter().map(|krate| format!("{}=warn", krate)));
    directives.push(level_str.to_string());
    directives.join(",")
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
