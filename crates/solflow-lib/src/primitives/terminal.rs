use super::impl_fromstr_for_value_enum;
use thiserror::Error;

/// Requested colour behaviour, before the terminal is probed
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ColorIntent {
    /// Colour when stdout is a terminal that supports it
    #[value(aliases = ["automatic", "detect", "default"])]
    Auto,

    /// Colour even when piped
    #[value(aliases = ["force", "on"])]
    Always,

    /// Plain output
    #[value(alias = "off")]
    Never,
}

/// How many colours the terminal can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TerminalColorCaps {
    None,
    Ansi16,
    Ansi256,
    TrueColor,
}

/// Whether status glyphs can use unicode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalUnicodeCaps {
    Ascii,
    BasicUnicode,
}

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("Environment variable parsing failed: {source}")]
    EnvironmentParsingFailed {
        #[from]
        source: envy::Error,
    },
}

impl_fromstr_for_value_enum!(ColorIntent, "invalid color mode");
