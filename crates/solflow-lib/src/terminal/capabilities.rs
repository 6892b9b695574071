use crate::application::AppConfig;
use crate::primitives::*;
use serde::Deserialize;
use std::io::{self, IsTerminal};

/// What the attached terminal can render, resolved once at startup
#[derive(Debug, Clone)]
pub struct TerminalCapabilities {
    pub color: TerminalColorCaps,
    pub unicode: TerminalUnicodeCaps,
    pub cols: u16,
    /// stdout is a terminal rather than a pipe or file
    pub interactive: bool,
}

impl Default for TerminalCapabilities {
    fn default() -> Self {
        Self {
            color: TerminalColorCaps::None,
            unicode: TerminalUnicodeCaps::Ascii,
            cols: 80,
            interactive: false,
        }
    }
}

/// Terminal-describing variables, read through envy
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TerminalEnv {
    pub colorterm: Option<String>,
    pub term: Option<String>,
    pub term_program: Option<String>,
    pub lang: Option<String>,
    pub lc_ctype: Option<String>,
    pub lc_all: Option<String>,
    /// Set inside Windows Terminal
    pub wt_session: Option<String>,
    pub columns: Option<String>,
}

impl TerminalCapabilities {
    pub fn detect_from_config(config: &AppConfig) -> Result<Self, TerminalError> {
        let env: TerminalEnv = envy::from_env()?;
        let interactive = io::stdout().is_terminal();

        Ok(Self {
            color: resolve_color(config.color, &env, interactive),
            unicode: detect_unicode_capabilities(&env),
            cols: detect_columns(&env, interactive),
            interactive,
        })
    }
}

/// `--color` wins over detection; `auto` also requires a terminal
pub(crate) fn resolve_color(
    intent: ColorIntent,
    env: &TerminalEnv,
    interactive: bool,
) -> TerminalColorCaps {
    match intent {
        ColorIntent::Never => TerminalColorCaps::None,
        ColorIntent::Always => {
            detect_color_from_environment(env).max(TerminalColorCaps::Ansi16)
        }
        ColorIntent::Auto if !interactive => TerminalColorCaps::None,
        ColorIntent::Auto => detect_color_from_environment(env),
    }
}

pub(crate) fn detect_color_from_environment(env: &TerminalEnv) -> TerminalColorCaps {
    if let Some(colorterm) = &env.colorterm {
        let colorterm = colorterm.to_lowercase();
        if colorterm == "truecolor" || colorterm == "24bit" {
            return TerminalColorCaps::TrueColor;
        }
    }

    // Windows Terminal and the common macOS terminals all render 24-bit colour
    if env.wt_session.is_some() {
        return TerminalColorCaps::TrueColor;
    }
    if let Some(program) = &env.term_program {
        match program.as_str() {
            "iTerm.app" | "vscode" | "WezTerm" | "ghostty" => return TerminalColorCaps::TrueColor,
            "Apple_Terminal" => return TerminalColorCaps::Ansi256,
            _ => {}
        }
    }

    match env.term.as_deref() {
        Some("dumb") => TerminalColorCaps::None,
        Some(term) if term.contains("256color") => TerminalColorCaps::Ansi256,
        Some(_) => TerminalColorCaps::Ansi16,
        None => TerminalColorCaps::None,
    }
}

pub(crate) fn detect_unicode_capabilities(env: &TerminalEnv) -> TerminalUnicodeCaps {
    // LC_ALL > LC_CTYPE > LANG, first non-empty wins
    let locale = [&env.lc_all, &env.lc_ctype, &env.lang]
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty());

    match locale {
        Some(value) if value.to_uppercase().contains("UTF-8") || value.to_uppercase().contains("UTF8") => {
            TerminalUnicodeCaps::BasicUnicode
        }
        Some(_) => TerminalUnicodeCaps::Ascii,
        // Windows consoles rarely export a locale but handle unicode
        None if env.wt_session.is_some() => TerminalUnicodeCaps::BasicUnicode,
        None => TerminalUnicodeCaps::Ascii,
    }
}

fn detect_columns(env: &TerminalEnv, interactive: bool) -> u16 {
    if interactive {
        if let Some((_rows, cols)) = console::Term::stdout().size_checked() {
            return cols;
        }
    }

    env
        .columns
        .as_deref()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|cols| *cols > 0)
        .unwrap_or(80)
}

#[cfg(test)]
mod tests {
    include!("capabilities.test.rs");
}
