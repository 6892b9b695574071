//! Terminal-aware styling
//!
//! Semantic color intents and status symbols, resolved once from the
//! detected terminal capabilities.

use crate::primitives::{TerminalColorCaps, TerminalUnicodeCaps};
use crate::terminal::TerminalCapabilities;
use console::Style;

/// Status glyphs for one unicode capability level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbols {
    pub checkmark: &'static str,
    pub cross: &'static str,
    pub warning: &'static str,
    pub info: &'static str,
    pub bullet: &'static str,
}

impl Symbols {
    pub const UNICODE: Symbols = Symbols {
        checkmark: "✓",
        cross: "✗",
        warning: "⚠",
        info: "ℹ",
        bullet: "•",
    };

    pub const ASCII: Symbols = Symbols {
        checkmark: "+",
        cross: "x",
        warning: "!",
        info: "i",
        bullet: "-",
    };

    pub fn for_caps(unicode: TerminalUnicodeCaps) -> Self {
        match unicode {
            TerminalUnicodeCaps::BasicUnicode => Self::UNICODE,
            TerminalUnicodeCaps::Ascii => Self::ASCII,
        }
    }
}

/// Style manager mapping semantic intents to console styles
#[derive(Debug, Clone)]
pub struct StyleManager {
    success: Style,
    error: Style,
    warning: Style,
    info: Style,
    emphasis: Style,
    subtle: Style,
    symbols: Symbols,
}

impl StyleManager {
    pub fn new(capabilities: &TerminalCapabilities) -> Self {
        let colored = capabilities.color != TerminalColorCaps::None;
        let style = |base: Style| base.force_styling(colored);

        Self {
            success: style(Style::new().green()),
            error: style(Style::new().red()),
            warning: style(Style::new().yellow()),
            info: style(Style::new().cyan()),
            emphasis: style(Style::new().bold()),
            subtle: style(Style::new().dim()),
            symbols: Symbols::for_caps(capabilities.unicode),
        }
    }

    pub fn style_success(&self, text: &str) -> String {
        self.success.apply_to(text).to_string()
    }

    pub fn style_error(&self, text: &str) -> String {
        self.error.apply_to(text).to_string()
    }

    pub fn style_warning(&self, text: &str) -> String {
        self.warning.apply_to(text).to_string()
    }

    pub fn style_info(&self, text: &str) -> String {
        self.info.apply_to(text).to_string()
    }

    /// Bold
    pub fn style_emphasis(&self, text: &str) -> String {
        self.emphasis.apply_to(text).to_string()
    }

    /// Dimmed
    pub fn style_subtle(&self, text: &str) -> String {
        self.subtle.apply_to(text).to_string()
    }

    pub fn format_success(&self, message: &str) -> String {
        format!("{} {}", self.style_success(self.symbols.checkmark), message)
    }

    pub fn format_error(&self, message: &str) -> String {
        format!("{} {}", self.style_error(self.symbols.cross), message)
    }

    pub fn format_warning(&self, message: &str) -> String {
        format!("{} {}", self.style_warning(self.symbols.warning), message)
    }

    pub fn format_info(&self, message: &str) -> String {
        format!("{} {}", self.style_info(self.symbols.info), message)
    }

    pub fn bullet(&self) -> &'static str {
        self.symbols.bullet
    }
}

#[cfg(test)]
mod tests {
    include!("styling.test.rs");
}
