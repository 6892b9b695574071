//! Status display for user feedback
//!
//! Semantic status lines printed to stdout with terminal-aware symbols.

use super::styling::StyleManager;

/// Status display manager for semantic user feedback
pub struct StatusDisplay<'a> {
    styling: &'a StyleManager,
}

impl<'a> StatusDisplay<'a> {
    pub(crate) fn new(styling: &'a StyleManager) -> Self {
        Self { styling }
    }

    /// Output: `✓ item: details`
    pub fn success(&self, item: &str, details: &str) {
        println!("{}", self.styling.format_success(&join_detail(item, details)));
    }

    /// Output: `✗ item: details`
    pub fn error(&self, item: &str, details: &str) {
        println!("{}", self.styling.format_error(&join_detail(item, details)));
    }

    pub fn warning(&self, message: &str) {
        println!("{}", self.styling.format_warning(message));
    }

    pub fn info(&self, message: &str) {
        println!("{}", self.styling.format_info(message));
    }

    /// Plain line without a status symbol
    pub fn message(&self, text: &str) {
        println!("{}", text);
    }

    pub fn emphasis(&self, text: &str) {
        println!("{}", self.styling.style_emphasis(text));
    }

    pub fn subtle(&self, text: &str) {
        println!("{}", self.styling.style_subtle(text));
    }

    /// Bulleted list, indented two spaces
    pub fn list(&self, items: &[&str]) {
        for item in items {
            println!("  {} {}", self.styling.bullet(), item);
        }
    }

    pub fn complete(&self, task: &str) {
        println!("{}", self.styling.format_success(task));
    }

    /// Blank line followed by a bold title
    pub fn section(&self, title: &str) {
        println!();
        println!("{}", self.styling.style_emphasis(title));
    }
}

pub(crate) fn join_detail(item: &str, details: &str) -> String {
    if details.is_empty() {
        item.to_string()
    } else {
        format!("{}: {}", item, details)
    }
}

#[cfg(test)]
mod tests {
    include!("status.test.rs");
}
