//! Structured output display (tables, lists)
//!
//! Table layout measures visible width, so styled cells and wide glyphs
//! line up the same way plain ASCII does.

use super::styling::StyleManager;
use crate::terminal::TerminalCapabilities;
use console::{measure_text_width, pad_str, truncate_str, Alignment};
use std::cmp;

const COLUMN_SEPARATOR: &str = " | ";

/// Structured display manager for tables and lists
pub struct StructuredDisplay<'a> {
    styling: &'a StyleManager,
    capabilities: &'a TerminalCapabilities,
}

impl<'a> StructuredDisplay<'a> {
    pub(crate) fn new(styling: &'a StyleManager, capabilities: &'a TerminalCapabilities) -> Self {
        Self {
            styling,
            capabilities,
        }
    }

    /// Start a table builder
    ///
    /// ```ignore
    /// Display::table()
    ///     .table()
    ///     .header(&["Type", "Name", "Object Id"])
    ///     .row(&["Entity", "account", "70816501-..."])
    ///     .render();
    /// ```
    pub fn table(&self) -> TableDisplay<'a> {
        TableDisplay::new(self.styling, self.capabilities)
    }

    /// Aligned key-value pairs
    pub fn pairs(&self, pairs: &[(&str, &str)]) {
        for line in pair_lines(self.styling, pairs) {
            println!("{}", line);
        }
    }

    pub fn list(&self, items: &[&str]) {
        for item in items {
            println!("{} {}", self.styling.bullet(), item);
        }
    }
}

/// Table display builder
pub struct TableDisplay<'a> {
    styling: &'a StyleManager,
    capabilities: &'a TerminalCapabilities,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    max_width: Option<usize>,
}

impl<'a> TableDisplay<'a> {
    fn new(styling: &'a StyleManager, capabilities: &'a TerminalCapabilities) -> Self {
        Self {
            styling,
            capabilities,
            headers: Vec::new(),
            rows: Vec::new(),
            max_width: None,
        }
    }

    pub fn header(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn row(mut self, cells: &[&str]) -> Self {
        self.rows.push(cells.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Maximum table width (terminal columns if not set)
    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Lay the table out into printable lines
    pub fn lines(&self) -> Vec<String> {
        let num_cols = cmp::max(
            self.headers.len(),
            self.rows.iter().map(Vec::len).max().unwrap_or(0),
        );
        if num_cols == 0 {
            return Vec::new();
        }

        let mut col_widths = vec![0usize; num_cols];
        for row in std::iter::once(&self.headers).chain(self.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                col_widths[i] = cmp::max(col_widths[i], measure_text_width(cell));
            }
        }

        let terminal_width = self
            .max_width
            .unwrap_or(self.capabilities.cols as usize);
        let separators = (num_cols - 1) * COLUMN_SEPARATOR.len();
        let total_width = col_widths.iter().sum::<usize>() + separators;
        if total_width > terminal_width {
            shrink_widest(&mut col_widths, total_width - terminal_width);
        }

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        if !self.headers.is_empty() {
            lines.push(self.layout_row(&self.headers, &col_widths, true));
            let rule = col_widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-");
            lines.push(self.styling.style_subtle(&rule));
        }
        for row in &self.rows {
            lines.push(self.layout_row(row, &col_widths, false));
        }
        lines
    }

    pub fn render(self) {
        for line in self.lines() {
            println!("{}", line);
        }
    }

    fn layout_row(&self, cells: &[String], widths: &[usize], is_header: bool) -> String {
        let rendered: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let fitted = truncate_str(cell, *width, "...");
                let padded = pad_str(&fitted, *width, Alignment::Left, None).into_owned();
                if is_header {
                    self.styling.style_emphasis(&padded)
                } else {
                    padded
                }
            })
            .collect();
        rendered.join(COLUMN_SEPARATOR).trim_end().to_string()
    }
}

/// Take width away from the widest columns first, never below 3 cells
fn shrink_widest(widths: &mut [usize], mut excess: usize) {
    const MIN_WIDTH: usize = 3;
    while excess > 0 {
        let Some((idx, widest)) = widths
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(_, w)| *w)
        else {
            return;
        };
        if widest <= MIN_WIDTH {
            return;
        }
        widths[idx] -= 1;
        excess -= 1;
    }
}

pub(crate) fn pair_lines(styling: &StyleManager, pairs: &[(&str, &str)]) -> Vec<String> {
    let key_width = pairs
        .iter()
        .map(|(key, _)| measure_text_width(key))
        .max()
        .unwrap_or(0);

    pairs
        .iter()
        .map(|(key, value)| {
            let padded = pad_str(key, key_width, Alignment::Left, None);
            format!("{} : {}", styling.style_subtle(&padded), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    include!("structured.test.rs");
}
