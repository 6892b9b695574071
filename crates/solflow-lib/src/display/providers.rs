//! Display seams
//!
//! Command handlers and observers write through these traits only, so the
//! same code drives the terminal in production and a recorder in tests.

use std::fmt;

/// Entry point handed to handlers by the session
pub trait DisplayProvider {
    fn status(&self) -> Box<dyn StatusProvider>;

    fn progress(&self) -> Box<dyn ProgressProvider>;

    fn table(&self) -> Box<dyn StructuredProvider>;
}

/// One-line status output. `item`/`details` pairs render as `item: details`.
pub trait StatusProvider {
    fn success(&self, item: &str, details: &str);

    fn error(&self, item: &str, details: &str);

    fn warning(&self, message: &str);

    fn info(&self, message: &str);

    /// Plain line, no symbol
    fn message(&self, text: &str);

    fn emphasis(&self, text: &str);

    fn subtle(&self, text: &str);

    fn list(&self, items: &[&str]);

    /// Success line without details
    fn complete(&self, task: &str);

    /// Blank line plus a bold heading
    fn section(&self, title: &str);
}

pub trait ProgressProvider {
    /// Bar for a loop of known length
    fn bar(&self, total: u64) -> Box<dyn ProgressTracker>;
}

pub trait ProgressTracker {
    fn inc(&self);

    /// Show the item currently being worked on
    fn tick(&self, item: &str);

    /// Remove the bar from the terminal
    fn finish_clear(&self);
}

pub trait StructuredProvider {
    fn table(&self, headers: &[&str], rows: &[Vec<&str>]);

    fn list(&self, items: &[&str]);

    /// Aligned `key: value` lines
    fn properties(&self, pairs: &[(&str, &str)]);
}

/// Counts from a loop over independent items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchSummary {
    pub fn new(successful: usize, failed: usize) -> Self {
        Self {
            successful,
            failed,
            skipped: 0,
        }
    }

    pub fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn total(&self) -> usize {
        self.successful + self.failed + self.skipped
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.successful > 0
    }

    pub fn is_partial_success(&self) -> bool {
        self.successful > 0 && self.failed > 0
    }

    pub fn is_failure(&self) -> bool {
        self.failed > 0 && self.successful == 0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} successful, {} failed", self.successful, self.failed)?;
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        Ok(())
    }
}

/// Shared rendering built on the provider traits
pub trait DisplayProviderExt: DisplayProvider {
    /// Closing line for a batch: success, warning or error depending on the
    /// counts, followed by the numbers
    fn display_summary(&self, operation: &str, summary: &BatchSummary) {
        let status = self.status();
        let detail = if summary.is_success() {
            status.complete(&format!("{} finished", operation));
            count_line(summary.successful, "successful")
        } else if summary.is_partial_success() {
            status.warning(&format!("{} finished with failures", operation));
            summary.to_string()
        } else if summary.is_failure() {
            status.error(operation, "failed");
            count_line(summary.failed, "failed")
        } else {
            status.info(&format!("{}: nothing to do", operation));
            return;
        };
        status.subtle(&format!("   {}", detail));
    }
}

impl<T: DisplayProvider + ?Sized> DisplayProviderExt for T {}

fn count_line(count: usize, outcome: &str) -> String {
    let noun = if count == 1 { "item" } else { "items" };
    format!("{} {} {}", count, noun, outcome)
}

#[cfg(test)]
mod tests {
    include!("providers.test.rs");
}
