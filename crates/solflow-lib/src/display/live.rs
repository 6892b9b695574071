//! Terminal-backed providers
//!
//! Status and table output go through the process-wide `Display`; bars are
//! attached to one `MultiProgress` per provider and hidden off a tty.

use super::Display;
use super::providers::*;
use super::status::StatusDisplay;
use super::structured::StructuredDisplay;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}";

pub struct LiveDisplayProvider {
    bars: MultiProgress,
}

impl LiveDisplayProvider {
    pub fn new() -> Self {
        let bars = MultiProgress::new();
        if !Display::capabilities().interactive {
            bars.set_draw_target(ProgressDrawTarget::hidden());
        }
        Self { bars }
    }
}

impl Default for LiveDisplayProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayProvider for LiveDisplayProvider {
    fn status(&self) -> Box<dyn StatusProvider> {
        Box::new(LiveStatus(Display::status()))
    }

    fn progress(&self) -> Box<dyn ProgressProvider> {
        Box::new(LiveProgress(self.bars.clone()))
    }

    fn table(&self) -> Box<dyn StructuredProvider> {
        Box::new(LiveStructured(Display::table()))
    }
}

struct LiveStatus(StatusDisplay<'static>);

impl StatusProvider for LiveStatus {
    fn success(&self, item: &str, details: &str) {
        self.0.success(item, details);
    }

    fn error(&self, item: &str, details: &str) {
        self.0.error(item, details);
    }

    fn warning(&self, message: &str) {
        self.0.warning(message);
    }

    fn info(&self, message: &str) {
        self.0.info(message);
    }

    fn message(&self, text: &str) {
        self.0.message(text);
    }

    fn emphasis(&self, text: &str) {
        self.0.emphasis(text);
    }

    fn subtle(&self, text: &str) {
        self.0.subtle(text);
    }

    fn list(&self, items: &[&str]) {
        self.0.list(items);
    }

    fn complete(&self, task: &str) {
        self.0.complete(task);
    }

    fn section(&self, title: &str) {
        self.0.section(title);
    }
}

struct LiveProgress(MultiProgress);

impl ProgressProvider for LiveProgress {
    fn bar(&self, total: u64) -> Box<dyn ProgressTracker> {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        Box::new(self.0.add(ProgressBar::new(total).with_style(style)))
    }
}

struct LiveStructured(StructuredDisplay<'static>);

impl StructuredProvider for LiveStructured {
    fn table(&self, headers: &[&str], rows: &[Vec<&str>]) {
        rows.iter()
            .fold(self.0.table().header(headers), |table, row| table.row(row))
            .render();
    }

    fn list(&self, items: &[&str]) {
        self.0.list(items);
    }

    fn properties(&self, pairs: &[(&str, &str)]) {
        self.0.pairs(pairs);
    }
}

impl ProgressTracker for ProgressBar {
    fn inc(&self) {
        ProgressBar::inc(self, 1);
    }

    fn tick(&self, item: &str) {
        ProgressBar::tick(self);
        self.set_message(item.to_string());
    }

    fn finish_clear(&self) {
        self.finish_and_clear();
    }
}
