//! Recording display for tests
//!
//! Every provider handed out by `MockDisplayProvider` appends to the same
//! call log, in call order.

use super::providers::*;
use std::sync::{Arc, Mutex};

/// One recorded display call
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    StatusSuccess { item: String, details: String },
    StatusError { item: String, details: String },
    StatusWarning { message: String },
    StatusInfo { message: String },
    StatusMessage { text: String },
    StatusEmphasis { text: String },
    StatusSubtle { text: String },
    StatusList { items: Vec<String> },
    StatusComplete { task: String },
    StatusSection { title: String },

    ProgressBar { total: u64 },
    ProgressInc,
    ProgressTick { item: String },
    ProgressClear,

    StructuredTable { headers: Vec<String>, rows: Vec<Vec<String>> },
    StructuredList { items: Vec<String> },
    StructuredProperties { pairs: Vec<(String, String)> },
}

impl DisplayCall {
    /// Snake-case kind, e.g. `status_success` or `progress_tick`
    pub fn call_type(&self) -> &'static str {
        use DisplayCall::*;
        match self {
            StatusSuccess { .. } => "status_success",
            StatusError { .. } => "status_error",
            StatusWarning { .. } => "status_warning",
            StatusInfo { .. } => "status_info",
            StatusMessage { .. } => "status_message",
            StatusEmphasis { .. } => "status_emphasis",
            StatusSubtle { .. } => "status_subtle",
            StatusList { .. } => "status_list",
            StatusComplete { .. } => "status_complete",
            StatusSection { .. } => "status_section",
            ProgressBar { .. } => "progress_bar",
            ProgressInc => "progress_inc",
            ProgressTick { .. } => "progress_tick",
            ProgressClear => "progress_clear",
            StructuredTable { .. } => "structured_table",
            StructuredList { .. } => "structured_list",
            StructuredProperties { .. } => "structured_properties",
        }
    }

    /// Text a reader would see, without styling
    pub fn text(&self) -> String {
        use DisplayCall::*;
        match self {
            StatusSuccess { item, details } | StatusError { item, details } => {
                format!("{} {}", item, details)
            }
            StatusWarning { message } | StatusInfo { message } => message.clone(),
            StatusMessage { text } | StatusEmphasis { text } | StatusSubtle { text } => {
                text.clone()
            }
            StatusComplete { task } => task.clone(),
            StatusSection { title } => title.clone(),
            ProgressTick { item } => item.clone(),
            ProgressBar { total } => total.to_string(),
            ProgressInc | ProgressClear => String::new(),
            StatusList { items } | StructuredList { items } => items.join("\n"),
            StructuredTable { headers, rows } => std::iter::once(headers)
                .chain(rows)
                .map(|row| row.join(" | "))
                .collect::<Vec<_>>()
                .join("\n"),
            StructuredProperties { pairs } => pairs
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<DisplayCall>>>);

impl Recorder {
    fn push(&self, call: DisplayCall) {
        self.0.lock().unwrap().push(call);
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Clone, Default)]
pub struct MockDisplayProvider {
    recorder: Recorder,
}

impl MockDisplayProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_calls(&self) -> Vec<DisplayCall> {
        self.recorder.0.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.recorder.0.lock().unwrap().clear();
    }

    pub fn has_call(&self, expected: &DisplayCall) -> bool {
        self.get_calls().contains(expected)
    }

    pub fn count_calls(&self, call_type: &str) -> usize {
        self.get_calls()
            .iter()
            .filter(|call| call.call_type() == call_type)
            .count()
    }

    /// True if the visible text of any call contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.get_calls().iter().any(|call| call.text().contains(needle))
    }
}

impl DisplayProvider for MockDisplayProvider {
    fn status(&self) -> Box<dyn StatusProvider> {
        Box::new(self.recorder.clone())
    }

    fn progress(&self) -> Box<dyn ProgressProvider> {
        Box::new(self.recorder.clone())
    }

    fn table(&self) -> Box<dyn StructuredProvider> {
        Box::new(self.recorder.clone())
    }
}

impl StatusProvider for Recorder {
    fn success(&self, item: &str, details: &str) {
        self.push(DisplayCall::StatusSuccess {
            item: item.into(),
            details: details.into(),
        });
    }

    fn error(&self, item: &str, details: &str) {
        self.push(DisplayCall::StatusError {
            item: item.into(),
            details: details.into(),
        });
    }

    fn warning(&self, message: &str) {
        self.push(DisplayCall::StatusWarning {
            message: message.into(),
        });
    }

    fn info(&self, message: &str) {
        self.push(DisplayCall::StatusInfo {
            message: message.into(),
        });
    }

    fn message(&self, text: &str) {
        self.push(DisplayCall::StatusMessage { text: text.into() });
    }

    fn emphasis(&self, text: &str) {
        self.push(DisplayCall::StatusEmphasis { text: text.into() });
    }

    fn subtle(&self, text: &str) {
        self.push(DisplayCall::StatusSubtle { text: text.into() });
    }

    fn list(&self, items: &[&str]) {
        self.push(DisplayCall::StatusList {
            items: owned(items),
        });
    }

    fn complete(&self, task: &str) {
        self.push(DisplayCall::StatusComplete { task: task.into() });
    }

    fn section(&self, title: &str) {
        self.push(DisplayCall::StatusSection {
            title: title.into(),
        });
    }
}

impl ProgressProvider for Recorder {
    fn bar(&self, total: u64) -> Box<dyn ProgressTracker> {
        self.push(DisplayCall::ProgressBar { total });
        Box::new(self.clone())
    }
}

impl ProgressTracker for Recorder {
    fn inc(&self) {
        self.push(DisplayCall::ProgressInc);
    }

    fn tick(&self, item: &str) {
        self.push(DisplayCall::ProgressTick { item: item.into() });
    }

    fn finish_clear(&self) {
        self.push(DisplayCall::ProgressClear);
    }
}

impl StructuredProvider for Recorder {
    fn table(&self, headers: &[&str], rows: &[Vec<&str>]) {
        self.push(DisplayCall::StructuredTable {
            headers: owned(headers),
            rows: rows.iter().map(|row| owned(row)).collect(),
        });
    }

    fn list(&self, items: &[&str]) {
        self.push(DisplayCall::StructuredList {
            items: owned(items),
        });
    }

    fn properties(&self, pairs: &[(&str, &str)]) {
        self.push(DisplayCall::StructuredProperties {
            pairs: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
    }
}
