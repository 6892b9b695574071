//! Migration observers: console rendering and the JSON run report

use super::classifier::classify;
use super::component::Component;
use super::export::{ExportError, ExportReport};
use super::migration::{
    ComponentResult, MigrationObserver, MigrationOutcome, MoveStatus, TargetTally,
};
use super::version::SolutionVersion;
use crate::application::session::FileSystemProvider;
use crate::dataverse::DataverseError;
use crate::display::{BatchSummary, DisplayProvider, DisplayProviderExt, ProgressTracker};
use anyhow::Context;
use serde::Serialize;
use std::cell::RefCell;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Renders migration events through a [`DisplayProvider`]
pub struct ConsoleReporter<'a> {
    display: &'a dyn DisplayProvider,
    progress: RefCell<Option<Box<dyn ProgressTracker>>>,
    failures: RefCell<Vec<ComponentResult>>,
}

impl<'a> ConsoleReporter<'a> {
    pub fn new(display: &'a dyn DisplayProvider) -> Self {
        Self {
            display,
            progress: RefCell::new(None),
            failures: RefCell::new(Vec::new()),
        }
    }
}

impl MigrationObserver for ConsoleReporter<'_> {
    fn components_discovered(&self, source: &str, components: &[Component]) {
        let status = self.display.status();
        if components.is_empty() {
            status.info(&format!("Solution '{}' has no components", source));
            return;
        }

        let rows: Vec<Vec<String>> = components
            .iter()
            .map(|c| {
                vec![
                    c.component_type.to_string(),
                    c.component_type_name.clone(),
                    c.label().to_string(),
                    classify(c.component_type).to_string(),
                ]
            })
            .collect();
        let rows: Vec<Vec<&str>> = rows
            .iter()
            .map(|row| row.iter().map(String::as_str).collect())
            .collect();

        status.section(&format!("Components of '{}'", source));
        self.display
            .table()
            .table(&["Type", "Type Name", "Component", "Target"], &rows);
        status.info(&format!("{} component(s) found", components.len()));
    }

    fn component_processed(&self, _index: usize, total: usize, result: &ComponentResult) {
        let mut progress = self.progress.borrow_mut();
        let tracker = progress.get_or_insert_with(|| self.display.progress().bar(total as u64));
        tracker.tick(&format!("{} -> {}", result.component.label(), result.target));
        tracker.inc();

        if matches!(result.status, MoveStatus::Failed { .. }) {
            self.failures.borrow_mut().push(result.clone());
        }
    }

    fn run_completed(&self, outcome: &MigrationOutcome) {
        if let Some(tracker) = self.progress.borrow_mut().take() {
            tracker.finish_clear();
        }
        if outcome.total == 0 {
            return;
        }

        let rows: Vec<Vec<String>> = outcome
            .by_target
            .iter()
            .map(|(target, tally)| {
                vec![
                    target.clone(),
                    tally.success.to_string(),
                    tally.failed.to_string(),
                ]
            })
            .collect();
        let rows: Vec<Vec<&str>> = rows
            .iter()
            .map(|row| row.iter().map(String::as_str).collect())
            .collect();
        self.display
            .table()
            .table(&["Target", "Moved", "Failed"], &rows);

        let status = self.display.status();
        for failure in self.failures.borrow().iter() {
            if let MoveStatus::Failed { reason } = &failure.status {
                status.error(failure.component.label(), reason);
            }
        }

        self.display.display_summary(
            "Migration",
            &BatchSummary::new(outcome.successful, outcome.failed)
                .with_skipped(outcome.skipped),
        );
    }

    fn target_exported(&self, target: &str, result: &Result<ExportReport, ExportError>) {
        let status = self.display.status();
        match result {
            Ok(report) if report.is_success() => {
                status.success(target, &format!("exported v{}", report.version));
            }
            Ok(report) => {
                for variant in report.failed_variants() {
                    status.error(
                        &format!("{} ({})", target, variant.package),
                        variant.error.as_deref().unwrap_or("export failed"),
                    );
                }
            }
            Err(e) => status.error(target, &e.to_string()),
        }
    }

    fn source_deleted(&self, source: &str, result: &Result<(), DataverseError>) {
        let status = self.display.status();
        match result {
            Ok(()) => status.success(source, "source solution deleted"),
            Err(e) => status.error(source, &e.to_string()),
        }
    }
}

/// Serialized form of one export attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEntry {
    pub target: String,
    pub version: Option<SolutionVersion>,
    pub success: bool,
    pub errors: Vec<String>,
}

/// Serialized form of a migration run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub source: String,
    pub generated_at: u64,
    pub discovered: usize,
    pub components: Vec<ComponentResult>,
    pub outcome: Option<MigrationOutcome>,
    pub affected_targets: Vec<String>,
    pub exports: Vec<ExportEntry>,
    pub source_deleted: Option<bool>,
    pub delete_error: Option<String>,
}

/// Accumulates migration events into a [`MigrationReport`]
#[derive(Default)]
pub struct JsonReportWriter {
    report: RefCell<MigrationReport>,
}

impl JsonReportWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> MigrationReport {
        self.report.borrow().clone()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut report = self.report();
        report.generated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        serde_json::to_string_pretty(&report)
    }

    pub fn save(&self, filesystem: &dyn FileSystemProvider, path: &Path) -> anyhow::Result<()> {
        let json = self.to_json().context("Failed to serialize migration report")?;
        filesystem
            .write_file(path, &json)
            .with_context(|| format!("Failed to write report to {}", path.display()))
    }
}

impl MigrationObserver for JsonReportWriter {
    fn components_discovered(&self, source: &str, components: &[Component]) {
        let mut report = self.report.borrow_mut();
        report.source = source.to_string();
        report.discovered = components.len();
    }

    fn component_processed(&self, _index: usize, _total: usize, result: &ComponentResult) {
        self.report.borrow_mut().components.push(result.clone());
    }

    fn target_affected(&self, target: &str, _tally: TargetTally) {
        self.report
            .borrow_mut()
            .affected_targets
            .push(target.to_string());
    }

    fn run_completed(&self, outcome: &MigrationOutcome) {
        self.report.borrow_mut().outcome = Some(outcome.clone());
    }

    fn target_exported(&self, target: &str, result: &Result<ExportReport, ExportError>) {
        let entry = match result {
            Ok(report) => ExportEntry {
                target: target.to_string(),
                version: Some(report.version),
                success: report.is_success(),
                errors: report
                    .failed_variants()
                    .iter()
                    .filter_map(|v| v.error.as_ref().map(|e| format!("{}: {}", v.package, e)))
                    .collect(),
            },
            Err(e) => ExportEntry {
                target: target.to_string(),
                version: None,
                success: false,
                errors: vec![e.to_string()],
            },
        };
        self.report.borrow_mut().exports.push(entry);
    }

    fn source_deleted(&self, _source: &str, result: &Result<(), DataverseError>) {
        let mut report = self.report.borrow_mut();
        report.source_deleted = Some(result.is_ok());
        report.delete_error = result.as_ref().err().map(|e| e.to_string());
    }
}

#[cfg(test)]
mod tests {
    include!("report.test.rs");
}
