//! Migration orchestrator
//!
//! Moves every component of a source solution into the target solution
//! its type maps to, tallies the outcome per target, then optionally
//! exports the affected targets and deletes the source.

use super::classifier::{ComponentTypeSelector, classify};
use super::component::Component;
use super::confirm::{ConfirmationSource, DecisionPoint};
use super::export::{ExportError, ExportManager, ExportReport};
use crate::dataverse::{DataverseError, SolutionDirectory};
use crate::pac::ComponentMover;
use crate::primitives::IncrementPolicy;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Per-target move counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TargetTally {
    pub success: usize,
    pub failed: usize,
}

/// Aggregate result of one pass over the components.
///
/// `total == successful + failed + skipped`, and the per-target tallies sum
/// to `successful` and `failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationOutcome {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub by_target: BTreeMap<String, TargetTally>,
}

impl MigrationOutcome {
    /// Targets that received at least one component, in name order
    pub fn affected_targets(&self) -> Vec<&str> {
        self.by_target
            .iter()
            .filter(|(_, tally)| tally.success > 0)
            .map(|(target, _)| target.as_str())
            .collect()
    }

    fn record(&mut self, target: &str, status: &MoveStatus) {
        let tally = self.by_target.entry(target.to_string()).or_default();
        match status {
            MoveStatus::Moved => {
                self.successful += 1;
                tally.success += 1;
            }
            MoveStatus::Failed { .. } => {
                self.failed += 1;
                tally.failed += 1;
            }
            MoveStatus::Skipped { .. } => self.skipped += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MoveStatus {
    Moved,
    Failed { reason: String },
    /// Not produced by the current rule set
    Skipped { reason: String },
}

/// What happened to one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentResult {
    pub component: Component,
    pub target: String,
    #[serde(flatten)]
    pub status: MoveStatus,
}

/// Export attempt for one affected target
#[derive(Debug)]
pub struct TargetExport {
    pub target: String,
    pub result: Result<ExportReport, ExportError>,
}

impl TargetExport {
    pub fn is_success(&self) -> bool {
        matches!(&self.result, Ok(report) if report.is_success())
    }
}

/// Everything a full migration run did
#[derive(Debug, Default)]
pub struct MigrationRun {
    pub source: String,
    /// False when there was nothing to move or the run was declined
    pub proceeded: bool,
    pub outcome: MigrationOutcome,
    pub exports: Vec<TargetExport>,
    pub source_deleted: bool,
}

impl MigrationRun {
    pub fn failed_exports(&self) -> usize {
        self.exports.iter().filter(|e| !e.is_success()).count()
    }
}

/// Receives orchestrator events (console tables, JSON report)
pub trait MigrationObserver {
    fn components_discovered(&self, _source: &str, _components: &[Component]) {}

    fn component_processed(&self, _index: usize, _total: usize, _result: &ComponentResult) {}

    fn target_affected(&self, _target: &str, _tally: TargetTally) {}

    /// Move loop finished; cascades have not started yet
    fn run_completed(&self, _outcome: &MigrationOutcome) {}

    fn target_exported(&self, _target: &str, _result: &Result<ExportReport, ExportError>) {}

    fn source_deleted(&self, _source: &str, _result: &Result<(), DataverseError>) {}
}

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Failed to read source solution '{solution}': {source}")]
    Discovery {
        solution: String,
        #[source]
        source: DataverseError,
    },

    #[error("Could not read the {point} decision: {reason}")]
    Confirmation {
        point: DecisionPoint,
        reason: String,
    },

    #[error("Failed to delete source solution '{solution}': {source}")]
    DeleteSource {
        solution: String,
        #[source]
        source: DataverseError,
    },
}

impl MigrationError {
    pub fn hints(&self) -> Vec<&'static str> {
        match self {
            MigrationError::Discovery { source, .. } => source.hints(),
            MigrationError::DeleteSource { .. } => vec![
                "The components were already moved; only the empty source solution remains",
                "Delete it by hand: make.powerapps.com > Solutions > select the solution > Delete",
                "Or run 'pac solution delete --solution-name <name>'",
                "Deletion fails while another solution depends on it; check Solution dependencies",
            ],
            MigrationError::Confirmation { .. } => vec![
                "Pass --proceed/--export/--delete-source to answer without prompting",
                "Or run from an interactive terminal",
            ],
        }
    }
}

/// Drives discovery, the move loop and the cascades
pub struct MigrationOrchestrator<'a> {
    directory: &'a dyn SolutionDirectory,
    mover: &'a dyn ComponentMover,
    observers: Vec<&'a dyn MigrationObserver>,
}

impl<'a> MigrationOrchestrator<'a> {
    pub fn new(directory: &'a dyn SolutionDirectory, mover: &'a dyn ComponentMover) -> Self {
        Self {
            directory,
            mover,
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn MigrationObserver) -> Self {
        self.observers.push(observer);
        self
    }

    /// Resolve the source and fetch its components
    #[instrument(skip(self))]
    pub fn discover(&self, source: &str) -> Result<Vec<Component>, MigrationError> {
        let discovery = |e| MigrationError::Discovery {
            solution: source.to_string(),
            source: e,
        };

        let solution_id = self.directory.resolve_id(source).map_err(discovery)?;
        let components = self
            .directory
            .list_components(&solution_id)
            .map_err(discovery)?;

        info!(count = components.len(), "Discovered components");
        self.notify(|o| o.components_discovered(source, &components));
        Ok(components)
    }

    /// Move each component to its target, in input order. Never fails:
    /// per-component errors are recorded in the outcome.
    pub fn migrate(&self, components: &[Component]) -> MigrationOutcome {
        let mut outcome = MigrationOutcome::default();
        let count = components.len();

        for (index, component) in components.iter().enumerate() {
            outcome.total += 1;
            let target = classify(component.component_type);
            outcome.by_target.entry(target.to_string()).or_default();

            let status = self.move_component(component, target);
            outcome.record(target, &status);

            let result = ComponentResult {
                component: component.clone(),
                target: target.to_string(),
                status,
            };
            self.notify(|o| o.component_processed(index, count, &result));
        }

        for target in outcome.affected_targets() {
            let tally = outcome.by_target.get(target).copied().unwrap_or_default();
            self.notify(|o| o.target_affected(target, tally));
        }

        info!(
            total = outcome.total,
            successful = outcome.successful,
            failed = outcome.failed,
            skipped = outcome.skipped,
            "Migration pass finished"
        );
        self.notify(|o| o.run_completed(&outcome));
        outcome
    }

    /// Full run: discover, confirm, migrate, then the export and delete cascades
    pub fn run(
        &self,
        source: &str,
        confirmation: &dyn ConfirmationSource,
        exporter: &ExportManager<'_>,
    ) -> Result<MigrationRun, MigrationError> {
        let components = self.discover(source)?;
        let mut run = MigrationRun {
            source: source.to_string(),
            ..MigrationRun::default()
        };

        if components.is_empty() {
            info!(source, "Nothing to migrate");
            return Ok(run);
        }

        let question = format!(
            "Move {} component(s) out of '{}' into their target solutions?",
            components.len(),
            source
        );
        if !ask(confirmation, DecisionPoint::Proceed, &question)? {
            info!(source, "Migration declined");
            return Ok(run);
        }

        run.proceeded = true;
        run.outcome = self.migrate(&components);

        let affected: Vec<String> = run
            .outcome
            .affected_targets()
            .into_iter()
            .map(String::from)
            .collect();

        if !affected.is_empty() {
            let question = format!(
                "Export {} affected solution(s) ({})?",
                affected.len(),
                affected.join(", ")
            );
            if ask(confirmation, DecisionPoint::Export, &question)? {
                run.exports = self.export_targets(&affected, exporter);
            }
        }

        let question = if run.outcome.failed > 0 {
            format!(
                "{} component(s) failed to move. Delete source solution '{}' anyway?",
                run.outcome.failed, source
            )
        } else {
            format!("Delete source solution '{}'?", source)
        };
        if ask(confirmation, DecisionPoint::DeleteSource, &question)? {
            let result = self.directory.delete(source);
            self.notify(|o| o.source_deleted(source, &result));
            result.map_err(|e| MigrationError::DeleteSource {
                solution: source.to_string(),
                source: e,
            })?;
            info!(source, "Source solution deleted");
            run.source_deleted = true;
        }

        Ok(run)
    }

    fn export_targets(&self, targets: &[String], exporter: &ExportManager<'_>) -> Vec<TargetExport> {
        targets
            .iter()
            .map(|target| {
                let result = exporter.export_solution(target, IncrementPolicy::Patch);
                if let Err(e) = &result {
                    warn!(target = %target, error = %e, "Export of affected target failed");
                }
                self.notify(|o| o.target_exported(target, &result));
                TargetExport {
                    target: target.clone(),
                    result,
                }
            })
            .collect()
    }

    fn move_component(&self, component: &Component, target: &str) -> MoveStatus {
        if !component.is_addressable() {
            warn!(
                component = component.label(),
                object_id = %component.object_id,
                "Component has no usable object id"
            );
            return MoveStatus::Failed {
                reason: "missing or placeholder object id".to_string(),
            };
        }

        let selector = ComponentTypeSelector::for_type(component.component_type);
        match self
            .mover
            .move_component(selector, target, component.object_id.trim())
        {
            Ok(()) => {
                info!(component = component.label(), target, "Component moved");
                MoveStatus::Moved
            }
            Err(e) => {
                warn!(component = component.label(), target, error = %e, "Component move failed");
                MoveStatus::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn notify(&self, event: impl Fn(&dyn MigrationObserver)) {
        for observer in &self.observers {
            event(*observer);
        }
    }
}

fn ask(
    confirmation: &dyn ConfirmationSource,
    point: DecisionPoint,
    question: &str,
) -> Result<bool, MigrationError> {
    confirmation
        .confirm(point, question)
        .map_err(|e| MigrationError::Confirmation {
            point,
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    include!("migration.test.rs");
}
