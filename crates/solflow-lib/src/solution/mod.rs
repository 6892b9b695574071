//! Solution lifecycle core
//!
//! Component classification, the migration orchestrator, the export and
//! version manager and the observers that render a run.

pub mod classifier;
pub mod component;
pub mod confirm;
pub mod export;
pub mod migration;
pub mod report;
pub mod version;

pub use classifier::{
    CONNECTION_REFERENCE_SELECTOR, CONNECTION_REFERENCE_TYPE, ComponentTypeSelector,
    DEFAULT_TARGET, classify,
};
pub use component::Component;
pub use confirm::{
    ConfirmationSource, DecisionFlags, DecisionPoint, FlagsThenPrompt, PresetConfirmation,
    PromptConfirmation,
};
pub use export::{ExportError, ExportManager, ExportReport, VariantOutcome, VersionBump};
pub use migration::{
    ComponentResult, MigrationError, MigrationObserver, MigrationOrchestrator, MigrationOutcome,
    MigrationRun, MoveStatus, TargetExport, TargetTally,
};
pub use report::{ConsoleReporter, ExportEntry, JsonReportWriter, MigrationReport};
pub use version::{SolutionVersion, VersionError};
