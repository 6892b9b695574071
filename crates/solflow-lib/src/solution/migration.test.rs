use super::*;
use crate::application::session_mocks::{
    MockFileSystemProvider, MockPackageTool, MockSolutionDirectory,
};
use crate::primitives::PackageType;
use crate::solution::{DecisionFlags, PresetConfirmation, SolutionVersion};
use std::cell::RefCell;
use std::path::PathBuf;

fn component(component_type: i32, object_id: &str) -> Component {
    Component {
        display_name: format!("component {}", object_id),
        schema_name: String::new(),
        component_type,
        component_type_name: String::new(),
        object_id: object_id.to_string(),
    }
}

fn scenario_components() -> Vec<Component> {
    vec![component(29, "a"), component(61, ""), component(999, "c")]
}

fn answers(proceed: bool, export: bool, delete_source: bool) -> PresetConfirmation {
    PresetConfirmation::new(DecisionFlags {
        proceed: Some(proceed),
        export: Some(export),
        delete_source: Some(delete_source),
    })
}

#[derive(Default)]
struct RecordingObserver {
    events: RefCell<Vec<String>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl MigrationObserver for RecordingObserver {
    fn components_discovered(&self, source: &str, components: &[Component]) {
        self.events
            .borrow_mut()
            .push(format!("discovered {} {}", source, components.len()));
    }

    fn component_processed(&self, index: usize, total: usize, result: &ComponentResult) {
        self.events.borrow_mut().push(format!(
            "processed {}/{} {} {:?}",
            index + 1,
            total,
            result.target,
            result.status
        ));
    }

    fn target_affected(&self, target: &str, tally: TargetTally) {
        self.events
            .borrow_mut()
            .push(format!("affected {} {}", target, tally.success));
    }

    fn run_completed(&self, outcome: &MigrationOutcome) {
        self.events
            .borrow_mut()
            .push(format!("completed {}", outcome.total));
    }

    fn target_exported(&self, target: &str, result: &Result<ExportReport, ExportError>) {
        self.events
            .borrow_mut()
            .push(format!("exported {} {}", target, result.is_ok()));
    }

    fn source_deleted(&self, source: &str, result: &Result<(), DataverseError>) {
        self.events
            .borrow_mut()
            .push(format!("deleted {} {}", source, result.is_ok()));
    }
}

fn directory_with_targets(source_components: Vec<Component>) -> MockSolutionDirectory {
    let mut directory = MockSolutionDirectory::new().with_solution(
        "feature_x",
        SolutionVersion::new(1, 0, 0, 0),
        source_components,
    );
    for target in ["flows", "webresources", "main", "plugins", "connectionreference"] {
        directory = directory.with_solution(target, SolutionVersion::new(1, 0, 0, 3), vec![]);
    }
    directory
}

#[test]
fn test_scenario_outcome_and_affected_targets() {
    let directory = MockSolutionDirectory::new();
    let mover = MockPackageTool::new();
    let orchestrator = MigrationOrchestrator::new(&directory, &mover);

    let outcome = orchestrator.migrate(&scenario_components());

    assert_eq!(outcome.total, 3);
    assert_eq!(outcome.successful, 2);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.skipped, 0);
    assert_eq!(outcome.by_target["flows"], TargetTally { success: 1, failed: 0 });
    assert_eq!(
        outcome.by_target["webresources"],
        TargetTally { success: 0, failed: 1 }
    );
    assert_eq!(outcome.by_target["main"], TargetTally { success: 1, failed: 0 });
    assert_eq!(outcome.affected_targets(), vec!["flows", "main"]);
}

#[test]
fn test_blank_object_id_never_reaches_mover() {
    let directory = MockSolutionDirectory::new();
    let mover = MockPackageTool::new();
    let orchestrator = MigrationOrchestrator::new(&directory, &mover);

    orchestrator.migrate(&scenario_components());

    let moved: Vec<String> = mover.moves().into_iter().map(|m| m.object_id).collect();
    assert_eq!(moved, vec!["a".to_string(), "c".to_string()]);
}

#[test]
fn test_moves_in_input_order_with_selectors() {
    let directory = MockSolutionDirectory::new();
    let mover = MockPackageTool::new();
    let orchestrator = MigrationOrchestrator::new(&directory, &mover);

    orchestrator.migrate(&[component(10112, "conn"), component(1, "table"), component(91, "asm")]);

    let moves = mover.moves();
    assert_eq!(moves.len(), 3);
    assert_eq!(moves[0].selector, "ConnectionReference");
    assert_eq!(moves[0].target, "connectionreference");
    assert_eq!(moves[1].selector, "1");
    assert_eq!(moves[1].target, "main");
    assert_eq!(moves[2].target, "plugins");
}

#[test]
fn test_mover_failure_is_counted_and_run_continues() {
    let directory = MockSolutionDirectory::new();
    let mover = MockPackageTool::new().with_move_failure("a", "already in another managed layer");
    let orchestrator = MigrationOrchestrator::new(&directory, &mover);

    let outcome = orchestrator.migrate(&[component(29, "a"), component(29, "b")]);

    assert_eq!(outcome.successful, 1);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.by_target["flows"], TargetTally { success: 1, failed: 1 });
    assert_eq!(outcome.affected_targets(), vec!["flows"]);
    assert_eq!(mover.moves().len(), 2);
}

#[test]
fn test_tallies_sum_to_totals() {
    let directory = MockSolutionDirectory::new();
    let mover = MockPackageTool::new().with_move_failure("x2", "nope");
    let orchestrator = MigrationOrchestrator::new(&directory, &mover);

    let components = vec![
        component(29, "x1"),
        component(61, "x2"),
        component(61, "N/A"),
        component(91, "x4"),
        component(42, "x5"),
    ];
    let outcome = orchestrator.migrate(&components);

    let success: usize = outcome.by_target.values().map(|t| t.success).sum();
    let failed: usize = outcome.by_target.values().map(|t| t.failed).sum();
    assert_eq!(success, outcome.successful);
    assert_eq!(failed, outcome.failed);
    assert_eq!(
        outcome.total,
        outcome.successful + outcome.failed + outcome.skipped
    );
}

#[test]
fn test_observer_sees_every_component_then_summary() {
    let directory = MockSolutionDirectory::new();
    let mover = MockPackageTool::new();
    let observer = RecordingObserver::default();
    let orchestrator = MigrationOrchestrator::new(&directory, &mover).with_observer(&observer);

    orchestrator.migrate(&scenario_components());

    let events = observer.events();
    assert_eq!(events.len(), 3 + 2 + 1);
    assert!(events[0].starts_with("processed 1/3 flows"));
    assert!(events[1].starts_with("processed 2/3 webresources Failed"));
    assert_eq!(events[3], "affected flows 1");
    assert_eq!(events[4], "affected main 1");
    assert_eq!(events[5], "completed 3");
}

#[test]
fn test_discover_resolves_then_lists() {
    let directory = directory_with_targets(scenario_components());
    let mover = MockPackageTool::new();
    let orchestrator = MigrationOrchestrator::new(&directory, &mover);

    let components = orchestrator.discover("feature_x").unwrap();

    assert_eq!(components.len(), 3);
    assert_eq!(
        directory.calls()[..2],
        ["resolve_id:feature_x".to_string(), "list_components:id-feature_x".to_string()]
    );
}

#[test]
fn test_discover_unknown_solution_is_fatal() {
    let directory = MockSolutionDirectory::new();
    let mover = MockPackageTool::new();
    let orchestrator = MigrationOrchestrator::new(&directory, &mover);

    let error = orchestrator.discover("ghost").unwrap_err();
    match error {
        MigrationError::Discovery { solution, source } => {
            assert_eq!(solution, "ghost");
            assert!(source.is_not_found());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_source_skips_prompts_and_cascades() {
    let directory = directory_with_targets(vec![]);
    let tool = MockPackageTool::new();
    let filesystem = MockFileSystemProvider::new();
    let exporter = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));
    let orchestrator = MigrationOrchestrator::new(&directory, &tool);

    let run = orchestrator
        .run("feature_x", &answers(true, true, true), &exporter)
        .unwrap();

    assert!(!run.proceeded);
    assert_eq!(run.outcome.total, 0);
    assert!(run.exports.is_empty());
    assert!(!run.source_deleted);
    assert!(directory.exists("feature_x"));
}

#[test]
fn test_declined_run_moves_nothing() {
    let directory = directory_with_targets(scenario_components());
    let tool = MockPackageTool::new();
    let filesystem = MockFileSystemProvider::new();
    let exporter = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));
    let orchestrator = MigrationOrchestrator::new(&directory, &tool);

    let run = orchestrator
        .run("feature_x", &answers(false, true, true), &exporter)
        .unwrap();

    assert!(!run.proceeded);
    assert!(tool.moves().is_empty());
    assert!(directory.exists("feature_x"));
}

#[test]
fn test_full_run_exports_affected_targets_with_patch_bump() {
    let directory = directory_with_targets(scenario_components());
    let tool = MockPackageTool::new();
    let filesystem = MockFileSystemProvider::new();
    let exporter = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));
    let observer = RecordingObserver::default();
    let orchestrator = MigrationOrchestrator::new(&directory, &tool).with_observer(&observer);

    let run = orchestrator
        .run("feature_x", &answers(true, true, true), &exporter)
        .unwrap();

    assert!(run.proceeded);
    let exported: Vec<&str> = run.exports.iter().map(|e| e.target.as_str()).collect();
    assert_eq!(exported, vec!["flows", "main"]);
    assert_eq!(run.failed_exports(), 0);
    assert_eq!(directory.version_of("flows"), Some(SolutionVersion::new(1, 0, 0, 4)));
    assert_eq!(directory.version_of("main"), Some(SolutionVersion::new(1, 0, 0, 4)));
    assert_eq!(
        directory.version_of("webresources"),
        Some(SolutionVersion::new(1, 0, 0, 3))
    );
    assert!(run.source_deleted);
    assert!(!directory.exists("feature_x"));

    let events = observer.events();
    assert!(events.contains(&"exported flows true".to_string()));
    assert_eq!(events.last().map(String::as_str), Some("deleted feature_x true"));
}

#[test]
fn test_declined_export_still_offers_delete() {
    let directory = directory_with_targets(scenario_components());
    let tool = MockPackageTool::new();
    let filesystem = MockFileSystemProvider::new();
    let exporter = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));
    let orchestrator = MigrationOrchestrator::new(&directory, &tool);

    let run = orchestrator
        .run("feature_x", &answers(true, false, true), &exporter)
        .unwrap();

    assert!(run.exports.is_empty());
    assert!(tool.exports().is_empty());
    assert!(run.source_deleted);
}

#[test]
fn test_delete_defaults_to_keeping_the_source() {
    let directory = directory_with_targets(scenario_components());
    let tool = MockPackageTool::new();
    let filesystem = MockFileSystemProvider::new();
    let exporter = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));
    let orchestrator = MigrationOrchestrator::new(&directory, &tool);
    let confirmation = PresetConfirmation::new(DecisionFlags::default());

    let run = orchestrator.run("feature_x", &confirmation, &exporter).unwrap();

    assert!(run.proceeded);
    assert!(!run.source_deleted);
    assert!(directory.exists("feature_x"));
}

#[test]
fn test_failed_export_does_not_stop_the_others() {
    let directory = directory_with_targets(scenario_components());
    let tool = MockPackageTool::new().with_export_failure("flows", PackageType::Managed, "boom");
    let filesystem = MockFileSystemProvider::new();
    let exporter = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));
    let orchestrator = MigrationOrchestrator::new(&directory, &tool);

    let run = orchestrator
        .run("feature_x", &answers(true, true, false), &exporter)
        .unwrap();

    assert_eq!(run.exports.len(), 2);
    assert!(!run.exports[0].is_success());
    assert!(run.exports[1].is_success());
    assert_eq!(run.failed_exports(), 1);
}

#[test]
fn test_delete_failure_is_fatal_with_manual_guidance() {
    let directory = directory_with_targets(scenario_components())
        .with_api_error("delete", 400, "solution has dependencies");
    let tool = MockPackageTool::new();
    let filesystem = MockFileSystemProvider::new();
    let exporter = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));
    let observer = RecordingObserver::default();
    let orchestrator = MigrationOrchestrator::new(&directory, &tool).with_observer(&observer);

    let error = orchestrator
        .run("feature_x", &answers(true, false, true), &exporter)
        .unwrap_err();

    assert!(matches!(error, MigrationError::DeleteSource { .. }));
    assert!(error.hints().iter().any(|h| h.contains("make.powerapps.com")));
    assert!(observer.events().contains(&"deleted feature_x false".to_string()));
}

#[test]
fn test_confirmation_failure_maps_to_error() {
    struct Broken;
    impl ConfirmationSource for Broken {
        fn confirm(&self, _point: DecisionPoint, _question: &str) -> anyhow::Result<bool> {
            anyhow::bail!("stdin closed")
        }
    }

    let directory = directory_with_targets(scenario_components());
    let tool = MockPackageTool::new();
    let filesystem = MockFileSystemProvider::new();
    let exporter = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));
    let orchestrator = MigrationOrchestrator::new(&directory, &tool);

    let error = orchestrator.run("feature_x", &Broken, &exporter).unwrap_err();
    match error {
        MigrationError::Confirmation { point, reason } => {
            assert_eq!(point, DecisionPoint::Proceed);
            assert!(reason.contains("stdin closed"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
