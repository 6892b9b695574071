use super::*;
use crate::application::session_mocks::MockFileSystemProvider;
use crate::display::{DisplayCall, MockDisplayProvider};
use crate::primitives::PackageType;
use crate::solution::{TargetTally, VariantOutcome};
use std::path::PathBuf;

fn component(component_type: i32, name: &str, object_id: &str) -> Component {
    Component {
        display_name: name.to_string(),
        schema_name: String::new(),
        component_type,
        component_type_name: "Workflow".to_string(),
        object_id: object_id.to_string(),
    }
}

fn result(component: Component, target: &str, status: MoveStatus) -> ComponentResult {
    ComponentResult {
        component,
        target: target.to_string(),
        status,
    }
}

fn outcome() -> MigrationOutcome {
    let mut outcome = MigrationOutcome {
        total: 2,
        successful: 1,
        failed: 1,
        skipped: 0,
        ..MigrationOutcome::default()
    };
    outcome
        .by_target
        .insert("flows".to_string(), TargetTally { success: 1, failed: 0 });
    outcome
        .by_target
        .insert("webresources".to_string(), TargetTally { success: 0, failed: 1 });
    outcome
}

fn export_report(failed: Option<PackageType>) -> ExportReport {
    ExportReport {
        solution: "flows".to_string(),
        previous_version: SolutionVersion::new(1, 0, 0, 0),
        version: SolutionVersion::new(1, 0, 0, 1),
        variants: PackageType::ALL
            .iter()
            .map(|package| VariantOutcome {
                package: *package,
                directory: PathBuf::from("/out/flows").join(package.dir_name()),
                error: (Some(*package) == failed).then(|| "pac exited 1".to_string()),
            })
            .collect(),
    }
}

#[test]
fn test_console_lists_discovered_components_with_targets() {
    let display = MockDisplayProvider::new();
    let reporter = ConsoleReporter::new(&display);

    reporter.components_discovered(
        "feature_x",
        &[component(29, "Approval flow", "a"), component(1, "Account", "b")],
    );

    let tables: Vec<DisplayCall> = display
        .get_calls()
        .into_iter()
        .filter(|c| c.call_type() == "structured_table")
        .collect();
    assert_eq!(tables.len(), 1);
    match &tables[0] {
        DisplayCall::StructuredTable { headers, rows } => {
            assert_eq!(headers, &["Type", "Type Name", "Component", "Target"]);
            assert_eq!(rows[0], ["29", "Workflow", "Approval flow", "flows"]);
            assert_eq!(rows[1][3], "main");
        }
        _ => unreachable!(),
    }
    assert!(display.mentions("2 component(s) found"));
}

#[test]
fn test_console_reports_empty_source() {
    let display = MockDisplayProvider::new();
    let reporter = ConsoleReporter::new(&display);

    reporter.components_discovered("feature_x", &[]);

    assert_eq!(display.count_calls("structured_table"), 0);
    assert!(display.mentions("has no components"));
}

#[test]
fn test_console_progress_then_summary_with_failures() {
    let display = MockDisplayProvider::new();
    let reporter = ConsoleReporter::new(&display);

    reporter.component_processed(
        0,
        2,
        &result(component(29, "Flow", "a"), "flows", MoveStatus::Moved),
    );
    reporter.component_processed(
        1,
        2,
        &result(
            component(61, "Script", ""),
            "webresources",
            MoveStatus::Failed {
                reason: "missing or placeholder object id".to_string(),
            },
        ),
    );
    reporter.run_completed(&outcome());

    assert_eq!(display.count_calls("progress_bar"), 1);
    assert_eq!(display.count_calls("progress_inc"), 2);
    assert_eq!(display.count_calls("progress_clear"), 1);
    assert!(display.has_call(&DisplayCall::StructuredTable {
        headers: vec!["Target".into(), "Moved".into(), "Failed".into()],
        rows: vec![
            vec!["flows".into(), "1".into(), "0".into()],
            vec!["webresources".into(), "0".into(), "1".into()],
        ],
    }));
    assert!(display.has_call(&DisplayCall::StatusError {
        item: "Script".into(),
        details: "missing or placeholder object id".into(),
    }));
    assert!(display.mentions("Migration finished with failures"));
}

#[test]
fn test_console_export_and_delete_results() {
    let display = MockDisplayProvider::new();
    let reporter = ConsoleReporter::new(&display);

    reporter.target_exported("flows", &Ok(export_report(None)));
    reporter.target_exported("main", &Ok(export_report(Some(PackageType::Managed))));
    reporter.source_deleted(
        "feature_x",
        &Err(DataverseError::NotFound {
            solution: "feature_x".to_string(),
        }),
    );

    assert!(display.has_call(&DisplayCall::StatusSuccess {
        item: "flows".into(),
        details: "exported v1.0.0.1".into(),
    }));
    assert!(display.has_call(&DisplayCall::StatusError {
        item: "main (managed)".into(),
        details: "pac exited 1".into(),
    }));
    assert_eq!(display.count_calls("status_error"), 2);
}

#[test]
fn test_json_report_accumulates_run() {
    let writer = JsonReportWriter::new();

    writer.components_discovered("feature_x", &[component(29, "Flow", "a")]);
    writer.component_processed(
        0,
        1,
        &result(component(29, "Flow", "a"), "flows", MoveStatus::Moved),
    );
    writer.target_affected("flows", TargetTally { success: 1, failed: 0 });
    writer.run_completed(&outcome());
    writer.target_exported("flows", &Ok(export_report(Some(PackageType::Unmanaged))));
    writer.source_deleted("feature_x", &Ok(()));

    let report = writer.report();
    assert_eq!(report.source, "feature_x");
    assert_eq!(report.discovered, 1);
    assert_eq!(report.components.len(), 1);
    assert_eq!(report.affected_targets, vec!["flows".to_string()]);
    assert_eq!(report.exports[0].version, Some(SolutionVersion::new(1, 0, 0, 1)));
    assert!(!report.exports[0].success);
    assert_eq!(report.exports[0].errors, vec!["unmanaged: pac exited 1".to_string()]);
    assert_eq!(report.source_deleted, Some(true));
    assert_eq!(report.delete_error, None);
}

#[test]
fn test_json_report_shape() {
    let writer = JsonReportWriter::new();
    writer.component_processed(
        0,
        1,
        &result(
            component(61, "Script", ""),
            "webresources",
            MoveStatus::Failed {
                reason: "missing".to_string(),
            },
        ),
    );
    writer.run_completed(&outcome());

    let json: serde_json::Value = serde_json::from_str(&writer.to_json().unwrap()).unwrap();
    let first = &json["components"][0];
    assert_eq!(first["status"], "failed");
    assert_eq!(first["reason"], "missing");
    assert_eq!(first["target"], "webresources");
    assert_eq!(first["component"]["componentType"], 61);
    assert_eq!(json["outcome"]["by_target"]["flows"]["success"], 1);
    assert!(json["generated_at"].as_u64().unwrap() > 0);
}

#[test]
fn test_json_report_saved_through_filesystem() {
    let filesystem = MockFileSystemProvider::new();
    let writer = JsonReportWriter::new();
    writer.components_discovered("feature_x", &[]);

    writer
        .save(&filesystem, &PathBuf::from("/work/report.json"))
        .unwrap();

    let written = filesystem
        .read_written(&PathBuf::from("/work/report.json"))
        .unwrap();
    assert!(written.contains("\"source\": \"feature_x\""));
}
