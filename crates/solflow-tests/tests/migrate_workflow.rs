//! E2E tests for the migrate command
//!
//! Live filesystem, network and process providers against a mockito
//! Dataverse and a stub `pac` on an isolated PATH.

use anyhow::Result;
use solflow_lib::application::cli::Commands;
use solflow_lib::application::commands::execute_command_with_session;
use solflow_lib::application::session_mocks::MockInteractiveProvider;
use solflow_lib::primitives::ConfigError;
use solflow_lib::solution::MigrationError;
use solflow_tests::{ConditionalRule, DataverseStub, HermeticSessionBuilder, MockBehavior, StubComponent};
use std::path::PathBuf;

fn feature_stub() -> DataverseStub {
    let mut stub = DataverseStub::new();
    stub.with_token()
        .with_solution("feature_x", "sol-src", "1.0.0.0")
        .with_components(
        "sol-src",
        &[
                StubComponent::new(29, "approval_flow", "a-1"),
                StubComponent::new(61, "logo", ""),
                StubComponent::new(10112, "sharepoint_ref", "cr-2"),
                StubComponent::new(999, "misc", "c-3"),
            ],
        )
        .with_solution("flows", "sol-flows", "1.0.0.3")
        .with_solution("connectionreference", "sol-cr", "3.0.0.0")
        .with_solution("main", "sol-main", "2.1.0.9");
    stub
}

fn migrate(
    proceed: Option<bool>,
    export: Option<bool>,
    delete_source: Option<bool>,
    report: Option<&str>,
) -> Commands {
    Commands::Migrate {
        source: Some("feature_x".to_string()),
        proceed,
        export,
        delete_source,
        report: report.map(PathBuf::from),
    }
}

#[test]
fn e2e_full_migration_moves_exports_and_deletes() -> Result<()> {
    let mut stub = feature_stub();
    let flows_bump = stub.version_update("sol-flows", "1.0.0.4", 1);
    let cr_bump = stub.version_update("sol-cr", "3.0.0.1", 1);
    let main_bump = stub.version_update("sol-main", "2.1.0.10", 1);
    let delete = stub.delete("sol-src", 1);

    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_mock_executable("pac", MockBehavior::pac())?
        .with_dataverse(&stub)
        .build()?;

    let result = execute_command_with_session(
        migrate(Some(true), Some(true), Some(true), Some("run.json")),
        &session,
    );

    assert!(result.is_ok(), "migration should succeed: {:?}", result);

    // blank object id never reaches pac
    let moves = test_env.calls_starting_with("pac", &["solution", "add-solution-component"])?;
    assert_eq!(moves.len(), 3);
    assert!(test_env.verify_mock_call(
        "pac",
        &[
            "solution",
            "add-solution-component",
            "--solutionUniqueName",
            "connectionreference",
            "--component",
            "cr-2",
            "--componentType",
            "ConnectionReference",
        ],
    )?);

    assert_eq!(test_env.calls_starting_with("pac", &["solution", "export"])?.len(), 6);
    assert_eq!(test_env.calls_starting_with("pac", &["solution", "unpack"])?.len(), 6);
    let unpack_dir = test_env.work_path.join("solutions").join("flows").join("managed");
    assert!(test_env.verify_mock_call(
        "pac",
        &[
            "solution",
            "unpack",
            "--zipfile",
            test_env
                .work_path
                .join("solutions")
                .join("flows_managed.zip")
                .to_str()
                .unwrap(),
            "--folder",
            unpack_dir.to_str().unwrap(),
            "--packagetype",
            "Managed",
        ],
    )?);

    flows_bump.assert();
    cr_bump.assert();
    main_bump.assert();
    delete.assert();

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(test_env.work_path.join("run.json"))?)?;
    assert_eq!(report["outcome"]["total"], 4);
    assert_eq!(report["outcome"]["successful"], 3);
    assert_eq!(report["outcome"]["failed"], 1);
    assert_eq!(report["source_deleted"], true);
    assert_eq!(report["exports"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[test]
fn e2e_failed_moves_and_exports_do_not_fail_the_run() -> Result<()> {
    let mut stub = feature_stub();
    let flows_bump = stub.version_update("sol-flows", "1.0.0.4", 1);
    let main_bump = stub.version_update("sol-main", "2.1.0.10", 1);
    let delete = stub.delete("sol-src", 0);

    let pac = MockBehavior::pac_with(vec![
        ConditionalRule::new(
            &["solution", "add-solution-component", "--solutionUniqueName", "connectionreference"],
            MockBehavior::AlwaysFail {
                error: "Error: The connection reference is managed".to_string(),
            },
        ),
        ConditionalRule::new(
            &["solution", "export", "--name", "main"],
            MockBehavior::AlwaysFail {
                error: "Error: Missing dependencies".to_string(),
            },
        ),
    ]);

    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_mock_executable("pac", pac)?
        .with_dataverse(&stub)
        .build()?;

    let result = execute_command_with_session(
        migrate(Some(true), Some(true), Some(false), Some("run.json")),
        &session,
    );

    assert!(result.is_ok(), "per-item failures are not fatal: {:?}", result);
    flows_bump.assert();
    main_bump.assert();
    delete.assert();

    // main's unpack never runs once its export failed
    let unpacks = test_env.calls_starting_with("pac", &["solution", "unpack"])?;
    assert_eq!(unpacks.len(), 2);

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(test_env.work_path.join("run.json"))?)?;
    assert_eq!(report["outcome"]["failed"], 2);
    assert_eq!(report["affected_targets"], serde_json::json!(["flows", "main"]));
    let main_export = report["exports"]
        .as_array()
        .and_then(|exports| exports.iter().find(|e| e["target"] == "main"))
        .cloned()
        .unwrap_or_default();
    assert_eq!(main_export["success"], false);
    assert_eq!(main_export["errors"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn e2e_refused_delete_is_fatal() -> Result<()> {
    let mut stub = feature_stub();
    let _refused = stub.delete_refused("sol-src");

    let (session, _test_env) = HermeticSessionBuilder::new()?
        .with_mock_executable("pac", MockBehavior::pac())?
        .with_dataverse(&stub)
        .build()?;

    let error = execute_command_with_session(migrate(Some(true), Some(false), Some(true), None), &session)
        .unwrap_err();

    match error.downcast_ref::<MigrationError>() {
        Some(MigrationError::DeleteSource { solution, source }) => {
            assert_eq!(solution, "feature_x");
            assert!(source.to_string().contains("dependencies"));
        }
        other => panic!("expected delete failure, got {:?}", other),
    }
    Ok(())
}

#[test]
fn e2e_unknown_source_aborts_before_any_move() -> Result<()> {
    let mut stub = DataverseStub::new();
    stub.with_token().with_missing_solution("feature_x");

    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_mock_executable("pac", MockBehavior::pac())?
        .with_dataverse(&stub)
        .build()?;

    let error = execute_command_with_session(migrate(None, None, None, None), &session).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<MigrationError>(),
        Some(MigrationError::Discovery { .. })
    ));
    assert_eq!(test_env.get_mock_calls("pac")?, vec!["help"]);
    Ok(())
}

#[test]
fn e2e_yes_mode_never_deletes_the_source() -> Result<()> {
    let mut stub = feature_stub();
    let _bumps = [
        stub.version_update("sol-flows", "1.0.0.4", 1),
        stub.version_update("sol-cr", "3.0.0.1", 1),
        stub.version_update("sol-main", "2.1.0.10", 1),
    ];
    let delete = stub.delete("sol-src", 0);

    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_mock_executable("pac", MockBehavior::pac())?
        .with_dataverse(&stub)
        .with_interactive(MockInteractiveProvider::new().with_yes_mode(true))
        .build()?;

    let result = execute_command_with_session(migrate(None, None, None, None), &session);

    assert!(result.is_ok(), "{:?}", result);
    assert_eq!(test_env.calls_starting_with("pac", &["solution", "export"])?.len(), 6);
    delete.assert();
    Ok(())
}

#[test]
fn e2e_missing_source_fails_fast_when_not_interactive() -> Result<()> {
    let mut stub = DataverseStub::new();
    let token = stub.token_endpoint(0);

    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_mock_executable("pac", MockBehavior::pac())?
        .with_dataverse(&stub)
        .with_interactive(MockInteractiveProvider::new().with_yes_mode(true))
        .build()?;

    let command = Commands::Migrate {
        source: None,
        proceed: None,
        export: None,
        delete_source: None,
        report: None,
    };
    let error = execute_command_with_session(command, &session).unwrap_err();

    assert!(error.downcast_ref::<ConfigError>().is_some());
    assert!(test_env.get_mock_calls("pac")?.is_empty());
    token.assert();
    Ok(())
}
