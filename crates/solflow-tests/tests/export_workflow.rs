//! E2E tests for the bump and export commands

use anyhow::Result;
use solflow_lib::application::cli::Commands;
use solflow_lib::application::commands::execute_command_with_session;
use solflow_lib::primitives::IncrementPolicy;
use solflow_tests::{ConditionalRule, DataverseStub, HermeticSessionBuilder, MockBehavior};

fn export(increment: IncrementPolicy) -> Commands {
    Commands::Export {
        solution: Some("flows".to_string()),
        increment,
    }
}

#[test]
fn e2e_export_bumps_then_exports_both_packages() -> Result<()> {
    let mut stub = DataverseStub::new();
    stub.with_token().with_solution("flows", "sol-flows", "1.4.2.7");
    let bump = stub.version_update("sol-flows", "1.5.0.0", 1);

    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_mock_executable("pac", MockBehavior::pac())?
        .with_dataverse(&stub)
        .build()?;

    let result = execute_command_with_session(export(IncrementPolicy::Minor), &session);

    assert!(result.is_ok(), "{:?}", result);
    bump.assert();

    let out = test_env.work_path.join("solutions");
    assert!(out.is_dir());
    for (flavor, managed) in [("unmanaged", "false"), ("managed", "true")] {
        let archive = out.join(format!("flows_{}.zip", flavor));
        assert!(test_env.verify_mock_call(
            "pac",
            &[
                "solution",
                "export",
                "--name",
                "flows",
                "--path",
                archive.to_str().unwrap(),
                "--managed",
                managed,
                "--overwrite",
            ],
        )?);
    }
    Ok(())
}

#[test]
fn e2e_export_exits_non_zero_when_a_package_fails() -> Result<()> {
    let mut stub = DataverseStub::new();
    stub.with_token().with_solution("flows", "sol-flows", "1.0.0.0");
    let _bump = stub.version_update("sol-flows", "1.0.0.1", 1);

    let pac = MockBehavior::pac_with(vec![ConditionalRule::new(
        &["solution", "unpack"],
        MockBehavior::AlwaysFail {
            error: "Error: Zip file is corrupt".to_string(),
        },
    )]);
    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_mock_executable("pac", pac)?
        .with_dataverse(&stub)
        .build()?;

    let error = execute_command_with_session(export(IncrementPolicy::Patch), &session).unwrap_err();

    assert!(error.to_string().contains("2 of 2"));
    assert_eq!(test_env.calls_starting_with("pac", &["solution", "export"])?.len(), 2);
    Ok(())
}

#[test]
fn e2e_export_clears_previous_unpack_output() -> Result<()> {
    let mut stub = DataverseStub::new();
    stub.with_token().with_solution("flows", "sol-flows", "1.0.0.0");
    let _bump = stub.version_update("sol-flows", "1.0.0.1", 1);

    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_mock_executable("pac", MockBehavior::pac())?
        .with_dataverse(&stub)
        .build()?;

    let stale = test_env
        .work_path
        .join("solutions")
        .join("flows")
        .join("managed")
        .join("stale.xml");
    std::fs::create_dir_all(stale.parent().unwrap())?;
    std::fs::write(&stale, "<old/>")?;

    execute_command_with_session(export(IncrementPolicy::Patch), &session)?;

    assert!(!stale.exists());
    Ok(())
}

#[test]
fn e2e_bump_dry_run_writes_nothing() -> Result<()> {
    let mut stub = DataverseStub::new();
    stub.with_token().with_solution("flows", "sol-flows", "1.0.0.0");
    let bump = stub.version_update("sol-flows", "1.0.0.1", 0);

    let (session, test_env) = HermeticSessionBuilder::new()?.with_dataverse(&stub).build()?;

    let result = execute_command_with_session(
        Commands::Bump {
            solution: Some("flows".to_string()),
            increment: IncrementPolicy::Patch,
            dry_run: true,
        },
        &session,
    );

    assert!(result.is_ok(), "{:?}", result);
    bump.assert();
    assert!(!test_env.work_path.join("solutions").exists());
    Ok(())
}
