//! E2E tests for the requirements command
//!
//! Stub executables on an isolated PATH stand in for `pac` and `az`.

use anyhow::Result;
use solflow_lib::application::cli::Commands;
use solflow_lib::application::commands::execute_command_with_session;
use solflow_lib::pac::PacError;
use solflow_tests::{HermeticSessionBuilder, MockBehavior};

#[test]
fn e2e_requirements_finds_pac_and_az() -> Result<()> {
    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_mock_executable("pac", MockBehavior::pac())?
        .with_mock_executable("az", MockBehavior::AlwaysSucceed)?
        .build()?;

    let result = execute_command_with_session(Commands::Requirements, &session);

    assert!(result.is_ok(), "requirements should pass: {:?}", result);
    assert!(test_env.verify_mock_call("pac", &["help"])?);
    // az is only located, never run
    assert!(test_env.get_mock_calls("az")?.is_empty());
    Ok(())
}

#[test]
fn e2e_requirements_fails_without_pac() -> Result<()> {
    let (session, _test_env) = HermeticSessionBuilder::new()?
        .with_mock_executable("az", MockBehavior::AlwaysSucceed)?
        .build()?;

    let error = execute_command_with_session(Commands::Requirements, &session).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<PacError>(),
        Some(PacError::NotAvailable { .. })
    ));
    Ok(())
}

#[test]
fn e2e_requirements_honours_custom_pac_program() -> Result<()> {
    let (session, test_env) = HermeticSessionBuilder::new()?
        .with_mock_executable("pac-preview", MockBehavior::pac())?
        .with_config(|config| config.pac_program = "pac-preview".to_string())
        .build()?;

    let result = execute_command_with_session(Commands::Requirements, &session);

    assert!(result.is_ok(), "{:?}", result);
    assert!(test_env.verify_mock_call("pac-preview", &["help"])?);
    Ok(())
}
