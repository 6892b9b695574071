//! E2E tests for sign-in and the WhoAmI smoke test against a Dataverse stub

use anyhow::Result;
use solflow_lib::application::cli::Commands;
use solflow_lib::application::commands::execute_command_with_session;
use solflow_lib::application::session::{LiveNetworkProvider, NetworkProvider};
use solflow_lib::dataverse::{AccessTokenProvider, AuthError, ClientCredentialsTokenProvider};
use solflow_lib::primitives::ConfigError;
use solflow_tests::{DataverseStub, HermeticSessionBuilder};
use std::time::Duration;

#[test]
fn e2e_whoami_signs_in_with_client_credentials() -> Result<()> {
    let mut stub = DataverseStub::new();
    let token = stub.token_endpoint(1);
    let who_am_i = stub.who_am_i(1);

    let (session, _test_env) = HermeticSessionBuilder::new()?.with_dataverse(&stub).build()?;

    let result = execute_command_with_session(Commands::Whoami, &session);

    assert!(result.is_ok(), "whoami should succeed: {:?}", result);
    token.assert();
    who_am_i.assert();
    Ok(())
}

#[test]
fn e2e_token_endpoint_accepts_encoded_form_body() -> Result<()> {
    let mut stub = DataverseStub::new();
    let token = stub.token_endpoint(1);

    let http = LiveNetworkProvider::new().http_client(Duration::from_secs(5))?;
    let provider = ClientCredentialsTokenProvider::new(
        http,
        &stub.url(),
        DataverseStub::TENANT,
        "e2e_client",
        "e2e_secret",
        &stub.url(),
    );

    let bearer = provider.access_token()?;

    assert_eq!(bearer.secret(), DataverseStub::TOKEN);
    token.assert();
    Ok(())
}

#[test]
fn e2e_whoami_reports_rejected_secret() -> Result<()> {
    let mut stub = DataverseStub::new();
    let _token = stub.token_rejected();
    let who_am_i = stub.who_am_i(0);

    let (session, _test_env) = HermeticSessionBuilder::new()?.with_dataverse(&stub).build()?;

    let error = execute_command_with_session(Commands::Whoami, &session).unwrap_err();

    assert!(error.chain().any(|cause| matches!(
        cause.downcast_ref::<AuthError>(),
        Some(AuthError::TokenEndpoint { error, .. }) if error == "invalid_client"
    )));
    who_am_i.assert();
    Ok(())
}

#[test]
fn e2e_client_secret_flow_requires_a_secret() -> Result<()> {
    let mut stub = DataverseStub::new();
    let token = stub.token_endpoint(0);

    let (session, _test_env) = HermeticSessionBuilder::new()?
        .with_dataverse(&stub)
        .with_config(|config| config.client_secret = None)
        .build()?;

    let error = execute_command_with_session(Commands::Whoami, &session).unwrap_err();

    assert!(error.to_string().contains("SOLFLOW_CLIENT_SECRET"));
    token.assert();
    Ok(())
}

#[test]
fn e2e_api_commands_require_an_environment() -> Result<()> {
    let (session, _test_env) = HermeticSessionBuilder::new()?.build()?;

    let error = execute_command_with_session(Commands::Whoami, &session).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingSetting { .. })
    ));
    Ok(())
}
