use super::*;
use crate::application::session_mocks::MockProcessProvider;
use crate::application::session::ProcessOutput;
use mockito::Matcher;
use std::cell::RefCell;
use std::path::Path;

fn no_sleep(_: Duration) {}

#[test]
fn test_bearer_token_debug_is_redacted() {
    let token = BearerToken::new("super-secret");
    assert_eq!(format!("{:?}", token), "BearerToken(***)");
    assert_eq!(token.secret(), "super-secret");
}

#[test]
fn test_form_body_percent_encodes_values() {
    let body = form_body(&[("scope", "https://org.crm.dynamics.com/.default"), ("a b", "c&d")]);
    assert_eq!(
        body,
        "scope=https%3A%2F%2Forg%2Ecrm%2Edynamics%2Ecom%2F%2Edefault&a%20b=c%26d"
    );
}

#[test]
fn test_scope_and_endpoints() {
    assert_eq!(
        scope_for("https://org.crm.dynamics.com/"),
        "https://org.crm.dynamics.com/.default"
    );
    assert_eq!(
        endpoint("https://login.microsoftonline.com/", "contoso", "token"),
        "https://login.microsoftonline.com/contoso/oauth2/v2.0/token"
    );
}

#[test]
fn test_azure_cli_flow_runs_az_with_resource_and_tenant() {
    let process = MockProcessProvider::new().with_result(
        "az",
        &[
            "account",
            "get-access-token",
            "--resource",
            "https://org.crm.dynamics.com",
            "--query",
            "accessToken",
            "--output",
            "tsv",
            "--tenant",
            "contoso",
        ],
        Ok(ProcessOutput {
            stdout: "eyJ0eXAi\n".to_string(),
            stderr: String::new(),
            success: true,
        }),
    );

    let provider = AzureCliTokenProvider::new(
        &process,
        "https://org.crm.dynamics.com/",
        Some("contoso".to_string()),
        PathBuf::from("/work"),
    );

    let token = provider.access_token().unwrap();
    assert_eq!(token.secret(), "eyJ0eXAi");
    assert_eq!(provider.flow_name(), "interactive");
    assert_eq!(process.get_calls()[0].working_dir, Path::new("/work"));
}

#[test]
fn test_azure_cli_failure_surfaces_stderr() {
    let process = MockProcessProvider::new().with_default_result(Ok(ProcessOutput {
        stdout: String::new(),
        stderr: "Please run 'az login' to setup account.\n".to_string(),
        success: false,
    }));

    let provider =
        AzureCliTokenProvider::new(&process, "https://org.crm.dynamics.com", None, PathBuf::from("."));

    let err = provider.access_token().unwrap_err();
    assert!(err.to_string().contains("az login"), "{err}");
    assert!(err.hints().iter().any(|h| h.contains("--auth")));
}

#[test]
fn test_azure_cli_empty_token_is_an_error() {
    let process = MockProcessProvider::new();
    let provider =
        AzureCliTokenProvider::new(&process, "https://org.crm.dynamics.com", None, PathBuf::from("."));

    assert!(matches!(
        provider.access_token(),
        Err(AuthError::AzureCli { .. })
    ));
}

#[test]
fn test_client_credentials_posts_form_to_tenant_token_endpoint() {
    let mut server = mockito::Server::new();
    let resource = "https://org.crm.dynamics.com";
    let mock = server
        .mock("POST", "/contoso/oauth2/v2.0/token")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
            Matcher::UrlEncoded("client_id".into(), "app-id".into()),
            Matcher::UrlEncoded("client_secret".into(), "s3cr3t".into()),
            Matcher::UrlEncoded("scope".into(), format!("{}/.default", resource)),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token_type":"Bearer","expires_in":3599,"access_token":"cc-token"}"#)
        .create();

    let provider = ClientCredentialsTokenProvider::new(
        Client::new(),
        &server.url(),
        "contoso",
        "app-id",
        "s3cr3t",
        resource,
    );

    assert_eq!(provider.access_token().unwrap().secret(), "cc-token");
    mock.assert();
}

#[test]
fn test_client_credentials_maps_oauth_errors() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/contoso/oauth2/v2.0/token")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"invalid_client","error_description":"AADSTS7000215: Invalid client secret provided."}"#)
        .create();

    let provider = ClientCredentialsTokenProvider::new(
        Client::new(),
        &server.url(),
        "contoso",
        "app-id",
        "wrong",
        "https://org.crm.dynamics.com",
    );

    match provider.access_token().unwrap_err() {
        AuthError::TokenEndpoint { error, description } => {
            assert_eq!(error, "invalid_client");
            assert!(description.contains("AADSTS7000215"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_device_code_polls_until_authorized() {
    let mut server = mockito::Server::new();
    let device = server
        .mock("POST", "/organizations/oauth2/v2.0/devicecode")
        .match_body(Matcher::UrlEncoded("client_id".into(), DEFAULT_PUBLIC_CLIENT_ID.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"device_code":"dev-123","user_code":"ABCD-EFGH","verification_uri":"https://microsoft.com/devicelogin","expires_in":900,"interval":1,"message":"Open the page and enter ABCD-EFGH"}"#,
        )
        .create();
    let pending = server
        .mock("POST", "/organizations/oauth2/v2.0/token")
        .match_body(Matcher::UrlEncoded("device_code".into(), "dev-123".into()))
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"authorization_pending","error_description":"pending"}"#)
        .expect(1)
        .create();
    let granted = server
        .mock("POST", "/organizations/oauth2/v2.0/token")
        .match_body(Matcher::UrlEncoded("grant_type".into(), DEVICE_CODE_GRANT.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"device-token","token_type":"Bearer"}"#)
        .expect(1)
        .create();

    let shown = RefCell::new(Vec::new());
    let provider = DeviceCodeTokenProvider::new(
        Client::new(),
        &server.url(),
        DEFAULT_DEVICE_TENANT,
        DEFAULT_PUBLIC_CLIENT_ID,
        "https://org.crm.dynamics.com",
        Box::new(|message: &str| shown.borrow_mut().push(message.to_string())),
    )
    .with_sleep(no_sleep);

    let token = provider.access_token().unwrap();

    assert_eq!(token.secret(), "device-token");
    assert_eq!(shown.borrow().as_slice(), ["Open the page and enter ABCD-EFGH"]);
    device.assert();
    pending.assert();
    granted.assert();
}

#[test]
fn test_device_code_declined() {
    let mut server = mockito::Server::new();
    let _device = server
        .mock("POST", "/organizations/oauth2/v2.0/devicecode")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"device_code":"dev","user_code":"X","verification_uri":"https://microsoft.com/devicelogin","expires_in":900}"#)
        .create();
    let _token = server
        .mock("POST", "/organizations/oauth2/v2.0/token")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"authorization_declined"}"#)
        .create();

    let provider = DeviceCodeTokenProvider::new(
        Client::new(),
        &server.url(),
        DEFAULT_DEVICE_TENANT,
        DEFAULT_PUBLIC_CLIENT_ID,
        "https://org.crm.dynamics.com",
        Box::new(|_: &str| {}),
    )
    .with_sleep(no_sleep);

    assert!(matches!(
        provider.access_token(),
        Err(AuthError::DeviceCodeDeclined)
    ));
}

#[test]
fn test_device_code_expires_without_polling() {
    let mut server = mockito::Server::new();
    let _device = server
        .mock("POST", "/organizations/oauth2/v2.0/devicecode")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"device_code":"dev","user_code":"X","verification_uri":"u","expires_in":0,"interval":1}"#)
        .create();
    let token = server
        .mock("POST", "/organizations/oauth2/v2.0/token")
        .expect(0)
        .create();

    let provider = DeviceCodeTokenProvider::new(
        Client::new(),
        &server.url(),
        DEFAULT_DEVICE_TENANT,
        DEFAULT_PUBLIC_CLIENT_ID,
        "https://org.crm.dynamics.com",
        Box::new(|_: &str| {}),
    )
    .with_sleep(no_sleep);

    assert!(matches!(
        provider.access_token(),
        Err(AuthError::DeviceCodeExpired)
    ));
    token.assert();
}
