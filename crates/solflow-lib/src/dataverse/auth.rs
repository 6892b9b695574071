//! Bearer-token acquisition
//!
//! Three interchangeable flows behind [`AccessTokenProvider`]: the Azure CLI
//! session (delegated, interactive login), the OAuth device authorization
//! grant, and the client-credentials grant for service principals.

use crate::application::session::ProcessProvider;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Tenant segment accepted for any work or school account
pub const DEFAULT_DEVICE_TENANT: &str = "organizations";

/// Public client id registered for Dataverse developer tooling
pub const DEFAULT_PUBLIC_CLIENT_ID: &str = "51f81489-12ee-4a9e-aaae-a2591f45987d";

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";
const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);

/// OAuth bearer token. Debug output never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Source of Dataverse bearer tokens
pub trait AccessTokenProvider {
    fn access_token(&self) -> Result<BearerToken, AuthError>;

    /// Short flow name for logs and status lines
    fn flow_name(&self) -> &'static str;
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing credential '{setting}' (set {env})")]
    MissingCredential {
        setting: &'static str,
        env: &'static str,
    },

    #[error("Azure CLI could not provide a token: {reason}")]
    AzureCli { reason: String },

    #[error("Token request failed: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("Token endpoint rejected the request ({error}): {description}")]
    TokenEndpoint { error: String, description: String },

    #[error("Device code expired before sign-in completed")]
    DeviceCodeExpired,

    #[error("Sign-in was declined")]
    DeviceCodeDeclined,

    #[error("Unexpected token endpoint response: {reason}")]
    InvalidResponse { reason: String },
}

impl AuthError {
    /// Troubleshooting checklist shown alongside a fatal error
    pub fn hints(&self) -> Vec<&'static str> {
        match self {
            AuthError::AzureCli { .. } => vec![
                "Install the Azure CLI and run 'az login' (add --tenant for guest accounts)",
                "Or switch flows with --auth device-code or --auth client-secret",
            ],
            AuthError::MissingCredential { .. } => vec![
                "Client-secret auth needs SOLFLOW_TENANT_ID, SOLFLOW_CLIENT_ID and SOLFLOW_CLIENT_SECRET",
                "Put them in .env.local or the pipeline's secret variables",
            ],
            AuthError::TokenEndpoint { .. } => vec![
                "Check the tenant id and client id of the app registration",
                "Check that the client secret has not expired",
                "The app registration needs the Dynamics CRM user_impersonation permission",
            ],
            AuthError::DeviceCodeExpired | AuthError::DeviceCodeDeclined => {
                vec!["Run the command again and finish the browser sign-in before the code expires"]
            }
            _ => vec!["Check network access to the login authority"],
        }
    }
}

/// Azure CLI delegated login (`az account get-access-token`)
pub struct AzureCliTokenProvider<'a> {
    process: &'a dyn ProcessProvider,
    resource: String,
    tenant: Option<String>,
    workdir: PathBuf,
}

impl<'a> AzureCliTokenProvider<'a> {
    pub fn new(
        process: &'a dyn ProcessProvider,
        resource: &str,
        tenant: Option<String>,
        workdir: PathBuf,
    ) -> Self {
        Self {
            process,
            resource: resource.trim_end_matches('/').to_string(),
            tenant,
            workdir,
        }
    }
}

impl AccessTokenProvider for AzureCliTokenProvider<'_> {
    #[instrument(skip(self), fields(resource = %self.resource))]
    fn access_token(&self) -> Result<BearerToken, AuthError> {
        let mut args = vec![
            "account",
            "get-access-token",
            "--resource",
            self.resource.as_str(),
            "--query",
            "accessToken",
            "--output",
            "tsv",
        ];
        if let Some(tenant) = &self.tenant {
            args.extend(["--tenant", tenant.as_str()]);
        }

        let output = self
            .process
            .execute("az", &args, &self.workdir)
            .map_err(|e| AuthError::AzureCli {
                reason: e.to_string(),
            })?;

        if !output.success {
            return Err(AuthError::AzureCli {
                reason: output.stderr.trim().to_string(),
            });
        }

        let token = output.stdout.trim();
        if token.is_empty() {
            return Err(AuthError::AzureCli {
                reason: "empty access token".to_string(),
            });
        }

        debug!("Acquired token from Azure CLI");
        Ok(BearerToken::new(token))
    }

    fn flow_name(&self) -> &'static str {
        "interactive"
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: String,
}

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    #[serde(default)]
    user_code: String,
    #[serde(default)]
    verification_uri: String,
    expires_in: u64,
    #[serde(default = "default_poll_interval")]
    interval: u64,
    #[serde(default)]
    message: Option<String>,
}

fn default_poll_interval() -> u64 {
    5
}

/// OAuth client-credentials grant (service principal)
pub struct ClientCredentialsTokenProvider {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl ClientCredentialsTokenProvider {
    pub fn new(
        http: Client,
        authority: &str,
        tenant: &str,
        client_id: &str,
        client_secret: &str,
        resource: &str,
    ) -> Self {
        Self {
            http,
            token_url: endpoint(authority, tenant, "token"),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            scope: scope_for(resource),
        }
    }
}

impl AccessTokenProvider for ClientCredentialsTokenProvider {
    #[instrument(skip(self), fields(client_id = %self.client_id))]
    fn access_token(&self) -> Result<BearerToken, AuthError> {
        let body = form_body(&[
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ]);

        match post_form(&self.http, &self.token_url, body)? {
            Ok(token) => {
                debug!("Acquired token with client credentials");
                Ok(BearerToken::new(token.access_token))
            }
            Err(error) => Err(AuthError::TokenEndpoint {
                error: error.error,
                description: error.error_description,
            }),
        }
    }

    fn flow_name(&self) -> &'static str {
        "client-secret"
    }
}

/// OAuth device authorization grant
pub struct DeviceCodeTokenProvider<'a> {
    http: Client,
    device_code_url: String,
    token_url: String,
    client_id: String,
    scope: String,
    notify: Box<dyn Fn(&str) + 'a>,
    sleep: fn(Duration),
}

impl<'a> DeviceCodeTokenProvider<'a> {
    pub fn new(
        http: Client,
        authority: &str,
        tenant: &str,
        client_id: &str,
        resource: &str,
        notify: Box<dyn Fn(&str) + 'a>,
    ) -> Self {
        Self {
            http,
            device_code_url: endpoint(authority, tenant, "devicecode"),
            token_url: endpoint(authority, tenant, "token"),
            client_id: client_id.to_string(),
            scope: scope_for(resource),
            notify,
            sleep: std::thread::sleep,
        }
    }

    /// Replace the polling delay, used by tests to avoid real waits
    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    fn request_device_code(&self) -> Result<DeviceCodeResponse, AuthError> {
        let body = form_body(&[
            ("client_id", self.client_id.as_str()),
            ("scope", self.scope.as_str()),
        ]);

        let response = self
            .http
            .post(&self.device_code_url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(token_endpoint_error(&text));
        }
        serde_json::from_str(&text).map_err(|e| AuthError::InvalidResponse {
            reason: e.to_string(),
        })
    }
}

impl AccessTokenProvider for DeviceCodeTokenProvider<'_> {
    #[instrument(skip(self), fields(client_id = %self.client_id))]
    fn access_token(&self) -> Result<BearerToken, AuthError> {
        let grant = self.request_device_code()?;
        let message = grant.message.clone().unwrap_or_else(|| {
            format!(
                "To sign in, open {} and enter the code {}",
                grant.verification_uri, grant.user_code
            )
        });
        (self.notify)(&message);

        let deadline = Instant::now() + Duration::from_secs(grant.expires_in);
        let mut interval = Duration::from_secs(grant.interval);

        loop {
            if Instant::now() >= deadline {
                return Err(AuthError::DeviceCodeExpired);
            }
            (self.sleep)(interval);

            let body = form_body(&[
                ("grant_type", DEVICE_CODE_GRANT),
                ("client_id", self.client_id.as_str()),
                ("device_code", grant.device_code.as_str()),
            ]);

            match post_form(&self.http, &self.token_url, body)? {
                Ok(token) => {
                    info!("Device code sign-in completed");
                    return Ok(BearerToken::new(token.access_token));
                }
                Err(error) => match error.error.as_str() {
                    "authorization_pending" => continue,
                    "slow_down" => interval += SLOW_DOWN_STEP,
                    "expired_token" => return Err(AuthError::DeviceCodeExpired),
                    "authorization_declined" | "access_denied" => {
                        return Err(AuthError::DeviceCodeDeclined);
                    }
                    _ => {
                        return Err(AuthError::TokenEndpoint {
                            error: error.error,
                            description: error.error_description,
                        });
                    }
                },
            }
        }
    }

    fn flow_name(&self) -> &'static str {
        "device-code"
    }
}

/// POST a form to a token endpoint; the inner result separates OAuth errors
/// from transport failures
fn post_form(
    http: &Client,
    url: &str,
    body: String,
) -> Result<Result<TokenResponse, TokenErrorResponse>, AuthError> {
    let response = http
        .post(url)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(ACCEPT, "application/json")
        .body(body)
        .send()?;

    let status = response.status();
    let text = response.text()?;

    if status.is_success() {
        let token = serde_json::from_str::<TokenResponse>(&text).map_err(|e| {
            AuthError::InvalidResponse {
                reason: e.to_string(),
            }
        })?;
        return Ok(Ok(token));
    }

    serde_json::from_str::<TokenErrorResponse>(&text)
        .map(Err)
        .map_err(|_| AuthError::InvalidResponse {
            reason: format!("HTTP {}: {}", status.as_u16(), text.trim()),
        })
}

fn token_endpoint_error(text: &str) -> AuthError {
    match serde_json::from_str::<TokenErrorResponse>(text) {
        Ok(error) => AuthError::TokenEndpoint {
            error: error.error,
            description: error.error_description,
        },
        Err(_) => AuthError::InvalidResponse {
            reason: text.trim().to_string(),
        },
    }
}

/// `application/x-www-form-urlencoded` body
pub(crate) fn form_body(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, NON_ALPHANUMERIC),
                utf8_percent_encode(value, NON_ALPHANUMERIC)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn endpoint(authority: &str, tenant: &str, leaf: &str) -> String {
    format!(
        "{}/{}/oauth2/v2.0/{}",
        authority.trim_end_matches('/'),
        tenant,
        leaf
    )
}

/// `.default` scope for a Dataverse environment
pub fn scope_for(resource: &str) -> String {
    format!("{}/.default", resource.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    include!("auth.test.rs");
}
