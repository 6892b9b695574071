//! Dataverse Web API collaborators
//!
//! Bearer-token acquisition and the solution directory client. Both are
//! reached only through the traits declared here and in [`auth`], so the
//! command layer can swap in mocks.

pub mod auth;
pub mod client;

pub use auth::{
    AccessTokenProvider, AuthError, AzureCliTokenProvider, BearerToken,
    ClientCredentialsTokenProvider, DeviceCodeTokenProvider,
};
pub use client::DataverseClient;

use crate::solution::{Component, SolutionVersion, VersionError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Relative path of the Web API endpoint under an environment URL
pub const API_PATH: &str = "api/data/v9.2";

/// Identity returned by the `WhoAmI` function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmI {
    #[serde(rename = "UserId")]
    pub user_id: String,
    #[serde(rename = "BusinessUnitId")]
    pub business_unit_id: String,
    #[serde(rename = "OrganizationId")]
    pub organization_id: String,
}

/// Solution lookup, component discovery, versioning and deletion
pub trait SolutionDirectory {
    /// Internal id (`solutionid`) of the solution with this unique name
    fn resolve_id(&self, unique_name: &str) -> Result<String, DataverseError>;

    /// Components of a solution, ordered by component type ascending
    fn list_components(&self, solution_id: &str) -> Result<Vec<Component>, DataverseError>;

    fn get_version(&self, unique_name: &str) -> Result<SolutionVersion, DataverseError>;

    fn set_version(&self, unique_name: &str, version: SolutionVersion)
    -> Result<(), DataverseError>;

    fn delete(&self, unique_name: &str) -> Result<(), DataverseError>;

    fn who_am_i(&self) -> Result<WhoAmI, DataverseError>;
}

#[derive(Debug, Error)]
pub enum DataverseError {
    #[error("Solution '{solution}' was not found in the environment")]
    NotFound { solution: String },

    #[error("Dataverse request failed: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("Dataverse returned HTTP {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Invalid Dataverse URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unexpected Dataverse response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Solution '{solution}' has an unreadable version: {source}")]
    InvalidVersion {
        solution: String,
        #[source]
        source: VersionError,
    },
}

impl DataverseError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataverseError::NotFound { .. })
    }

    /// Troubleshooting checklist shown alongside a fatal error
    pub fn hints(&self) -> Vec<&'static str> {
        match self {
            DataverseError::NotFound { .. } => vec![
                "Use the solution's unique name, not its display name",
                "Check that SOLFLOW_ENVIRONMENT_URL points at the environment holding the solution",
                "Run 'solflow whoami' to confirm which environment you are connected to",
            ],
            DataverseError::Api { status: 401, .. } | DataverseError::Api { status: 403, .. } => {
                vec![
                    "The token was rejected: sign in again or refresh the client secret",
                    "The identity needs a security role that can read and write solutions",
                    "For service principals, add an application user in the environment",
                ]
            }
            DataverseError::Transport { .. } => vec![
                "Check network access to the environment URL",
                "Raise --net-timeout for slow environments",
            ],
            _ => vec!["Re-run with --log-level 3 to see the full request log"],
        }
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
