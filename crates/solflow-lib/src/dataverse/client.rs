//! Blocking Dataverse Web API client

use super::{API_PATH, BearerToken, DataverseError, SolutionDirectory, WhoAmI};
use crate::solution::{Component, SolutionVersion};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE, IF_MATCH};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

const SOLUTION_FIELDS: &str = "solutionid,uniquename,friendlyname,version";
const COMPONENT_FIELDS: &str = "msdyn_displayname,msdyn_schemaname,msdyn_componenttype,msdyn_componenttypename,msdyn_objectid";
const MAX_PAGE_SIZE: &str = "odata.maxpagesize=500";

/// Page of an OData collection
#[derive(Debug, Deserialize)]
struct ODataCollection<T> {
    value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ODataErrorBody {
    error: ODataErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ODataErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Row of the `solutions` entity set
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SolutionRecord {
    #[serde(rename = "solutionid")]
    pub id: String,
    #[serde(rename = "uniquename")]
    pub unique_name: String,
    #[serde(rename = "friendlyname", default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Row of the `msdyn_solutioncomponentsummaries` virtual entity
#[derive(Debug, Deserialize)]
struct ComponentSummaryRecord {
    #[serde(default)]
    msdyn_displayname: Option<String>,
    #[serde(default)]
    msdyn_schemaname: Option<String>,
    #[serde(default)]
    msdyn_componenttype: Option<i32>,
    #[serde(default)]
    msdyn_componenttypename: Option<String>,
    #[serde(default)]
    msdyn_objectid: Option<String>,
}

impl From<ComponentSummaryRecord> for Component {
    fn from(record: ComponentSummaryRecord) -> Self {
        Component {
            display_name: record.msdyn_displayname.unwrap_or_default(),
            schema_name: record.msdyn_schemaname.unwrap_or_default(),
            component_type: record.msdyn_componenttype.unwrap_or_default(),
            component_type_name: record.msdyn_componenttypename.unwrap_or_default(),
            object_id: record.msdyn_objectid.unwrap_or_default(),
        }
    }
}

/// Dataverse Web API client bound to one environment and one token
pub struct DataverseClient {
    http: Client,
    api_root: String,
    token: BearerToken,
}

impl DataverseClient {
    pub fn new(http: Client, environment_url: &str, token: BearerToken) -> Self {
        let api_root = format!("{}/{}", environment_url.trim_end_matches('/'), API_PATH);
        Self {
            http,
            api_root,
            token,
        }
    }

    /// Look up a solution row by unique name
    #[instrument(skip(self))]
    pub fn find_solution(&self, unique_name: &str) -> Result<SolutionRecord, DataverseError> {
        let filter = format!("uniquename eq '{}'", escape_literal(unique_name));
        let url = self.url(
            "solutions",
            &[("$select", SOLUTION_FIELDS), ("$filter", filter.as_str())],
        )?;

        let page: ODataCollection<SolutionRecord> = self.get_json(url)?;
        page.value
            .into_iter()
            .next()
            .ok_or_else(|| DataverseError::NotFound {
                solution: unique_name.to_string(),
            })
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, DataverseError> {
        let raw = format!("{}/{}", self.api_root, path);
        let parsed = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        parsed.map_err(|e| DataverseError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DataverseError> {
        debug!(%url, "GET");
        let response = self.send(self.http.get(url).header("Prefer", MAX_PAGE_SIZE))?;
        response
            .json::<T>()
            .map_err(|e| DataverseError::InvalidResponse {
                reason: e.to_string(),
            })
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, DataverseError> {
        let response = request
            .bearer_auth(self.token.secret())
            .header(ACCEPT, "application/json")
            .header("OData-MaxVersion", "4.0")
            .header("OData-Version", "4.0")
            .send()?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(api_error(status.as_u16(), &body))
    }
}

impl SolutionDirectory for DataverseClient {
    fn resolve_id(&self, unique_name: &str) -> Result<String, DataverseError> {
        Ok(self.find_solution(unique_name)?.id)
    }

    #[instrument(skip(self))]
    fn list_components(&self, solution_id: &str) -> Result<Vec<Component>, DataverseError> {
        let filter = format!("msdyn_solutionid eq {}", solution_id);
        let mut next = Some(self.url(
            "msdyn_solutioncomponentsummaries",
            &[
                ("$filter", filter.as_str()),
                ("$select", COMPONENT_FIELDS),
                ("$orderby", "msdyn_componenttype asc"),
            ],
        )?);

        let mut components = Vec::new();
        while let Some(url) = next.take() {
            let page: ODataCollection<ComponentSummaryRecord> = self.get_json(url)?;
            components.extend(page.value.into_iter().map(Component::from));

            if let Some(link) = page.next_link {
                next = Some(Url::parse(&link).map_err(|e| DataverseError::InvalidUrl {
                    url: link.clone(),
                    reason: e.to_string(),
                })?);
            }
        }

        // Server ordering is not guaranteed across pages
        components.sort_by_key(|c| c.component_type);
        debug!(count = components.len(), "Fetched solution components");
        Ok(components)
    }

    fn get_version(&self, unique_name: &str) -> Result<SolutionVersion, DataverseError> {
        let record = self.find_solution(unique_name)?;
        let raw = record.version.unwrap_or_default();
        raw.parse().map_err(|source| DataverseError::InvalidVersion {
            solution: unique_name.to_string(),
            source,
        })
    }

    #[instrument(skip(self))]
    fn set_version(
        &self,
        unique_name: &str,
        version: SolutionVersion,
    ) -> Result<(), DataverseError> {
        let id = self.resolve_id(unique_name)?;
        let url = self.url(&format!("solutions({})", id), &[])?;
        let body = serde_json::json!({ "version": version.to_string() });

        self.send(
            self.http
                .patch(url)
                .header(CONTENT_TYPE, "application/json")
                .header(IF_MATCH, "*")
                .body(body.to_string()),
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete(&self, unique_name: &str) -> Result<(), DataverseError> {
        let id = self.resolve_id(unique_name)?;
        let url = self.url(&format!("solutions({})", id), &[])?;
        self.send(self.http.delete(url))?;
        Ok(())
    }

    fn who_am_i(&self) -> Result<WhoAmI, DataverseError> {
        let url = self.url("WhoAmI", &[])?;
        self.get_json(url)
    }
}

/// Escape a value for use inside a single-quoted OData string literal
fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

fn api_error(status: u16, body: &str) -> DataverseError {
    match serde_json::from_str::<ODataErrorBody>(body) {
        Ok(parsed) => DataverseError::Api {
            status,
            code: parsed.error.code,
            message: parsed.error.message,
        },
        Err(_) => DataverseError::Api {
            status,
            code: String::new(),
            message: body.trim().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    include!("client.test.rs");
}
