//! Dataverse Web API and token endpoint stub backed by mockito
//!
//! `with_*` methods register background mocks owned by the stub. Methods
//! returning a [`Mock`] register an expectation the caller keeps and asserts;
//! mockito drops a mock together with its handle.

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;

const API: &str = "/api/data/v9.2";

/// Row of the component summary virtual entity
#[derive(Debug, Clone)]
pub struct StubComponent {
    pub component_type: i32,
    pub name: String,
    pub object_id: String,
}

impl StubComponent {
    pub fn new(component_type: i32, name: &str, object_id: &str) -> Self {
        Self {
            component_type,
            name: name.to_string(),
            object_id: object_id.to_string(),
        }
    }
}

/// One mockito server playing both the identity platform and the environment
pub struct DataverseStub {
    server: ServerGuard,
    background: Vec<Mock>,
}

impl DataverseStub {
    pub const TENANT: &'static str = "e2e-tenant";
    pub const TOKEN: &'static str = "e2e-token";

    pub fn new() -> Self {
        Self {
            server: Server::new(),
            background: Vec::new(),
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    fn token_path() -> String {
        format!("/{}/oauth2/v2.0/token", Self::TENANT)
    }

    fn token_mock(&mut self) -> Mock {
        self.server
            .mock("POST", Self::token_path().as_str())
            .match_body(Matcher::UrlEncoded(
                "grant_type".into(),
                "client_credentials".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "token_type": "Bearer",
                    "expires_in": 3599,
                    "access_token": Self::TOKEN,
                })
                .to_string(),
            )
    }

    /// Client-credentials token endpoint issuing [`Self::TOKEN`]
    pub fn with_token(&mut self) -> &mut Self {
        let mock = self.token_mock().create();
        self.background.push(mock);
        self
    }

    /// Token endpoint expected to be hit exactly `hits` times
    pub fn token_endpoint(&mut self, hits: usize) -> Mock {
        self.token_mock().expect(hits).create()
    }

    /// Token endpoint rejecting the client secret
    pub fn token_rejected(&mut self) -> Mock {
        self.server
            .mock("POST", Self::token_path().as_str())
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "error": "invalid_client",
                    "error_description": "AADSTS7000215: Invalid client secret provided.",
                })
                .to_string(),
            )
            .create()
    }

    pub fn who_am_i(&mut self, hits: usize) -> Mock {
        self.server
            .mock("GET", format!("{}/WhoAmI", API).as_str())
            .match_header("authorization", format!("Bearer {}", Self::TOKEN).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "UserId": "11111111-1111-1111-1111-111111111111",
                    "BusinessUnitId": "22222222-2222-2222-2222-222222222222",
                    "OrganizationId": "33333333-3333-3333-3333-333333333333",
                })
                .to_string(),
            )
            .expect(hits)
            .create()
    }

    fn lookup(&mut self, unique_name: &str, rows: serde_json::Value) -> &mut Self {
        let mock = self
            .server
            .mock("GET", format!("{}/solutions", API).as_str())
            .match_query(Matcher::UrlEncoded(
                "$filter".to_string(),
                format!("uniquename eq '{}'", unique_name),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "value": rows }).to_string())
            .create();
        self.background.push(mock);
        self
    }

    /// Lookup of a solution by unique name
    pub fn with_solution(&mut self, unique_name: &str, id: &str, version: &str) -> &mut Self {
        self.lookup(
            unique_name,
            json!([{
                "solutionid": id,
                "uniquename": unique_name,
                "friendlyname": unique_name,
                "version": version,
            }]),
        )
    }

    /// Lookup that finds nothing
    pub fn with_missing_solution(&mut self, unique_name: &str) -> &mut Self {
        self.lookup(unique_name, json!([]))
    }

    /// Component summaries of a solution, in one page
    pub fn with_components(&mut self, solution_id: &str, components: &[StubComponent]) -> &mut Self {
        let value: Vec<_> = components
            .iter()
            .map(|c| {
                json!({
                    "msdyn_displayname": c.name,
                    "msdyn_schemaname": format!("new_{}", c.name),
                    "msdyn_componenttype": c.component_type,
                    "msdyn_componenttypename": format!("Type {}", c.component_type),
                    "msdyn_objectid": c.object_id,
                })
            })
            .collect();

        let mock = self
            .server
            .mock("GET", format!("{}/msdyn_solutioncomponentsummaries", API).as_str())
            .match_query(Matcher::UrlEncoded(
                "$filter".to_string(),
                format!("msdyn_solutionid eq {}", solution_id),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "value": value }).to_string())
            .create();
        self.background.push(mock);
        self
    }

    /// Version update of a solution to exactly `version`
    pub fn version_update(&mut self, solution_id: &str, version: &str, hits: usize) -> Mock {
        self.server
            .mock("PATCH", format!("{}/solutions({})", API, solution_id).as_str())
            .match_header("if-match", "*")
            .match_body(Matcher::Json(json!({ "version": version })))
            .with_status(204)
            .expect(hits)
            .create()
    }

    pub fn delete(&mut self, solution_id: &str, hits: usize) -> Mock {
        self.server
            .mock("DELETE", format!("{}/solutions({})", API, solution_id).as_str())
            .with_status(204)
            .expect(hits)
            .create()
    }

    /// Delete refused by the platform
    pub fn delete_refused(&mut self, solution_id: &str) -> Mock {
        self.server
            .mock("DELETE", format!("{}/solutions({})", API, solution_id).as_str())
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "error": {
                        "code": "0x8004f01f",
                        "message": "The solution cannot be deleted due to dependencies",
                    }
                })
                .to_string(),
            )
            .create()
    }
}

impl Default for DataverseStub {
    fn default() -> Self {
        Self::new()
    }
}
