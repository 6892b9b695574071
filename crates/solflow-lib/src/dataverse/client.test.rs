use super::*;
use mockito::Matcher;

const SOLUTION_ID: &str = "3c1e2b4f-0000-4000-8000-000000000001";

fn client_for(server: &mockito::Server) -> DataverseClient {
    DataverseClient::new(Client::new(), &server.url(), BearerToken::new("test-token"))
}

fn solution_body(version: &str) -> String {
    format!(
        r#"{{"value":[{{"solutionid":"{}","uniquename":"feature_x","friendlyname":"Feature X","version":"{}"}}]}}"#,
        SOLUTION_ID, version
    )
}

fn mock_solution_lookup(server: &mut mockito::Server, unique_name: &str, body: &str) -> mockito::Mock {
    server
        .mock("GET", "/api/data/v9.2/solutions")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "$filter".into(),
                format!("uniquename eq '{}'", unique_name.replace('\'', "''")),
            ),
            Matcher::UrlEncoded("$select".into(), SOLUTION_FIELDS.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}

#[test]
fn test_resolve_id_sends_odata_headers_and_filter() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/data/v9.2/solutions")
        .match_query(Matcher::UrlEncoded(
            "$filter".into(),
            "uniquename eq 'feature_x'".into(),
        ))
        .match_header("authorization", "Bearer test-token")
        .match_header("odata-version", "4.0")
        .match_header("odata-maxversion", "4.0")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(solution_body("1.0.0.0"))
        .create();

    let id = client_for(&server).resolve_id("feature_x").unwrap();

    assert_eq!(id, SOLUTION_ID);
    mock.assert();
}

#[test]
fn test_quotes_in_unique_name_are_escaped() {
    let mut server = mockito::Server::new();
    let mock = mock_solution_lookup(&mut server, "o'brien", &solution_body("1.0.0.0"));

    client_for(&server).resolve_id("o'brien").unwrap();
    mock.assert();
}

#[test]
fn test_missing_solution_is_not_found() {
    let mut server = mockito::Server::new();
    let _mock = mock_solution_lookup(&mut server, "ghost", r#"{"value":[]}"#);

    let err = client_for(&server).resolve_id("ghost").unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
}

#[test]
fn test_list_components_follows_next_link_and_sorts() {
    let mut server = mockito::Server::new();
    let next_link = format!(
        "{}/api/data/v9.2/msdyn_solutioncomponentsummaries?$skiptoken=page2",
        server.url()
    );
    let first = server
        .mock("GET", "/api/data/v9.2/msdyn_solutioncomponentsummaries")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "$filter".into(),
                format!("msdyn_solutionid eq {}", SOLUTION_ID),
            ),
            Matcher::UrlEncoded("$orderby".into(), "msdyn_componenttype asc".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"value":[
                {{"msdyn_displayname":"Notify owner","msdyn_schemaname":"notify","msdyn_componenttype":29,"msdyn_componenttypename":"Workflow","msdyn_objectid":"f-1"}},
                {{"msdyn_displayname":"Script","msdyn_schemaname":"new_script","msdyn_componenttype":61,"msdyn_componenttypename":"Web Resource","msdyn_objectid":"w-1"}}
            ],"@odata.nextLink":"{}"}}"#,
            next_link
        ))
        .create();
    let second = server
        .mock("GET", "/api/data/v9.2/msdyn_solutioncomponentsummaries")
        .match_query(Matcher::UrlEncoded("$skiptoken".into(), "page2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"value":[
                {"msdyn_displayname":null,"msdyn_schemaname":"account","msdyn_componenttype":1,"msdyn_componenttypename":"Entity","msdyn_objectid":"e-1"}
            ]}"#,
        )
        .create();

    let components = client_for(&server).list_components(SOLUTION_ID).unwrap();

    first.assert();
    second.assert();
    let types: Vec<i32> = components.iter().map(|c| c.component_type).collect();
    assert_eq!(types, vec![1, 29, 61]);
    assert_eq!(components[0].display_name, "");
    assert_eq!(components[0].schema_name, "account");
    assert_eq!(components[1].object_id, "f-1");
}

#[test]
fn test_get_version_parses_solution_version() {
    let mut server = mockito::Server::new();
    let _mock = mock_solution_lookup(&mut server, "feature_x", &solution_body("1.2.3.4"));

    let version = client_for(&server).get_version("feature_x").unwrap();
    assert_eq!(version, SolutionVersion::new(1, 2, 3, 4));
}

#[test]
fn test_get_version_rejects_garbage() {
    let mut server = mockito::Server::new();
    let _mock = mock_solution_lookup(&mut server, "feature_x", &solution_body("banana"));

    let err = client_for(&server).get_version("feature_x").unwrap_err();
    assert!(matches!(err, DataverseError::InvalidVersion { .. }), "{err}");
}

#[test]
fn test_set_version_patches_solution_row() {
    let mut server = mockito::Server::new();
    let _lookup = mock_solution_lookup(&mut server, "feature_x", &solution_body("1.0.0.0"));
    let patch = server
        .mock("PATCH", format!("/api/data/v9.2/solutions({})", SOLUTION_ID).as_str())
        .match_header("if-match", "*")
        .match_body(Matcher::Json(serde_json::json!({ "version": "1.0.0.1" })))
        .with_status(204)
        .create();

    client_for(&server)
        .set_version("feature_x", SolutionVersion::new(1, 0, 0, 1))
        .unwrap();
    patch.assert();
}

#[test]
fn test_delete_removes_solution_row() {
    let mut server = mockito::Server::new();
    let _lookup = mock_solution_lookup(&mut server, "feature_x", &solution_body("1.0.0.0"));
    let delete = server
        .mock("DELETE", format!("/api/data/v9.2/solutions({})", SOLUTION_ID).as_str())
        .with_status(204)
        .create();

    client_for(&server).delete("feature_x").unwrap();
    delete.assert();
}

#[test]
fn test_api_errors_carry_odata_code_and_message() {
    let mut server = mockito::Server::new();
    let _lookup = mock_solution_lookup(&mut server, "feature_x", &solution_body("1.0.0.0"));
    let _delete = server
        .mock("DELETE", format!("/api/data/v9.2/solutions({})", SOLUTION_ID).as_str())
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"code":"0x8004f01f","message":"The solution has dependencies"}}"#)
        .create();

    let err = client_for(&server).delete("feature_x").unwrap_err();
    match err {
        DataverseError::Api {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 400);
            assert_eq!(code, "0x8004f01f");
            assert_eq!(message, "The solution has dependencies");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_non_json_error_body_is_kept_verbatim() {
    let err = api_error(502, "  Bad Gateway \n");
    assert_eq!(err.to_string(), "Dataverse returned HTTP 502 (): Bad Gateway");
}

#[test]
fn test_who_am_i() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/api/data/v9.2/WhoAmI")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"BusinessUnitId":"bu","UserId":"me","OrganizationId":"org"}"#)
        .create();

    let who = client_for(&server).who_am_i().unwrap();
    assert_eq!(who.user_id, "me");
}

#[test]
fn test_trailing_slash_in_environment_url_is_ignored() {
    let client = DataverseClient::new(
        Client::new(),
        "https://org.crm.dynamics.com/",
        BearerToken::new("t"),
    );
    let url = client.url("WhoAmI", &[]).unwrap();
    assert_eq!(url.as_str(), "https://org.crm.dynamics.com/api/data/v9.2/WhoAmI");
}

#[test]
fn test_escape_literal_doubles_quotes() {
    assert_eq!(escape_literal("a'b''c"), "a''b''''c");
}
