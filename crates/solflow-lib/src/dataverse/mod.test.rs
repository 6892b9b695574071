use super::*;

#[test]
fn test_who_am_i_deserializes_pascal_case() {
    let body = r#"{
        "@odata.context": "https://org.crm.dynamics.com/api/data/v9.2/$metadata#WhoAmIResponse",
        "BusinessUnitId": "bu-1",
        "UserId": "user-1",
        "OrganizationId": "org-1"
    }"#;

    let who: WhoAmI = serde_json::from_str(body).unwrap();
    assert_eq!(who.user_id, "user-1");
    assert_eq!(who.business_unit_id, "bu-1");
    assert_eq!(who.organization_id, "org-1");
}

#[test]
fn test_not_found_hints_mention_unique_name() {
    let error = DataverseError::NotFound {
        solution: "feature_x".to_string(),
    };
    assert!(error.is_not_found());
    assert!(error.to_string().contains("feature_x"));
    assert!(error.hints().iter().any(|h| h.contains("unique name")));
}

#[test]
fn test_auth_failures_get_permission_hints() {
    let error = DataverseError::Api {
        status: 403,
        code: "0x80040220".to_string(),
        message: "Principal user is missing prvReadSolution privilege".to_string(),
    };
    assert!(!error.is_not_found());
    assert!(error.hints().iter().any(|h| h.contains("security role")));
    assert_eq!(
        error.to_string(),
        "Dataverse returned HTTP 403 (0x80040220): Principal user is missing prvReadSolution privilege"
    );
}
