use super::*;

fn component(display: &str, schema: &str, object_id: &str) -> Component {
    Component {
        display_name: display.to_string(),
        schema_name: schema.to_string(),
        component_type: 1,
        component_type_name: "Entity".to_string(),
        object_id: object_id.to_string(),
    }
}

#[test]
fn test_blank_and_placeholder_ids_are_not_addressable() {
    for id in ["", "   ", "N/A", "null", "NONE", "00000000-0000-0000-0000-000000000000"] {
        assert!(!component("x", "x", id).is_addressable(), "{id:?} should be rejected");
    }
}

#[test]
fn test_real_ids_are_addressable() {
    assert!(component("x", "x", "70816501-edb9-4740-a16c-6a5efbc05d84").is_addressable());
    assert!(component("x", "x", "  abc  ").is_addressable());
}

#[test]
fn test_label_falls_back_through_names() {
    assert_eq!(component("Account", "account", "id").label(), "Account");
    assert_eq!(component("", "account", "id").label(), "account");
    assert_eq!(component("N/A", " ", "id-1").label(), "id-1");
    assert_eq!(component("", "", "").label(), "(unnamed)");
}

#[test]
fn test_component_serializes_camel_case() {
    let json = serde_json::to_value(component("A", "a", "1")).unwrap();
    assert_eq!(json["displayName"], "A");
    assert_eq!(json["componentTypeName"], "Entity");
    assert_eq!(json["objectId"], "1");
}
