use super::*;

#[test]
fn test_mapped_types() {
    assert_eq!(classify(10112), "connectionreference");
    assert_eq!(classify(29), "flows");
    assert_eq!(classify(61), "webresources");
    assert_eq!(classify(91), "plugins");
    assert_eq!(classify(92), "plugins");
}

#[test]
fn test_unmapped_types_fall_back_to_main() {
    for code in [0, 1, -1, 28, 30, 93, 999, 10111, 10113, i32::MIN, i32::MAX] {
        assert_eq!(classify(code), DEFAULT_TARGET, "code {code}");
    }
}

#[test]
fn test_connection_references_use_symbolic_selector() {
    let selector = ComponentTypeSelector::for_type(10112);
    assert_eq!(selector, ComponentTypeSelector::Symbolic("ConnectionReference"));
    assert_eq!(selector.to_string(), "ConnectionReference");
}

#[test]
fn test_other_types_use_numeric_selector() {
    let selector = ComponentTypeSelector::for_type(61);
    assert_eq!(selector, ComponentTypeSelector::Code(61));
    assert_eq!(selector.to_string(), "61");
}
