use super::*;
use crate::terminal::TerminalCapabilities;

fn create_test_styling() -> StyleManager {
    StyleManager::new(&TerminalCapabilities::default())
}

#[test]
fn test_status_message_formatting() {
    let styling = create_test_styling();
    let status = StatusDisplay::new(&styling);

    status.success("pac", "1.35.1");
    status.error("az", "not found");
    status.warning("source solution left in place");
    status.info("using default output directory");
    status.message("Plain message");
    status.emphasis("Important message");
    status.subtle("Secondary info");
}

#[test]
fn test_status_helpers_do_not_panic_on_edge_input() {
    let styling = create_test_styling();
    let status = StatusDisplay::new(&styling);

    status.list(&[]);
    status.list(&["one", "two"]);
    status.section("");
    status.complete("");
    status.success(&"a".repeat(500), "");
}

#[test]
fn test_join_detail_omits_separator_for_empty_details() {
    assert_eq!(join_detail("pac", ""), "pac");
    assert_eq!(join_detail("pac", "1.35.1"), "pac: 1.35.1");
}
