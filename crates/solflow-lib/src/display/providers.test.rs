use super::*;
use crate::display::mock::{DisplayCall, MockDisplayProvider};

#[test]
fn test_batch_summary_classification() {
    let all_good = BatchSummary::new(3, 0);
    assert!(all_good.is_success());
    assert!(!all_good.is_partial_success());

    let mixed = BatchSummary::new(2, 1).with_skipped(1);
    assert!(mixed.is_partial_success());
    assert!(!mixed.is_failure());
    assert_eq!(mixed.total(), 4);

    let none = BatchSummary::default();
    assert!(!none.is_success());
    assert!(!none.is_failure());
    assert!(BatchSummary::new(0, 1).is_failure());
}

#[test]
fn test_batch_summary_mentions_skipped_only_when_present() {
    assert_eq!(BatchSummary::new(0, 2).to_string(), "0 successful, 2 failed");
    assert_eq!(
        BatchSummary::new(1, 1).with_skipped(2).to_string(),
        "1 successful, 1 failed, 2 skipped"
    );
}

#[test]
fn test_display_summary_reports_partial_success_as_warning() {
    let display = MockDisplayProvider::new();
    display.display_summary("Migration", &BatchSummary::new(2, 1));

    assert!(display.has_call(&DisplayCall::StatusWarning {
        message: "Migration finished with failures".to_string(),
    }));
    assert!(display.mentions("2 successful, 1 failed"));
}

#[test]
fn test_display_summary_pluralizes_counts() {
    let display = MockDisplayProvider::new();
    display.display_summary("Export", &BatchSummary::new(1, 0));
    assert!(display.has_call(&DisplayCall::StatusComplete {
        task: "Export finished".to_string(),
    }));
    assert!(display.mentions("1 item successful"));

    let display = MockDisplayProvider::new();
    display.display_summary("Export", &BatchSummary::new(0, 2));
    assert!(display.has_call(&DisplayCall::StatusError {
        item: "Export".to_string(),
        details: "failed".to_string(),
    }));
    assert!(display.mentions("2 items failed"));
}

#[test]
fn test_display_summary_with_nothing_done() {
    let display = MockDisplayProvider::new();
    display.display_summary("Migration", &BatchSummary::default());

    assert_eq!(
        display.get_calls(),
        vec![DisplayCall::StatusInfo {
            message: "Migration: nothing to do".to_string(),
        }]
    );
}
