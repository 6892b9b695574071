use super::*;
use crate::application::session_mocks::MockInteractiveProvider;

#[test]
fn test_defaults_never_delete() {
    assert!(DecisionPoint::Proceed.default_answer());
    assert!(DecisionPoint::Export.default_answer());
    assert!(!DecisionPoint::DeleteSource.default_answer());
}

#[test]
fn test_prompt_passes_question_and_default() {
    let interactive = MockInteractiveProvider::new().with_confirm(true);
    let source = PromptConfirmation::new(&interactive);

    assert!(source.confirm(DecisionPoint::DeleteSource, "Delete feature_x?").unwrap());
    assert_eq!(
        interactive.get_confirm_calls(),
        vec![("Delete feature_x?".to_string(), false)]
    );
}

#[test]
fn test_preset_uses_flags_then_defaults() {
    let source = PresetConfirmation::new(DecisionFlags {
        export: Some(false),
        ..DecisionFlags::default()
    });

    assert!(source.confirm(DecisionPoint::Proceed, "").unwrap());
    assert!(!source.confirm(DecisionPoint::Export, "").unwrap());
    assert!(!source.confirm(DecisionPoint::DeleteSource, "").unwrap());
}

#[test]
fn test_flags_then_prompt_only_asks_for_unset_points() {
    let interactive = MockInteractiveProvider::new().with_confirm(false);
    let source = FlagsThenPrompt::new(
        DecisionFlags {
            proceed: Some(true),
            delete_source: Some(true),
            export: None,
        },
        PromptConfirmation::new(&interactive),
    );

    assert!(source.confirm(DecisionPoint::Proceed, "go?").unwrap());
    assert!(!source.confirm(DecisionPoint::Export, "export?").unwrap());
    assert!(source.confirm(DecisionPoint::DeleteSource, "delete?").unwrap());

    let asked: Vec<String> = interactive
        .get_confirm_calls()
        .into_iter()
        .map(|(question, _)| question)
        .collect();
    assert_eq!(asked, vec!["export?".to_string()]);
}

#[test]
fn test_decision_point_names() {
    assert_eq!(DecisionPoint::DeleteSource.to_string(), "delete-source");
}
