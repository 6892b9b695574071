use super::*;

fn parse(args: &[&str]) -> Commands {
    let mut argv = vec!["solflow"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command.unwrap()
}

#[test]
fn test_migrate_decision_flags() {
    match parse(&["migrate", "feature_x", "--proceed", "--export=false"]) {
        Commands::Migrate {
            source,
            proceed,
            export,
            delete_source,
            report,
        } => {
            assert_eq!(source.as_deref(), Some("feature_x"));
            assert_eq!(proceed, Some(true));
            assert_eq!(export, Some(false));
            assert_eq!(delete_source, None);
            assert_eq!(report, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_migrate_explicit_delete_and_report() {
    match parse(&["migrate", "--delete-source", "true", "-r", "run.json"]) {
        Commands::Migrate {
            source,
            delete_source,
            report,
            ..
        } => {
            assert_eq!(source, None);
            assert_eq!(delete_source, Some(true));
            assert_eq!(report, Some(PathBuf::from("run.json")));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_bump_increment_aliases() {
    match parse(&["bump", "flows", "--increment", "feature", "--dry-run"]) {
        Commands::Bump {
            solution,
            increment,
            dry_run,
        } => {
            assert_eq!(solution.as_deref(), Some("flows"));
            assert_eq!(increment, IncrementPolicy::Minor);
            assert!(dry_run);
        }
        other => panic!("unexpected command: {other:?}"),
    }

    match parse(&["export", "flows"]) {
        Commands::Export { increment, .. } => assert_eq!(increment, IncrementPolicy::Patch),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_rejects_non_boolean_decision() {
    assert!(Cli::try_parse_from(["solflow", "migrate", "x", "--proceed", "maybe"]).is_err());
}
