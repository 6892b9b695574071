use super::*;
use crate::application::config::AppConfig;
use crate::application::session::ProcessOutput;
use crate::application::session_mocks::*;
use crate::display::DisplayCall;
use crate::solution::{Component, SolutionVersion};
use std::path::Path;

const WORKDIR: &str = "/test/workdir";

fn component(component_type: i32, name: &str, object_id: &str) -> Component {
    Component {
        display_name: name.to_string(),
        schema_name: format!("new_{}", name),
        component_type,
        component_type_name: format!("Type {}", component_type),
        object_id: object_id.to_string(),
    }
}

fn output(stdout: &str, success: bool) -> ProcessOutput {
    ProcessOutput {
        stdout: stdout.to_string(),
        stderr: String::new(),
        success,
    }
}

fn pac() -> MockProcessProvider {
    MockProcessProvider::new().with_program("pac").with_result(
        "pac",
        &["help"],
        Ok(output("Microsoft PowerPlatform CLI\nVersion: 1.34.4+g1a2b3c\n", true)),
    )
}

fn session_with(directory: &MockSolutionDirectory, process: MockProcessProvider) -> MockCommandSession {
    MockCommandSession::new()
        .with_network(MockNetworkProvider::new().with_directory(directory.clone()))
        .with_process(process)
}

fn config_with(update: impl FnOnce(&mut AppConfig)) -> MockConfigProvider {
    let mut config = AppConfig {
        workdir: Some(PathBuf::from(WORKDIR)),
        environment_url: Some("https://org.crm.dynamics.com".to_string()),
        ..AppConfig::default()
    };
    update(&mut config);
    MockConfigProvider::new(config)
}

fn pac_subcommands(process: &MockProcessProvider, subcommand: &str) -> Vec<Vec<String>> {
    process
        .get_calls_for_command("pac")
        .into_iter()
        .filter(|call| call.args.get(1).map(String::as_str) == Some(subcommand))
        .map(|call| call.args)
        .collect()
}

fn feature_directory() -> MockSolutionDirectory {
    MockSolutionDirectory::new()
        .with_solution(
            "feature_x",
            SolutionVersion::new(1, 0, 0, 0),
            vec![
                component(29, "approval_flow", "a-1"),
                component(61, "logo", ""),
                component(999, "misc", "c-3"),
            ],
        )
        .with_solution("flows", SolutionVersion::new(1, 0, 0, 3), vec![])
        .with_solution("main", SolutionVersion::new(2, 1, 0, 9), vec![])
        .with_solution("webresources", SolutionVersion::new(1, 0, 0, 0), vec![])
}

fn migrate(source: &str, flags: DecisionFlags, report: Option<&str>) -> Commands {
    Commands::Migrate {
        source: Some(source.to_string()),
        proceed: flags.proceed,
        export: flags.export,
        delete_source: flags.delete_source,
        report: report.map(PathBuf::from),
    }
}

mod handle_requirements_tests {
    use super::*;

    #[test]
    fn it_reports_pac_version_when_available() {
        let session = MockCommandSession::new().with_process(pac().with_program("az"));

        let result = handle_requirements(&session);

        assert!(result.is_ok(), "{:?}", result);
        assert!(session.display_provider.has_call(&DisplayCall::StatusSuccess {
            item: "pac".to_string(),
            details: "1.34.4+g1a2b3c".to_string(),
        }));
        assert!(
            session
                .display_provider
                .mentions("/mock/bin/az")
        );
    }

    #[test]
    fn it_fails_with_install_hint_when_pac_is_missing() {
        let session = MockCommandSession::new().with_process(MockProcessProvider::new());

        let error = handle_requirements(&session).unwrap_err();

        assert!(matches!(
            error.downcast_ref::<PacError>(),
            Some(PacError::NotAvailable { .. })
        ));
        assert!(session.display_provider.mentions("dotnet tool install"));
    }

    #[test]
    fn it_requires_az_only_for_interactive_auth() {
        let session = MockCommandSession::new()
            .with_process(pac())
            .with_config(config_with(|c| c.auth = AuthMethod::ClientSecret));

        assert!(handle_requirements(&session).is_ok());
        assert_eq!(session.display_provider.count_calls("status_error"), 0);
        assert!(session.display_provider.mentions("only needed for --auth interactive"));
    }

    #[test]
    fn it_flags_missing_az_for_interactive_auth() {
        let session = MockCommandSession::new().with_process(pac());

        assert!(handle_requirements(&session).is_ok());
        assert!(session.display_provider.mentions("install-azure-cli"));
        assert_eq!(session.display_provider.count_calls("status_error"), 1);
    }
}

mod handle_whoami_tests {
    use super::*;

    #[test]
    fn it_prints_identity_properties() {
        let directory = MockSolutionDirectory::new();
        let network = MockNetworkProvider::new().with_directory(directory.clone());
        let session = MockCommandSession::new().with_network(network.clone());

        let result = handle_whoami(&session);

        assert!(result.is_ok(), "{:?}", result);
        assert_eq!(network.token_request_count(), 1);
        assert_eq!(directory.calls(), vec!["who_am_i:"]);
        assert!(
            session
                .display_provider
                .mentions("00000000-0000-0000-0000-0000000000aa")
        );
    }

    #[test]
    fn it_requires_an_environment_url() {
        let session = MockCommandSession::new().with_config(config_with(|c| c.environment_url = None));

        let error = handle_whoami(&session).unwrap_err();

        assert!(matches!(
            error.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingSetting { env: "SOLFLOW_ENVIRONMENT_URL", .. })
        ));
        assert!(!failure_hints(&error).is_empty());
    }

    #[test]
    fn it_surfaces_authentication_failures() {
        let session = MockCommandSession::new()
            .with_network(MockNetworkProvider::new().with_auth_failure("az login required"));

        let error = handle_whoami(&session).unwrap_err();

        assert!(error.chain().any(|cause| cause.is::<AuthError>()));
        assert!(format!("{:#}", error).contains("az login required"));
    }
}

mod handle_components_tests {
    use super::*;

    #[test]
    fn it_lists_components_with_targets() {
        let directory = feature_directory();
        let session = session_with(&directory, MockProcessProvider::new());

        let result = handle_components(&session, Some("feature_x".to_string()));

        assert!(result.is_ok(), "{:?}", result);
        let table = session
            .display_provider
            .get_calls()
            .into_iter()
            .find_map(|call| match call {
                DisplayCall::StructuredTable { headers, rows } => Some((headers, rows)),
                _ => None,
            })
            .expect("component table");
        assert_eq!(table.0, vec!["Type", "Type Name", "Component", "Target"]);
        let targets: Vec<&str> = table.1.iter().map(|row| row[3].as_str()).collect();
        assert_eq!(targets, vec!["flows", "webresources", "main"]);
        // listing never runs pac
        assert!(session.process_provider.get_calls().is_empty());
    }

    #[test]
    fn it_prompts_for_a_missing_solution_name() {
        let directory = feature_directory();
        let session = session_with(&directory, MockProcessProvider::new())
            .with_interactive(MockInteractiveProvider::new().with_text_input("  feature_x "));

        assert!(handle_components(&session, None).is_ok());
        assert_eq!(session.interactive_provider.get_text_input_calls().len(), 1);
        assert_eq!(directory.calls()[0], "resolve_id:feature_x");
    }

    #[test]
    fn it_fails_fast_without_a_name_when_not_interactive() {
        let directory = feature_directory();
        let session = session_with(&directory, MockProcessProvider::new())
            .with_interactive(MockInteractiveProvider::new().with_yes_mode(true));

        let error = handle_components(&session, Some("   ".to_string())).unwrap_err();

        assert!(matches!(
            error.downcast_ref::<ConfigError>(),
            Some(ConfigError::ValidationFailed { .. })
        ));
        assert!(directory.calls().is_empty());
    }

    #[test]
    fn it_reports_unknown_solutions_with_hints() {
        let directory = MockSolutionDirectory::new();
        let session = session_with(&directory, MockProcessProvider::new());

        let error = handle_components(&session, Some("ghost".to_string())).unwrap_err();

        assert!(matches!(
            error.downcast_ref::<MigrationError>(),
            Some(MigrationError::Discovery { .. })
        ));
        assert!(!failure_hints(&error).is_empty());
    }
}

mod handle_bump_tests {
    use super::*;

    #[test]
    fn it_writes_the_incremented_version() {
        let directory = feature_directory();
        let session = session_with(&directory, MockProcessProvider::new());

        let result = handle_bump(&session, Some("flows".to_string()), IncrementPolicy::Minor, false);

        assert!(result.is_ok(), "{:?}", result);
        assert_eq!(directory.version_of("flows"), Some(SolutionVersion::new(1, 1, 0, 0)));
        assert!(session.display_provider.has_call(&DisplayCall::StatusSuccess {
            item: "flows".to_string(),
            details: "1.0.0.3 -> 1.1.0.0".to_string(),
        }));
    }

    #[test]
    fn it_leaves_the_version_alone_on_dry_run() {
        let directory = feature_directory();
        let session = session_with(&directory, MockProcessProvider::new());

        let result = handle_bump(&session, Some("flows".to_string()), IncrementPolicy::Patch, true);

        assert!(result.is_ok());
        assert_eq!(directory.version_of("flows"), Some(SolutionVersion::new(1, 0, 0, 3)));
        assert!(!directory.calls().iter().any(|c| c.starts_with("set_version")));
        assert!(session.display_provider.mentions("dry run"));
    }

    #[test]
    fn it_fails_when_the_version_cannot_be_pushed() {
        let directory = feature_directory().with_api_error("set_version", 403, "no write access");
        let session = session_with(&directory, MockProcessProvider::new());

        let error = handle_bump(&session, Some("flows".to_string()), IncrementPolicy::Patch, false)
            .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<ExportError>(),
            Some(ExportError::VersionUpdate { .. })
        ));
    }
}

mod handle_export_tests {
    use super::*;

    #[test]
    fn it_exports_and_unpacks_both_packages() {
        let directory = feature_directory();
        let session = session_with(&directory, pac());

        let result = handle_export(&session, Some("flows".to_string()), IncrementPolicy::Patch);

        assert!(result.is_ok(), "{:?}", result);
        assert_eq!(directory.version_of("flows"), Some(SolutionVersion::new(1, 0, 0, 4)));
        assert!(session.process_provider.verify_call(
            "pac",
            &[
                "solution",
                "export",
                "--name",
                "flows",
                "--path",
                "/test/workdir/solutions/flows_managed.zip",
                "--managed",
                "true",
                "--overwrite",
            ],
            Path::new(WORKDIR),
        ));
        assert_eq!(pac_subcommands(&session.process_provider, "unpack").len(), 2);
        assert!(
            session
                .display_provider
                .mentions("/test/workdir/solutions/flows/unmanaged")
        );
    }

    #[test]
    fn it_fails_when_a_package_variant_fails() {
        let directory = feature_directory();
        let process = pac().with_result(
            "pac",
            &[
                "solution",
                "export",
                "--name",
                "flows",
                "--path",
                "/test/workdir/solutions/flows_managed.zip",
                "--managed",
                "true",
                "--overwrite",
            ],
            Ok(output("Error: Missing dependencies", false)),
        );
        let session = session_with(&directory, process);

        let error =
            handle_export(&session, Some("flows".to_string()), IncrementPolicy::Patch).unwrap_err();

        assert!(error.to_string().contains("1 of 2"));
        // unmanaged still exported and unpacked
        assert_eq!(pac_subcommands(&session.process_provider, "unpack").len(), 1);
        assert!(session.display_provider.mentions("Missing dependencies"));
    }

    #[test]
    fn it_checks_pac_before_touching_the_environment() {
        let directory = feature_directory();
        let session = session_with(&directory, MockProcessProvider::new());

        let error =
            handle_export(&session, Some("flows".to_string()), IncrementPolicy::Patch).unwrap_err();

        assert!(error.downcast_ref::<PacError>().is_some());
        assert!(directory.calls().is_empty());
        assert_eq!(session.network_provider.token_request_count(), 0);
    }
}

mod handle_migrate_tests {
    use super::*;

    #[test]
    fn it_moves_components_and_keeps_the_source_by_default() {
        let directory = feature_directory();
        let session = session_with(&directory, pac());
        let flags = DecisionFlags {
            proceed: Some(true),
            export: Some(false),
            delete_source: None,
        };

        let result = execute_command_with_session(migrate("feature_x", flags, None), &session);

        assert!(result.is_ok(), "{:?}", result);
        let moves = pac_subcommands(&session.process_provider, "add-solution-component");
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0][3], "flows");
        assert_eq!(moves[1][3], "main");
        assert!(pac_subcommands(&session.process_provider, "export").is_empty());
        assert!(directory.exists("feature_x"));
        // delete prompt offered, default declined
        let confirms = session.interactive_provider.get_confirm_calls();
        assert_eq!(confirms.len(), 1);
        assert!(!confirms[0].1);
    }

    #[test]
    fn it_exports_affected_targets_and_deletes_the_source_when_asked() {
        let directory = feature_directory();
        let session = session_with(&directory, pac());
        let flags = DecisionFlags {
            proceed: None,
            export: None,
            delete_source: Some(true),
        };

        let result = execute_command_with_session(migrate("feature_x", flags, None), &session);

        assert!(result.is_ok(), "{:?}", result);
        assert_eq!(directory.version_of("flows"), Some(SolutionVersion::new(1, 0, 0, 4)));
        assert_eq!(directory.version_of("main"), Some(SolutionVersion::new(2, 1, 0, 10)));
        assert_eq!(directory.version_of("webresources"), Some(SolutionVersion::new(1, 0, 0, 0)));
        assert_eq!(pac_subcommands(&session.process_provider, "export").len(), 4);
        assert!(!directory.exists("feature_x"));
    }

    #[test]
    fn it_takes_prompt_defaults_in_yes_mode() {
        let directory = feature_directory();
        let session = session_with(&directory, pac())
            .with_interactive(MockInteractiveProvider::new().with_yes_mode(true));

        let result =
            execute_command_with_session(migrate("feature_x", DecisionFlags::default(), None), &session);

        assert!(result.is_ok(), "{:?}", result);
        assert_eq!(pac_subcommands(&session.process_provider, "export").len(), 4);
        assert!(directory.exists("feature_x"));
    }

    #[test]
    fn it_writes_the_report_relative_to_the_workdir() {
        let directory = feature_directory();
        let filesystem = MockFileSystemProvider::new();
        let session = session_with(&directory, pac()).with_filesystem(filesystem.clone());
        let flags = DecisionFlags {
            proceed: Some(true),
            export: Some(false),
            delete_source: Some(false),
        };

        let result =
            execute_command_with_session(migrate("feature_x", flags, Some("report.json")), &session);

        assert!(result.is_ok(), "{:?}", result);
        let json = filesystem
            .read_written(Path::new("/test/workdir/report.json"))
            .expect("report written");
        let report: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(report["source"], "feature_x");
        assert_eq!(report["discovered"], 3);
        assert_eq!(report["outcome"]["failed"], 1);
    }

    #[test]
    fn it_keeps_the_report_when_the_source_is_unknown() {
        let directory = feature_directory();
        let filesystem = MockFileSystemProvider::new();
        let session = session_with(&directory, pac()).with_filesystem(filesystem.clone());

        let error = execute_command_with_session(
            migrate("ghost", DecisionFlags::default(), Some("/tmp/run.json")),
            &session,
        )
        .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<MigrationError>(),
            Some(MigrationError::Discovery { .. })
        ));
        assert!(filesystem.read_written(Path::new("/tmp/run.json")).is_some());
        assert!(pac_subcommands(&session.process_provider, "add-solution-component").is_empty());
    }

    #[test]
    fn it_reports_delete_failures_as_fatal() {
        let directory = feature_directory().with_api_error("delete", 400, "solution has dependencies");
        let session = session_with(&directory, pac());
        let flags = DecisionFlags {
            proceed: Some(true),
            export: Some(false),
            delete_source: Some(true),
        };

        let error = execute_command_with_session(migrate("feature_x", flags, None), &session)
            .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<MigrationError>(),
            Some(MigrationError::DeleteSource { .. })
        ));
        assert!(failure_hints(&error).iter().any(|hint| hint.contains("pac solution delete")));
    }

    #[test]
    fn it_does_nothing_when_declined() {
        let directory = feature_directory();
        let session = session_with(&directory, pac());
        let flags = DecisionFlags {
            proceed: Some(false),
            ..DecisionFlags::default()
        };

        let result = execute_command_with_session(migrate("feature_x", flags, None), &session);

        assert!(result.is_ok());
        assert!(pac_subcommands(&session.process_provider, "add-solution-component").is_empty());
        assert!(session.interactive_provider.get_confirm_calls().is_empty());
        assert!(session.display_provider.mentions("No components were moved"));
    }
}

mod failure_hints_tests {
    use super::*;

    #[test]
    fn it_finds_structured_errors_behind_context() {
        let error = anyhow::Error::from(PacError::NotAvailable {
            program: "pac".to_string(),
        })
        .context("requirements check");

        assert_eq!(
            failure_hints(&error),
            PacError::NotAvailable {
                program: "pac".to_string()
            }
            .hints()
        );
    }

    #[test]
    fn it_has_no_hints_for_plain_errors() {
        assert!(failure_hints(&anyhow::anyhow!("boom")).is_empty());
    }
}
