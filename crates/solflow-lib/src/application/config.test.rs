use super::*;

#[test]
fn test_default_strings_match_typed_defaults() {
    let parsed = AppConfig::try_parse_from(["solflow"]).unwrap();
    let defaults = AppConfig::default();

    assert_eq!(parsed.log_level, defaults.log_level);
    assert_eq!(parsed.log_format, defaults.log_format);
    assert_eq!(parsed.log_output, defaults.log_output);
    assert_eq!(parsed.color, defaults.color);
    assert_eq!(parsed.auth, defaults.auth);
    assert_eq!(parsed.net_timeout, defaults.net_timeout);
    assert_eq!(parsed.authority_url, defaults.authority_url);
    assert_eq!(parsed.output_dir, defaults.output_dir);
    assert_eq!(parsed.pac_program, defaults.pac_program);
}

#[test]
fn test_cli_flags_and_aliases() {
    let parsed = AppConfig::try_parse_from([
        "solflow",
        "--environment-url",
        "https://org.crm.dynamics.com/",
        "--auth",
        "spn",
        "--tenant-id",
        "contoso",
        "--pac",
        "/opt/pac/pac",
        "-y",
    ])
    .unwrap();

    assert_eq!(parsed.auth, AuthMethod::ClientSecret);
    assert_eq!(parsed.tenant_id.as_deref(), Some("contoso"));
    assert_eq!(parsed.pac_program, "/opt/pac/pac");
    assert!(parsed.yes);
    assert_eq!(
        parsed.require_environment_url().unwrap(),
        "https://org.crm.dynamics.com"
    );
}

#[test]
fn test_missing_environment_url_names_variable() {
    let config = AppConfig {
        environment_url: Some("  ".to_string()),
        ..AppConfig::default()
    };

    let err = config.require_environment_url().unwrap_err();
    assert!(matches!(err, ConfigError::MissingSetting { env: "SOLFLOW_ENVIRONMENT_URL", .. }));
    assert!(err.to_string().contains("--environment-url"));
}

#[test]
fn test_output_path_resolves_against_workdir() {
    let relative = AppConfig {
        workdir: Some(PathBuf::from("/repo")),
        ..AppConfig::default()
    };
    assert_eq!(relative.output_path(), PathBuf::from("/repo/solutions"));

    let absolute = AppConfig {
        workdir: Some(PathBuf::from("/repo")),
        output_dir: std::env::temp_dir().join("exports"),
        ..AppConfig::default()
    };
    assert_eq!(absolute.output_path(), std::env::temp_dir().join("exports"));
}

#[test]
fn test_validate_fills_workdir_and_rejects_bad_values() {
    let mut config = AppConfig::default();
    config.validate().unwrap();
    assert!(config.workdir.is_some());

    let mut zero_timeout = AppConfig {
        net_timeout: 0,
        ..AppConfig::default()
    };
    assert!(matches!(
        zero_timeout.validate(),
        Err(ConfigError::ValidationFailed { .. })
    ));

    let mut bad_url = AppConfig {
        environment_url: Some("org.crm.dynamics.com".to_string()),
        ..AppConfig::default()
    };
    assert!(bad_url.validate().is_err());

    let mut missing_dir = AppConfig {
        workdir: Some(PathBuf::from("/definitely/not/a/solflow/workdir")),
        ..AppConfig::default()
    };
    assert!(matches!(
        missing_dir.validate(),
        Err(ConfigError::InvalidWorkDir { .. })
    ));
}

#[test]
fn test_timeout_duration() {
    let config = AppConfig {
        net_timeout: 90,
        ..AppConfig::default()
    };
    assert_eq!(config.timeout(), Duration::from_secs(90));
}
