use super::*;
use crate::primitives::ColorIntent;
use tempfile::TempDir;

#[test]
fn test_config_loading_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.log_level, 0);
    assert_eq!(config.net_timeout, 30);
    assert_eq!(config.color, ColorIntent::Auto);
    assert_eq!(config.pac_program, "pac");
}

#[test]
fn test_config_merging() {
    let base = AppConfig::default();
    let override_config = AppConfig {
        log_level: 4,
        color: ColorIntent::Always,
        environment_url: Some("https://org.crm.dynamics.com".to_string()),
        ..AppConfig::default()
    };

    let merged = base.merge_with(override_config);
    assert_eq!(merged.log_level, 4);
    assert_eq!(merged.color, ColorIntent::Always);
    assert_eq!(
        merged.environment_url.as_deref(),
        Some("https://org.crm.dynamics.com")
    );
    assert_eq!(merged.net_timeout, 30);
}

#[test]
fn test_load_layers_cli_over_defaults() {
    let cli = AppConfig {
        output_dir: "exports".into(),
        yes: true,
        ..AppConfig::default()
    };

    let config = AppConfig::load(cli).unwrap();
    assert_eq!(config.output_dir, std::path::PathBuf::from("exports"));
    assert!(config.yes);
    assert!(config.workdir.is_some());
}

#[test]
fn test_missing_env_files_are_skipped() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join(".env.nowhere");

    load_env_file(&missing).unwrap();
}

#[test]
fn test_malformed_env_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".env");
    std::fs::write(&path, "SOLFLOW_TEST_BROKEN='unterminated\n").unwrap();

    let err = load_env_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::EnvFileError { .. }));
}
