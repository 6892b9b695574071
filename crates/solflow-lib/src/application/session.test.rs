use super::*;
use tempfile::TempDir;

#[test]
fn test_live_filesystem_round_trip() {
    let temp = TempDir::new().unwrap();
    let fs = LiveFileSystemProvider;
    let report = temp.path().join("reports").join("run.json");

    fs.write_file(&report, "{}").unwrap();
    assert!(fs.exists(&report));
    assert!(temp.path().join("reports").is_dir());
    assert_eq!(std::fs::read_to_string(&report).unwrap(), "{}");

    fs.remove_file(&report).unwrap();
    assert!(!fs.exists(&report));

    let unpacked = temp.path().join("flows").join("managed");
    fs.create_dir_all(&unpacked).unwrap();
    fs.write_file(&unpacked.join("Other.xml"), "<x/>").unwrap();
    fs.remove_dir_all(&temp.path().join("flows")).unwrap();
    assert!(!fs.exists(&unpacked));
}

#[test]
fn test_live_filesystem_errors_name_the_path() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.txt");

    let err = LiveFileSystemProvider.remove_file(&missing).unwrap_err();
    assert!(err.to_string().contains("missing.txt"));
}

#[test]
fn test_find_program_searches_custom_path() {
    let temp = TempDir::new().unwrap();
    let name = if cfg!(windows) { "pac.cmd" } else { "pac" };
    std::fs::write(temp.path().join(name), "").unwrap();

    let process = LiveProcessProvider::with_custom_path(temp.path().display().to_string());

    assert_eq!(process.find_program("pac"), Some(temp.path().join(name)));
    assert_eq!(process.find_program("definitely-not-a-tool"), None);
}

#[test]
fn test_find_program_accepts_explicit_path() {
    let temp = TempDir::new().unwrap();
    let tool = temp.path().join("pac-wrapper");
    std::fs::write(&tool, "").unwrap();

    let process = LiveProcessProvider::with_custom_path(String::new());

    assert_eq!(process.find_program(&tool.display().to_string()), Some(tool));
}

#[test]
fn test_required_credential_rejects_blank() {
    let blank = Some("   ".to_string());
    let err = required(&blank, "client_secret", "SOLFLOW_CLIENT_SECRET").unwrap_err();
    assert!(matches!(
        err,
        AuthError::MissingCredential {
            setting: "client_secret",
            ..
        }
    ));

    let set = Some(" abc ".to_string());
    assert_eq!(required(&set, "client_id", "SOLFLOW_CLIENT_ID").unwrap(), "abc");
}

#[test]
fn test_client_secret_flow_requires_all_credentials() {
    let config = AppConfig {
        environment_url: Some("https://org.crm.dynamics.com".to_string()),
        auth: AuthMethod::ClientSecret,
        tenant_id: Some("contoso".to_string()),
        client_id: None,
        workdir: Some(PathBuf::from(".")),
        ..AppConfig::default()
    };
    let network = LiveNetworkProvider::new();
    let process = LiveProcessProvider::new();
    let display = crate::display::MockDisplayProvider::new();

    let err = network
        .token_provider(&config, &process, &display)
        .err()
        .unwrap();
    let auth = err.downcast_ref::<AuthError>().unwrap();
    assert!(matches!(
        auth,
        AuthError::MissingCredential {
            setting: "client_id",
            ..
        }
    ));
}

#[test]
fn test_token_provider_needs_environment_url() {
    let config = AppConfig::default();
    let network = LiveNetworkProvider::new();
    let process = LiveProcessProvider::new();
    let display = crate::display::MockDisplayProvider::new();

    let err = network
        .token_provider(&config, &process, &display)
        .err()
        .unwrap();
    assert!(err.to_string().contains("SOLFLOW_ENVIRONMENT_URL"));
}

#[test]
fn test_interactive_flow_selected_by_default() {
    let config = AppConfig {
        environment_url: Some("https://org.crm.dynamics.com".to_string()),
        workdir: Some(PathBuf::from(".")),
        ..AppConfig::default()
    };
    let network = LiveNetworkProvider::new();
    let process = LiveProcessProvider::new();
    let display = crate::display::MockDisplayProvider::new();

    let provider = network.token_provider(&config, &process, &display).unwrap();
    assert_eq!(provider.flow_name(), "interactive");
}
