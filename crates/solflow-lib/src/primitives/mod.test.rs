use super::*;
use clap::ValueEnum;
use std::fmt::Debug;
use std::str::FromStr;

/// Every variant's primary name parses back to the same variant
fn assert_primary_names_parse<T>()
where
    T: ValueEnum + FromStr + PartialEq + Debug,
    <T as FromStr>::Err: Debug,
{
    for variant in T::value_variants() {
        let name = variant
            .to_possible_value()
            .map(|value| value.get_name().to_string())
            .unwrap_or_default();
        assert_eq!(name.parse::<T>().ok().as_ref(), Some(variant), "name '{}'", name);
    }
}

/// Each input (alias or mixed case) parses to the expected variant
fn assert_parses<T>(cases: &[(&str, T)])
where
    T: FromStr + PartialEq + Debug,
    <T as FromStr>::Err: Debug,
{
    for (input, expected) in cases {
        match input.parse::<T>() {
            Ok(parsed) => assert_eq!(&parsed, expected, "input '{}'", input),
            Err(err) => panic!("'{}' did not parse: {:?}", input, err),
        }
    }
}

#[test]
fn test_primary_names_round_trip() {
    assert_primary_names_parse::<LogLevel>();
    assert_primary_names_parse::<LogFormat>();
    assert_primary_names_parse::<LogOutput>();
    assert_primary_names_parse::<ColorIntent>();
    assert_primary_names_parse::<IncrementPolicy>();
    assert_primary_names_parse::<AuthMethod>();
}

#[test]
fn test_log_selectors_accept_aliases() {
    assert_parses(&[
        ("err", LogLevel::Error),
        ("critical", LogLevel::Error),
        ("warn", LogLevel::Warning),
        ("warning", LogLevel::Warning),
        ("information", LogLevel::Info),
        ("debugging", LogLevel::Debug),
        ("verbose", LogLevel::Trace),
    ]);
    assert_parses(&[
        ("plain", LogFormat::Text),
        ("json", LogFormat::Json),
        ("yml", LogFormat::Yaml),
    ]);
    assert_parses(&[("STDOUT", LogOutput::Stdout)]);
}

#[test]
fn test_color_intent_aliases() {
    assert_parses(&[
        ("detect", ColorIntent::Auto),
        ("default", ColorIntent::Auto),
        ("force", ColorIntent::Always),
        ("on", ColorIntent::Always),
        ("off", ColorIntent::Never),
    ]);
}

#[test]
fn test_solution_selectors_accept_aliases() {
    assert_parses(&[
        ("revision", IncrementPolicy::Patch),
        ("fix", IncrementPolicy::Patch),
        ("feature", IncrementPolicy::Minor),
        ("MAJOR", IncrementPolicy::Major),
        ("breaking", IncrementPolicy::Major),
    ]);
    assert_parses(&[
        ("az", AuthMethod::Interactive),
        ("azure-cli", AuthMethod::Interactive),
        ("device", AuthMethod::DeviceCode),
        ("spn", AuthMethod::ClientSecret),
        ("service-principal", AuthMethod::ClientSecret),
    ]);
}

#[test]
fn test_selector_display_matches_primary_name() {
    assert_eq!(IncrementPolicy::Minor.to_string(), "minor");
    assert_eq!(AuthMethod::DeviceCode.to_string(), "device-code");
    assert_eq!(PackageType::Managed.to_string(), "managed");
}

#[test]
fn test_log_level_from_verbosity_boundary_conditions() {
    assert_eq!(LogLevel::from_verbosity(0), LogLevel::Error);
    assert_eq!(LogLevel::from_verbosity(1), LogLevel::Warning);
    assert_eq!(LogLevel::from_verbosity(2), LogLevel::Info);
    assert_eq!(LogLevel::from_verbosity(3), LogLevel::Debug);
    assert_eq!(LogLevel::from_verbosity(4), LogLevel::Trace);

    assert_eq!(LogLevel::from_verbosity(5), LogLevel::Trace);
    assert_eq!(LogLevel::from_verbosity(100), LogLevel::Trace);
    assert_eq!(LogLevel::from_verbosity(u8::MAX), LogLevel::Trace);
}

#[test]
fn test_log_level_ordering() {
    assert!(LogLevel::Error < LogLevel::Warning);
    assert!(LogLevel::Warning < LogLevel::Info);
    assert!(LogLevel::Info < LogLevel::Debug);
    assert!(LogLevel::Debug < LogLevel::Trace);
}

#[test]
fn test_unknown_values_are_rejected() {
    let err = "sideways".parse::<IncrementPolicy>().unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { ref value, .. } if value == "sideways"));
    assert!("kerberos".parse::<AuthMethod>().is_err());
}

#[test]
fn test_package_type_names() {
    assert_eq!(PackageType::ALL, [PackageType::Unmanaged, PackageType::Managed]);
    assert_eq!(PackageType::Managed.pac_name(), "Managed");
    assert_eq!(PackageType::Unmanaged.dir_name(), "unmanaged");
    assert!(PackageType::Managed.is_managed());
    assert!(!PackageType::Unmanaged.is_managed());
}

#[test]
fn test_config_error_display() {
    let error = ConfigError::MissingSetting {
        setting: "environment_url",
        env: "SOLFLOW_ENVIRONMENT_URL",
        flag: "environment-url",
    };
    assert_eq!(
        error.to_string(),
        "Missing required setting 'environment_url' (set SOLFLOW_ENVIRONMENT_URL or pass --environment-url)"
    );
    assert!(!error.hints().is_empty());

    let error = ConfigError::InvalidWorkDir {
        path: "/invalid/path".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Invalid working directory: /invalid/path"
    );
}

#[test]
fn test_log_level_filter_directives() {
    assert_eq!(LogLevel::Error.as_filter_directive(), "error");
    assert_eq!(LogLevel::Warning.as_filter_directive(), "warn");
    assert_eq!(LogLevel::Trace.as_filter_directive(), "trace");
}
