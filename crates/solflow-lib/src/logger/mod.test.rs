use super::*;

#[test]
fn test_filter_directives_scope_crates_to_level() {
    let directives = filter_directives(LogLevel::Debug);
    assert!(directives.starts_with("solflow=debug,solflow_lib=debug"));
    assert!(directives.contains("reqwest=warn"));
    assert!(directives.ends_with(",debug"));
}

#[test]
fn test_filter_directives_parse_as_env_filter() {
    for verbosity in 0..=4u8 {
        let level = LogLevel::from_verbosity(verbosity);
        let filter = EnvFilter::try_new(filter_directives(level));
        assert!(filter.is_ok(), "directives for {:?} should parse", level);
    }
}

#[test]
fn test_logger_global_matches_initialized_flag() {
    // Another test in the binary may have initialized the subscriber
    assert_eq!(Logger::is_initialized(), Logger::global().is_some());
}
