use super::*;
use crate::primitives::{LogFormat, LogOutput};
use std::path::PathBuf;

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_from_vars_empty_gives_defaults() {
    let settings = Settings::from_vars(Vec::new()).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_from_vars_reads_prefixed_values() {
    let settings = Settings::from_vars(vars(&[
        ("MUISTI_TEST_API_BASE_PATH", "http://api.test:8080/v1"),
        ("MUISTI_TEST_FILES_BASE_PATH", "http://api.test:8080/files"),
        ("MUISTI_TEST_ACCESS_TOKEN", "secret"),
        ("MUISTI_TEST_NET_TIMEOUT", "5"),
        ("MUISTI_TEST_RESOURCES_DIR", "/opt/resources"),
        ("MUISTI_TEST_LOG_LEVEL", "2"),
        ("MUISTI_TEST_LOG_FORMAT", "json"),
        ("MUISTI_TEST_LOG_OUTPUT", "stderr"),
    ]))
    .unwrap();

    assert_eq!(settings.api_base_path, "http://api.test:8080/v1");
    assert_eq!(settings.files_base_path, "http://api.test:8080/files");
    assert_eq!(settings.access_token.as_deref(), Some("secret"));
    assert_eq!(settings.net_timeout, 5);
    assert_eq!(settings.resources_dir, PathBuf::from("/opt/resources"));
    assert_eq!(settings.log_level, 2);
    assert_eq!(settings.log_format, LogFormat::Json);
    assert_eq!(settings.log_output, LogOutput::Stderr);
}

#[test]
fn test_from_vars_ignores_unprefixed_values() {
    let settings = Settings::from_vars(vars(&[
        ("API_BASE_PATH", "http://elsewhere/v1"),
        ("MUISTI_API_BASE_PATH", "http://elsewhere/v1"),
    ]))
    .unwrap();

    assert_eq!(settings.api_base_path, Settings::default().api_base_path);
}

#[test]
fn test_from_vars_rejects_bad_number() {
    let result = Settings::from_vars(vars(&[("MUISTI_TEST_NET_TIMEOUT", "soon")]));
    assert!(matches!(
        result,
        Err(ConfigError::EnvironmentParsingFailed { .. })
    ));
}

#[test]
fn test_from_vars_validates() {
    let result = Settings::from_vars(vars(&[("MUISTI_TEST_NET_TIMEOUT", "0")]));
    assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
}
