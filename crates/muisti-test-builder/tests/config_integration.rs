use muisti_test_builder::application::config::defaults;
use muisti_test_builder::{BuilderError, ConfigError, LogFormat, LogOutput, Settings, TestBuilder};
use std::path::PathBuf;

#[test]
fn test_settings_default_creation() {
    let settings = Settings::default();

    assert_eq!(settings.api_base_path, defaults::API_BASE_PATH);
    assert_eq!(settings.files_base_path, defaults::FILES_BASE_PATH);
    assert_eq!(settings.net_timeout, 30);
    assert!(settings.access_token.is_none());
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_merging_integration() {
    let base = Settings::default();
    let overrides = Settings {
        api_base_path: "https://muisti.example.com/v1".to_string(),
        log_format: LogFormat::Json,
        resources_dir: PathBuf::from("fixtures"),
        ..Settings::default()
    };

    let merged = base.merge_with(overrides);

    // Override values should be preserved
    assert_eq!(merged.api_base_path, "https://muisti.example.com/v1");
    assert_eq!(merged.log_format, LogFormat::Json);
    assert_eq!(merged.resources_dir, PathBuf::from("fixtures"));

    // Default values should remain for non-overridden fields
    assert_eq!(merged.files_base_path, defaults::FILES_BASE_PATH);
    assert_eq!(merged.log_output, LogOutput::Captured);
}

#[test]
fn test_settings_from_vars_integration() {
    let settings = Settings::from_vars(vec![
        (
            "MUISTI_TEST_API_BASE_PATH".to_string(),
            "http://api.test:8080/v1".to_string(),
        ),
        ("MUISTI_TEST_ACCESS_TOKEN".to_string(), "abc".to_string()),
        ("MUISTI_TEST_NET_TIMEOUT".to_string(), "5".to_string()),
    ])
    .unwrap();

    assert_eq!(settings.api_base_path, "http://api.test:8080/v1");
    assert_eq!(settings.access_token.as_deref(), Some("abc"));
    assert_eq!(settings.net_timeout, 5);

    let builder = TestBuilder::new(settings, None).unwrap();
    assert_eq!(
        builder.api_client().base_url().as_str(),
        "http://api.test:8080/v1"
    );
}

#[test]
fn test_builder_rejects_relative_api_path() {
    let settings = Settings {
        api_base_path: "/v1".to_string(),
        ..Settings::default()
    };

    match TestBuilder::new(settings, None) {
        Err(BuilderError::Config {
            source: ConfigError::ParseError { value, .. },
        }) => assert_eq!(value, "/v1"),
        other => panic!("Expected ParseError, got {:?}", other.map(|_| ())),
    }
}
