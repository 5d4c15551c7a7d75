use super::*;

#[test]
fn test_default_settings_are_valid() {
    let settings = Settings::default();

    assert_eq!(settings.api_base_path, "http://localhost:1234/v1");
    assert_eq!(settings.files_base_path, "http://localhost:1234/files");
    assert_eq!(settings.net_timeout, 30);
    assert_eq!(settings.access_token, None);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_for_server_derives_both_paths() {
    let settings = Settings::for_server("http://127.0.0.1:4321/");

    assert_eq!(settings.api_base_path, "http://127.0.0.1:4321/v1");
    assert_eq!(settings.files_base_path, "http://127.0.0.1:4321/files");
    assert!(settings.validate().is_ok());
}

#[test]
fn test_merge_takes_non_default_values() {
    let base = Settings {
        access_token: Some("base-token".to_string()),
        ..Settings::default()
    };
    let overrides = Settings {
        api_base_path: "https://muisti.example.com/v1".to_string(),
        log_level: 3,
        log_format: LogFormat::Json,
        ..Settings::default()
    };

    let merged = base.merge_with(overrides);

    assert_eq!(merged.api_base_path, "https://muisti.example.com/v1");
    assert_eq!(merged.log_level, 3);
    assert_eq!(merged.log_format, LogFormat::Json);
    // Untouched values keep the base
    assert_eq!(merged.access_token.as_deref(), Some("base-token"));
    assert_eq!(merged.files_base_path, "http://localhost:1234/files");
}

#[test]
fn test_validate_rejects_zero_timeout() {
    let settings = Settings {
        net_timeout: 0,
        ..Settings::default()
    };

    assert!(matches!(
        settings.validate(),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn test_validate_rejects_unparseable_url() {
    let settings = Settings {
        api_base_path: "not a url".to_string(),
        ..Settings::default()
    };

    assert!(matches!(
        settings.validate(),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn test_validate_rejects_non_http_scheme() {
    let settings = Settings {
        files_base_path: "ftp://localhost/files".to_string(),
        ..Settings::default()
    };

    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("files_base_path"));
}

#[test]
fn test_logger_config_from_settings() {
    let settings = Settings {
        log_level: 4,
        log_output: LogOutput::Stderr,
        ..Settings::default()
    };

    let logger_config = settings.to_logger_config();
    assert_eq!(logger_config.level, LogLevel::Trace);
    assert_eq!(logger_config.format, LogFormat::Text);
    assert_eq!(logger_config.output, LogOutput::Stderr);
}
