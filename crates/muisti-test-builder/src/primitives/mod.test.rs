use super::*;
use serde_json::json;

macro_rules! test_serde_aliases {
    ($enum_type:ty, $test_name:ident, $expected_mappings:expr) => {
        #[test]
        fn $test_name() {
            let mappings: &[(&str, $enum_type)] = &$expected_mappings;

            for (input, expected) in mappings {
                let parsed: Result<$enum_type, _> = serde_json::from_value(json!(input));
                assert!(
                    parsed.is_ok(),
                    "Failed to deserialize '{}' for {}",
                    input,
                    stringify!($enum_type)
                );
                assert_eq!(
                    parsed.unwrap(),
                    *expected,
                    "Alias '{}' should map to {:?}",
                    input,
                    expected
                );
            }
        }
    };
}

test_serde_aliases!(
    LogFormat,
    test_log_format_aliases,
    [
        ("text", LogFormat::Text),
        ("txt", LogFormat::Text),
        ("plain", LogFormat::Text),
        ("json", LogFormat::Json),
        ("pretty", LogFormat::Pretty),
    ]
);

test_serde_aliases!(
    LogOutput,
    test_log_output_aliases,
    [
        ("captured", LogOutput::Captured),
        ("test", LogOutput::Captured),
        ("stderr", LogOutput::Stderr),
        ("stdout", LogOutput::Stdout),
    ]
);

#[test]
fn test_unknown_values_are_rejected() {
    for format in ["yaml", "yml", "xml"] {
        assert!(
            serde_json::from_value::<LogFormat>(json!(format)).is_err(),
            "'{}' is not a log format",
            format
        );
    }
    assert!(serde_json::from_value::<LogOutput>(json!("syslog")).is_err());
}

#[test]
fn test_verbosity_mapping() {
    assert_eq!(LogLevel::from_verbosity(0), LogLevel::Error);
    assert_eq!(LogLevel::from_verbosity(1), LogLevel::Warning);
    assert_eq!(LogLevel::from_verbosity(2), LogLevel::Info);
    assert_eq!(LogLevel::from_verbosity(3), LogLevel::Debug);
    assert_eq!(LogLevel::from_verbosity(4), LogLevel::Trace);
    assert_eq!(LogLevel::from_verbosity(200), LogLevel::Trace);
}

#[test]
fn test_directive_strings() {
    assert_eq!(LogLevel::Warning.as_directive(), "warn");
    assert_eq!(LogLevel::Trace.as_directive(), "trace");
}

#[test]
fn test_error_display() {
    let err = ConfigError::ValidationFailed {
        reason: "net_timeout must be > 0".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Configuration validation failed: net_timeout must be > 0"
    );

    assert_eq!(
        LoggerError::AlreadyInitialized.to_string(),
        "Logger already initialized"
    );
}
