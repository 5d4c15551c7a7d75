use super::*;

#[test]
fn test_default_directives_scope_crate_level() {
    let directives = Logger::default_directives(LogLevel::Debug);
    assert!(directives.starts_with("muisti_test_builder=debug,"));
    assert!(directives.contains("reqwest=warn"));
    assert!(directives.ends_with(",warn"));
}

#[test]
fn test_default_directives_parse() {
    for level in [
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ] {
        let directives = Logger::default_directives(level);
        assert!(
            EnvFilter::try_new(&directives).is_ok(),
            "Directives should parse: {}",
            directives
        );
    }
}

#[test]
fn test_init_for_tests_is_repeatable() {
    // Other tests in this binary may race us to the global subscriber
    let first = Logger::init_for_tests(LoggerConfig::default());
    let second = Logger::init_for_tests(LoggerConfig::default());

    if first.is_some() {
        assert!(second.is_some());
        assert!(Logger::is_initialized());
    }
}

#[test]
fn test_second_init_is_rejected() {
    let _ = Logger::init_for_tests(LoggerConfig::default());

    if Logger::is_initialized() {
        assert!(matches!(
            Logger::init(LoggerConfig::default()),
            Err(LoggerError::AlreadyInitialized)
        ));
    }
}
