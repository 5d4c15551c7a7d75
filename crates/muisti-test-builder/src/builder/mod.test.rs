// Tests for the test session and failure expectations

use super::*;
use crate::closeable::CloseableFn;
use std::rc::Rc;

fn status_error(status: u16) -> BuilderError {
    BuilderError::Api {
        source: ApiError::Status {
            status: StatusCode::from_u16(status).unwrap(),
            body: String::new(),
        },
    }
}

fn offline_builder() -> TestBuilder {
    TestBuilder::new(Settings::default(), None).unwrap()
}

fn recording(name: &str, log: &Rc<RefCell<Vec<String>>>) -> Box<dyn Closeable> {
    let log = log.clone();
    let label = name.to_string();
    Box::new(CloseableFn::new(ResourceKey::Custom(name.to_string()), move || {
        log.borrow_mut().push(label);
        Ok(())
    }))
}

// ============================================================================
// Failure Expectations
// ============================================================================

#[test]
fn test_expect_failure_matching_status() {
    let result: Result<(), _> = Err(status_error(422));
    assert!(expect_failure("create", 422, result).is_ok());
}

#[test]
fn test_expect_failure_on_success() {
    let err = expect_failure("create", 422, Ok::<_, BuilderError>(42)).unwrap_err();

    assert!(matches!(
        err,
        BuilderError::UnexpectedSuccess {
            operation: "create",
            expected: 422
        }
    ));
    assert_eq!(
        err.to_string(),
        "Expected create to fail with status 422, but it succeeded"
    );
}

#[test]
fn test_expect_failure_other_status() {
    let result: Result<(), _> = Err(status_error(400));
    let err = expect_failure("find", 404, result).unwrap_err();

    assert!(matches!(
        err,
        BuilderError::StatusMismatch {
            operation: "find",
            expected: 404,
            actual: 400
        }
    ));
}

#[test]
fn test_expect_failure_passes_through_errors_without_status() {
    let result: Result<(), _> = Err(BuilderError::MissingField { field: "uri" });
    let err = expect_failure("delete", 404, result).unwrap_err();

    assert!(matches!(err, BuilderError::MissingField { field: "uri" }));
}

#[test]
fn test_status_only_for_api_rejections() {
    assert_eq!(status_error(403).status(), Some(403));
    assert_eq!(
        BuilderError::Api {
            source: ApiError::AccessToken {
                reason: "expired".to_string()
            }
        }
        .status(),
        None
    );
    assert_eq!(
        BuilderError::MissingIdentifier { resource: "x" }.status(),
        None
    );
}

#[test]
fn test_expect_count() {
    assert!(expect_count("stored files", 2, 2).is_ok());

    let err = expect_count("stored files", 2, 3).unwrap_err();
    assert_eq!(err.to_string(), "Expected 2 stored files, found 3");
}

// ============================================================================
// Session
// ============================================================================

#[test]
fn test_new_rejects_invalid_settings() {
    let settings = Settings {
        net_timeout: 0,
        ..Settings::default()
    };

    let err = TestBuilder::new(settings, None).unwrap_err();
    assert!(matches!(err, BuilderError::Config { .. }));
}

#[test]
fn test_debug_shows_pending_closables() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let builder = offline_builder();
    builder.add_closable(recording("pending", &log));

    let debug = format!("{:?}", builder);

    assert!(debug.starts_with("TestBuilder"));
    assert!(debug.contains(r#"Custom("pending")"#));
    builder.close().unwrap();
}

#[test]
fn test_new_uses_settings_api_base() {
    let builder = TestBuilder::new(Settings::for_server("http://127.0.0.1:9999"), None).unwrap();

    assert_eq!(
        builder.api_client().base_url().as_str(),
        "http://127.0.0.1:9999/v1"
    );
    assert_eq!(builder.settings().files_base_path, "http://127.0.0.1:9999/files");
}

#[test]
fn test_static_token_from_settings() {
    let settings = Settings {
        access_token: Some("secret".to_string()),
        ..Settings::default()
    };
    let builder = TestBuilder::new(settings, None).unwrap();

    assert!(format!("{:?}", builder.api_client()).contains("authenticated: true"));
}

#[test]
fn test_no_token_means_unauthenticated() {
    let builder = offline_builder();
    assert!(format!("{:?}", builder.api_client()).contains("authenticated: false"));
}

// ============================================================================
// Closeables
// ============================================================================

#[test]
fn test_add_and_remove_closables() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let builder = offline_builder();

    builder.add_closable(recording("a", &log));
    builder.add_closable(recording("b", &log));

    let removed = builder.remove_closable(|key| *key == ResourceKey::Custom("a".to_string()));

    assert_eq!(removed, 1);
    assert_eq!(
        builder.pending_closables(),
        vec![ResourceKey::Custom("b".to_string())]
    );

    builder.close().unwrap();
    assert_eq!(*log.borrow(), vec!["b"]);
}

#[test]
fn test_close_in_creation_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let builder = offline_builder();

    for name in ["first", "second", "third"] {
        builder.add_closable(recording(name, &log));
    }

    builder.close().unwrap();
    assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn test_drop_closes_pending() {
    let log = Rc::new(RefCell::new(Vec::new()));
    {
        let builder = offline_builder();
        builder.add_closable(recording("left-open", &log));
    }

    assert_eq!(*log.borrow(), vec!["left-open"]);
}

#[test]
fn test_drop_after_close_does_nothing_twice() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let builder = offline_builder();
    builder.add_closable(recording("once", &log));

    builder.close().unwrap();

    assert_eq!(log.borrow().len(), 1);
}
