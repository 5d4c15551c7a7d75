// Tests for closeable registration, deregistration and teardown

use super::*;
use std::cell::RefCell;
use std::rc::Rc;

type CloseLog = Rc<RefCell<Vec<String>>>;

fn recording(name: &str, log: &CloseLog) -> Box<dyn Closeable> {
    let log = log.clone();
    let label = name.to_string();
    Box::new(CloseableFn::new(ResourceKey::Custom(name.to_string()), move || {
        log.borrow_mut().push(label);
        Ok(())
    }))
}

fn failing(name: &str, log: &CloseLog) -> Box<dyn Closeable> {
    let log = log.clone();
    let label = name.to_string();
    Box::new(CloseableFn::new(ResourceKey::Custom(name.to_string()), move || {
        log.borrow_mut().push(label);
        Err(BuilderError::MissingIdentifier {
            resource: "test resource",
        })
    }))
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_register_preserves_order() {
    let log = CloseLog::default();
    let mut registry = CloseableRegistry::new();

    registry.register(recording("first", &log));
    registry.register(recording("second", &log));
    registry.register(recording("third", &log));

    assert_eq!(registry.len(), 3);
    assert_eq!(
        registry.keys(),
        vec![
            ResourceKey::Custom("first".to_string()),
            ResourceKey::Custom("second".to_string()),
            ResourceKey::Custom("third".to_string()),
        ]
    );
    // Registration alone never closes anything
    assert!(log.borrow().is_empty());
}

// ============================================================================
// Deregistration
// ============================================================================

#[test]
fn test_remove_where_removes_all_matches() {
    let log = CloseLog::default();
    let mut registry = CloseableRegistry::new();

    registry.register(recording("dup", &log));
    registry.register(recording("keep", &log));
    registry.register(recording("dup", &log));

    let removed = registry.remove_where(|key| *key == ResourceKey::Custom("dup".to_string()));

    assert_eq!(removed, 2);
    assert_eq!(registry.keys(), vec![ResourceKey::Custom("keep".to_string())]);
    assert!(log.borrow().is_empty(), "Removed handles must not be closed");
}

#[test]
fn test_remove_where_without_match() {
    let log = CloseLog::default();
    let mut registry = CloseableRegistry::new();
    registry.register(recording("keep", &log));

    let removed = registry.remove_where(|key| matches!(key, ResourceKey::StoredFile(_)));

    assert_eq!(removed, 0);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_removed_handle_is_not_closed_at_teardown() {
    let log = CloseLog::default();
    let mut registry = CloseableRegistry::new();

    registry.register(recording("deleted-explicitly", &log));
    registry.register(recording("left-behind", &log));
    registry.remove_where(|key| *key == ResourceKey::Custom("deleted-explicitly".to_string()));

    registry.close_all().unwrap();

    assert_eq!(*log.borrow(), vec!["left-behind".to_string()]);
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_close_all_in_registration_order() {
    let log = CloseLog::default();
    let mut registry = CloseableRegistry::new();

    for name in ["a", "b", "c"] {
        registry.register(recording(name, &log));
    }

    registry.close_all().unwrap();

    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    assert!(registry.is_empty());
}

#[test]
fn test_close_all_closes_each_handle_once() {
    let log = CloseLog::default();
    let mut registry = CloseableRegistry::new();
    registry.register(recording("only", &log));

    registry.close_all().unwrap();
    registry.close_all().unwrap();

    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_close_all_continues_after_failure() {
    let log = CloseLog::default();
    let mut registry = CloseableRegistry::new();

    registry.register(recording("a", &log));
    registry.register(failing("b", &log));
    registry.register(recording("c", &log));
    registry.register(failing("d", &log));

    let err = registry.close_all().unwrap_err();

    assert_eq!(*log.borrow(), vec!["a", "b", "c", "d"]);
    assert_eq!(err.failures.len(), 2);
    assert_eq!(err.failures[0].resource, ResourceKey::Custom("b".to_string()));
    assert_eq!(err.failures[1].resource, ResourceKey::Custom("d".to_string()));
    assert!(registry.is_empty(), "Registry is cleared even when closes fail");
}

#[test]
fn test_close_all_on_empty_registry() {
    let mut registry = CloseableRegistry::new();
    assert!(registry.close_all().is_ok());
}

#[test]
fn test_teardown_error_lists_every_failure() {
    let log = CloseLog::default();
    let mut registry = CloseableRegistry::new();
    registry.register(failing("first", &log));
    registry.register(failing("second", &log));

    let message = registry.close_all().unwrap_err().to_string();

    assert!(message.starts_with("Failed to close 2 resource(s): first: "));
    assert!(message.contains("; second: "));
}

#[test]
fn test_teardown_error_single_failure() {
    let log = CloseLog::default();
    let mut registry = CloseableRegistry::new();
    registry.register(failing("only", &log));

    let err = registry.close_all().unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to close 1 resource(s): only: test resource has no identifier"
    );
    assert!(std::error::Error::source(&err).is_none());
}

#[test]
fn test_resource_key_display() {
    let id = Uuid::nil();
    assert_eq!(
        ResourceKey::GroupContentVersion(id).to_string(),
        "group content version 00000000-0000-0000-0000-000000000000"
    );
    assert_eq!(
        ResourceKey::StoredFile("abc".to_string()).to_string(),
        "stored file abc"
    );
    assert_eq!(
        ResourceKey::OutputFile(PathBuf::from("/tmp/x.png")).to_string(),
        "output file /tmp/x.png"
    );
}

#[test]
fn test_debug_lists_keys() {
    let log = CloseLog::default();
    let mut registry = CloseableRegistry::new();
    registry.register(recording("a", &log));

    assert_eq!(format!("{:?}", registry), r#"[Custom("a")]"#);
}
