use super::*;
use crate::application::Settings;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::io::Cursor;
use tempfile::TempDir;

fn builder_for(server: &ServerGuard, resources_dir: &Path) -> TestBuilder {
    let mut settings = Settings::for_server(&server.url());
    settings.resources_dir = resources_dir.to_path_buf();
    TestBuilder::new(settings, None).unwrap()
}

/// Mock upload endpoint that reports `stored` as the file's location
fn upload_response(stored: &Path) -> String {
    json!({
        "meta": {"contentType": "text/plain", "fileName": "file"},
        "uri": stored.to_string_lossy()
    })
    .to_string()
}

#[test]
fn test_upload_resource_uses_file_part_name() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    let stored = dir.path().join("stored.txt");
    std::fs::write(&stored, "hello").unwrap();

    let mut server = Server::new();
    let upload = server
        .mock("POST", "/files")
        .match_body(Matcher::Regex(r#"name="file"; filename="file""#.to_string()))
        .with_status(200)
        .with_body(upload_response(&stored))
        .expect(1)
        .create();

    let builder = builder_for(&server, dir.path());
    let output = builder
        .files()
        .upload_resource("test", "notes.txt", "text/plain")
        .unwrap();

    assert_eq!(output.meta.file_name, "file");
    assert_eq!(
        builder.pending_closables(),
        vec![ResourceKey::OutputFile(stored.clone())]
    );
    upload.assert();
}

#[test]
fn test_teardown_removes_local_file() {
    let dir = TempDir::new().unwrap();
    let stored = dir.path().join("stored.txt");
    std::fs::write(&stored, "hello").unwrap();

    let mut server = Server::new();
    let _upload = server
        .mock("POST", "/files")
        .with_status(200)
        .with_body(upload_response(&stored))
        .create();

    let builder = builder_for(&server, dir.path());
    builder
        .files()
        .upload("test", Cursor::new("hello"), "text/plain", None)
        .unwrap();

    assert!(stored.exists());
    builder.close().unwrap();
    assert!(!stored.exists());
}

#[test]
fn test_teardown_tolerates_missing_file() {
    let dir = TempDir::new().unwrap();
    let stored = dir.path().join("never-written.txt");

    let mut server = Server::new();
    let _upload = server
        .mock("POST", "/files")
        .with_status(200)
        .with_body(upload_response(&stored))
        .create();

    let builder = builder_for(&server, dir.path());
    builder
        .files()
        .upload("test", Cursor::new("hello"), "text/plain", None)
        .unwrap();

    assert!(builder.close().is_ok());
}

#[test]
fn test_delete_removes_and_deregisters() {
    let dir = TempDir::new().unwrap();
    let stored = dir.path().join("stored.txt");
    std::fs::write(&stored, "hello").unwrap();

    let mut server = Server::new();
    let _upload = server
        .mock("POST", "/files")
        .with_status(200)
        .with_body(upload_response(&stored))
        .create();

    let builder = builder_for(&server, dir.path());
    let files = builder.files();
    let output = files
        .upload("test", Cursor::new("hello"), "text/plain", None)
        .unwrap();

    files.delete(&output).unwrap();

    assert!(!stored.exists());
    assert!(builder.pending_closables().is_empty());
}

#[test]
fn test_upload_without_uri_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut server = Server::new();
    let _upload = server
        .mock("POST", "/files")
        .with_status(200)
        .with_body(json!({"meta": {"contentType": "text/plain", "fileName": "file"}}).to_string())
        .create();

    let builder = builder_for(&server, dir.path());
    let err = builder
        .files()
        .upload("test", Cursor::new("hello"), "text/plain", None)
        .unwrap_err();

    assert!(matches!(err, BuilderError::MissingField { field: "uri" }));
}
