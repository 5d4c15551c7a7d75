use super::*;
use crate::application::Settings;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::io::Cursor;
use tempfile::TempDir;

const IMAGE: &[u8] = b"\x89PNG\r\n\x1a\nstored";

fn builder_for(server: &ServerGuard, resources_dir: Option<&TempDir>) -> TestBuilder {
    let mut settings = Settings::for_server(&server.url());
    settings.access_token = Some("token".to_string());
    if let Some(dir) = resources_dir {
        settings.resources_dir = dir.path().to_path_buf();
    }
    TestBuilder::new(settings, None).unwrap()
}

fn stored_file_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "fileName": "test-image.png",
        "contentType": "image/png",
        "uri": format!("https://cdn.example.com/test/{}", id)
    })
}

#[test]
fn test_upload_registers_remote_delete() {
    let mut server = Server::new();
    let upload = server
        .mock("POST", "/files")
        .match_body(Matcher::Regex(r#"name="folder"\r\n\r\ntest"#.to_string()))
        .with_status(200)
        .with_body(stored_file_json("s1").to_string())
        .expect(1)
        .create();
    let teardown = server
        .mock("DELETE", "/v1/files/s1")
        .match_header("authorization", "Bearer token")
        .with_status(204)
        .expect(1)
        .create();

    let builder = builder_for(&server, None);
    let stored = builder
        .stored_files()
        .upload("test", Cursor::new(IMAGE), "image/png", Some("test-image.png"))
        .unwrap();

    assert_eq!(stored.content_type.as_deref(), Some("image/png"));
    assert_eq!(
        builder.pending_closables(),
        vec![ResourceKey::StoredFile("s1".to_string())]
    );

    builder.close().unwrap();
    upload.assert();
    teardown.assert();
}

#[test]
fn test_upload_resource_defaults_filename() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("test-image.png"), IMAGE).unwrap();

    let mut server = Server::new();
    let upload = server
        .mock("POST", "/files")
        .match_body(Matcher::Regex(
            r#"name="file"; filename="test-image.png""#.to_string(),
        ))
        .with_status(200)
        .with_body(stored_file_json("s2").to_string())
        .expect(1)
        .create();
    let _teardown = server.mock("DELETE", "/v1/files/s2").with_status(204).create();

    let builder = builder_for(&server, Some(&dir));
    builder
        .stored_files()
        .upload_resource("test", "test-image.png", "image/png", None)
        .unwrap();

    builder.close().unwrap();
    upload.assert();
}

#[test]
fn test_upload_without_uri_is_rejected() {
    let mut server = Server::new();
    let _upload = server
        .mock("POST", "/files")
        .with_status(200)
        .with_body(json!({"id": "s3", "contentType": "image/png"}).to_string())
        .create();

    let builder = builder_for(&server, None);
    let err = builder
        .stored_files()
        .upload("test", Cursor::new(IMAGE), "image/png", None)
        .unwrap_err();

    assert!(matches!(err, BuilderError::MissingField { field: "uri" }));
    assert!(builder.pending_closables().is_empty());
}

#[test]
fn test_upload_failure_status() {
    let mut server = Server::new();
    let _upload = server.mock("POST", "/files").with_status(413).create();

    let builder = builder_for(&server, None);
    let err = builder
        .stored_files()
        .upload("test", Cursor::new(IMAGE), "image/png", None)
        .unwrap_err();

    assert!(matches!(err, BuilderError::UploadRejected { .. }));
    // Upload rejections are not API statuses tests assert on
    assert_eq!(err.status(), None);
}

#[test]
fn test_delete_deregisters() {
    let mut server = Server::new();
    let _upload = server
        .mock("POST", "/files")
        .with_status(200)
        .with_body(stored_file_json("s4").to_string())
        .create();
    let delete = server
        .mock("DELETE", "/v1/files/s4")
        .with_status(204)
        .expect(1)
        .create();

    let builder = builder_for(&server, None);
    let files = builder.stored_files();
    let stored = files
        .upload("test", Cursor::new(IMAGE), "image/png", None)
        .unwrap();

    files.delete_resource(&stored).unwrap();

    assert!(builder.pending_closables().is_empty());
    builder.close().unwrap();
    delete.assert();
}

#[test]
fn test_assert_count_by_folder() {
    let mut server = Server::new();
    let _list = server
        .mock("GET", "/v1/files")
        .match_query(Matcher::UrlEncoded("folder".to_string(), "test".to_string()))
        .with_status(200)
        .with_body(json!([stored_file_json("a"), stored_file_json("b")]).to_string())
        .create();

    let builder = builder_for(&server, None);

    assert!(builder.stored_files().assert_count(2, "test").is_ok());
    assert!(builder.stored_files().assert_count(0, "test").is_err());
}

#[test]
fn test_update_requires_id() {
    let server = Server::new();
    let builder = builder_for(&server, None);
    let file = StoredFile {
        id: None,
        file_name: None,
        content_type: None,
        uri: None,
        description: Some("orphan".to_string()),
    };

    assert!(matches!(
        builder.stored_files().update(&file),
        Err(BuilderError::MissingIdentifier { .. })
    ));
}

#[test]
fn test_assert_find_fails() {
    let mut server = Server::new();
    let _find = server.mock("GET", "/v1/files/gone").with_status(404).create();

    let builder = builder_for(&server, None);

    assert!(builder.stored_files().assert_find_fails(404, "gone").is_ok());
    assert!(matches!(
        builder.stored_files().assert_find_fails(403, "gone"),
        Err(BuilderError::StatusMismatch {
            expected: 403,
            actual: 404,
            ..
        })
    ));
}

#[test]
fn test_assert_update_fails() {
    let mut server = Server::new();
    let _update = server
        .mock("PUT", "/v1/files/locked")
        .with_status(403)
        .expect(2)
        .create();

    let builder = builder_for(&server, None);
    let file: StoredFile = serde_json::from_value(stored_file_json("locked")).unwrap();

    assert!(builder.stored_files().assert_update_fails(403, &file).is_ok());
    assert!(matches!(
        builder.stored_files().assert_update_fails(404, &file),
        Err(BuilderError::StatusMismatch {
            operation: "update",
            expected: 404,
            actual: 403
        })
    ));
}

#[test]
fn test_assert_update_fails_on_success() {
    let mut server = Server::new();
    let _update = server
        .mock("PUT", "/v1/files/open")
        .with_status(200)
        .with_body(stored_file_json("open").to_string())
        .create();

    let builder = builder_for(&server, None);
    let file: StoredFile = serde_json::from_value(stored_file_json("open")).unwrap();

    assert!(matches!(
        builder.stored_files().assert_update_fails(403, &file),
        Err(BuilderError::UnexpectedSuccess {
            operation: "update",
            expected: 403
        })
    ));
}

#[test]
fn test_assert_delete_fails_keeps_tracking() {
    let mut server = Server::new();
    let _upload = server
        .mock("POST", "/files")
        .with_status(200)
        .with_body(stored_file_json("kept").to_string())
        .create();
    let rejected = server
        .mock("DELETE", "/v1/files/kept")
        .with_status(403)
        .expect(3)
        .create();

    let builder = builder_for(&server, None);
    let files = builder.stored_files();
    files
        .upload("test", Cursor::new(IMAGE), "image/png", None)
        .unwrap();

    assert!(files.assert_delete_fails(403, "kept").is_ok());
    assert!(matches!(
        files.assert_delete_fails(404, "kept"),
        Err(BuilderError::StatusMismatch {
            operation: "delete",
            expected: 404,
            actual: 403
        })
    ));
    assert_eq!(
        builder.pending_closables(),
        vec![ResourceKey::StoredFile("kept".to_string())]
    );

    // Teardown still tries the delete and reports the rejection
    let err = builder.close().unwrap_err();
    assert_eq!(err.failures.len(), 1);
    rejected.assert();
}

#[test]
fn test_assert_delete_fails_on_success() {
    let mut server = Server::new();
    let _delete = server
        .mock("DELETE", "/v1/files/removable")
        .with_status(204)
        .create();

    let builder = builder_for(&server, None);

    assert!(matches!(
        builder.stored_files().assert_delete_fails(404, "removable"),
        Err(BuilderError::UnexpectedSuccess {
            operation: "delete",
            expected: 404
        })
    ));
}
