use super::*;
use crate::client::StoredFile;
use mockito::{Matcher, Server};
use serde_json::json;
use std::io::{Cursor, Write};
use tempfile::TempDir;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

fn upload(filename: Option<&str>) -> Upload<'_> {
    Upload::from_reader("test", Cursor::new(PNG_BYTES), "image/png", filename).unwrap()
}

#[test]
fn test_from_reader_reads_everything() {
    let upload = upload(None);

    assert_eq!(upload.data, PNG_BYTES);
    assert_eq!(upload.folder, "test");
    assert_eq!(upload.filename, None);
}

#[test]
fn test_from_resource_reads_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("image.png"), PNG_BYTES).unwrap();

    let upload =
        Upload::from_resource("test", dir.path(), "image.png", "image/png", Some("image.png"))
            .unwrap();

    assert_eq!(upload.data, PNG_BYTES);
}

#[test]
fn test_from_resource_missing_file() {
    let dir = TempDir::new().unwrap();

    let err = Upload::from_resource("test", dir.path(), "missing.png", "image/png", None)
        .unwrap_err();

    match err {
        BuilderError::ResourceRead { path, .. } => {
            assert_eq!(path, dir.path().join("missing.png"));
        }
        other => panic!("Expected ResourceRead, got {:?}", other),
    }
}

#[test]
fn test_invalid_content_type_is_rejected() {
    let upload = Upload::from_reader("test", Cursor::new(PNG_BYTES), "not a mime", None).unwrap();
    assert!(upload.into_form().is_err());
}

#[test]
fn test_submit_sends_multipart_fields() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/files")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="image.png""#.to_string()),
            Matcher::Regex("Content-Type: image/png".to_string()),
            Matcher::Regex(r#"name="folder"\r\n\r\ntest"#.to_string()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "id": "abc",
                "fileName": "image.png",
                "contentType": "image/png",
                "uri": "https://cdn.example.com/test/image.png"
            })
            .to_string(),
        )
        .expect(1)
        .create();

    let http = reqwest::blocking::Client::new();
    let url = format!("{}/files", server.url());
    let stored: StoredFile = upload(Some("image.png")).submit(&http, &url).unwrap();

    assert_eq!(stored.id.as_deref(), Some("abc"));
    assert_eq!(stored.content_type.as_deref(), Some("image/png"));
    mock.assert();
}

#[test]
fn test_submit_rejected_status() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/files")
        .with_status(500)
        .with_body("storage offline")
        .create();

    let http = reqwest::blocking::Client::new();
    let url = format!("{}/files", server.url());
    let err = upload(None).submit::<StoredFile>(&http, &url).unwrap_err();

    match err {
        BuilderError::UploadRejected { status, body, .. } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "storage offline");
        }
        other => panic!("Expected UploadRejected, got {:?}", other),
    }
}

#[test]
fn test_submit_rejected_with_unreadable_body() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/files")
        .with_status(502)
        .with_chunked_body(|writer| {
            writer.write_all(b"partial")?;
            Err(std::io::Error::other("proxy hung up"))
        })
        .create();

    let http = reqwest::blocking::Client::new();
    let url = format!("{}/files", server.url());
    let err = upload(None).submit::<StoredFile>(&http, &url).unwrap_err();

    match err {
        BuilderError::UploadRejected { status, .. } => assert_eq!(status.as_u16(), 502),
        other => panic!("Expected UploadRejected, got {:?}", other),
    }
}

#[test]
fn test_submit_invalid_json() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/files")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create();

    let http = reqwest::blocking::Client::new();
    let url = format!("{}/files", server.url());
    let err = upload(None).submit::<StoredFile>(&http, &url).unwrap_err();

    assert!(matches!(err, BuilderError::InvalidUploadResponse { .. }));
}

#[test]
fn test_require_uri() {
    assert_eq!(require_uri(Some("/tmp/a")).unwrap(), "/tmp/a");
    assert!(matches!(
        require_uri(Some("")),
        Err(BuilderError::MissingField { field: "uri" })
    ));
    assert!(matches!(
        require_uri(None),
        Err(BuilderError::MissingField { field: "uri" })
    ));
}
