//! Legacy output file uploads against the mock API

use anyhow::Result;
use mockito::Matcher;
use muisti_test_builder_tests::MockApi;
use muisti_test_builder_tests::fixtures::{self, TEST_DOCUMENT};
use tempfile::TempDir;

#[test]
fn uploaded_output_file_is_removed_locally() -> Result<()> {
    let mut api = MockApi::new();
    let storage = TempDir::new()?;
    let stored = storage.path().join("stored-document.txt");
    std::fs::write(&stored, fixtures::resource_bytes(TEST_DOCUMENT))?;

    let upload = api
        .server()
        .mock("POST", "/files")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="file""#.to_string()),
            Matcher::Regex("Muisti functional test resource".to_string()),
        ]))
        .with_status(200)
        .with_body(fixtures::output_file_json(&stored, "text/plain").to_string())
        .expect(1)
        .create();

    let builder = api.builder()?;
    let output = builder
        .files()
        .upload_resource("test", TEST_DOCUMENT, "text/plain")?;

    assert_eq!(output.meta.content_type, "text/plain");
    assert!(stored.exists());

    builder.close()?;
    assert!(!stored.exists());
    upload.assert();
    Ok(())
}

#[test]
fn explicit_delete_removes_file_once() -> Result<()> {
    let mut api = MockApi::new();
    let storage = TempDir::new()?;
    let stored = storage.path().join("stored-document.txt");
    std::fs::write(&stored, "content")?;

    let _upload = api
        .server()
        .mock("POST", "/files")
        .with_status(200)
        .with_body(fixtures::output_file_json(&stored, "text/plain").to_string())
        .create();

    let builder = api.builder()?;
    let files = builder.files();
    let output = files.upload_resource("test", TEST_DOCUMENT, "text/plain")?;

    files.delete(&output)?;
    assert!(!stored.exists());

    // Recreated by something else after the delete; teardown must leave it
    std::fs::write(&stored, "content")?;
    builder.close()?;
    assert!(stored.exists());
    Ok(())
}
