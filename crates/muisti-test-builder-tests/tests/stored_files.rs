//! Stored file uploads against the mock API

use anyhow::Result;
use mockito::Matcher;
use muisti_test_builder::ResourceKey;
use muisti_test_builder_tests::fixtures::{self, TEST_IMAGE};
use muisti_test_builder_tests::{MockApi, RequestLog};
use serde_json::json;
use std::io::Cursor;

#[test]
fn uploaded_image_is_removed_at_teardown() -> Result<()> {
    let mut api = MockApi::new();
    let log = RequestLog::default();
    let response = fixtures::stored_file_json("image-1", "test", "image/png");

    let upload = api.mock_upload("test", "image/png", &response);
    let teardown = api.mock_delete_stored_file("image-1", &log);

    let builder = api.builder()?;
    let stored = builder
        .stored_files()
        .upload_resource("test", TEST_IMAGE, "image/png", None)?;

    assert_eq!(stored.content_type.as_deref(), Some("image/png"));
    assert!(stored.uri.as_deref().is_some_and(|uri| !uri.is_empty()));
    assert_eq!(
        builder.pending_closables(),
        vec![ResourceKey::StoredFile("image-1".to_string())]
    );

    builder.close()?;
    upload.assert();
    teardown.assert();
    assert_eq!(log.paths(), vec!["/v1/files/image-1".to_string()]);
    Ok(())
}

#[test]
fn upload_sends_resource_bytes() -> Result<()> {
    let mut api = MockApi::new();
    let log = RequestLog::default();
    let response = fixtures::stored_file_json("image-2", "test", "image/png");

    let upload = api
        .server()
        .mock("POST", "/files")
        .match_body(Matcher::Regex("IHDR".to_string()))
        .with_status(200)
        .with_body(response.to_string())
        .expect(1)
        .create();
    let _teardown = api.mock_delete_stored_file("image-2", &log);

    let builder = api.builder()?;
    let bytes = fixtures::resource_bytes(TEST_IMAGE);
    builder
        .stored_files()
        .upload("test", Cursor::new(bytes), "image/png", Some("cover.png"))?;

    builder.close()?;
    upload.assert();
    Ok(())
}

#[test]
fn description_update_and_explicit_delete() -> Result<()> {
    let mut api = MockApi::new();
    let log = RequestLog::default();
    let response = fixtures::stored_file_json("image-3", "test", "image/png");
    let mut described = response.clone();
    described["description"] = json!("Lobby poster");

    let _upload = api.mock_upload("test", "image/png", &response);
    let update = api
        .server()
        .mock("PUT", "/v1/files/image-3")
        .match_body(Matcher::PartialJson(json!({"description": "Lobby poster"})))
        .with_status(200)
        .with_body(described.to_string())
        .expect(1)
        .create();
    let delete = api.mock_delete_stored_file("image-3", &log);

    let builder = api.builder()?;
    let files = builder.stored_files();
    let mut stored = files.upload_resource("test", TEST_IMAGE, "image/png", None)?;

    stored.description = Some("Lobby poster".to_string());
    let updated = files.update(&stored)?;
    assert_eq!(updated.description.as_deref(), Some("Lobby poster"));

    files.delete_resource(&updated)?;
    assert!(builder.pending_closables().is_empty());

    builder.close()?;
    update.assert();
    delete.assert();
    Ok(())
}

#[test]
fn folder_listing_counts() -> Result<()> {
    let mut api = MockApi::new();
    let _list = api
        .server()
        .mock("GET", "/v1/files")
        .match_query(Matcher::UrlEncoded("folder".to_string(), "test".to_string()))
        .with_status(200)
        .with_body(
            json!([
                fixtures::stored_file_json("a", "test", "image/png"),
                fixtures::stored_file_json("b", "test", "image/jpeg"),
            ])
            .to_string(),
        )
        .create();
    let _forbidden = api
        .server()
        .mock("GET", "/v1/files")
        .match_query(Matcher::UrlEncoded("folder".to_string(), "private".to_string()))
        .with_status(403)
        .create();

    let builder = api.builder()?;
    let files = builder.stored_files();

    files.assert_count(2, "test")?;
    files.assert_list_fails(403, "private")?;
    Ok(())
}
