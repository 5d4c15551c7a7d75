//! Session teardown across resource kinds

use anyhow::Result;
use muisti_test_builder::{CloseableFn, ResourceKey};
use muisti_test_builder_tests::fixtures::{
    self, CONTENT_VERSION_ID, DEVICE_GROUP_ID, EXHIBITION_ID, TEST_IMAGE, id,
};
use muisti_test_builder_tests::{MockApi, RequestLog};
use uuid::Uuid;

#[test]
fn teardown_deletes_each_resource_once_in_creation_order() -> Result<()> {
    let mut api = MockApi::new();
    let log = RequestLog::default();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    let first_body = fixtures::group_content_version_json(first, "first", CONTENT_VERSION_ID);
    let second_body = fixtures::group_content_version_json(second, "second", CONTENT_VERSION_ID);
    let upload_body = fixtures::stored_file_json("between", "test", "image/png");

    let path = MockApi::group_content_versions_path(EXHIBITION_ID);
    let create_first = api
        .server()
        .mock("POST", path.as_str())
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({"name": "first"})))
        .with_status(200)
        .with_body(first_body.to_string())
        .expect(1)
        .create();
    let create_second = api
        .server()
        .mock("POST", path.as_str())
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({"name": "second"})))
        .with_status(200)
        .with_body(second_body.to_string())
        .expect(1)
        .create();
    let _upload = api.mock_upload("test", "image/png", &upload_body);

    let delete_first = api.mock_delete_group_content_version(first, &log);
    let delete_file = api.mock_delete_stored_file("between", &log);
    let delete_second = api.mock_delete_group_content_version(second, &log);

    let builder = api.builder()?;
    let versions = builder.group_content_versions();
    let mut payload: muisti_test_builder::models::GroupContentVersion =
        serde_json::from_value(first_body.clone())?;
    payload.id = None;

    versions.create(id(EXHIBITION_ID), &payload)?;
    builder
        .stored_files()
        .upload_resource("test", TEST_IMAGE, "image/png", None)?;
    payload.name = "second".to_string();
    versions.create(id(EXHIBITION_ID), &payload)?;

    builder.close()?;

    create_first.assert();
    create_second.assert();
    delete_first.assert();
    delete_file.assert();
    delete_second.assert();
    assert_eq!(
        log.paths(),
        vec![
            MockApi::group_content_version_path(EXHIBITION_ID, first),
            "/v1/files/between".to_string(),
            MockApi::group_content_version_path(EXHIBITION_ID, second),
        ]
    );
    Ok(())
}

#[test]
fn teardown_continues_past_failures() -> Result<()> {
    let mut api = MockApi::new();
    let log = RequestLog::default();
    let version_id = Uuid::new_v4();
    let body = fixtures::group_content_version_json(version_id, "default", CONTENT_VERSION_ID);

    let _create = api.mock_create_group_content_version(&body);
    let teardown = api.mock_delete_group_content_version(version_id, &log);

    let builder = api.builder()?;
    builder.add_closable(Box::new(CloseableFn::new(
        ResourceKey::Custom("already gone".to_string()),
        || {
            Err(muisti_test_builder::BuilderError::MissingIdentifier {
                resource: "external fixture",
            })
        },
    )));
    builder
        .group_content_versions()
        .create_default(id(EXHIBITION_ID), id(CONTENT_VERSION_ID), id(DEVICE_GROUP_ID))?;

    let err = builder.close().unwrap_err();

    assert_eq!(err.failures.len(), 1);
    assert_eq!(
        err.failures[0].resource,
        ResourceKey::Custom("already gone".to_string())
    );
    // The failing close did not stop the remote delete
    teardown.assert();
    Ok(())
}

#[test]
fn dropped_builder_still_cleans_up() -> Result<()> {
    let mut api = MockApi::new();
    let log = RequestLog::default();
    let version_id = Uuid::new_v4();
    let body = fixtures::group_content_version_json(version_id, "default", CONTENT_VERSION_ID);

    let _create = api.mock_create_group_content_version(&body);
    let teardown = api.mock_delete_group_content_version(version_id, &log);

    {
        let builder = api.builder()?;
        builder
            .group_content_versions()
            .create_default(id(EXHIBITION_ID), id(CONTENT_VERSION_ID), id(DEVICE_GROUP_ID))?;
    }

    teardown.assert();
    Ok(())
}
