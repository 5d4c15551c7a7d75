//! Group content version lifecycle against the mock API

use anyhow::Result;
use mockito::Matcher;
use muisti_test_builder::models::{GroupContentVersion, GroupContentVersionStatus};
use muisti_test_builder::{BuilderError, ResourceKey};
use muisti_test_builder_tests::fixtures::{
    self, CONTENT_VERSION_ID, DEVICE_GROUP_ID, EXHIBITION_ID, OTHER_CONTENT_VERSION_ID, id,
};
use muisti_test_builder_tests::{MockApi, RequestLog};
use serde_json::json;
use uuid::Uuid;

#[test]
fn created_version_is_found() -> Result<()> {
    let mut api = MockApi::new();
    let version_id = Uuid::new_v4();
    let body = fixtures::group_content_version_json(version_id, "default", CONTENT_VERSION_ID);
    let log = RequestLog::default();

    let create = api.mock_create_group_content_version(&body);
    let _find = api.mock_find_group_content_version(version_id, &body);
    let teardown = api.mock_delete_group_content_version(version_id, &log);

    let builder = api.builder()?;
    let versions = builder.group_content_versions();

    let created =
        versions.create_default(id(EXHIBITION_ID), id(CONTENT_VERSION_ID), id(DEVICE_GROUP_ID))?;
    let found = versions.find(id(EXHIBITION_ID), version_id)?;

    assert_eq!(created, found);
    assert_eq!(found.name, "default");
    assert_eq!(found.status, GroupContentVersionStatus::Ready);

    builder.close()?;
    create.assert();
    teardown.assert();
    Ok(())
}

#[test]
fn deleted_version_is_gone_and_not_deleted_again() -> Result<()> {
    let mut api = MockApi::new();
    let version_id = Uuid::new_v4();
    let body = fixtures::group_content_version_json(version_id, "default", CONTENT_VERSION_ID);
    let log = RequestLog::default();

    let _create = api.mock_create_group_content_version(&body);
    let delete = api.mock_delete_group_content_version(version_id, &log);

    let builder = api.builder()?;
    let versions = builder.group_content_versions();
    let created =
        versions.create_default(id(EXHIBITION_ID), id(CONTENT_VERSION_ID), id(DEVICE_GROUP_ID))?;

    versions.delete_resource(id(EXHIBITION_ID), &created)?;

    let path = MockApi::group_content_version_path(EXHIBITION_ID, version_id);
    let _gone = api
        .server()
        .mock("GET", path.as_str())
        .with_status(404)
        .create();

    versions.assert_find_fails(404, id(EXHIBITION_ID), version_id)?;
    assert!(builder.pending_closables().is_empty());

    builder.close()?;
    // The explicit delete is the only one
    delete.assert();
    assert_eq!(log.paths(), vec![path]);
    Ok(())
}

#[test]
fn list_transmits_filter_only_when_given() -> Result<()> {
    let mut api = MockApi::new();
    let path = MockApi::group_content_versions_path(EXHIBITION_ID);
    let first = fixtures::group_content_version_json(Uuid::new_v4(), "first", CONTENT_VERSION_ID);
    let second =
        fixtures::group_content_version_json(Uuid::new_v4(), "second", OTHER_CONTENT_VERSION_ID);

    let filtered = api
        .server()
        .mock("GET", path.as_str())
        .match_query(Matcher::UrlEncoded(
            "contentVersionId".to_string(),
            CONTENT_VERSION_ID.to_string(),
        ))
        .with_status(200)
        .with_body(json!([first]).to_string())
        .expect(1)
        .create();
    let unfiltered = api
        .server()
        .mock("GET", path.as_str())
        .match_query(Matcher::Exact(String::new()))
        .with_status(200)
        .with_body(json!([first, second]).to_string())
        .expect(1)
        .create();

    let builder = api.builder()?;
    let versions = builder.group_content_versions();

    versions.assert_count(1, id(EXHIBITION_ID), Some(id(CONTENT_VERSION_ID)))?;
    versions.assert_count(2, id(EXHIBITION_ID), None)?;

    filtered.assert();
    unfiltered.assert();
    Ok(())
}

#[test]
fn create_rejection_is_asserted_by_status() -> Result<()> {
    let mut api = MockApi::new();
    let path = MockApi::group_content_versions_path(EXHIBITION_ID);
    let _reject = api
        .server()
        .mock("POST", path.as_str())
        .match_body(Matcher::PartialJson(json!({"name": ""})))
        .with_status(422)
        .with_body(r#"{"code":422,"message":"Name is required"}"#)
        .create();

    let builder = api.builder()?;
    let versions = builder.group_content_versions();
    let invalid = GroupContentVersion::new(
        "",
        id(CONTENT_VERSION_ID),
        id(DEVICE_GROUP_ID),
        GroupContentVersionStatus::NotReady,
    );

    versions.assert_create_fails(422, id(EXHIBITION_ID), &invalid)?;

    let mismatch = versions
        .assert_create_fails(400, id(EXHIBITION_ID), &invalid)
        .unwrap_err();
    assert!(matches!(
        mismatch,
        BuilderError::StatusMismatch {
            expected: 400,
            actual: 422,
            ..
        }
    ));
    assert!(builder.pending_closables().is_empty());
    Ok(())
}

#[test]
fn create_success_fails_the_assertion() -> Result<()> {
    let mut api = MockApi::new();
    let version_id = Uuid::new_v4();
    let body = fixtures::group_content_version_json(version_id, "default", CONTENT_VERSION_ID);
    let log = RequestLog::default();

    let _create = api.mock_create_group_content_version(&body);
    let teardown = api.mock_delete_group_content_version(version_id, &log);

    let builder = api.builder()?;
    let payload = GroupContentVersion::new(
        "default",
        id(CONTENT_VERSION_ID),
        id(DEVICE_GROUP_ID),
        GroupContentVersionStatus::Ready,
    );

    let err = builder
        .group_content_versions()
        .assert_create_fails(422, id(EXHIBITION_ID), &payload)
        .unwrap_err();

    assert!(matches!(err, BuilderError::UnexpectedSuccess { .. }));
    // The accidental create is still cleaned up
    assert_eq!(
        builder.pending_closables(),
        vec![ResourceKey::GroupContentVersion(version_id)]
    );

    builder.close()?;
    teardown.assert();
    Ok(())
}

#[test]
fn update_replaces_representation() -> Result<()> {
    let mut api = MockApi::new();
    let version_id = Uuid::new_v4();
    let mut body = fixtures::group_content_version_json(version_id, "renamed", CONTENT_VERSION_ID);
    body["status"] = json!("notready");

    let update = api
        .server()
        .mock(
            "PUT",
            MockApi::group_content_version_path(EXHIBITION_ID, version_id).as_str(),
        )
        .match_body(Matcher::PartialJson(json!({
            "id": version_id,
            "name": "renamed",
            "status": "notready"
        })))
        .with_status(200)
        .with_body(body.to_string())
        .expect(1)
        .create();

    let builder = api.builder()?;
    let mut changed: GroupContentVersion = serde_json::from_value(body.clone())?;
    changed.name = "renamed".to_string();

    let updated = builder
        .group_content_versions()
        .update(id(EXHIBITION_ID), &changed)?;

    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.status, GroupContentVersionStatus::NotReady);
    update.assert();
    Ok(())
}
