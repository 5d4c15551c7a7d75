use super::*;
use crate::application::Settings;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const EXHIBITION_ID: &str = "1b2c3d4e-0000-4000-8000-000000000001";
const CONTENT_VERSION_ID: &str = "1b2c3d4e-0000-4000-8000-000000000002";
const DEVICE_GROUP_ID: &str = "1b2c3d4e-0000-4000-8000-000000000003";
const VERSION_ID: &str = "1b2c3d4e-0000-4000-8000-000000000004";

fn uuid(value: &str) -> Uuid {
    Uuid::parse_str(value).unwrap()
}

fn builder_for(server: &ServerGuard) -> TestBuilder {
    let settings = Settings {
        access_token: Some("token".to_string()),
        ..Settings::for_server(&server.url())
    };
    TestBuilder::new(settings, None).unwrap()
}

fn version_json() -> serde_json::Value {
    json!({
        "id": VERSION_ID,
        "name": "default",
        "contentVersionId": CONTENT_VERSION_ID,
        "deviceGroupId": DEVICE_GROUP_ID,
        "status": "ready",
        "exhibitionId": EXHIBITION_ID
    })
}

fn collection_path() -> String {
    format!("/v1/exhibitions/{}/groupContentVersions", EXHIBITION_ID)
}

fn item_path() -> String {
    format!("{}/{}", collection_path(), VERSION_ID)
}

#[test]
fn test_create_default_registers_closable() {
    let mut server = Server::new();
    let create = server
        .mock("POST", collection_path().as_str())
        .match_body(Matcher::Json(json!({
            "name": "default",
            "contentVersionId": CONTENT_VERSION_ID,
            "deviceGroupId": DEVICE_GROUP_ID,
            "status": "ready"
        })))
        .with_status(200)
        .with_body(version_json().to_string())
        .expect(1)
        .create();
    let teardown = server
        .mock("DELETE", item_path().as_str())
        .match_header("authorization", "Bearer token")
        .with_status(204)
        .expect(1)
        .create();

    let builder = builder_for(&server);
    let created = builder
        .group_content_versions()
        .create_default(uuid(EXHIBITION_ID), uuid(CONTENT_VERSION_ID), uuid(DEVICE_GROUP_ID))
        .unwrap();

    assert_eq!(created.id, Some(uuid(VERSION_ID)));
    assert_eq!(
        builder.pending_closables(),
        vec![ResourceKey::GroupContentVersion(uuid(VERSION_ID))]
    );

    builder.close().unwrap();
    create.assert();
    teardown.assert();
}

#[test]
fn test_delete_deregisters() {
    let mut server = Server::new();
    let _create = server
        .mock("POST", collection_path().as_str())
        .with_status(200)
        .with_body(version_json().to_string())
        .create();
    let delete = server
        .mock("DELETE", item_path().as_str())
        .with_status(204)
        .expect(1)
        .create();

    let builder = builder_for(&server);
    let versions = builder.group_content_versions();
    let created = versions
        .create_default(uuid(EXHIBITION_ID), uuid(CONTENT_VERSION_ID), uuid(DEVICE_GROUP_ID))
        .unwrap();

    versions.delete_resource(uuid(EXHIBITION_ID), &created).unwrap();

    assert!(builder.pending_closables().is_empty());
    builder.close().unwrap();
    delete.assert();
}

#[test]
fn test_create_without_id_is_rejected() {
    let mut server = Server::new();
    let mut body = version_json();
    body.as_object_mut().unwrap().remove("id");
    let _create = server
        .mock("POST", collection_path().as_str())
        .with_status(200)
        .with_body(body.to_string())
        .create();

    let builder = builder_for(&server);
    let err = builder
        .group_content_versions()
        .create_default(uuid(EXHIBITION_ID), uuid(CONTENT_VERSION_ID), uuid(DEVICE_GROUP_ID))
        .unwrap_err();

    assert!(matches!(err, BuilderError::MissingIdentifier { .. }));
    assert!(builder.pending_closables().is_empty());
}

#[test]
fn test_update_requires_id() {
    let server = Server::new();
    let builder = builder_for(&server);
    let body = GroupContentVersion::new(
        "unsaved",
        uuid(CONTENT_VERSION_ID),
        uuid(DEVICE_GROUP_ID),
        GroupContentVersionStatus::NotReady,
    );

    let err = builder
        .group_content_versions()
        .update(uuid(EXHIBITION_ID), &body)
        .unwrap_err();

    assert!(matches!(err, BuilderError::MissingIdentifier { .. }));
}

#[test]
fn test_update_puts_to_own_id() {
    let mut server = Server::new();
    let mut updated = version_json();
    updated["status"] = json!("notready");
    let mock = server
        .mock("PUT", item_path().as_str())
        .match_body(Matcher::PartialJson(json!({"status": "notready"})))
        .with_status(200)
        .with_body(updated.to_string())
        .expect(1)
        .create();

    let builder = builder_for(&server);
    let mut body: GroupContentVersion = serde_json::from_value(version_json()).unwrap();
    body.status = GroupContentVersionStatus::NotReady;

    let result = builder
        .group_content_versions()
        .update(uuid(EXHIBITION_ID), &body)
        .unwrap();

    assert_eq!(result.status, GroupContentVersionStatus::NotReady);
    mock.assert();
}

#[test]
fn test_assert_count() {
    let mut server = Server::new();
    let _list = server
        .mock("GET", collection_path().as_str())
        .match_query(Matcher::UrlEncoded(
            "contentVersionId".to_string(),
            CONTENT_VERSION_ID.to_string(),
        ))
        .with_status(200)
        .with_body(json!([version_json()]).to_string())
        .create();

    let builder = builder_for(&server);
    let versions = builder.group_content_versions();

    assert!(versions
        .assert_count(1, uuid(EXHIBITION_ID), Some(uuid(CONTENT_VERSION_ID)))
        .is_ok());
    assert!(matches!(
        versions.assert_count(2, uuid(EXHIBITION_ID), Some(uuid(CONTENT_VERSION_ID))),
        Err(BuilderError::CountMismatch {
            expected: 2,
            actual: 1,
            ..
        })
    ));
}

#[test]
fn test_assert_create_fails() {
    let mut server = Server::new();
    let _create = server
        .mock("POST", collection_path().as_str())
        .with_status(422)
        .with_body(r#"{"message":"invalid"}"#)
        .create();

    let builder = builder_for(&server);
    let payload = GroupContentVersion::new(
        "",
        uuid(CONTENT_VERSION_ID),
        uuid(DEVICE_GROUP_ID),
        GroupContentVersionStatus::Ready,
    );
    let versions = builder.group_content_versions();

    assert!(versions
        .assert_create_fails(422, uuid(EXHIBITION_ID), &payload)
        .is_ok());
    assert!(matches!(
        versions.assert_create_fails(400, uuid(EXHIBITION_ID), &payload),
        Err(BuilderError::StatusMismatch {
            expected: 400,
            actual: 422,
            ..
        })
    ));
    assert!(builder.pending_closables().is_empty());
}

#[test]
fn test_assert_find_fails_on_success() {
    let mut server = Server::new();
    let _find = server
        .mock("GET", item_path().as_str())
        .with_status(200)
        .with_body(version_json().to_string())
        .create();

    let builder = builder_for(&server);
    let err = builder
        .group_content_versions()
        .assert_find_fails(404, uuid(EXHIBITION_ID), uuid(VERSION_ID))
        .unwrap_err();

    assert!(matches!(
        err,
        BuilderError::UnexpectedSuccess {
            operation: "find",
            expected: 404
        }
    ));
}

#[test]
fn test_assert_delete_fails_keeps_tracking() {
    let mut server = Server::new();
    let _delete = server
        .mock("DELETE", item_path().as_str())
        .with_status(403)
        .create();

    let builder = builder_for(&server);
    let log = std::rc::Rc::new(std::cell::RefCell::new(0));
    let counter = log.clone();
    builder.add_closable(Box::new(crate::closeable::CloseableFn::new(
        ResourceKey::GroupContentVersion(uuid(VERSION_ID)),
        move || {
            *counter.borrow_mut() += 1;
            Ok(())
        },
    )));

    builder
        .group_content_versions()
        .assert_delete_fails(403, uuid(EXHIBITION_ID), uuid(VERSION_ID))
        .unwrap();

    assert_eq!(builder.pending_closables().len(), 1);
    builder.close().unwrap();
    assert_eq!(*log.borrow(), 1);
}

#[test]
fn test_assert_update_fails() {
    let mut server = Server::new();
    let _update = server
        .mock("PUT", item_path().as_str())
        .with_status(403)
        .expect(2)
        .create();

    let builder = builder_for(&server);
    let versions = builder.group_content_versions();
    let body: GroupContentVersion = serde_json::from_value(version_json()).unwrap();

    assert!(versions
        .assert_update_fails(403, uuid(EXHIBITION_ID), &body)
        .is_ok());
    assert!(matches!(
        versions.assert_update_fails(404, uuid(EXHIBITION_ID), &body),
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
        .mock("PUT", item_path().as_str())
        .with_status(200)
        .with_body(version_json().to_string())
        .create();

    let builder = builder_for(&server);
    let body: GroupContentVersion = serde_json::from_value(version_json()).unwrap();

    let err = builder
        .group_content_versions()
        .assert_update_fails(403, uuid(EXHIBITION_ID), &body)
        .unwrap_err();

    assert!(matches!(
        err,
        BuilderError::UnexpectedSuccess {
            operation: "update",
            expected: 403
        }
    ));
}

#[test]
fn test_assert_list_fails() {
    let mut server = Server::new();
    let _list = server
        .mock("GET", collection_path().as_str())
        .match_query(Matcher::Exact(String::new()))
        .with_status(401)
        .expect(2)
        .create();

    let builder = builder_for(&server);
    let versions = builder.group_content_versions();

    assert!(versions
        .assert_list_fails(401, uuid(EXHIBITION_ID), None)
        .is_ok());
    assert!(matches!(
        versions.assert_list_fails(500, uuid(EXHIBITION_ID), None),
        Err(BuilderError::StatusMismatch {
            operation: "list",
            expected: 500,
            actual: 401
        })
    ));
}

#[test]
fn test_assert_list_fails_on_success() {
    let mut server = Server::new();
    let _list = server
        .mock("GET", collection_path().as_str())
        .match_query(Matcher::UrlEncoded(
            "contentVersionId".to_string(),
            CONTENT_VERSION_ID.to_string(),
        ))
        .with_status(200)
        .with_body(json!([version_json()]).to_string())
        .create();

    let builder = builder_for(&server);

    let err = builder
        .group_content_versions()
        .assert_list_fails(401, uuid(EXHIBITION_ID), Some(uuid(CONTENT_VERSION_ID)))
        .unwrap_err();

    assert!(matches!(
        err,
        BuilderError::UnexpectedSuccess {
            operation: "list",
            expected: 401
        }
    ));
}
