use super::*;
use crate::client::{GroupContentVersionStatus, StaticAccessTokenProvider};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const EXHIBITION_ID: &str = "6a5b4c3d-0000-4000-8000-000000000001";
const CONTENT_VERSION_ID: &str = "6a5b4c3d-0000-4000-8000-000000000002";
const DEVICE_GROUP_ID: &str = "6a5b4c3d-0000-4000-8000-000000000003";
const VERSION_ID: &str = "6a5b4c3d-0000-4000-8000-000000000004";

fn api_for(server: &Server) -> GroupContentVersionsApi {
    let client = ApiClient::new(
        &format!("{}/v1", server.url()),
        Duration::from_secs(5),
        Some(Arc::new(StaticAccessTokenProvider::new("token"))),
    )
    .unwrap();
    GroupContentVersionsApi::new(client)
}

fn uuid(value: &str) -> Uuid {
    Uuid::parse_str(value).unwrap()
}

fn version_json() -> serde_json::Value {
    json!({
        "id": VERSION_ID,
        "name": "default",
        "contentVersionId": CONTENT_VERSION_ID,
        "deviceGroupId": DEVICE_GROUP_ID,
        "status": "ready",
        "exhibitionId": EXHIBITION_ID,
        "createdAt": "2020-05-01T10:00:00Z"
    })
}

fn collection_path() -> String {
    format!("/v1/exhibitions/{}/groupContentVersions", EXHIBITION_ID)
}

#[test]
fn test_create_posts_camel_case_payload() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", collection_path().as_str())
        .match_header("authorization", "Bearer token")
        .match_body(Matcher::Json(json!({
            "name": "default",
            "contentVersionId": CONTENT_VERSION_ID,
            "deviceGroupId": DEVICE_GROUP_ID,
            "status": "ready"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(version_json().to_string())
        .expect(1)
        .create();

    let payload = GroupContentVersion::new(
        "default",
        uuid(CONTENT_VERSION_ID),
        uuid(DEVICE_GROUP_ID),
        GroupContentVersionStatus::Ready,
    );
    let created = api_for(&server)
        .create_group_content_version(uuid(EXHIBITION_ID), &payload)
        .unwrap();

    assert_eq!(created.id, Some(uuid(VERSION_ID)));
    assert_eq!(created.exhibition_id, Some(uuid(EXHIBITION_ID)));
    assert_eq!(created.status, GroupContentVersionStatus::Ready);
    mock.assert();
}

#[test]
fn test_list_without_filter_sends_no_query() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", collection_path().as_str())
        .with_status(200)
        .with_body(json!([version_json()]).to_string())
        .expect(1)
        .create();

    let versions = api_for(&server)
        .list_group_content_versions(uuid(EXHIBITION_ID), None)
        .unwrap();

    assert_eq!(versions.len(), 1);
    mock.assert();
}

#[test]
fn test_list_with_filter_sends_content_version_id() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", collection_path().as_str())
        .match_query(Matcher::UrlEncoded(
            "contentVersionId".to_string(),
            CONTENT_VERSION_ID.to_string(),
        ))
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create();

    let versions = api_for(&server)
        .list_group_content_versions(uuid(EXHIBITION_ID), Some(uuid(CONTENT_VERSION_ID)))
        .unwrap();

    assert!(versions.is_empty());
    mock.assert();
}

#[test]
fn test_find_not_found_carries_status() {
    let mut server = Server::new();
    let _mock = server
        .mock(
            "GET",
            format!("{}/{}", collection_path(), VERSION_ID).as_str(),
        )
        .with_status(404)
        .create();

    let err = api_for(&server)
        .find_group_content_version(uuid(EXHIBITION_ID), uuid(VERSION_ID))
        .unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
}

#[test]
fn test_update_puts_to_item() {
    let mut server = Server::new();
    let mut updated = version_json();
    updated["name"] = json!("renamed");

    let mock = server
        .mock(
            "PUT",
            format!("{}/{}", collection_path(), VERSION_ID).as_str(),
        )
        .match_body(Matcher::PartialJson(json!({"name": "renamed"})))
        .with_status(200)
        .with_body(updated.to_string())
        .expect(1)
        .create();

    let mut body: GroupContentVersion = serde_json::from_value(version_json()).unwrap();
    body.name = "renamed".to_string();

    let result = api_for(&server)
        .update_group_content_version(uuid(EXHIBITION_ID), uuid(VERSION_ID), &body)
        .unwrap();

    assert_eq!(result.name, "renamed");
    mock.assert();
}

#[test]
fn test_delete_item() {
    let mut server = Server::new();
    let mock = server
        .mock(
            "DELETE",
            format!("{}/{}", collection_path(), VERSION_ID).as_str(),
        )
        .with_status(204)
        .expect(1)
        .create();

    api_for(&server)
        .delete_group_content_version(uuid(EXHIBITION_ID), uuid(VERSION_ID))
        .unwrap();

    mock.assert();
}

#[test]
fn test_status_serialization() {
    assert_eq!(
        serde_json::to_value(GroupContentVersionStatus::NotReady).unwrap(),
        json!("notready")
    );
    assert_eq!(
        serde_json::from_value::<GroupContentVersionStatus>(json!("ready")).unwrap(),
        GroupContentVersionStatus::Ready
    );
}
