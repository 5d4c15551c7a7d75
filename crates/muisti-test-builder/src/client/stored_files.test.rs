use super::*;
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

fn api_for(server: &Server) -> StoredFilesApi {
    let client = ApiClient::new(
        &format!("{}/v1", server.url()),
        Duration::from_secs(5),
        None,
    )
    .unwrap();
    StoredFilesApi::new(client)
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
fn test_list_sends_folder() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v1/files")
        .match_query(Matcher::UrlEncoded("folder".to_string(), "test".to_string()))
        .with_status(200)
        .with_body(json!([stored_file_json("a"), stored_file_json("b")]).to_string())
        .expect(1)
        .create();

    let files = api_for(&server).list_stored_files("test").unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(files[1].id.as_deref(), Some("b"));
    mock.assert();
}

#[test]
fn test_find_by_id() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/v1/files/a")
        .with_status(200)
        .with_body(stored_file_json("a").to_string())
        .create();

    let file = api_for(&server).find_stored_file("a").unwrap();

    assert_eq!(file.content_type.as_deref(), Some("image/png"));
    assert_eq!(file.description, None);
}

#[test]
fn test_update_sends_description() {
    let mut server = Server::new();
    let mut body = stored_file_json("a");
    body["description"] = json!("Cover image");

    let mock = server
        .mock("PUT", "/v1/files/a")
        .match_body(Matcher::PartialJson(json!({"description": "Cover image"})))
        .with_status(200)
        .with_body(body.to_string())
        .expect(1)
        .create();

    let mut file: StoredFile = serde_json::from_value(stored_file_json("a")).unwrap();
    file.description = Some("Cover image".to_string());

    let updated = api_for(&server).update_stored_file("a", &file).unwrap();

    assert_eq!(updated.description.as_deref(), Some("Cover image"));
    mock.assert();
}

#[test]
fn test_delete_missing_file_reports_status() {
    let mut server = Server::new();
    let _mock = server.mock("DELETE", "/v1/files/gone").with_status(404).create();

    let err = api_for(&server).delete_stored_file("gone").unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
}
