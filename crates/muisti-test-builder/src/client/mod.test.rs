// Tests for the shared API client plumbing

use super::*;
use mockito::{Matcher, Server};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

fn client_for(server: &Server, token: Option<&str>) -> ApiClient {
    let provider: Option<Arc<dyn AccessTokenProvider>> = token
        .map(|t| Arc::new(StaticAccessTokenProvider::new(t)) as Arc<dyn AccessTokenProvider>);
    ApiClient::new(
        &format!("{}/v1", server.url()),
        Duration::from_secs(5),
        provider,
    )
    .unwrap()
}

// ============================================================================
// URL Building
// ============================================================================

#[test]
fn test_endpoint_appends_segments() {
    let client = ApiClient::new("http://localhost:1234/v1", Duration::from_secs(1), None).unwrap();
    let url = client.endpoint(&["exhibitions", "abc", "groupContentVersions"]).unwrap();
    assert_eq!(
        url.as_str(),
        "http://localhost:1234/v1/exhibitions/abc/groupContentVersions"
    );
}

#[test]
fn test_endpoint_tolerates_trailing_slash() {
    let client = ApiClient::new("http://localhost:1234/v1/", Duration::from_secs(1), None).unwrap();
    let url = client.endpoint(&["files"]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:1234/v1/files");
}

#[test]
fn test_endpoint_encodes_segments() {
    let client = ApiClient::new("http://localhost:1234/v1", Duration::from_secs(1), None).unwrap();
    let url = client.endpoint(&["files", "folder/image name.png"]).unwrap();
    assert_eq!(
        url.as_str(),
        "http://localhost:1234/v1/files/folder%2Fimage%20name.png"
    );
}

#[test]
fn test_invalid_base_path_is_rejected() {
    let result = ApiClient::new("not a url", Duration::from_secs(1), None);
    assert!(matches!(result, Err(ApiError::InvalidUrl { .. })));

    let result = ApiClient::new("mailto:someone@example.com", Duration::from_secs(1), None);
    assert!(matches!(result, Err(ApiError::InvalidUrl { .. })));
}

// ============================================================================
// Requests
// ============================================================================

#[test]
fn test_bearer_token_is_attached() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v1/files/abc")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"abc"}"#)
        .expect(1)
        .create();

    let client = client_for(&server, Some("test-token"));
    let url = client.endpoint(&["files", "abc"]).unwrap();
    let value: serde_json::Value = client.get_json(url).unwrap();

    assert_eq!(value["id"], "abc");
    mock.assert();
}

#[test]
fn test_no_provider_sends_no_authorization() {
    let mut server = Server::new();
    let mock = server
        .mock("DELETE", "/v1/files/abc")
        .match_header("authorization", Matcher::Missing)
        .with_status(204)
        .expect(1)
        .create();

    let client = client_for(&server, None);
    let url = client.endpoint(&["files", "abc"]).unwrap();
    client.delete(url).unwrap();

    mock.assert();
}

#[test]
fn test_token_is_fetched_per_call() {
    let mut server = Server::new();
    let mock = server
        .mock("DELETE", "/v1/files/abc")
        .with_status(204)
        .expect(2)
        .create();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let provider = move || -> Result<String, ApiError> {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("token-{}", n))
    };

    let client = ApiClient::new(
        &format!("{}/v1", server.url()),
        Duration::from_secs(5),
        Some(Arc::new(provider)),
    )
    .unwrap();

    for _ in 0..2 {
        let url = client.endpoint(&["files", "abc"]).unwrap();
        client.delete(url).unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    mock.assert();
}

#[test]
fn test_token_failure_aborts_request() {
    let mut server = Server::new();
    let mock = server.mock("GET", "/v1/files/abc").expect(0).create();

    let provider = || -> Result<String, ApiError> {
        Err(ApiError::AccessToken {
            reason: "identity provider down".to_string(),
        })
    };
    let client = ApiClient::new(
        &format!("{}/v1", server.url()),
        Duration::from_secs(5),
        Some(Arc::new(provider)),
    )
    .unwrap();

    let url = client.endpoint(&["files", "abc"]).unwrap();
    let result: Result<serde_json::Value, _> = client.get_json(url);

    assert!(matches!(result, Err(ApiError::AccessToken { .. })));
    mock.assert();
}

#[test]
fn test_error_status_is_carried() {
    let mut server = Server::new();
    let _mock = server
        .mock("PUT", "/v1/files/abc")
        .with_status(422)
        .with_body("name is required")
        .create();

    let client = client_for(&server, Some("t"));
    let url = client.endpoint(&["files", "abc"]).unwrap();
    let err = client
        .send_json::<_, serde_json::Value>(Method::PUT, url, &serde_json::json!({}))
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    match err {
        ApiError::Status { body, .. } => assert_eq!(body, "name is required"),
        other => panic!("expected status error, got {other}"),
    }
}

#[test]
fn test_unreadable_rejection_body_keeps_status() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/v1/files/abc")
        .with_status(503)
        .with_chunked_body(|writer| {
            writer.write_all(b"partial")?;
            Err(std::io::Error::other("storage went away"))
        })
        .create();

    let client = client_for(&server, None);
    let url = client.endpoint(&["files", "abc"]).unwrap();
    let result: Result<serde_json::Value, _> = client.get_json(url);

    // The rejection is still reported by status, not as a transport failure
    let err = result.unwrap_err();
    assert!(matches!(err, ApiError::Status { .. }));
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
}

#[test]
fn test_invalid_json_is_reported() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/v1/files/abc")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create();

    let client = client_for(&server, None);
    let url = client.endpoint(&["files", "abc"]).unwrap();
    let result: Result<serde_json::Value, _> = client.get_json(url);

    let err = result.unwrap_err();
    assert!(matches!(err, ApiError::JsonError { .. }));
    assert_eq!(err.status(), None);
}

#[test]
fn test_connection_failure_has_no_status() {
    // Port 9 (discard) is closed on test machines
    let client = ApiClient::new("http://127.0.0.1:9/v1", Duration::from_secs(2), None).unwrap();
    let url = client.endpoint(&["files"]).unwrap();
    let result: Result<serde_json::Value, _> = client.get_json(url);

    let err = result.unwrap_err();
    assert!(matches!(err, ApiError::RequestFailed { .. }));
    assert_eq!(err.status(), None);
}

#[test]
fn test_debug_hides_token_provider() {
    let client = ApiClient::new(
        "http://localhost:1234/v1",
        Duration::from_secs(1),
        Some(Arc::new(StaticAccessTokenProvider::new("secret"))),
    )
    .unwrap();

    let debug = format!("{:?}", client);
    assert!(debug.contains("authenticated: true"));
    assert!(!debug.contains("secret"));
}
