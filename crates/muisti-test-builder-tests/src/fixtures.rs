//! Fixture data for E2E tests
//!
//! JSON bodies shaped like Muisti API responses, and the test resources
//! shipped under `tests/resources`.

use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const EXHIBITION_ID: &str = "2f1d7c0a-6b3e-4a9c-9d51-0c6f2b8e7a10";
pub const CONTENT_VERSION_ID: &str = "2f1d7c0a-6b3e-4a9c-9d51-0c6f2b8e7a11";
pub const OTHER_CONTENT_VERSION_ID: &str = "2f1d7c0a-6b3e-4a9c-9d51-0c6f2b8e7a12";
pub const DEVICE_GROUP_ID: &str = "2f1d7c0a-6b3e-4a9c-9d51-0c6f2b8e7a13";

pub const TEST_IMAGE: &str = "test-image.png";
pub const TEST_DOCUMENT: &str = "test-document.txt";

/// Parse one of the fixed ids above
pub fn id(value: &str) -> Uuid {
    Uuid::parse_str(value).unwrap_or_else(|e| panic!("Invalid fixture id '{}': {}", value, e))
}

/// Directory holding the files uploaded by the tests
pub fn resources_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("resources")
}

/// Raw bytes of a test resource
pub fn resource_bytes(name: &str) -> Vec<u8> {
    let path = resources_dir().join(name);
    std::fs::read(&path)
        .unwrap_or_else(|e| panic!("Failed to read resource '{}': {}", path.display(), e))
}

/// Server representation of a group content version
pub fn group_content_version_json(version_id: Uuid, name: &str, content_version_id: &str) -> Value {
    json!({
        "id": version_id,
        "name": name,
        "contentVersionId": content_version_id,
        "deviceGroupId": DEVICE_GROUP_ID,
        "status": "ready",
        "exhibitionId": EXHIBITION_ID,
        "creatorId": "00000000-0000-4000-8000-00000000c0de",
        "lastModifierId": "00000000-0000-4000-8000-00000000c0de",
        "createdAt": "2020-04-01T09:30:00Z",
        "modifiedAt": "2020-04-01T09:30:00Z"
    })
}

/// Server representation of a stored file in `folder`
pub fn stored_file_json(stored_file_id: &str, folder: &str, content_type: &str) -> Value {
    json!({
        "id": stored_file_id,
        "fileName": TEST_IMAGE,
        "contentType": content_type,
        "uri": format!("https://cdn.muisti.test/{}/{}", folder, stored_file_id)
    })
}

/// Upload response of the legacy endpoint for a file stored at `path`
pub fn output_file_json(path: &Path, content_type: &str) -> Value {
    json!({
        "meta": {
            "contentType": content_type,
            "fileName": "file"
        },
        "uri": path.to_string_lossy()
    })
}
