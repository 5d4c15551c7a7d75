//! Resource representations exchanged with the Muisti API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Readiness of a group content version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupContentVersionStatus {
    #[serde(rename = "notready")]
    NotReady,
    #[serde(rename = "ready")]
    Ready,
}

/// Content version assigned to a device group within an exhibition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupContentVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub content_version_id: Uuid,
    pub device_group_id: Uuid,
    pub status: GroupContentVersionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exhibition_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modifier_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
}

impl GroupContentVersion {
    /// Payload for a new group content version
    pub fn new(
        name: impl Into<String>,
        content_version_id: Uuid,
        device_group_id: Uuid,
        status: GroupContentVersionStatus,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            content_version_id,
            device_group_id,
            status,
            exhibition_id: None,
            creator_id: None,
            last_modifier_id: None,
            created_at: None,
            modified_at: None,
        }
    }
}

/// File held by the API's file store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Metadata reported for a plain uploaded file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub content_type: String,
    pub file_name: String,
}

/// Plain file persisted by the upload endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputFile {
    pub meta: FileMeta,
    #[serde(default)]
    pub uri: Option<String>,
}
