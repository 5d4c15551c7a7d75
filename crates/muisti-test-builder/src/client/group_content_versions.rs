//! Group content version endpoints
//!
//! `exhibitions/{exhibitionId}/groupContentVersions[/{groupContentVersionId}]`

use reqwest::Method;
use uuid::Uuid;

use super::{ApiClient, ApiError, GroupContentVersion};

const COLLECTION: &str = "groupContentVersions";

/// Typed client for group content versions
#[derive(Debug, Clone)]
pub struct GroupContentVersionsApi {
    client: ApiClient,
}

impl GroupContentVersionsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn create_group_content_version(
        &self,
        exhibition_id: Uuid,
        payload: &GroupContentVersion,
    ) -> Result<GroupContentVersion, ApiError> {
        let exhibition_id = exhibition_id.to_string();
        let url = self
            .client
            .endpoint(&["exhibitions", &exhibition_id, COLLECTION])?;
        self.client.send_json(Method::POST, url, payload)
    }

    pub fn find_group_content_version(
        &self,
        exhibition_id: Uuid,
        group_content_version_id: Uuid,
    ) -> Result<GroupContentVersion, ApiError> {
        let url = self.item_url(exhibition_id, group_content_version_id)?;
        self.client.get_json(url)
    }

    /// List versions of an exhibition, optionally narrowed to one content version
    ///
    /// `None` leaves the `contentVersionId` parameter out of the request.
    pub fn list_group_content_versions(
        &self,
        exhibition_id: Uuid,
        content_version_id: Option<Uuid>,
    ) -> Result<Vec<GroupContentVersion>, ApiError> {
        let exhibition_id = exhibition_id.to_string();
        let mut url = self
            .client
            .endpoint(&["exhibitions", &exhibition_id, COLLECTION])?;

        if let Some(content_version_id) = content_version_id {
            url.query_pairs_mut()
                .append_pair("contentVersionId", &content_version_id.to_string());
        }

        self.client.get_json(url)
    }

    pub fn update_group_content_version(
        &self,
        exhibition_id: Uuid,
        group_content_version_id: Uuid,
        payload: &GroupContentVersion,
    ) -> Result<GroupContentVersion, ApiError> {
        let url = self.item_url(exhibition_id, group_content_version_id)?;
        self.client.send_json(Method::PUT, url, payload)
    }

    pub fn delete_group_content_version(
        &self,
        exhibition_id: Uuid,
        group_content_version_id: Uuid,
    ) -> Result<(), ApiError> {
        let url = self.item_url(exhibition_id, group_content_version_id)?;
        self.client.delete(url)
    }

    fn item_url(
        &self,
        exhibition_id: Uuid,
        group_content_version_id: Uuid,
    ) -> Result<reqwest::Url, ApiError> {
        let exhibition_id = exhibition_id.to_string();
        let group_content_version_id = group_content_version_id.to_string();
        self.client.endpoint(&[
            "exhibitions",
            &exhibition_id,
            COLLECTION,
            &group_content_version_id,
        ])
    }
}

#[cfg(test)]
mod tests {
    include!("group_content_versions.test.rs");
}
