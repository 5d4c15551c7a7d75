//! Group content version builder
//!
//! Every version created here is deleted again at teardown unless the test
//! deletes it first.

use tracing::debug;
use uuid::Uuid;

use super::{BuilderError, TestBuilder, expect_count, expect_failure};
use crate::client::{GroupContentVersion, GroupContentVersionStatus, GroupContentVersionsApi};
use crate::closeable::{Closeable, ResourceKey};

const RESOURCE: &str = "group content version";

/// Remote delete of one created version
struct CloseableGroupContentVersion {
    api: GroupContentVersionsApi,
    exhibition_id: Uuid,
    id: Uuid,
}

impl Closeable for CloseableGroupContentVersion {
    fn key(&self) -> ResourceKey {
        ResourceKey::GroupContentVersion(self.id)
    }

    fn close(self: Box<Self>) -> Result<(), BuilderError> {
        self.api
            .delete_group_content_version(self.exhibition_id, self.id)?;
        Ok(())
    }
}

/// CRUD and failure assertions for group content versions
pub struct GroupContentVersionBuilder<'a> {
    builder: &'a TestBuilder,
    api: GroupContentVersionsApi,
}

impl<'a> GroupContentVersionBuilder<'a> {
    pub fn new(builder: &'a TestBuilder) -> Self {
        Self {
            builder,
            api: GroupContentVersionsApi::new(builder.api_client().clone()),
        }
    }

    /// Create a ready version named `default`
    pub fn create_default(
        &self,
        exhibition_id: Uuid,
        content_version_id: Uuid,
        device_group_id: Uuid,
    ) -> Result<GroupContentVersion, BuilderError> {
        let payload = GroupContentVersion::new(
            "default",
            content_version_id,
            device_group_id,
            GroupContentVersionStatus::Ready,
        );
        self.create(exhibition_id, &payload)
    }

    /// Create a version and track it for cleanup
    pub fn create(
        &self,
        exhibition_id: Uuid,
        payload: &GroupContentVersion,
    ) -> Result<GroupContentVersion, BuilderError> {
        let created = self
            .api
            .create_group_content_version(exhibition_id, payload)?;
        let id = created
            .id
            .ok_or(BuilderError::MissingIdentifier { resource: RESOURCE })?;

        self.builder.add_closable(Box::new(CloseableGroupContentVersion {
            api: self.api.clone(),
            exhibition_id,
            id,
        }));

        debug!(%exhibition_id, %id, "Created group content version");
        Ok(created)
    }

    pub fn find(
        &self,
        exhibition_id: Uuid,
        group_content_version_id: Uuid,
    ) -> Result<GroupContentVersion, BuilderError> {
        Ok(self
            .api
            .find_group_content_version(exhibition_id, group_content_version_id)?)
    }

    /// List versions, optionally only those of one content version
    pub fn list(
        &self,
        exhibition_id: Uuid,
        content_version_id: Option<Uuid>,
    ) -> Result<Vec<GroupContentVersion>, BuilderError> {
        Ok(self
            .api
            .list_group_content_versions(exhibition_id, content_version_id)?)
    }

    /// Replace a version; `body.id` selects the record
    pub fn update(
        &self,
        exhibition_id: Uuid,
        body: &GroupContentVersion,
    ) -> Result<GroupContentVersion, BuilderError> {
        let id = body
            .id
            .ok_or(BuilderError::MissingIdentifier { resource: RESOURCE })?;
        Ok(self
            .api
            .update_group_content_version(exhibition_id, id, body)?)
    }

    /// Delete a version and stop tracking it
    pub fn delete(
        &self,
        exhibition_id: Uuid,
        group_content_version_id: Uuid,
    ) -> Result<(), BuilderError> {
        self.api
            .delete_group_content_version(exhibition_id, group_content_version_id)?;

        let key = ResourceKey::GroupContentVersion(group_content_version_id);
        let removed = self.builder.remove_closable(|pending| *pending == key);

        debug!(%exhibition_id, id = %group_content_version_id, removed, "Deleted group content version");
        Ok(())
    }

    pub fn delete_resource(
        &self,
        exhibition_id: Uuid,
        group_content_version: &GroupContentVersion,
    ) -> Result<(), BuilderError> {
        let id = group_content_version
            .id
            .ok_or(BuilderError::MissingIdentifier { resource: RESOURCE })?;
        self.delete(exhibition_id, id)
    }

    pub fn assert_count(
        &self,
        expected: usize,
        exhibition_id: Uuid,
        content_version_id: Option<Uuid>,
    ) -> Result<(), BuilderError> {
        let actual = self.list(exhibition_id, content_version_id)?.len();
        expect_count("group content versions", expected, actual)
    }

    pub fn assert_create_fails(
        &self,
        expected_status: u16,
        exhibition_id: Uuid,
        payload: &GroupContentVersion,
    ) -> Result<(), BuilderError> {
        expect_failure("create", expected_status, self.create(exhibition_id, payload))
    }

    pub fn assert_find_fails(
        &self,
        expected_status: u16,
        exhibition_id: Uuid,
        group_content_version_id: Uuid,
    ) -> Result<(), BuilderError> {
        expect_failure(
            "find",
            expected_status,
            self.find(exhibition_id, group_content_version_id),
        )
    }

    pub fn assert_list_fails(
        &self,
        expected_status: u16,
        exhibition_id: Uuid,
        content_version_id: Option<Uuid>,
    ) -> Result<(), BuilderError> {
        expect_failure(
            "list",
            expected_status,
            self.list(exhibition_id, content_version_id),
        )
    }

    pub fn assert_update_fails(
        &self,
        expected_status: u16,
        exhibition_id: Uuid,
        body: &GroupContentVersion,
    ) -> Result<(), BuilderError> {
        expect_failure("update", expected_status, self.update(exhibition_id, body))
    }

    pub fn assert_delete_fails(
        &self,
        expected_status: u16,
        exhibition_id: Uuid,
        group_content_version_id: Uuid,
    ) -> Result<(), BuilderError> {
        expect_failure(
            "delete",
            expected_status,
            self.delete(exhibition_id, group_content_version_id),
        )
    }
}

#[cfg(test)]
mod tests {
    include!("group_content_versions.test.rs");
}
