//! Stored file builder
//!
//! Files enter the store through the multipart upload endpoint and are
//! managed afterwards through the typed `files` API.

use std::io::Read;
use tracing::debug;

use super::upload::{Upload, require_uri};
use super::{BuilderError, TestBuilder, expect_count, expect_failure};
use crate::client::{StoredFile, StoredFilesApi};
use crate::closeable::{Closeable, ResourceKey};

const RESOURCE: &str = "stored file";

/// Remote delete of one uploaded file
struct CloseableStoredFile {
    api: StoredFilesApi,
    id: String,
}

impl Closeable for CloseableStoredFile {
    fn key(&self) -> ResourceKey {
        ResourceKey::StoredFile(self.id.clone())
    }

    fn close(self: Box<Self>) -> Result<(), BuilderError> {
        self.api.delete_stored_file(&self.id)?;
        Ok(())
    }
}

/// Uploads, CRUD and failure assertions for stored files
pub struct StoredFileBuilder<'a> {
    builder: &'a TestBuilder,
    api: StoredFilesApi,
}

impl<'a> StoredFileBuilder<'a> {
    pub fn new(builder: &'a TestBuilder) -> Self {
        Self {
            builder,
            api: StoredFilesApi::new(builder.api_client().clone()),
        }
    }

    /// Upload the content of `source` into `folder`
    pub fn upload<R: Read>(
        &self,
        folder: &str,
        source: R,
        content_type: &str,
        filename: Option<&str>,
    ) -> Result<StoredFile, BuilderError> {
        let upload = Upload::from_reader(folder, source, content_type, filename)?;
        self.submit(upload)
    }

    /// Upload a file from the resources directory
    ///
    /// The part's filename defaults to the resource name.
    pub fn upload_resource(
        &self,
        folder: &str,
        resource_name: &str,
        content_type: &str,
        filename: Option<&str>,
    ) -> Result<StoredFile, BuilderError> {
        let upload = Upload::from_resource(
            folder,
            &self.builder.settings().resources_dir,
            resource_name,
            content_type,
            Some(filename.unwrap_or(resource_name)),
        )?;
        self.submit(upload)
    }

    fn submit(&self, upload: Upload<'_>) -> Result<StoredFile, BuilderError> {
        let settings = self.builder.settings();
        let stored: StoredFile =
            upload.submit(self.builder.api_client().http(), &settings.files_base_path)?;

        require_uri(stored.uri.as_deref())?;
        let id = stored
            .id
            .clone()
            .ok_or(BuilderError::MissingField { field: "id" })?;

        self.builder.add_closable(Box::new(CloseableStoredFile {
            api: self.api.clone(),
            id: id.clone(),
        }));

        debug!(%id, uri = stored.uri.as_deref().unwrap_or_default(), "Uploaded stored file");
        Ok(stored)
    }

    pub fn find(&self, stored_file_id: &str) -> Result<StoredFile, BuilderError> {
        Ok(self.api.find_stored_file(stored_file_id)?)
    }

    pub fn list(&self, folder: &str) -> Result<Vec<StoredFile>, BuilderError> {
        Ok(self.api.list_stored_files(folder)?)
    }

    /// Replace a stored file's metadata; `stored_file.id` selects the record
    pub fn update(&self, stored_file: &StoredFile) -> Result<StoredFile, BuilderError> {
        let id = stored_file
            .id
            .as_deref()
            .ok_or(BuilderError::MissingIdentifier { resource: RESOURCE })?;
        Ok(self.api.update_stored_file(id, stored_file)?)
    }

    /// Delete a stored file and stop tracking it
    pub fn delete(&self, stored_file_id: &str) -> Result<(), BuilderError> {
        self.api.delete_stored_file(stored_file_id)?;

        let removed = self.builder.remove_closable(
            |pending| matches!(pending, ResourceKey::StoredFile(id) if id == stored_file_id),
        );

        debug!(id = stored_file_id, removed, "Deleted stored file");
        Ok(())
    }

    pub fn delete_resource(&self, stored_file: &StoredFile) -> Result<(), BuilderError> {
        let id = stored_file
            .id
            .as_deref()
            .ok_or(BuilderError::MissingIdentifier { resource: RESOURCE })?;
        self.delete(id)
    }

    pub fn assert_count(&self, expected: usize, folder: &str) -> Result<(), BuilderError> {
        let actual = self.list(folder)?.len();
        expect_count("stored files", expected, actual)
    }

    pub fn assert_find_fails(
        &self,
        expected_status: u16,
        stored_file_id: &str,
    ) -> Result<(), BuilderError> {
        expect_failure("find", expected_status, self.find(stored_file_id))
    }

    pub fn assert_list_fails(&self, expected_status: u16, folder: &str) -> Result<(), BuilderError> {
        expect_failure("list", expected_status, self.list(folder))
    }

    pub fn assert_update_fails(
        &self,
        expected_status: u16,
        stored_file: &StoredFile,
    ) -> Result<(), BuilderError> {
        expect_failure("update", expected_status, self.update(stored_file))
    }

    pub fn assert_delete_fails(
        &self,
        expected_status: u16,
        stored_file_id: &str,
    ) -> Result<(), BuilderError> {
        expect_failure("delete", expected_status, self.delete(stored_file_id))
    }
}

#[cfg(test)]
mod tests {
    include!("stored_files.test.rs");
}
