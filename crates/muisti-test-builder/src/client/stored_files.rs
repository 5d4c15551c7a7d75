//! Stored file endpoints: `files[/{storedFileId}]`

use reqwest::Method;

use super::{ApiClient, ApiError, StoredFile};

const COLLECTION: &str = "files";

/// Typed client for stored files
#[derive(Debug, Clone)]
pub struct StoredFilesApi {
    client: ApiClient,
}

impl StoredFilesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn list_stored_files(&self, folder: &str) -> Result<Vec<StoredFile>, ApiError> {
        let mut url = self.client.endpoint(&[COLLECTION])?;
        url.query_pairs_mut().append_pair("folder", folder);
        self.client.get_json(url)
    }

    pub fn find_stored_file(&self, stored_file_id: &str) -> Result<StoredFile, ApiError> {
        let url = self.client.endpoint(&[COLLECTION, stored_file_id])?;
        self.client.get_json(url)
    }

    pub fn update_stored_file(
        &self,
        stored_file_id: &str,
        stored_file: &StoredFile,
    ) -> Result<StoredFile, ApiError> {
        let url = self.client.endpoint(&[COLLECTION, stored_file_id])?;
        self.client.send_json(Method::PUT, url, stored_file)
    }

    pub fn delete_stored_file(&self, stored_file_id: &str) -> Result<(), ApiError> {
        let url = self.client.endpoint(&[COLLECTION, stored_file_id])?;
        self.client.delete(url)
    }
}

#[cfg(test)]
mod tests {
    include!("stored_files.test.rs");
}
