//! Multipart uploads to the file store
//!
//! The upload endpoint takes `multipart/form-data` with a binary `file` part
//! and a text `folder` part, so it is called directly instead of through the
//! typed API client.

use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, trace};

use super::BuilderError;
use crate::client::{ApiError, rejection_body};

/// Content and metadata of one upload
#[derive(Debug, Clone)]
pub struct Upload<'a> {
    pub folder: &'a str,
    pub data: Vec<u8>,
    pub content_type: &'a str,
    pub filename: Option<&'a str>,
}

impl<'a> Upload<'a> {
    /// Read `source` fully into memory
    pub fn from_reader<R: Read>(
        folder: &'a str,
        mut source: R,
        content_type: &'a str,
        filename: Option<&'a str>,
    ) -> Result<Self, BuilderError> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;

        Ok(Self {
            folder,
            data,
            content_type,
            filename,
        })
    }

    /// Read a file below the resources directory
    pub fn from_resource(
        folder: &'a str,
        resources_dir: &Path,
        resource_name: &str,
        content_type: &'a str,
        filename: Option<&'a str>,
    ) -> Result<Self, BuilderError> {
        let path = resources_dir.join(resource_name);
        let data = fs::read(&path).map_err(|source| BuilderError::ResourceRead {
            path: path.clone(),
            source,
        })?;

        trace!(path = %path.display(), bytes = data.len(), "Read upload resource");

        Ok(Self {
            folder,
            data,
            content_type,
            filename,
        })
    }

    /// Build the multipart body: `file` (binary) and `folder` (text)
    pub fn into_form(self) -> Result<Form, BuilderError> {
        let mut part = Part::bytes(self.data)
            .mime_str(self.content_type)
            .map_err(ApiError::from)?;

        if let Some(filename) = self.filename {
            part = part.file_name(filename.to_string());
        }

        Ok(Form::new()
            .part("file", part)
            .text("folder", self.folder.to_string()))
    }

    /// POST the upload and decode the JSON response
    ///
    /// A non-success status or an undecodable body is an error; neither is an
    /// outcome tests are expected to assert on.
    pub fn submit<T: DeserializeOwned>(self, http: &Client, url: &str) -> Result<T, BuilderError> {
        debug!(
            url,
            folder = self.folder,
            content_type = self.content_type,
            bytes = self.data.len(),
            "Uploading file"
        );

        let form = self.into_form()?;
        let response = http
            .post(url)
            .multipart(form)
            .send()
            .map_err(ApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = rejection_body(response);
            return Err(BuilderError::UploadRejected {
                url: url.to_string(),
                status,
                body,
            });
        }

        let bytes = response.bytes().map_err(ApiError::from)?;
        serde_json::from_slice(&bytes).map_err(|source| BuilderError::InvalidUploadResponse { source })
    }
}

/// Storage locator of an upload response, which must be present and non-empty
pub(crate) fn require_uri(uri: Option<&str>) -> Result<&str, BuilderError> {
    match uri {
        Some(uri) if !uri.is_empty() => Ok(uri),
        _ => Err(BuilderError::MissingField { field: "uri" }),
    }
}

#[cfg(test)]
mod tests {
    include!("upload.test.rs");
}
