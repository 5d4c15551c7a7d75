//! Legacy output file uploads
//!
//! The upload endpoint stores these files on a local path and reports it as
//! the `uri`. Cleanup removes that path if it still exists.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::upload::{Upload, require_uri};
use super::{BuilderError, TestBuilder};
use crate::client::OutputFile;
use crate::closeable::{Closeable, ResourceKey};

const DEFAULT_FILENAME: &str = "file";

/// Local removal of one uploaded file
struct CloseableOutputFile {
    path: PathBuf,
}

impl Closeable for CloseableOutputFile {
    fn key(&self) -> ResourceKey {
        ResourceKey::OutputFile(self.path.clone())
    }

    fn close(self: Box<Self>) -> Result<(), BuilderError> {
        remove_if_exists(&self.path)
    }
}

fn remove_if_exists(path: &Path) -> Result<(), BuilderError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Uploads of plain output files
pub struct OutputFileBuilder<'a> {
    builder: &'a TestBuilder,
}

impl<'a> OutputFileBuilder<'a> {
    pub fn new(builder: &'a TestBuilder) -> Self {
        Self { builder }
    }

    /// Upload the content of `source` into `folder`
    pub fn upload<R: Read>(
        &self,
        folder: &str,
        source: R,
        content_type: &str,
        filename: Option<&str>,
    ) -> Result<OutputFile, BuilderError> {
        let upload = Upload::from_reader(folder, source, content_type, filename)?;
        self.submit(upload)
    }

    /// Upload a file from the resources directory under the part name `file`
    pub fn upload_resource(
        &self,
        folder: &str,
        resource_name: &str,
        content_type: &str,
    ) -> Result<OutputFile, BuilderError> {
        let upload = Upload::from_resource(
            folder,
            &self.builder.settings().resources_dir,
            resource_name,
            content_type,
            Some(DEFAULT_FILENAME),
        )?;
        self.submit(upload)
    }

    fn submit(&self, upload: Upload<'_>) -> Result<OutputFile, BuilderError> {
        let output: OutputFile = upload.submit(
            self.builder.api_client().http(),
            &self.builder.settings().files_base_path,
        )?;

        let path = PathBuf::from(require_uri(output.uri.as_deref())?);
        debug!(path = %path.display(), file_name = %output.meta.file_name, "Uploaded output file");

        self.builder
            .add_closable(Box::new(CloseableOutputFile { path }));
        Ok(output)
    }

    /// Remove an uploaded file now and stop tracking it
    pub fn delete(&self, output: &OutputFile) -> Result<(), BuilderError> {
        let path = Path::new(require_uri(output.uri.as_deref())?);
        remove_if_exists(path)?;

        let removed = self
            .builder
            .remove_closable(|pending| matches!(pending, ResourceKey::OutputFile(p) if p == path));

        debug!(path = %path.display(), removed, "Deleted output file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    include!("files.test.rs");
}
