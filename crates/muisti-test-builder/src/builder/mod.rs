//! # Builder Module
//!
//! Test-session entry point. A [`TestBuilder`] owns the settings, the API
//! client and the closeable registry; the per-resource builders borrow it.
//!
//! ## Modules
//!
//! - [`group_content_versions`] - CRUD and failure assertions for group content versions
//! - [`stored_files`] - uploads and CRUD for stored files
//! - [`files`] - legacy plain output file uploads
//! - [`upload`] - multipart submission shared by the upload builders

pub mod files;
pub mod group_content_versions;
pub mod stored_files;
pub mod upload;

pub use files::OutputFileBuilder;
pub use group_content_versions::GroupContentVersionBuilder;
pub use stored_files::StoredFileBuilder;

use reqwest::StatusCode;
use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::Settings;
use crate::client::{AccessTokenProvider, ApiClient, ApiError, StaticAccessTokenProvider};
use crate::closeable::{Closeable, CloseableRegistry, ResourceKey, TeardownError};
use crate::logger::Logger;
use crate::primitives::ConfigError;

/// Builder errors, including failed expectations of the assert helpers
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("API call failed: {source}")]
    Api {
        #[from]
        source: ApiError,
    },

    #[error("Invalid settings: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to read test resource '{}': {source}", .path.display())]
    ResourceRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Expected {operation} to fail with status {expected}, but it succeeded")]
    UnexpectedSuccess {
        operation: &'static str,
        expected: u16,
    },

    #[error("Expected {operation} to fail with status {expected}, but it failed with {actual}")]
    StatusMismatch {
        operation: &'static str,
        expected: u16,
        actual: u16,
    },

    #[error("Expected {expected} {resource}, found {actual}")]
    CountMismatch {
        resource: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Upload to {url} failed with {status}: {body}")]
    UploadRejected {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("Upload response could not be parsed: {source}")]
    InvalidUploadResponse { source: serde_json::Error },

    #[error("Upload response is missing '{field}'")]
    MissingField { field: &'static str },

    #[error("{resource} has no identifier")]
    MissingIdentifier { resource: &'static str },
}

impl BuilderError {
    /// Status code of a rejected API call, if that is what this error is
    pub fn status(&self) -> Option<u16> {
        match self {
            BuilderError::Api { source } => source.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

/// Require `result` to be an API rejection with status `expected`
///
/// Success becomes `UnexpectedSuccess`, another status `StatusMismatch`.
/// Errors without a status (transport, I/O) are returned unchanged.
pub fn expect_failure<T>(
    operation: &'static str,
    expected: u16,
    result: Result<T, BuilderError>,
) -> Result<(), BuilderError> {
    match result {
        Ok(_) => Err(BuilderError::UnexpectedSuccess {
            operation,
            expected,
        }),
        Err(error) => match error.status() {
            Some(actual) if actual == expected => Ok(()),
            Some(actual) => Err(BuilderError::StatusMismatch {
                operation,
                expected,
                actual,
            }),
            None => Err(error),
        },
    }
}

/// Compare a listed count against the expected one
pub(crate) fn expect_count(
    resource: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), BuilderError> {
    if expected == actual {
        Ok(())
    } else {
        Err(BuilderError::CountMismatch {
            resource,
            expected,
            actual,
        })
    }
}

/// One test session: settings, API access and the resources to clean up
///
/// Pending resources are closed by [`TestBuilder::close`], or on drop if the
/// test never got that far.
#[derive(Debug)]
pub struct TestBuilder {
    settings: Settings,
    api_client: ApiClient,
    closables: RefCell<CloseableRegistry>,
}

impl TestBuilder {
    /// Create a builder; without a provider the settings' static token is used
    pub fn new(
        settings: Settings,
        token_provider: Option<Arc<dyn AccessTokenProvider>>,
    ) -> Result<Self, BuilderError> {
        settings.validate()?;

        let token_provider = token_provider.or_else(|| {
            settings.access_token.as_ref().map(|token| {
                Arc::new(StaticAccessTokenProvider::new(token.clone())) as Arc<dyn AccessTokenProvider>
            })
        });

        let api_client = ApiClient::new(
            &settings.api_base_path,
            Duration::from_secs(settings.net_timeout),
            token_provider,
        )?;

        debug!(
            api = %settings.api_base_path,
            files = %settings.files_base_path,
            "Test builder created"
        );

        Ok(Self {
            settings,
            api_client,
            closables: RefCell::new(CloseableRegistry::new()),
        })
    }

    /// Load settings from the environment, set up logging and create a builder
    pub fn from_env() -> Result<Self, BuilderError> {
        let settings = Settings::load()?;
        Logger::init_for_tests(settings.to_logger_config());
        Self::new(settings, None)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn api_client(&self) -> &ApiClient {
        &self.api_client
    }

    pub fn group_content_versions(&self) -> GroupContentVersionBuilder<'_> {
        GroupContentVersionBuilder::new(self)
    }

    pub fn stored_files(&self) -> StoredFileBuilder<'_> {
        StoredFileBuilder::new(self)
    }

    pub fn files(&self) -> OutputFileBuilder<'_> {
        OutputFileBuilder::new(self)
    }

    /// Track a resource for cleanup at the end of the session
    pub fn add_closable(&self, closable: Box<dyn Closeable>) {
        self.closables.borrow_mut().register(closable);
    }

    /// Stop tracking resources matching `predicate`; returns how many
    pub fn remove_closable<P>(&self, predicate: P) -> usize
    where
        P: FnMut(&ResourceKey) -> bool,
    {
        self.closables.borrow_mut().remove_where(predicate)
    }

    /// Keys of the resources still waiting for cleanup, in close order
    pub fn pending_closables(&self) -> Vec<ResourceKey> {
        self.closables.borrow().keys()
    }

    /// Close every pending resource in creation order
    pub fn close(mut self) -> Result<(), TeardownError> {
        self.closables.get_mut().close_all()
    }
}

impl Drop for TestBuilder {
    fn drop(&mut self) {
        let registry = self.closables.get_mut();
        if registry.is_empty() {
            return;
        }

        if let Err(error) = registry.close_all() {
            warn!(%error, "Cleanup of test resources failed");
        }
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
