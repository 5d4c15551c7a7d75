//! # Client Module
//!
//! Typed blocking client for the Muisti REST API.
//!
//! ## Modules
//!
//! - [`models`] - Resource representations exchanged with the API
//! - [`group_content_versions`] - `exhibitions/{id}/groupContentVersions` endpoints
//! - [`stored_files`] - `files` endpoints

pub mod group_content_versions;
pub mod models;
pub mod stored_files;

pub use group_content_versions::GroupContentVersionsApi;
pub use models::{FileMeta, GroupContentVersion, GroupContentVersionStatus, OutputFile, StoredFile};
pub use stored_files::StoredFilesApi;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// API client errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {source}")]
    RequestFailed {
        #[from]
        source: reqwest::Error,
    },

    #[error("API responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("JSON parsing failed: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Access token unavailable: {reason}")]
    AccessToken { reason: String },
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::RequestFailed { source } => source.status(),
            _ => None,
        }
    }
}

/// Supplies the bearer token attached to every API call
pub trait AccessTokenProvider: Send + Sync {
    /// Current access token, fetched before each request
    fn access_token(&self) -> Result<String, ApiError>;
}

impl<F> AccessTokenProvider for F
where
    F: Fn() -> Result<String, ApiError> + Send + Sync,
{
    fn access_token(&self) -> Result<String, ApiError> {
        self()
    }
}

/// Provider returning the same token for every call
#[derive(Debug, Clone)]
pub struct StaticAccessTokenProvider {
    token: String,
}

impl StaticAccessTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl AccessTokenProvider for StaticAccessTokenProvider {
    fn access_token(&self) -> Result<String, ApiError> {
        Ok(self.token.clone())
    }
}

/// Shared HTTP plumbing for the typed endpoint clients
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token_provider: Option<Arc<dyn AccessTokenProvider>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token_provider.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create client with its own HTTP connection pool
    pub fn new(
        base_path: &str,
        timeout: Duration,
        token_provider: Option<Arc<dyn AccessTokenProvider>>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_http_client(http, base_path, token_provider)
    }

    /// Create client sharing an existing HTTP client
    pub fn with_http_client(
        http: Client,
        base_path: &str,
        token_provider: Option<Arc<dyn AccessTokenProvider>>,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_path).map_err(|e| ApiError::InvalidUrl {
            url: base_path.to_string(),
            reason: e.to_string(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base_path.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            http,
            base_url,
            token_provider,
        })
    }

    /// Underlying HTTP client, for requests outside the typed API
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Start an authenticated request
    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, ApiError> {
        trace!(%method, %url, "API request");

        let mut builder = self.http.request(method, url);
        if let Some(provider) = &self.token_provider {
            builder = builder.bearer_auth(provider.access_token()?);
        }

        Ok(builder)
    }

    /// Send a request, turning non-success statuses into `ApiError::Status`
    fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send()?;
        let status = response.status();

        if !status.is_success() {
            let body = rejection_body(response);
            debug!(%status, "API call rejected");
            return Err(ApiError::Status { status, body });
        }

        trace!(%status, "API response");
        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes()?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.execute(self.request(Method::GET, url)?)?;
        Self::decode(response)
    }

    pub(crate) fn send_json<B, T>(&self, method: Method, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(self.request(method, url)?.json(body))?;
        Self::decode(response)
    }

    pub(crate) fn delete(&self, url: Url) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, url)?)?;
        Ok(())
    }
}

/// Body of a rejected response; a body that cannot be read is logged and left empty
pub(crate) fn rejection_body(response: Response) -> String {
    let status = response.status();
    response.text().unwrap_or_else(|error| {
        debug!(%status, %error, "Failed to read rejection body");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
