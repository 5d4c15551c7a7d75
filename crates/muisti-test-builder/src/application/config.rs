//! Test builder settings
//!
//! Handles settings validation and merging. Loading follows the precedence
//! defaults -> .env -> MUISTI_TEST_* environment variables (see `loader`).

use crate::primitives::*;
use serde::Deserialize;
use std::path::PathBuf;

/// Default configuration values
pub mod defaults {
    pub const API_BASE_PATH: &str = "http://localhost:1234/v1";
    pub const FILES_BASE_PATH: &str = "http://localhost:1234/files";
    pub const NET_TIMEOUT: u64 = 30;
    pub const RESOURCES_DIR: &str = "tests/resources";
    pub const LOG_LEVEL: u8 = 1; // Warnings and errors by default
}

/// Default value functions for configuration fields
mod default_fns {
    use super::*;

    pub fn api_base_path() -> String {
        defaults::API_BASE_PATH.to_string()
    }

    pub fn files_base_path() -> String {
        defaults::FILES_BASE_PATH.to_string()
    }

    pub fn net_timeout() -> u64 {
        defaults::NET_TIMEOUT
    }

    pub fn resources_dir() -> PathBuf {
        PathBuf::from(defaults::RESOURCES_DIR)
    }

    pub fn log_level() -> u8 {
        defaults::LOG_LEVEL
    }

    pub fn log_format() -> LogFormat {
        LogFormat::Text
    }

    pub fn log_output() -> LogOutput {
        LogOutput::Captured
    }
}

/// Settings shared by every builder of one test session
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Base path of the REST API, e.g. `http://localhost:1234/v1`
    #[serde(default = "default_fns::api_base_path")]
    pub api_base_path: String,

    /// Multipart upload endpoint
    #[serde(default = "default_fns::files_base_path")]
    pub files_base_path: String,

    /// Static bearer token used when no other provider is given
    #[serde(default)]
    pub access_token: Option<String>,

    /// HTTP timeout in seconds
    #[serde(default = "default_fns::net_timeout")]
    pub net_timeout: u64,

    /// Directory test resources are uploaded from
    #[serde(default = "default_fns::resources_dir")]
    pub resources_dir: PathBuf,

    /// Verbosity level (0=error, 1=warn, 2=info, 3=debug, 4=trace)
    #[serde(default = "default_fns::log_level")]
    pub log_level: u8,

    /// Output format (text, json, pretty)
    #[serde(default = "default_fns::log_format")]
    pub log_format: LogFormat,

    /// Log output stream (captured, stderr, stdout)
    #[serde(default = "default_fns::log_output")]
    pub log_output: LogOutput,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_path: default_fns::api_base_path(),
            files_base_path: default_fns::files_base_path(),
            access_token: None,
            net_timeout: default_fns::net_timeout(),
            resources_dir: default_fns::resources_dir(),
            log_level: default_fns::log_level(),
            log_format: default_fns::log_format(),
            log_output: default_fns::log_output(),
        }
    }
}

impl Settings {
    /// Settings pointing both the API and the upload endpoint at one server
    ///
    /// Handy for mock servers: the API lives at `<server>/v1` and uploads go to
    /// `<server>/files`.
    pub fn for_server(server_url: &str) -> Self {
        let server_url = server_url.trim_end_matches('/');
        Self {
            api_base_path: format!("{}/v1", server_url),
            files_base_path: format!("{}/files", server_url),
            ..Self::default()
        }
    }

    /// Create LoggerConfig from these settings
    pub fn to_logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: LogLevel::from_verbosity(self.log_level),
            format: self.log_format,
            output: self.log_output,
        }
    }

    /// Merge this config with another, taking non-default values from other
    pub fn merge_with(mut self, other: Self) -> Self {
        if other.api_base_path != default_fns::api_base_path() {
            self.api_base_path = other.api_base_path;
        }
        if other.files_base_path != default_fns::files_base_path() {
            self.files_base_path = other.files_base_path;
        }
        if other.access_token.is_some() {
            self.access_token = other.access_token;
        }
        if other.net_timeout != default_fns::net_timeout() {
            self.net_timeout = other.net_timeout;
        }
        if other.resources_dir != default_fns::resources_dir() {
            self.resources_dir = other.resources_dir;
        }
        if other.log_level != default_fns::log_level() {
            self.log_level = other.log_level;
        }
        if !matches!(other.log_format, LogFormat::Text) {
            self.log_format = other.log_format;
        }
        if !matches!(other.log_output, LogOutput::Captured) {
            self.log_output = other.log_output;
        }

        self
    }

    /// Validate the final configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("api_base_path", &self.api_base_path)?;
        validate_http_url("files_base_path", &self.files_base_path)?;

        if self.net_timeout == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "net_timeout must be > 0".to_string(),
            });
        }

        Ok(())
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(value).map_err(|e| ConfigError::ParseError {
        value: value.to_string(),
        reason: format!("{} is not a valid URL: {}", field, e),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::ValidationFailed {
            reason: format!("{} must use http or https, got '{}'", field, scheme),
        }),
    }
}

#[cfg(test)]
mod tests {
    include!("config.test.rs");
}
