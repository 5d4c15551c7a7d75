//! # muisti-test-builder
//!
//! Functional-test support for the Muisti exhibition API.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Foundation types and errors shared by config and logging
//! - [`application`] - Settings loaded from defaults, `.env` and `MUISTI_TEST_*`
//! - [`logger`] - Structured logging for test runs
//! - [`client`] - Typed blocking client for the Muisti REST API
//! - [`closeable`] - Registry of created resources awaiting cleanup
//! - [`builder`] - Per-resource builders with CRUD and failure assertions
//!
//! ## Quick Start
//!
//! ```no_run
//! use muisti_test_builder::TestBuilder;
//! use uuid::Uuid;
//!
//! # fn run(exhibition: Uuid, content_version: Uuid, device_group: Uuid) -> Result<(), Box<dyn std::error::Error>> {
//! let builder = TestBuilder::from_env()?;
//! let versions = builder.group_content_versions();
//!
//! let created = versions.create_default(exhibition, content_version, device_group)?;
//! versions.assert_count(1, exhibition, Some(content_version))?;
//! versions.assert_create_fails(404, Uuid::new_v4(), &created)?;
//!
//! // Deletes every resource created above
//! builder.close()?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod builder;
pub mod client;
pub mod closeable;
pub mod logger;
pub mod primitives;

// Re-export commonly used types for convenience
pub use application::Settings;
pub use builder::{BuilderError, TestBuilder, expect_failure};
pub use client::{
    AccessTokenProvider, ApiClient, ApiError, StaticAccessTokenProvider, models,
};
pub use closeable::{Closeable, CloseableFn, CloseableRegistry, ResourceKey, TeardownError};
pub use logger::Logger;
pub use primitives::{ConfigError, LogFormat, LogLevel, LogOutput, LoggerConfig, LoggerError};
