//! Application layer modules
//!
//! Settings management and loading.

pub mod config;
pub mod loader;

// Re-export main types for convenience
pub use config::Settings;
pub use loader::ENV_PREFIX;
