//! Settings loading
//!
//! Coordinates loading settings from `.env` files and `MUISTI_TEST_*`
//! environment variables.

use crate::primitives::ConfigError;
use tracing::trace;

use super::config::Settings;

/// Prefix of every environment variable the settings are read from
pub const ENV_PREFIX: &str = "MUISTI_TEST_";

impl Settings {
    /// Load settings: defaults -> .env -> env vars
    pub fn load() -> Result<Self, ConfigError> {
        use dotenvy::from_filename;

        // 1. Start with defaults
        let settings = Self::default();

        // 2. Load .env files (missing files are fine)
        let env_files = [".env.local", ".env"];
        for env_file in &env_files {
            match from_filename(env_file) {
                Ok(path) => trace!("Loaded environment file {}", path.display()),
                Err(e) if e.not_found() => {}
                Err(e) => {
                    return Err(ConfigError::EnvFileError {
                        file: env_file.to_string(),
                        source: e,
                    });
                }
            }
        }

        // 3. Environment variables override defaults
        let settings = settings.merge_with(envy::prefixed(ENV_PREFIX).from_env::<Settings>()?);

        // 4. Validate
        settings.validate()?;

        Ok(settings)
    }

    /// Build settings from explicit `MUISTI_TEST_*` variables
    ///
    /// Does not touch the process environment or `.env` files.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let settings = Self::default().merge_with(envy::prefixed(ENV_PREFIX).from_iter(vars)?);
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    include!("loader.test.rs");
}
