use crate::primitives::*;
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Global logger instance - ensures single initialization
static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Logger implementation using tracing-subscriber
#[derive(Debug)]
pub struct Logger {
    config: LoggerConfig,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(config: LoggerConfig) -> Result<&'static Self, LoggerError> {
        if GLOBAL_LOGGER.get().is_some() {
            return Err(LoggerError::AlreadyInitialized);
        }

        // RUST_LOG wins; otherwise this crate at the configured level, HTTP stack at warn
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Self::default_directives(config.level)));

        let fmt_layer = match (config.output, config.format) {
            (LogOutput::Captured, LogFormat::Text) => {
                fmt::layer().with_test_writer().compact().boxed()
            }
            (LogOutput::Captured, LogFormat::Json) => fmt::layer()
                .with_test_writer()
                .with_ansi(false)
                .json()
                .boxed(),
            (LogOutput::Captured, LogFormat::Pretty) => {
                fmt::layer().with_test_writer().pretty().boxed()
            }
            (LogOutput::Stderr, LogFormat::Text) => fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .boxed(),
            (LogOutput::Stderr, LogFormat::Json) => fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .json()
                .boxed(),
            (LogOutput::Stderr, LogFormat::Pretty) => fmt::layer()
                .with_writer(std::io::stderr)
                .pretty()
                .boxed(),
            (LogOutput::Stdout, LogFormat::Text) => fmt::layer()
                .with_writer(std::io::stdout)
                .compact()
                .boxed(),
            (LogOutput::Stdout, LogFormat::Json) => fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(false)
                .json()
                .boxed(),
            (LogOutput::Stdout, LogFormat::Pretty) => fmt::layer()
                .with_writer(std::io::stdout)
                .pretty()
                .boxed(),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| LoggerError::InitializationFailed {
                reason: e.to_string(),
            })?;

        let logger = GLOBAL_LOGGER.get_or_init(|| Logger {
            config: config.clone(),
        });

        tracing::debug!(
            level = ?config.level,
            format = ?config.format,
            output = ?config.output,
            "Logger initialized"
        );

        Ok(logger)
    }

    /// Initialize the logger unless something already did
    ///
    /// Every test in a binary calls this, so a second call (or a subscriber
    /// installed by the host test harness) is not an error. Returns `None`
    /// when a foreign subscriber owns the global dispatcher.
    pub fn init_for_tests(config: LoggerConfig) -> Option<&'static Self> {
        match Self::init(config) {
            Ok(logger) => Some(logger),
            Err(LoggerError::AlreadyInitialized) => Self::global(),
            Err(LoggerError::InitializationFailed { .. }) => None,
        }
    }

    /// Filter directives used when RUST_LOG is not set
    pub fn default_directives(level: LogLevel) -> String {
        let level = level.as_directive();
        format!(
            "muisti_test_builder={level},muisti_test_builder_tests={level},hyper_util=warn,reqwest=warn,h2=warn,mockito=warn,warn"
        )
    }

    /// Get reference to the global logger instance
    pub fn global() -> Option<&'static Self> {
        GLOBAL_LOGGER.get()
    }

    /// Check if logger is initialized
    pub fn is_initialized() -> bool {
        GLOBAL_LOGGER.get().is_some()
    }

    /// Configuration the logger was initialized with
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
