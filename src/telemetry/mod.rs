//! Tracing subscriber setup
//!
//! The crate itself only emits `tracing` events (targets under
//! `apirunner::`). Applications that do not install their own subscriber can
//! use [`init_subscriber`] or [`init_from_env`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use apirunner::telemetry::{init_subscriber, OutputFormat, SubscriberConfig};
//!
//! init_subscriber(SubscriberConfig::default())?;
//!
//! let config = SubscriberConfig::builder()
//!     .log_level(tracing::Level::DEBUG)
//!     .output_format(OutputFormat::Json)
//!     .build();
//! init_subscriber(config)?;
//! ```

use crate::error::ApiError;

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON lines
    Json,
}

/// Configuration for tracing subscriber
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
        }
    }
}

impl SubscriberConfig {
    /// Create a new builder for SubscriberConfig
    pub fn builder() -> SubscriberConfigBuilder {
        SubscriberConfigBuilder::default()
    }

    /// Create a debug configuration
    pub fn debug() -> Self {
        Self {
            log_level: tracing::Level::DEBUG,
            output_format: OutputFormat::Text,
        }
    }

    fn filter(&self) -> String {
        let level = match self.log_level {
            tracing::Level::TRACE => "trace",
            tracing::Level::DEBUG => "debug",
            tracing::Level::INFO => "info",
            tracing::Level::WARN => "warn",
            tracing::Level::ERROR => "error",
        };
        format!("apirunner={level}")
    }
}

/// Builder for SubscriberConfig
#[derive(Debug, Default)]
pub struct SubscriberConfigBuilder {
    log_level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
}

impl SubscriberConfigBuilder {
    /// Set the log level
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set the log level from a string
    pub fn log_level_str(mut self, level: &str) -> Result<Self, ApiError> {
        let level = match level.to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => {
                return Err(ApiError::Configuration(format!(
                    "Invalid log level: {level}. Valid options: trace, debug, info, warn, error"
                )));
            }
        };
        self.log_level = Some(level);
        Ok(self)
    }

    /// Set the output format
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Build the configuration
    pub fn build(self) -> SubscriberConfig {
        let default = SubscriberConfig::default();
        SubscriberConfig {
            log_level: self.log_level.unwrap_or(default.log_level),
            output_format: self.output_format.unwrap_or(default.output_format),
        }
    }
}

/// Install a global `tracing-subscriber` fmt subscriber.
///
/// Returns `Ok(())` when a global subscriber is already installed.
pub fn init_subscriber(config: SubscriberConfig) -> Result<(), ApiError> {
    let filter = config.filter();
    let init_result = match config.output_format {
        OutputFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init(),
        OutputFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    match init_result {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_msg = e.to_string();
            // Either the dispatcher or the `log` bridge may be the part already installed.
            if error_msg.contains("global default trace dispatcher has already been set")
                || error_msg.contains("logging system was already initialized")
            {
                Ok(())
            } else {
                Err(ApiError::Configuration(format!(
                    "Failed to initialize tracing: {e}"
                )))
            }
        }
    }
}

/// Initialize tracing subscriber from environment variables
///
/// Supported environment variables:
/// - `APIRUNNER_LOG_LEVEL`: Log level (trace, debug, info, warn, error)
/// - `APIRUNNER_LOG_FORMAT`: Output format (text, json)
pub fn init_from_env() -> Result<(), ApiError> {
    let mut builder = SubscriberConfig::builder();

    if let Ok(level) = std::env::var(crate::defaults::env::LOG_LEVEL) {
        builder = builder.log_level_str(&level)?;
    }

    if let Ok(format) = std::env::var(crate::defaults::env::LOG_FORMAT) {
        let output_format = match format.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "text" => OutputFormat::Text,
            _ => {
                return Err(ApiError::Configuration(format!(
                    "Invalid log format: {format}. Valid options: text, json"
                )));
            }
        };
        builder = builder.output_format(output_format);
    }

    init_subscriber(builder.build())
}
