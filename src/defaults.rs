//! Default Configuration Values
//!
//! This module centralizes all default values used throughout the crate.
//! Having defaults in one place makes them easier to maintain, document, and adjust.

use std::time::Duration;

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Fixed per-call request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(6000);

    /// Default `Accept` header value for API families.
    pub const ACCEPT: &str = "application/json";

    /// Default `Content-Type` header value for API families.
    pub const CONTENT_TYPE: &str = "application/json";

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("apirunner/", env!("CARGO_PKG_VERSION"));
}

/// UI side-effect defaults applied by the service factory
pub mod ui {
    use crate::types::{PopupConfig, PopupSpec, UiConfig};

    /// Busy indicator is toggled unless the caller opts out.
    pub const LOADING: bool = true;

    pub const LOADING_MESSAGE: &str = "";

    /// Error popups are shown by default.
    pub const SHOW_ERROR_POPUP: bool = true;

    /// Success popups are hidden by default.
    pub const SHOW_SUCCESS_POPUP: bool = false;

    /// The UI configuration every runner starts from.
    pub fn ui_config() -> UiConfig {
        UiConfig {
            loading: Some(LOADING),
            loading_message: Some(LOADING_MESSAGE.to_string()),
            popup_config: Some(PopupConfig {
                popup_success: Some(PopupSpec::shown(SHOW_SUCCESS_POPUP)),
                popup_error: Some(PopupSpec::shown(SHOW_ERROR_POPUP)),
            }),
        }
    }
}

/// Environment variable names read by [`crate::config::ServiceSettings::from_env`]
pub mod env {
    pub const BASE_URL: &str = "APIRUNNER_BASE_URL";
    pub const TIMEOUT_MS: &str = "APIRUNNER_TIMEOUT_MS";
    pub const LOG_LEVEL: &str = "APIRUNNER_LOG_LEVEL";
    pub const LOG_FORMAT: &str = "APIRUNNER_LOG_FORMAT";
}
