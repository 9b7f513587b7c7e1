//! Core error types.

use thiserror::Error;

/// Coarse classification of an [`ApiError`], useful when a family's error
/// hook decides between rethrowing and swallowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 4xx responses.
    Client,
    /// 5xx responses.
    Server,
    /// Connection failures and timeouts.
    Network,
    /// The response was accepted by the transport but rejected by the family.
    Rejection,
    /// Interceptor hooks refused the request or response.
    Interceptor,
    /// Payload encoding or response decoding.
    Parsing,
    /// Invalid family or call configuration.
    Configuration,
    Unknown,
}

/// Errors raised while preparing, sending, or post-processing a call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request did not complete within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The connection could not be established.
    #[error("Network error: {0}")]
    Network(String),

    /// Any other transport-level failure reported by the HTTP client.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A structurally successful response was rejected by the family's
    /// success hook.
    #[error("Rejected{}: {message}", .code.map(|c| format!(" ({c})")).unwrap_or_default())]
    Rejected {
        code: Option<i64>,
        title: Option<String>,
        message: String,
        body: Option<serde_json::Value>,
    },

    /// An interceptor refused the request or the response.
    #[error("Interceptor error: {0}")]
    Interceptor(String),

    /// The payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The response body could not be decoded into the requested type.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Family-specific error raised from a custom hook.
    #[error("{0}")]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
    /// Build an HTTP status error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Build a domain rejection with only a message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            code: None,
            title: None,
            message: message.into(),
            body: None,
        }
    }

    /// Wrap a family-specific error.
    pub fn custom<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Custom(Box::new(err))
    }

    /// HTTP status carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for failures reported by the transport (network, timeout,
    /// non-2xx), as opposed to failures raised by hooks.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Timeout(_) | Self::Network(_) | Self::Transport(_)
        )
    }

    /// True when the family's success hook rejected the response.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Downcast a [`ApiError::Custom`] payload to a concrete family error.
    pub fn downcast_custom<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Custom(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http { status, .. } if (400..500).contains(status) => ErrorCategory::Client,
            Self::Http { status, .. } if *status >= 500 => ErrorCategory::Server,
            Self::Http { .. } => ErrorCategory::Unknown,
            Self::Timeout(_) | Self::Network(_) | Self::Transport(_) => ErrorCategory::Network,
            Self::Rejected { .. } => ErrorCategory::Rejection,
            Self::Interceptor(_) => ErrorCategory::Interceptor,
            Self::Serialization(_) | Self::Deserialization(_) => ErrorCategory::Parsing,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Custom(_) => ErrorCategory::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("dummy: {0}")]
    struct DummyError(String);

    #[test]
    fn categorizes_http_statuses() {
        assert_eq!(ApiError::http(404, "nf").category(), ErrorCategory::Client);
        assert_eq!(ApiError::http(503, "down").category(), ErrorCategory::Server);
        assert_eq!(ApiError::http(404, "nf").status_code(), Some(404));
        assert!(ApiError::http(500, "").is_transport());
    }

    #[test]
    fn rejection_display_includes_code() {
        let err = ApiError::Rejected {
            code: Some(4001),
            title: None,
            message: "out of stock".into(),
            body: None,
        };
        assert_eq!(err.to_string(), "Rejected (4001): out of stock");
        assert!(err.is_rejection());
        assert!(!err.is_transport());
        assert_eq!(ApiError::rejected("nope").to_string(), "Rejected: nope");
    }

    #[test]
    fn custom_errors_downcast() {
        let err = ApiError::custom(DummyError("boom".into()));
        assert_eq!(err.to_string(), "dummy: boom");
        let inner = err.downcast_custom::<DummyError>().expect("dummy error");
        assert_eq!(inner.0, "boom");
        assert_eq!(err.category(), ErrorCategory::Unknown);
    }
}
