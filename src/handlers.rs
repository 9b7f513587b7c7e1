//! Success/error hooks of an API family.
//!
//! A family decides what a successful body means and what happens to a
//! failure. Both transport failures and rejections raised by
//! [`ResponseHandler::on_success`] end up in [`ResponseHandler::on_error`],
//! which either propagates the error to the caller of `run()` or swallows it.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiError;
use crate::types::{ResponseBody, UiConfig};

/// Per-family response policy.
#[async_trait]
pub trait ResponseHandler: Send + Sync {
    /// Transform a 2xx body into the call's result. Returning `Err` marks the
    /// response as rejected; the error is then routed to [`Self::on_error`].
    async fn on_success(&self, body: ResponseBody, ui: &UiConfig) -> Result<ResponseBody, ApiError>;

    /// Handle a failure. `Err` propagates to the caller; `Ok(())` swallows the
    /// failure and the call resolves to `None`.
    async fn on_error(&self, error: ApiError, ui: &UiConfig) -> Result<(), ApiError>;
}

/// What a built-in handler does with failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Return the failure to the caller.
    #[default]
    Propagate,
    /// Log the failure and resolve the call to `None`.
    Swallow,
}

impl ErrorPolicy {
    fn apply(self, error: ApiError, ui: &UiConfig) -> Result<(), ApiError> {
        match self {
            Self::Propagate => Err(error),
            Self::Swallow => {
                tracing::warn!(
                    target: "apirunner::http",
                    err = %error,
                    category = ?error.category(),
                    show_popup = ui.popup().shows_error(),
                    "call failed; error swallowed"
                );
                Ok(())
            }
        }
    }
}

/// Returns the body unchanged.
#[derive(Debug, Clone, Default)]
pub struct PassthroughHandler {
    policy: ErrorPolicy,
}

impl PassthroughHandler {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self { policy }
    }

    pub fn swallowing() -> Self {
        Self::new(ErrorPolicy::Swallow)
    }
}

#[async_trait]
impl ResponseHandler for PassthroughHandler {
    async fn on_success(&self, body: ResponseBody, _ui: &UiConfig) -> Result<ResponseBody, ApiError> {
        Ok(body)
    }

    async fn on_error(&self, error: ApiError, ui: &UiConfig) -> Result<(), ApiError> {
        self.policy.apply(error, ui)
    }
}

/// Unwraps `{ status, code, title, message, data }` envelopes.
///
/// A body is accepted when its `code` (or `status`, when there is no `code`)
/// is listed in the accepted codes. Accepted bodies resolve to their `data`
/// field (`null` when missing); other bodies are rejected with
/// [`ApiError::Rejected`]. Objects with no code resolve to `data` when it is
/// present and pass through otherwise, as do non-object and byte bodies.
#[derive(Debug, Clone)]
pub struct EnvelopeHandler {
    accepted: Vec<i64>,
    policy: ErrorPolicy,
}

impl Default for EnvelopeHandler {
    fn default() -> Self {
        Self {
            accepted: (200..300).collect(),
            policy: ErrorPolicy::default(),
        }
    }
}

impl EnvelopeHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the accepted codes.
    pub fn with_accepted_codes(mut self, codes: impl IntoIterator<Item = i64>) -> Self {
        self.accepted = codes.into_iter().collect();
        self
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn unwrap_envelope(&self, value: Value) -> Result<Value, ApiError> {
        let Value::Object(mut map) = value else {
            return Ok(value);
        };
        let code = map
            .get("code")
            .and_then(Value::as_i64)
            .or_else(|| map.get("status").and_then(Value::as_i64));
        match code {
            Some(c) if !self.accepted.contains(&c) => {
                let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
                Err(ApiError::Rejected {
                    code: Some(c),
                    title: text("title"),
                    message: text("message").unwrap_or_else(|| format!("rejected with code {c}")),
                    body: Some(Value::Object(map)),
                })
            }
            Some(_) => Ok(map.remove("data").unwrap_or(Value::Null)),
            None => match map.remove("data") {
                Some(data) => Ok(data),
                None => Ok(Value::Object(map)),
            },
        }
    }
}

#[async_trait]
impl ResponseHandler for EnvelopeHandler {
    async fn on_success(&self, body: ResponseBody, _ui: &UiConfig) -> Result<ResponseBody, ApiError> {
        match body {
            ResponseBody::Json(value) => self.unwrap_envelope(value).map(ResponseBody::Json),
            bytes @ ResponseBody::Bytes(_) => Ok(bytes),
        }
    }

    async fn on_error(&self, error: ApiError, ui: &UiConfig) -> Result<(), ApiError> {
        self.policy.apply(error, ui)
    }
}
