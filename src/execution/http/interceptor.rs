//! HTTP Interceptor interfaces
//!
//! A family may define one interceptor; a call only runs it when it opted in
//! with `set_use_interceptor(true)`. Interceptors can tweak the request
//! builder before send, rewrite or reject successful responses, and are
//! notified of failures.

use crate::error::ApiError;
use crate::types::{Method, PreparedRequest, ResponseBody};
use reqwest::header::HeaderMap;

/// Context passed to interceptors describing the request.
#[derive(Clone, Debug)]
pub struct HttpRequestContext {
    pub request_id: String,
    pub method: Method,
    pub url: String,
}

impl HttpRequestContext {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            request_id: generate_request_id(),
            method,
            url: url.into(),
        }
    }
}

/// Generate a unique id used to correlate interceptor callbacks and logs.
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A received 2xx response, after the body has been read.
#[derive(Debug, Clone)]
pub struct InterceptedResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

/// HTTP interceptor trait
pub trait HttpInterceptor: Send + Sync {
    /// Called before sending a request. Interceptors may add headers or modify
    /// attributes on the request builder. Return the (possibly modified)
    /// builder or an error to short-circuit the request.
    fn on_before_send(
        &self,
        _ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
        _request: &PreparedRequest,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        Ok(builder)
    }

    /// Called after a successful response is received and its body read.
    /// Return the (possibly rewritten) response, or an error to reject it.
    fn on_response(
        &self,
        _ctx: &HttpRequestContext,
        response: InterceptedResponse,
    ) -> Result<InterceptedResponse, ApiError> {
        Ok(response)
    }

    /// Called when the request fails to send, returns a non-2xx status, or
    /// is rejected by this interceptor. The returned error is what the
    /// family's error hook receives.
    fn on_error(&self, _ctx: &HttpRequestContext, error: ApiError) -> ApiError {
        error
    }
}

/// A simple logging interceptor backed by `tracing` (no sensitive data).
#[derive(Clone, Debug, Default)]
pub struct LoggingInterceptor;

impl HttpInterceptor for LoggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
        request: &PreparedRequest,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        tracing::debug!(target: "apirunner::http", request_id=%ctx.request_id, method=%ctx.method, url=%ctx.url, has_body=%request.body.is_some(), "sending request");
        Ok(builder)
    }

    fn on_response(
        &self,
        ctx: &HttpRequestContext,
        response: InterceptedResponse,
    ) -> Result<InterceptedResponse, ApiError> {
        tracing::debug!(target: "apirunner::http", request_id=%ctx.request_id, url=%ctx.url, status=%response.status, "response received");
        Ok(response)
    }

    fn on_error(&self, ctx: &HttpRequestContext, error: ApiError) -> ApiError {
        tracing::debug!(target: "apirunner::http", request_id=%ctx.request_id, url=%ctx.url, err=%error, "request error");
        error
    }
}
