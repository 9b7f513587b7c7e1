//! Single-call builder and executor.
//!
//! An [`ApiRunner`] holds one call's fully resolved configuration. Setters
//! consume and return the runner so they can be chained, and [`ApiRunner::run`]
//! consumes it: a runner executes at most once and cannot be changed while its
//! request is in flight.
//!
//! ```rust,ignore
//! let product = service
//!     .get("/products", &json!({ "id": "42" }))
//!     .set_loading(false)
//!     .set_config_headers(HashMap::from([("X-Trace".into(), "t1".into())]))
//!     .run_json::<Product>()
//!     .await?;
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{ApiConfig, BaseConfig};
use crate::error::ApiError;
use crate::execution::busy::BusyGuard;
use crate::execution::http::{
    HttpInterceptor, HttpRequestContext, InterceptedResponse, append_query, merge_header_maps,
    resolve_headers,
};
use crate::types::{Method, PopupConfig, PreparedRequest, ResponseBody, UiConfig};

/// Mutable execution unit for exactly one call.
pub struct ApiRunner {
    base: Arc<BaseConfig>,
    method: Method,
    route: String,
    payload: Option<Value>,
    /// Call headers, names lowercased.
    headers: HashMap<String, String>,
    ui_config: UiConfig,
    downloadable: bool,
    use_interceptor: bool,
    /// Payload serialization failure captured at construction; reported by `run()`.
    payload_error: Option<String>,
}

impl std::fmt::Debug for ApiRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRunner")
            .field("method", &self.method)
            .field("route", &self.route)
            .field("payload", &self.payload)
            .field("headers", &self.headers)
            .field("ui_config", &self.ui_config)
            .field("downloadable", &self.downloadable)
            .field("use_interceptor", &self.use_interceptor)
            .finish_non_exhaustive()
    }
}

impl ApiRunner {
    /// Create a runner for `method`. The UI configuration is taken as given;
    /// the service factory is what applies the family defaults.
    pub fn new(method: Method, base: Arc<BaseConfig>, api: ApiConfig) -> Self {
        let mut headers = HashMap::new();
        merge_header_maps(&mut headers, api.headers);
        Self {
            base,
            method,
            route: api.route,
            payload: api.payload,
            headers,
            ui_config: api.ui_config,
            downloadable: false,
            use_interceptor: false,
            payload_error: None,
        }
    }

    pub(crate) fn with_payload_error(mut self, message: impl Into<String>) -> Self {
        self.payload_error = Some(message.into());
        self
    }

    /// Whether `run()` toggles the busy indicator.
    pub fn set_loading(mut self, loading: bool) -> Self {
        self.ui_config.loading = Some(loading);
        self
    }

    /// Advisory message for the busy state.
    pub fn set_loading_message(mut self, message: impl Into<String>) -> Self {
        self.ui_config.loading_message = Some(message.into());
        self
    }

    /// Shallow-merge popup preferences.
    pub fn set_config_popup(mut self, popup: PopupConfig) -> Self {
        self.ui_config
            .popup_config
            .get_or_insert_with(PopupConfig::default)
            .merge(popup);
        self
    }

    /// Shallow-merge extra headers; they win over construction headers and
    /// family defaults.
    pub fn set_config_headers(mut self, headers: HashMap<String, String>) -> Self {
        merge_header_maps(&mut self.headers, headers);
        self
    }

    /// Opt this call into the family's interceptor, if it defines one.
    pub fn set_use_interceptor(mut self, use_interceptor: bool) -> Self {
        self.use_interceptor = use_interceptor;
        self
    }

    /// Shallow-merge into the whole UI configuration.
    pub fn set_ui_configure(mut self, ui_config: UiConfig) -> Self {
        self.ui_config.merge(ui_config);
        self
    }

    /// Return the raw response bytes instead of a parsed body.
    pub fn set_is_downloadable(mut self, downloadable: bool) -> Self {
        self.downloadable = downloadable;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn ui_config(&self) -> &UiConfig {
        &self.ui_config
    }

    pub fn is_downloadable(&self) -> bool {
        self.downloadable
    }

    pub fn uses_interceptor(&self) -> bool {
        self.use_interceptor
    }

    /// Resolve URL, body and headers without sending anything.
    ///
    /// GET/DELETE payloads go to the query string and the body is empty;
    /// POST/PUT payloads become the JSON body and the URL is left alone.
    pub fn prepare(&self) -> Result<PreparedRequest, ApiError> {
        if let Some(message) = &self.payload_error {
            return Err(ApiError::Serialization(message.clone()));
        }

        let mut url = format!("{}{}", self.base.base_url, self.route);
        let payload = self.payload.as_ref().filter(|p| !p.is_null());
        let body = if self.method.encodes_payload_as_query() {
            if let Some(payload) = payload {
                url = append_query(&url, payload);
            }
            None
        } else {
            payload.cloned()
        };

        let headers = resolve_headers(&self.base.default_headers(), &self.headers)?;

        Ok(PreparedRequest {
            method: self.method,
            url,
            headers,
            body,
        })
    }

    /// Perform the call and apply the family's hooks.
    ///
    /// Resolves to `Ok(Some(value))` with the success hook's output,
    /// `Ok(None)` when the call failed and the error hook swallowed the
    /// failure, or `Err` when the error hook propagated it. If loading is on,
    /// the busy indicator is shown once before sending and hidden once after
    /// the hooks ran, whatever the outcome.
    pub async fn run(self) -> Result<Option<ResponseBody>, ApiError> {
        let prepared = self.prepare();
        let ApiRunner {
            base,
            ui_config,
            downloadable,
            use_interceptor,
            ..
        } = self;

        let _busy = BusyGuard::new(&base.busy, ui_config.is_loading());

        let interceptor = if use_interceptor {
            base.interceptor.clone()
        } else {
            None
        };

        let outcome = match prepared {
            Ok(request) => send(&base, request, downloadable, interceptor.as_ref()).await,
            Err(error) => Err(error),
        };
        let outcome = match outcome {
            Ok(body) => base.handler.on_success(body, &ui_config).await,
            Err(error) => Err(error),
        };

        match outcome {
            Ok(body) => Ok(Some(body)),
            Err(error) => {
                base.handler.on_error(error, &ui_config).await?;
                Ok(None)
            }
        }
    }

    /// [`run`](Self::run), then deserialize the success value into `O`.
    ///
    /// A deserialization failure is returned directly; it does not pass
    /// through the family's error hook.
    pub async fn run_json<O: DeserializeOwned>(self) -> Result<Option<O>, ApiError> {
        self.run()
            .await?
            .map(ResponseBody::deserialize)
            .transpose()
    }
}

async fn send(
    base: &BaseConfig,
    request: PreparedRequest,
    downloadable: bool,
    interceptor: Option<&Arc<dyn HttpInterceptor>>,
) -> Result<ResponseBody, ApiError> {
    let ctx = HttpRequestContext::new(request.method, request.url.clone());
    tracing::debug!(
        target: "apirunner::http",
        request_id = %ctx.request_id,
        method = %request.method,
        url = %request.url,
        has_body = request.body.is_some(),
        downloadable,
        "sending request"
    );

    let notify = |error: ApiError| match interceptor {
        Some(interceptor) => interceptor.on_error(&ctx, error),
        None => error,
    };

    let mut builder = base
        .http_client
        .request(request.method.to_reqwest(), &request.url)
        .timeout(base.timeout)
        .headers(request.headers.clone());
    if let Some(body) = &request.body {
        builder = builder.json(body);
    }
    if let Some(interceptor) = interceptor {
        builder = interceptor
            .on_before_send(&ctx, builder, &request)
            .map_err(notify)?;
    }

    let response = builder
        .send()
        .await
        .map_err(|e| notify(ApiError::from(e)))?;
    let status = response.status();
    let headers = response.headers().clone();
    let raw = response
        .bytes()
        .await
        .map_err(|e| notify(ApiError::from(e)))?;

    if !status.is_success() {
        tracing::debug!(target: "apirunner::http", request_id = %ctx.request_id, status = status.as_u16(), "request failed");
        return Err(notify(ApiError::http(
            status.as_u16(),
            String::from_utf8_lossy(&raw).into_owned(),
        )));
    }

    let body = if downloadable {
        ResponseBody::Bytes(raw)
    } else {
        ResponseBody::from_text(&String::from_utf8_lossy(&raw))
    };
    tracing::debug!(target: "apirunner::http", request_id = %ctx.request_id, status = status.as_u16(), "response received");

    match interceptor {
        Some(interceptor) => {
            let response = InterceptedResponse {
                status: status.as_u16(),
                headers,
                body,
            };
            interceptor
                .on_response(&ctx, response)
                .map(|r| r.body)
                .map_err(notify)
        }
        None => Ok(body),
    }
}
