//! Family and call configuration.
//!
//! [`BaseConfig`] is built once per API family and shared by every runner of
//! that family; [`ApiConfig`] describes a single call.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ApiError;
use crate::execution::busy::{BusyIndicator, NoopIndicator};
use crate::execution::http::{HttpInterceptor, merge_header_maps};
use crate::handlers::{PassthroughHandler, ResponseHandler};
use crate::types::UiConfig;

/// Supplies the family's default headers. Called once per `run()`, so it may
/// read state that changes over time (e.g. a token store).
pub type HeaderSupplier = Arc<dyn Fn() -> HashMap<String, String> + Send + Sync>;

/// Shared policy for one API family.
#[derive(Clone)]
pub struct BaseConfig {
    pub(crate) base_url: String,
    pub(crate) default_headers: HeaderSupplier,
    pub(crate) handler: Arc<dyn ResponseHandler>,
    pub(crate) interceptor: Option<Arc<dyn HttpInterceptor>>,
    pub(crate) busy: Arc<dyn BusyIndicator>,
    pub(crate) timeout: Duration,
    pub(crate) http_client: reqwest::Client,
}

impl BaseConfig {
    /// Returns a builder for constructing `BaseConfig`
    pub fn builder() -> BaseConfigBuilder {
        BaseConfigBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Evaluate the default-header supplier.
    pub fn default_headers(&self) -> HashMap<String, String> {
        (self.default_headers)()
    }

    pub fn handler(&self) -> &Arc<dyn ResponseHandler> {
        &self.handler
    }

    pub fn interceptor(&self) -> Option<&Arc<dyn HttpInterceptor>> {
        self.interceptor.as_ref()
    }

    pub fn busy_indicator(&self) -> &Arc<dyn BusyIndicator> {
        &self.busy
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }
}

impl fmt::Debug for BaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseConfig")
            .field("base_url", &self.base_url)
            .field("has_interceptor", &self.interceptor.is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for `BaseConfig`
#[derive(Default)]
pub struct BaseConfigBuilder {
    base_url: Option<String>,
    default_headers: Option<HeaderSupplier>,
    static_headers: HashMap<String, String>,
    handler: Option<Arc<dyn ResponseHandler>>,
    interceptor: Option<Arc<dyn HttpInterceptor>>,
    busy: Option<Arc<dyn BusyIndicator>>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl BaseConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Replace the default-header supplier. Without one, families send JSON
    /// `Accept` and `Content-Type` headers.
    pub fn default_headers<F>(mut self, supplier: F) -> Self
    where
        F: Fn() -> HashMap<String, String> + Send + Sync + 'static,
    {
        self.default_headers = Some(Arc::new(supplier));
        self
    }

    /// Add a fixed default header, applied on top of the supplier's output.
    /// Once any fixed header is set, default header names come out lowercased.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.static_headers.insert(name.into(), value.into());
        self
    }

    pub fn handler<H: ResponseHandler + 'static>(mut self, handler: H) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn handler_arc(mut self, handler: Arc<dyn ResponseHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn interceptor<I: HttpInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptor = Some(Arc::new(interceptor));
        self
    }

    pub fn interceptor_arc(mut self, interceptor: Arc<dyn HttpInterceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn busy_indicator<B: BusyIndicator + 'static>(mut self, busy: B) -> Self {
        self.busy = Some(Arc::new(busy));
        self
    }

    pub fn busy_indicator_arc(mut self, busy: Arc<dyn BusyIndicator>) -> Self {
        self.busy = Some(busy);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<BaseConfig, ApiError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::Configuration("base_url is required".to_string()))?;
        reqwest::Url::parse(&base_url).map_err(|e| {
            ApiError::Configuration(format!("Invalid base_url '{base_url}': {e}"))
        })?;

        let supplier: HeaderSupplier = match self.default_headers {
            Some(supplier) => supplier,
            None => Arc::new(json_headers),
        };
        let static_headers = self.static_headers;
        let default_headers: HeaderSupplier = if static_headers.is_empty() {
            supplier
        } else {
            Arc::new(move || {
                let mut headers = HashMap::new();
                merge_header_maps(&mut headers, supplier());
                merge_header_maps(&mut headers, static_headers.clone());
                headers
            })
        };

        let http_client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .user_agent(crate::defaults::http::USER_AGENT)
                .build()
                .map_err(|e| {
                    ApiError::Configuration(format!("Failed to build HTTP client: {e}"))
                })?,
        };

        let handler: Arc<dyn ResponseHandler> = match self.handler {
            Some(handler) => handler,
            None => Arc::new(PassthroughHandler::default()),
        };
        let busy: Arc<dyn BusyIndicator> = match self.busy {
            Some(busy) => busy,
            None => Arc::new(NoopIndicator),
        };

        Ok(BaseConfig {
            base_url,
            default_headers,
            handler,
            interceptor: self.interceptor,
            busy,
            timeout: self.timeout.unwrap_or(crate::defaults::http::REQUEST_TIMEOUT),
            http_client,
        })
    }
}

fn json_headers() -> HashMap<String, String> {
    HashMap::from([
        ("Accept".to_string(), crate::defaults::http::ACCEPT.to_string()),
        (
            "Content-Type".to_string(),
            crate::defaults::http::CONTENT_TYPE.to_string(),
        ),
    ])
}

/// One call's intent.
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    /// Endpoint only, e.g. `/v1/auth/login`.
    pub route: String,
    /// Query payload for GET/DELETE, JSON body for POST/PUT.
    pub payload: Option<serde_json::Value>,
    pub headers: HashMap<String, String>,
    pub ui_config: UiConfig,
}

impl ApiConfig {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            ..Default::default()
        }
    }

    pub fn with_payload<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, ApiError> {
        self.payload = Some(
            serde_json::to_value(payload).map_err(|e| ApiError::Serialization(e.to_string()))?,
        );
        Ok(self)
    }

    pub fn with_payload_value(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_ui_config(mut self, ui_config: UiConfig) -> Self {
        self.ui_config = ui_config;
        self
    }
}

/// Serializable subset of a family configuration, e.g. loaded from a file or
/// the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSettings {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ServiceSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: None,
            headers: HashMap::new(),
        }
    }

    /// Read settings from `APIRUNNER_BASE_URL` and `APIRUNNER_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var(crate::defaults::env::BASE_URL).map_err(|_| {
            ApiError::Configuration(format!(
                "{} is not set",
                crate::defaults::env::BASE_URL
            ))
        })?;
        let timeout_ms = match std::env::var(crate::defaults::env::TIMEOUT_MS) {
            Ok(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                ApiError::Configuration(format!(
                    "Invalid {} '{raw}': {e}",
                    crate::defaults::env::TIMEOUT_MS
                ))
            })?),
            Err(_) => None,
        };
        Ok(Self {
            base_url,
            timeout_ms,
            headers: HashMap::new(),
        })
    }

    /// Seed a [`BaseConfigBuilder`] with these settings.
    pub fn into_builder(self) -> BaseConfigBuilder {
        let mut builder = BaseConfig::builder().base_url(self.base_url);
        if let Some(ms) = self.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        for (name, value) in self.headers {
            builder = builder.default_header(name, value);
        }
        builder
    }
}
