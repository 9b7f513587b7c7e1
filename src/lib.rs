//! # apirunner
//!
//! Chainable HTTP call builder plus a factory that stamps out per-family API
//! services.
//!
//! A family (one backend, one set of conventions) is described once by a
//! [`BaseConfig`]: base URL, default headers, success/error hooks, an optional
//! interceptor and a busy indicator. [`generate_api_service`] turns it into an
//! [`ApiService`] whose `get`/`post`/`put`/`delete` methods return
//! [`ApiRunner`]s. A runner is adjusted with chained setters and executed once
//! with [`ApiRunner::run`].
//!
//! ```rust,ignore
//! use apirunner::{BaseConfig, EnvelopeHandler, generate_api_service};
//! use serde_json::json;
//!
//! let products = generate_api_service(
//!     BaseConfig::builder()
//!         .base_url("https://shop.example.com/api")
//!         .handler(EnvelopeHandler::new())
//!         .build()?,
//! );
//!
//! let product = products
//!     .get("/products", &json!({ "id": "42" }))
//!     .set_loading(false)
//!     .run()
//!     .await?;
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod defaults;
pub mod error;
pub mod execution;
pub mod handlers;
pub mod runner;
pub mod service;
pub mod telemetry;
pub mod types;

pub use config::{ApiConfig, BaseConfig, BaseConfigBuilder, HeaderSupplier, ServiceSettings};
pub use error::{ApiError, ErrorCategory};
pub use execution::busy::{BusyIndicator, CountingIndicator, NoopIndicator};
pub use execution::http::{
    HttpInterceptor, HttpRequestContext, InterceptedResponse, LoggingInterceptor,
};
pub use handlers::{EnvelopeHandler, ErrorPolicy, PassthroughHandler, ResponseHandler};
pub use runner::ApiRunner;
pub use service::{ApiService, generate_api_service};
pub use types::{Method, PopupButton, PopupConfig, PopupSpec, PreparedRequest, ResponseBody, UiConfig};
