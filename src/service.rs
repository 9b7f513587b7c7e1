//! Per-family API service factory.
//!
//! [`generate_api_service`] turns a [`BaseConfig`] into an [`ApiService`]
//! whose verb methods hand out pre-configured [`ApiRunner`]s.
//!
//! ```rust,ignore
//! let products = generate_api_service(
//!     BaseConfig::builder()
//!         .base_url("https://shop.example.com/api")
//!         .handler(EnvelopeHandler::new())
//!         .build()?,
//! );
//! let created = products.post("/products", &NewProduct { name: "x" }).run().await?;
//! ```

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{ApiConfig, BaseConfig};
use crate::runner::ApiRunner;
use crate::types::Method;

/// Build the entry points of one API family.
pub fn generate_api_service(base: BaseConfig) -> ApiService {
    ApiService::new(base)
}

/// Read/create/update/delete entry points sharing one [`BaseConfig`].
#[derive(Debug, Clone)]
pub struct ApiService {
    base: Arc<BaseConfig>,
}

impl ApiService {
    pub fn new(base: BaseConfig) -> Self {
        Self {
            base: Arc::new(base),
        }
    }

    pub fn base_config(&self) -> &BaseConfig {
        &self.base
    }

    /// GET `route` with `payload` encoded as the query string.
    pub fn get<I: Serialize + ?Sized>(&self, route: &str, payload: &I) -> ApiRunner {
        self.with_payload(Method::Get, route, payload, HashMap::new())
    }

    /// POST `payload` as JSON to `route`.
    pub fn post<I: Serialize + ?Sized>(&self, route: &str, payload: &I) -> ApiRunner {
        self.with_payload(Method::Post, route, payload, HashMap::new())
    }

    /// PUT `payload` as JSON to `route`.
    pub fn put<I: Serialize + ?Sized>(&self, route: &str, payload: &I) -> ApiRunner {
        self.with_payload(Method::Put, route, payload, HashMap::new())
    }

    /// DELETE `route` with `payload` encoded as the query string.
    pub fn delete<I: Serialize + ?Sized>(&self, route: &str, payload: &I) -> ApiRunner {
        self.with_payload(Method::Delete, route, payload, HashMap::new())
    }

    pub fn get_with_headers<I: Serialize + ?Sized>(
        &self,
        route: &str,
        payload: &I,
        headers: HashMap<String, String>,
    ) -> ApiRunner {
        self.with_payload(Method::Get, route, payload, headers)
    }

    pub fn post_with_headers<I: Serialize + ?Sized>(
        &self,
        route: &str,
        payload: &I,
        headers: HashMap<String, String>,
    ) -> ApiRunner {
        self.with_payload(Method::Post, route, payload, headers)
    }

    pub fn put_with_headers<I: Serialize + ?Sized>(
        &self,
        route: &str,
        payload: &I,
        headers: HashMap<String, String>,
    ) -> ApiRunner {
        self.with_payload(Method::Put, route, payload, headers)
    }

    pub fn delete_with_headers<I: Serialize + ?Sized>(
        &self,
        route: &str,
        payload: &I,
        headers: HashMap<String, String>,
    ) -> ApiRunner {
        self.with_payload(Method::Delete, route, payload, headers)
    }

    /// Create a runner from a full call configuration.
    ///
    /// Fields set in `api.ui_config` win over the factory defaults; the
    /// defaults only fill what the caller left unset.
    pub fn fetch(&self, method: Method, mut api: ApiConfig) -> ApiRunner {
        api.ui_config =
            std::mem::take(&mut api.ui_config).or_defaults(crate::defaults::ui::ui_config());
        ApiRunner::new(method, Arc::clone(&self.base), api)
    }

    fn with_payload<I: Serialize + ?Sized>(
        &self,
        method: Method,
        route: &str,
        payload: &I,
        headers: HashMap<String, String>,
    ) -> ApiRunner {
        let api = ApiConfig::new(route).with_headers(headers);
        match serde_json::to_value(payload) {
            Ok(value) => self.fetch(method, api.with_payload_value(value)),
            Err(e) => self.fetch(method, api).with_payload_error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::types::{PopupConfig, PopupSpec, UiConfig};
    use serde_json::json;

    fn service() -> ApiService {
        generate_api_service(
            BaseConfig::builder()
                .base_url("https://shop.example.com/api")
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn verbs_are_fixed_per_entry_point() {
        let s = service();
        assert_eq!(s.get("/p", &()).method(), Method::Get);
        assert_eq!(s.post("/p", &()).method(), Method::Post);
        assert_eq!(s.put("/p", &()).method(), Method::Put);
        assert_eq!(s.delete("/p", &()).method(), Method::Delete);
    }

    #[test]
    fn runners_start_from_default_ui_config() {
        let ui = service().get("/p", &()).ui_config().clone();
        assert_eq!(ui.loading, Some(true));
        assert_eq!(ui.loading_message(), "");
        let popup = ui.popup();
        assert!(popup.shows_error());
        assert!(!popup.shows_success());
    }

    #[test]
    fn caller_ui_config_wins_over_defaults() {
        let api = ApiConfig::new("/p").with_ui_config(
            UiConfig::new()
                .with_loading(false)
                .with_popup_config(PopupConfig::success(PopupSpec::shown(true))),
        );
        let ui = service().fetch(Method::Get, api).ui_config().clone();
        assert_eq!(ui.loading, Some(false));
        assert_eq!(ui.loading_message(), "");
        assert!(ui.popup().shows_success());
    }

    #[test]
    fn examples_from_the_products_api() {
        let s = service();
        let get = s.get("/products", &json!({"id": "42"})).prepare().unwrap();
        assert_eq!(get.url, "https://shop.example.com/api/products?id=42");
        assert!(get.body.is_none());

        let post = s.post("/products", &json!({"name": "x"})).prepare().unwrap();
        assert_eq!(post.url, "https://shop.example.com/api/products");
        assert_eq!(post.body, Some(json!({"name": "x"})));
    }

    #[test]
    fn construction_headers_are_kept() {
        let runner = service().delete_with_headers(
            "/products/1",
            &(),
            HashMap::from([("X-Reason".to_string(), "cleanup".to_string())]),
        );
        assert_eq!(runner.headers().get("x-reason").unwrap(), "cleanup");
    }

    #[test]
    fn unserializable_payload_fails_at_prepare() {
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], "non-string key");
        let runner = service().post("/p", &bad);
        assert!(matches!(runner.prepare(), Err(ApiError::Serialization(_))));
    }
}
