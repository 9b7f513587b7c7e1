//! Family-level behavior: response hooks, interceptors and the busy indicator.

mod support;

use apirunner::{
    ApiError, BaseConfig, BusyIndicator, CountingIndicator, EnvelopeHandler, ErrorPolicy,
    HttpInterceptor, HttpRequestContext, InterceptedResponse, PassthroughHandler, PopupConfig,
    PopupSpec, PreparedRequest, ResponseBody, ResponseHandler, UiConfig, generate_api_service,
};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Adds a header before send and counts failures it observed.
#[derive(Default)]
struct TaggingInterceptor {
    errors: AtomicUsize,
}

impl HttpInterceptor for TaggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
        _request: &PreparedRequest,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        Ok(builder
            .header("x-intercepted", "yes")
            .header("x-request-id", ctx.request_id.as_str()))
    }

    fn on_response(
        &self,
        _ctx: &HttpRequestContext,
        response: InterceptedResponse,
    ) -> Result<InterceptedResponse, ApiError> {
        if response.headers.contains_key("x-maintenance") {
            return Err(ApiError::Interceptor("backend in maintenance".into()));
        }
        Ok(response)
    }

    fn on_error(&self, _ctx: &HttpRequestContext, error: ApiError) -> ApiError {
        self.errors.fetch_add(1, Ordering::SeqCst);
        error
    }
}

/// Records what reached the family's hooks.
#[derive(Default)]
struct AuditHandler {
    successes: Mutex<Vec<ResponseBody>>,
    failures: Mutex<Vec<(String, bool)>>,
}

#[async_trait]
impl ResponseHandler for AuditHandler {
    async fn on_success(&self, body: ResponseBody, _ui: &UiConfig) -> Result<ResponseBody, ApiError> {
        self.successes.lock().unwrap().push(body.clone());
        Ok(body)
    }

    async fn on_error(&self, error: ApiError, ui: &UiConfig) -> Result<(), ApiError> {
        self.failures
            .lock()
            .unwrap()
            .push((error.to_string(), ui.popup().shows_error()));
        Err(error)
    }
}

#[tokio::test]
async fn interceptor_runs_only_when_call_opts_in() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(header("x-intercepted", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("tagged")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(|req: &Request| !req.headers.contains_key("x-intercepted"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("plain")))
        .expect(1)
        .mount(&server)
        .await;

    let (builder, _) = support::family(&server.uri());
    let items = generate_api_service(
        builder
            .interceptor(TaggingInterceptor::default())
            .build()
            .unwrap(),
    );

    let plain = items.get("/items", &()).run().await.unwrap();
    let tagged = items
        .get("/items", &())
        .set_use_interceptor(true)
        .run()
        .await
        .unwrap();

    assert_eq!(plain, Some(ResponseBody::Json(json!("plain"))));
    assert_eq!(tagged, Some(ResponseBody::Json(json!("tagged"))));
}

#[tokio::test]
async fn interceptor_rejection_reaches_error_hook() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-maintenance", "1")
                .set_body_json(json!({"id": 1})),
        )
        .mount(&server)
        .await;

    let interceptor = Arc::new(TaggingInterceptor::default());
    let handler = Arc::new(AuditHandler::default());
    let (builder, busy) = support::family(&server.uri());
    let items = generate_api_service(
        builder
            .interceptor_arc(interceptor.clone())
            .handler_arc(handler.clone())
            .build()
            .unwrap(),
    );

    let err = items
        .get("/items", &())
        .set_use_interceptor(true)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Interceptor(_)));
    assert!(handler.successes.lock().unwrap().is_empty());
    assert_eq!(
        *handler.failures.lock().unwrap(),
        vec![("Interceptor error: backend in maintenance".to_string(), true)]
    );
    assert_eq!(interceptor.errors.load(Ordering::SeqCst), 1);
    assert_eq!(busy.events(), vec!["show", "hide"]);
}

#[tokio::test]
async fn error_hook_sees_call_ui_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let handler = Arc::new(AuditHandler::default());
    let (builder, _) = support::family(&server.uri());
    let orders = generate_api_service(builder.handler_arc(handler.clone()).build().unwrap());

    let err = orders
        .post("/orders", &json!({"qty": 1}))
        .set_config_popup(PopupConfig::error(PopupSpec::shown(false)))
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    let failures = handler.failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert!(!failures[0].1);
}

#[tokio::test]
async fn swallowing_family_resolves_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (builder, busy) = support::family(&server.uri());
    let service = generate_api_service(
        builder
            .handler(PassthroughHandler::swallowing())
            .build()
            .unwrap(),
    );

    let out = service.get("/flaky", &()).run().await.unwrap();
    assert!(out.is_none());
    assert_eq!(busy.events(), vec!["show", "hide"]);
}

#[tokio::test]
async fn envelope_family_unwraps_and_rejects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dummy/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200, "code": 200, "message": "ok", "title": "", "data": {"id": 1}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dummy/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200, "code": 4004, "message": "not yours", "title": "Denied", "data": null
        })))
        .mount(&server)
        .await;

    let (builder, _) = support::family(&server.uri());
    let dummy = generate_api_service(builder.handler(EnvelopeHandler::new()).build().unwrap());

    let ok = dummy.get("/dummy/1", &()).run().await.unwrap();
    assert_eq!(ok, Some(ResponseBody::Json(json!({"id": 1}))));

    let err = dummy.get("/dummy/2", &()).run().await.unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(err.to_string(), "Rejected (4004): not yours");

    let lenient = generate_api_service(
        BaseConfig::builder()
            .base_url(format!("{}/api", server.uri()))
            .handler(EnvelopeHandler::new().with_policy(ErrorPolicy::Swallow))
            .build()
            .unwrap(),
    );
    assert!(lenient.get("/dummy/2", &()).run().await.unwrap().is_none());
}

#[derive(Default)]
struct Probe {
    shown: AtomicUsize,
    hidden: AtomicUsize,
}

impl BusyIndicator for Probe {
    fn show(&self) {
        self.shown.fetch_add(1, Ordering::SeqCst);
    }

    fn hide(&self) {
        self.hidden.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn counting_indicator_spans_overlapping_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/fast"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(20)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
        .mount(&server)
        .await;

    let probe = Arc::new(Probe::default());
    let counting = Arc::new(CountingIndicator::new(probe.clone()));
    let service = generate_api_service(
        BaseConfig::builder()
            .base_url(format!("{}/api", server.uri()))
            .busy_indicator_arc(counting.clone())
            .build()
            .unwrap(),
    );

    let slow = tokio::spawn(service.get("/slow", &()).run());
    tokio::time::sleep(Duration::from_millis(5)).await;
    service.get("/fast", &()).run().await.unwrap();

    assert_eq!(counting.in_flight(), 1);
    assert_eq!(probe.hidden.load(Ordering::SeqCst), 0);

    slow.await.unwrap().unwrap();
    assert_eq!(counting.in_flight(), 0);
    assert_eq!(probe.shown.load(Ordering::SeqCst), 1);
    assert_eq!(probe.hidden.load(Ordering::SeqCst), 1);
}

#[derive(Debug, thiserror::Error)]
#[error("session expired")]
struct SessionExpired;

/// Turns 401 responses into a family-specific error.
struct SessionInterceptor;

impl HttpInterceptor for SessionInterceptor {
    fn on_error(&self, _ctx: &HttpRequestContext, error: ApiError) -> ApiError {
        match error.status_code() {
            Some(401) => ApiError::custom(SessionExpired),
            _ => error,
        }
    }
}

#[tokio::test]
async fn interceptor_maps_errors_before_error_hook() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/account"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;

    let handler = Arc::new(AuditHandler::default());
    let (builder, _) = support::family(&server.uri());
    let account = generate_api_service(
        builder
            .interceptor(SessionInterceptor)
            .handler_arc(handler.clone())
            .build()
            .unwrap(),
    );

    let mapped = account
        .get("/account", &())
        .set_use_interceptor(true)
        .run()
        .await
        .unwrap_err();
    assert!(mapped.downcast_custom::<SessionExpired>().is_some());

    let raw = account.get("/account", &()).run().await.unwrap_err();
    assert_eq!(raw.status_code(), Some(401));

    let failures = handler.failures.lock().unwrap();
    assert_eq!(failures[0].0, "session expired");
    assert_eq!(failures[1].0, "HTTP 401: token expired");
}
