//! Verify whole invocations against JSON test vectors stored in `test-vectors/`.
//!
//! Each case holds an inbound proxy event and the outbound event the adapter
//! must produce. Outbound events are compared as parsed JSON so field order
//! in the vector file does not matter.

use apigw_core::{
    HandlerError, HttpRequest, HttpResponse, InvocationContext, ProxyAdapter, ProxyRequestEvent,
    Route, Router, FORM_URLENCODED,
};

fn text(body: impl Into<String>) -> HttpResponse {
    HttpResponse {
        body: body.into(),
        content_type: Some("text/plain".to_string()),
        ..HttpResponse::default()
    }
}

fn list_books(_: &HttpRequest) -> Result<HttpResponse, HandlerError> {
    Ok(text("list"))
}

/// Render form fields as `name=v1,v2;name2=v3` in name order.
fn echo_form(req: &HttpRequest) -> Result<HttpResponse, HandlerError> {
    let rendered: Vec<String> = req
        .form
        .iter()
        .map(|(name, values)| format!("{name}={}", values.join(",")))
        .collect();
    Ok(text(rendered.join(";")))
}

fn echo_body(req: &HttpRequest) -> Result<HttpResponse, HandlerError> {
    Ok(text(req.body.clone()))
}

fn fail(_: &HttpRequest) -> Result<HttpResponse, HandlerError> {
    Err(HandlerError::new("simulated collaborator failure"))
}

fn adapter() -> ProxyAdapter {
    ProxyAdapter::new(
        Router::new()
            .route(Route::get("/books", list_books))
            .route(Route::post("/books", echo_form).content_type(FORM_URLENCODED))
            .route(Route::get("/fail", fail))
            .route(Route::new(apigw_core::HttpMethod::Put, "/echo", echo_body)),
    )
}

#[test]
fn event_test_vectors() {
    let raw = include_str!("../../test-vectors/events.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let adapter = adapter();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let event: ProxyRequestEvent = serde_json::from_value(case["event"].clone())
            .unwrap_or_else(|e| panic!("{name}: bad event: {e}"));

        let out = adapter.handle(event, InvocationContext::new(format!("vector-{name}")));
        let actual = serde_json::to_value(&out).unwrap();
        assert_eq!(actual, case["expected_response"], "{name}: outbound event");
    }
}

#[test]
fn event_vectors_are_deterministic() {
    let raw = include_str!("../../test-vectors/events.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let adapter = adapter();
    for case in vectors["cases"].as_array().unwrap() {
        let event: ProxyRequestEvent = serde_json::from_value(case["event"].clone()).unwrap();
        let first = serde_json::to_string(&adapter.handle(event.clone(), InvocationContext::new("a"))).unwrap();
        let second = serde_json::to_string(&adapter.handle(event, InvocationContext::new("a"))).unwrap();
        assert_eq!(first, second, "{}", case["name"]);
    }
}
