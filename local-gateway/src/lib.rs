//! Local stand-in for the API gateway.
//!
//! # Design
//! Every HTTP request, whatever its method or path, is turned into a proxy
//! event and handed to a `ProxyAdapter`; the outbound event is turned back
//! into an HTTP response. Bodies that are valid UTF-8 travel as text, others
//! are base64-encoded with `isBase64Encoded` set, the way the gateway does
//! for binary payloads. Each request gets a fresh v4 UUID as its invocation
//! request id.

pub mod config;

use std::sync::Arc;

use apigw_core::event::{HeaderValues, ProxyRequestContext};
use apigw_core::{InvocationContext, ProxyAdapter, ProxyRequestEvent, ProxyResponseEvent};
use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{request::Parts, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::net::TcpListener;
use tracing::{error, warn};
use uuid::Uuid;

pub use config::{ConfigError, GatewayConfig};

/// Largest request body forwarded to the adapter.
pub const MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

/// Stage name reported in `requestContext`.
const STAGE: &str = "local";

pub fn app(adapter: Arc<ProxyAdapter>) -> Router {
    Router::new().fallback(forward).with_state(adapter)
}

pub async fn run(listener: TcpListener, adapter: Arc<ProxyAdapter>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(adapter)).await
}

async fn forward(State(adapter): State<Arc<ProxyAdapter>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "request body rejected");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let request_id = Uuid::new_v4().to_string();
    let event = to_event(&parts, &bytes, &request_id);
    let context = InvocationContext::new(request_id);

    // Collaborators are synchronous and may block.
    match tokio::task::spawn_blocking(move || adapter.handle(event, context)).await {
        Ok(out) => to_response(out),
        Err(e) => {
            error!(error = %e, "adapter task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Build the proxy event the gateway would send for this request.
pub fn to_event(parts: &Parts, body: &Bytes, request_id: &str) -> ProxyRequestEvent {
    let mut event = ProxyRequestEvent::new(parts.method.as_str(), parts.uri.path());

    for name in parts.headers.keys() {
        let values: Vec<String> = parts
            .headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        if let Some(last) = values.last() {
            event
                .headers
                .push((name.as_str().to_string(), HeaderValues::One(last.clone())));
            event
                .multi_value_headers
                .push((name.as_str().to_string(), HeaderValues::Many(values)));
        }
    }

    if !body.is_empty() {
        match std::str::from_utf8(body) {
            Ok(text) => event.body = Some(text.to_string()),
            Err(_) => {
                event.body = Some(STANDARD.encode(body));
                event.is_base64_encoded = true;
            }
        }
    }

    event.request_context = Some(ProxyRequestContext {
        request_id: Some(request_id.to_string()),
        stage: Some(STAGE.to_string()),
    });
    event
}

/// Turn an outbound proxy event into an HTTP response.
pub fn to_response(out: ProxyResponseEvent) -> Response {
    let status = StatusCode::from_u16(out.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let body = if out.is_base64_encoded {
        match STANDARD.decode(&out.body) {
            Ok(bytes) => Body::from(bytes),
            Err(e) => {
                error!(error = %e, "adapter returned invalid base64 body");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }
    } else {
        Body::from(out.body)
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    for (name, value) in &out.headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => warn!(header = %name, "dropping invalid response header"),
        }
    }
    response
}
