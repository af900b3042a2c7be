//! Conversion between proxy events and HTTP values.
//!
//! # Design
//! `to_request` is fallible and returns its `DecodeError` to the caller so
//! the adapter boundary picks the status. `from_response` is not: a response
//! that cannot be expressed as an outbound event is logged and replaced by a
//! bodiless 500, so serialization never fails an invocation on its own.

use ::http::{HeaderName, HeaderValue, StatusCode};
use tracing::error;

use crate::body::{decode_base64, is_form_urlencoded, parse_form_body, FormFields};
use crate::error::{DecodeError, SerializationError};
use crate::event::{ProxyRequestEvent, ProxyResponseEvent};
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse, InvocationContext, INVOCATION_CONTEXT_KEY};

/// Build an `HttpRequest` from an inbound event.
///
/// Multi-value headers are copied first; single-value headers fill in any
/// name the multi-value map did not carry. The effective content type is the
/// first header named `Content-Type` in any case. The invocation context is
/// attached under `INVOCATION_CONTEXT_KEY`; when it has no request id the
/// gateway's `requestContext.requestId` is used instead.
pub fn to_request(
    event: ProxyRequestEvent,
    mut context: InvocationContext,
) -> Result<HttpRequest, DecodeError> {
    let headers = merge_headers(event.multi_value_headers, event.headers);
    let content_type = headers.get("content-type").map(str::to_string);

    let (body, form) = match event.body {
        Some(raw) => {
            let body = decode_base64(&raw, event.is_base64_encoded)?;
            let form = match content_type.as_deref() {
                Some(ct) if is_form_urlencoded(ct) => parse_form_body(&body)?,
                _ => FormFields::default(),
            };
            (body, form)
        }
        None => (String::new(), FormFields::default()),
    };

    if context.request_id.is_empty() {
        if let Some(id) = event.request_context.and_then(|rc| rc.request_id) {
            context.request_id = id;
        }
    }

    let mut request = HttpRequest::new(HttpMethod::parse(&event.http_method), event.path);
    request.headers = headers;
    request.content_type = content_type;
    request.body = body;
    request.form = form;
    request.attributes.insert(INVOCATION_CONTEXT_KEY, context);
    Ok(request)
}

fn merge_headers(
    multi: Vec<(String, crate::event::HeaderValues)>,
    single: Vec<(String, crate::event::HeaderValues)>,
) -> Headers {
    let mut headers = Headers::new();
    for (name, values) in multi {
        for value in values.into_vec() {
            headers.append(name.clone(), value);
        }
    }
    for (name, values) in single {
        if headers.contains(&name) {
            continue;
        }
        for value in values.into_vec() {
            headers.append(name.clone(), value);
        }
    }
    headers
}

/// Build the outbound event for `response`.
///
/// Never fails: a response with an invalid status or header becomes a
/// bodiless 500 and the reason is logged. The same response always yields
/// the same event.
pub fn from_response(response: &HttpResponse) -> ProxyResponseEvent {
    match try_from_response(response) {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "failed to serialize response");
            ProxyResponseEvent::status_only(500)
        }
    }
}

/// Fallible half of `from_response`.
pub fn try_from_response(response: &HttpResponse) -> Result<ProxyResponseEvent, SerializationError> {
    StatusCode::from_u16(response.status)
        .map_err(|_| SerializationError::InvalidStatus(response.status))?;

    let mut event = ProxyResponseEvent::status_only(response.status);
    let content_type = response
        .content_type
        .as_ref()
        .map(|ct| ("Content-Type".to_string(), ct.clone()));

    for (name, value) in content_type.iter().chain(response.headers.iter()) {
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| SerializationError::InvalidHeaderName(name.clone()))?;
        HeaderValue::from_str(value)
            .map_err(|_| SerializationError::InvalidHeaderValue(name.clone()))?;

        // Last write wins; names differing only in case are the same header.
        event.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        event.headers.insert(name.clone(), value.clone());
    }

    event.body = response.body.clone();
    event.is_base64_encoded = false;
    Ok(event)
}
