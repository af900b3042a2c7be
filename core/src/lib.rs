//! In-process adapter between API-gateway proxy events and plain HTTP values.
//!
//! # Overview
//! Turns an inbound proxy event into an `HttpRequest`, routes it to a
//! handler, and turns the handler's `HttpResponse` back into an outbound
//! proxy event. No socket, listener or transport is involved: the hosting
//! platform delivers the event and receives the result.
//!
//! # Design
//! - `HttpRequest` / `HttpResponse` are owned value types built once per
//!   invocation and never shared.
//! - `Router` is an ordered, immutable route table; the first route whose
//!   method, path and content-type predicate match wins.
//! - `ProxyAdapter::handle` is the single boundary that maps every
//!   `AdapterError` kind to a fixed status code. Nothing below it produces an
//!   error response on its own.

pub mod adapter;
pub mod body;
pub mod codec;
pub mod error;
pub mod event;
pub mod http;
pub mod router;

pub use adapter::ProxyAdapter;
pub use body::{decode_base64, is_form_urlencoded, parse_form_body, FormFields, FORM_URLENCODED};
pub use codec::{from_response, to_request, try_from_response};
pub use error::{AdapterError, DecodeError, DispatchError, HandlerError, SerializationError};
pub use event::{ProxyRequestEvent, ProxyResponseEvent};
pub use crate::http::{
    Attributes, Headers, HttpMethod, HttpRequest, HttpResponse, InvocationContext, INVOCATION_CONTEXT_KEY,
};
pub use router::{Handler, Route, Router};
