//! HTTP request and response values for the in-process dispatch path.
//!
//! # Design
//! These types describe one HTTP exchange as plain data. The codec builds an
//! `HttpRequest` from a proxy event and reads an `HttpResponse` back into a
//! proxy event; no transport ever sees them. All fields are owned so a value
//! can be moved into a handler without lifetime concerns.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::body::FormFields;

/// Attribute key under which the invocation context is stored.
pub const INVOCATION_CONTEXT_KEY: &str = "lambda.context";

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    /// Any other verb, stored exactly as received.
    Other(String),
}

impl HttpMethod {
    /// Parse a verb. Method tokens are case-sensitive, so only the exact
    /// uppercase names map to the named variants. Never fails: anything else
    /// becomes `Other` verbatim and the router reports "no route".
    pub fn parse(verb: &str) -> Self {
        match verb {
            "GET" => Self::Get,
            "HEAD" => Self::Head,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "OPTIONS" => Self::Options,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Other(verb) => verb,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered header multimap.
///
/// Names keep the case they arrived with; lookups compare names
/// case-insensitively. A name may appear several times, once per value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value without touching existing values for the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value whose name matches `name` case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values for `name`, in arrival order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

/// Platform-provided facts about the current invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: String,
}

impl InvocationContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }
}

/// Request-scoped values keyed by name. Values are opaque to the adapter
/// and read back by type.
#[derive(Clone, Default)]
pub struct Attributes {
    values: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Attributes {
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Arc::new(value));
    }

    /// The value under `key`, if present and of type `T`.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_set().entries(keys).finish()
    }
}

/// An inbound HTTP request reconstructed from a proxy event.
///
/// Built by `codec::to_request`; handlers only read it.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Headers,
    /// First `Content-Type` header value, if any.
    pub content_type: Option<String>,
    /// Decoded body text. Empty when the event carried no body.
    pub body: String,
    /// Form fields decoded from a form-urlencoded body.
    pub form: FormFields,
    pub attributes: Attributes,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
            content_type: None,
            body: String::new(),
            form: FormFields::default(),
            attributes: Attributes::default(),
        }
    }

    /// The invocation context attached by the codec.
    pub fn invocation_context(&self) -> Option<&InvocationContext> {
        self.attributes.get(INVOCATION_CONTEXT_KEY)
    }
}

/// An HTTP response produced by a handler.
///
/// Consumed once by `codec::from_response`. `content_type` is written as the
/// `Content-Type` header of the outbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub content_type: Option<String>,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: String::new(),
            content_type: None,
        }
    }
}

impl HttpResponse {
    /// Empty response with the given status.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// 200 response with an HTML body.
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            content_type: Some("text/html".to_string()),
            ..Self::default()
        }
    }

    pub fn internal_server_error() -> Self {
        Self::status(500)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
