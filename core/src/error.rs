//! Error types for the proxy adapter.
//!
//! # Design
//! Every fallible step returns its own error type. They all converge into
//! `AdapterError`, and `AdapterError::status_code` is the only place that
//! decides which status an invocation ends with. Messages are logged; none
//! of them ever reach a response body.

use thiserror::Error;

/// Boxed cause carried by handler failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The inbound body could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64 body: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("malformed form body: {0}")]
    Form(String),
}

/// A handler failed while producing a response.
#[derive(Debug, Error)]
#[error("handler failed: {source}")]
pub struct HandlerError {
    #[source]
    source: BoxError,
}

impl HandlerError {
    pub fn new<E>(cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            source: cause.into(),
        }
    }

    /// A handler that panicked. The payload is kept as the message when it
    /// is a string.
    pub fn panicked(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::new(format!("handler panicked: {message}"))
    }

    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }
}

/// Outcome of routing a request that did not produce a response.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no route for {method} {path}")]
    NotFound { method: String, path: String },

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// A response could not be turned into an outbound event.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("invalid status code {0}")]
    InvalidStatus(u16),

    #[error("invalid header name {0:?}")]
    InvalidHeaderName(String),

    #[error("invalid value for header {0:?}")]
    InvalidHeaderValue(String),
}

/// Everything that can end an invocation without a handler response.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("no route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    #[error(transparent)]
    Handler(HandlerError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

impl AdapterError {
    /// Status code reported to the caller for this error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::RouteNotFound { .. } => 404,
            Self::Decode(_) | Self::Handler(_) | Self::Serialization(_) => 500,
        }
    }
}

impl From<DispatchError> for AdapterError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::NotFound { method, path } => Self::RouteNotFound { method, path },
            DispatchError::Handler(e) => Self::Handler(e),
        }
    }
}
