//! Ordered route table and synchronous dispatch.
//!
//! # Design
//! - Routes are matched by exact method and exact path; an optional
//!   content-type predicate narrows a route to one media type.
//! - Lookup is a linear scan in registration order. The first route that
//!   satisfies every predicate wins, even when a later one also would.
//! - The table is immutable once built and shared read-only between
//!   invocations.
//! - `dispatch` never builds an error response. It reports `NotFound` or
//!   `Handler` and leaves the status code to the adapter.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::body::media_type_matches;
use crate::error::{DispatchError, HandlerError};
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse};

/// Request handler bound to a route.
pub trait Handler: Send + Sync {
    fn call(&self, request: &HttpRequest) -> Result<HttpResponse, HandlerError>;
}

impl<F> Handler for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, HandlerError> + Send + Sync,
{
    fn call(&self, request: &HttpRequest) -> Result<HttpResponse, HandlerError> {
        self(request)
    }
}

/// One entry of the route table.
#[derive(Clone)]
pub struct Route {
    method: HttpMethod,
    path: String,
    content_type: Option<String>,
    handler: Arc<dyn Handler>,
}

impl Route {
    pub fn new(method: HttpMethod, path: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self {
            method,
            path: path.into(),
            content_type: None,
            handler: Arc::new(handler),
        }
    }

    pub fn get(path: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self::new(HttpMethod::Get, path, handler)
    }

    pub fn post(path: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self::new(HttpMethod::Post, path, handler)
    }

    /// Only match requests whose content type has this media type.
    pub fn content_type(mut self, media_type: impl Into<String>) -> Self {
        self.content_type = Some(media_type.into());
        self
    }

    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn matches(&self, method: &HttpMethod, path: &str, headers: &Headers) -> bool {
        if self.method != *method || self.path != path {
            return false;
        }
        match &self.content_type {
            None => true,
            Some(expected) => headers
                .get("content-type")
                .is_some_and(|actual| media_type_matches(actual, expected)),
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Immutable, ordered list of routes.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Earlier routes take precedence.
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// First route matching `method`, `path` and the content type found in
    /// `headers`.
    pub fn find(&self, method: &HttpMethod, path: &str, headers: &Headers) -> Option<&Route> {
        self.routes
            .iter()
            .find(|route| route.matches(method, path, headers))
    }

    /// Run the handler of the first matching route.
    ///
    /// A handler that panics is reported the same way as one that returns an
    /// error.
    pub fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse, DispatchError> {
        let route = self
            .find(&request.method, &request.path, &request.headers)
            .ok_or_else(|| DispatchError::NotFound {
                method: request.method.to_string(),
                path: request.path.clone(),
            })?;

        match catch_unwind(AssertUnwindSafe(|| route.handler.call(request))) {
            Ok(result) => result.map_err(DispatchError::Handler),
            Err(payload) => Err(DispatchError::Handler(HandlerError::panicked(payload.as_ref()))),
        }
    }
}
