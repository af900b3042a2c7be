//! The invocation boundary.
//!
//! `ProxyAdapter::handle` is the only function the hosting platform calls.
//! It runs decode, dispatch and encode, and it is the one place where an
//! error becomes a status code. It always returns an event.

use tracing::{error, info, warn};

use crate::codec::{from_response, to_request};
use crate::error::AdapterError;
use crate::event::{ProxyRequestEvent, ProxyResponseEvent};
use crate::http::{HttpResponse, InvocationContext};
use crate::router::Router;

/// Adapter that serves proxy events from an in-process route table.
#[derive(Debug, Clone)]
pub struct ProxyAdapter {
    router: Router,
}

impl ProxyAdapter {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Serve one inbound event.
    ///
    /// Decode failures and handler failures end as a bodiless 500, a miss
    /// in the route table as a bodiless 404. Error details are logged and
    /// never returned.
    pub fn handle(&self, event: ProxyRequestEvent, context: InvocationContext) -> ProxyResponseEvent {
        info!(method = %event.http_method, path = %event.path, "received request");

        match self.try_handle(event, context) {
            Ok(response) => from_response(&response),
            Err(e) => {
                match &e {
                    AdapterError::RouteNotFound { .. } => warn!(error = %e, "no route"),
                    _ => error!(error = %e, "invocation failed"),
                }
                ProxyResponseEvent::status_only(e.status_code())
            }
        }
    }

    fn try_handle(
        &self,
        event: ProxyRequestEvent,
        context: InvocationContext,
    ) -> Result<HttpResponse, AdapterError> {
        let request = to_request(event, context)?;
        Ok(self.router.dispatch(&request)?)
    }
}
