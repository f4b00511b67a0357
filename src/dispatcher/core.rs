//! Dispatcher core module - per-request hot path.
//!
//! Lookup, context build, handler invocation and error translation all happen
//! synchronously on the calling coroutine. Nothing here blocks on I/O.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]

use crate::context::{RequestBody, RequestContext};
use crate::errors::{DispatchError, HandlerError};
use crate::ids::RequestId;
use crate::router::{Resolution, RouteTable};
use http::Method;
use serde_json::Value;
use smallvec::SmallVec;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Maximum inline response headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 4;

/// Response header storage (lowercase names)
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// What a handler returns.
pub type HandlerResult = Result<HandlerResponse, HandlerError>;

/// The single capability a handler has: turn a request context into a response or
/// an error.
///
/// Closures and plain functions with the signature
/// `Fn(&RequestContext) -> HandlerResult` implement it through the blanket impl.
pub trait Handler: Send + Sync {
    /// Handle one request
    fn call(&self, req: &RequestContext) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&RequestContext) -> HandlerResult + Send + Sync,
{
    fn call(&self, req: &RequestContext) -> HandlerResult {
        self(req)
    }
}

/// Response produced by a handler or by the dispatcher itself
#[derive(Debug, Clone)]
pub struct HandlerResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// HTTP response headers
    pub headers: HeaderVec,
    /// Response body as JSON
    pub body: Value,
}

impl HandlerResponse {
    /// Create a JSON response with the given status
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// 200 with a JSON body
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    /// 201 with a JSON body
    #[must_use]
    pub fn created(body: Value) -> Self {
        Self::json(201, body)
    }

    /// Replace the status
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name.to_ascii_lowercase()), value));
    }
}

/// Routes requests through the route table and invokes the bound handler.
///
/// Holds the table behind an `Arc`; cloning the dispatcher is cheap and every clone
/// sees the same immutable table.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
}

impl Dispatcher {
    /// Freeze a built table into a dispatcher
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        table.dump_routes();
        Self {
            table: Arc::new(table),
        }
    }

    /// The route table this dispatcher resolves against
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Handle one request and always produce a response.
    ///
    /// 404 when no pattern has the shape of the path, 405 when the path exists under
    /// other methods, 400 for a malformed JSON body on a matched route, the handler's
    /// response on success, and the handler error's status (500 for internal
    /// failures and panics) otherwise.
    #[must_use]
    pub fn handle(
        &self,
        method: &Method,
        path: &str,
        query: &str,
        body: RequestBody<'_>,
    ) -> HandlerResponse {
        self.handle_with_request_id(RequestId::new(), method, path, query, body)
    }

    /// [`Dispatcher::handle`] with a caller-supplied request id
    #[must_use]
    pub fn handle_with_request_id(
        &self,
        request_id: RequestId,
        method: &Method,
        path: &str,
        query: &str,
        body: RequestBody<'_>,
    ) -> HandlerResponse {
        let start = Instant::now();
        let resp = match self.try_handle(request_id, method, path, query, body) {
            Ok(resp) => resp,
            Err(err) => {
                log_dispatch_error(request_id, &err);
                err.into_response()
            }
        };
        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = resp.status,
            latency_us = start.elapsed().as_micros() as u64,
            "Request handled"
        );
        resp
    }

    /// Run the dispatch steps, returning the request-time error instead of
    /// converting it.
    ///
    /// # Errors
    ///
    /// Any [`DispatchError`]; the caller decides how to answer it.
    pub fn try_handle(
        &self,
        request_id: RequestId,
        method: &Method,
        path: &str,
        query: &str,
        body: RequestBody<'_>,
    ) -> Result<HandlerResponse, DispatchError> {
        let route_match = match self.table.resolve(method, path) {
            Resolution::Matched(m) => m,
            Resolution::MethodNotAllowed { allowed } => {
                return Err(DispatchError::MethodNotAllowed {
                    method: method.to_string(),
                    path: path.to_string(),
                    allowed,
                });
            }
            Resolution::NotFound => {
                return Err(DispatchError::PathNotFound {
                    method: method.to_string(),
                    path: path.to_string(),
                });
            }
        };

        let pattern = route_match.entry.pattern.as_str().to_string();
        let handler = Arc::clone(&route_match.entry.handler);
        let ctx = RequestContext::build(
            request_id,
            method.clone(),
            path,
            query,
            body,
            route_match.path_params,
        )
        .map_err(|e| DispatchError::MalformedBody {
            method: method.to_string(),
            path: path.to_string(),
            detail: e.detail,
        })?;

        debug!(
            request_id = %request_id,
            method = %method,
            pattern = %pattern,
            path_params = ?ctx.path_params,
            query_keys = ?ctx.query_params.keys().collect::<Vec<_>>(),
            "Request dispatched to handler"
        );

        let execution_start = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| handler.call(&ctx)));
        let execution_time_us = execution_start.elapsed().as_micros() as u64;

        match outcome {
            Ok(Ok(resp)) => {
                debug!(
                    request_id = %request_id,
                    pattern = %pattern,
                    status = resp.status,
                    execution_time_us,
                    "Handler execution complete"
                );
                Ok(resp)
            }
            Ok(Err(error)) => Err(DispatchError::Handler {
                method: method.to_string(),
                path: path.to_string(),
                error,
            }),
            Err(panic) => {
                let panic_message = panic_message(panic.as_ref());
                error!(
                    request_id = %request_id,
                    pattern = %pattern,
                    panic_message = %panic_message,
                    execution_time_us,
                    "Handler panicked"
                );
                Err(DispatchError::Handler {
                    method: method.to_string(),
                    path: path.to_string(),
                    error: HandlerError::Internal(anyhow::anyhow!(
                        "handler panicked: {panic_message}"
                    )),
                })
            }
        }
    }

    /// Answer a request whose method token could not be parsed.
    ///
    /// Such a method can never match a route, so the path decides between 405
    /// (it exists under other methods) and 404.
    #[must_use]
    pub fn reject_method(&self, raw_method: &str, path: &str) -> HandlerResponse {
        let allowed = self.table.allowed_methods(path);
        let err = if allowed.is_empty() {
            DispatchError::PathNotFound {
                method: raw_method.to_string(),
                path: path.to_string(),
            }
        } else {
            DispatchError::MethodNotAllowed {
                method: raw_method.to_string(),
                path: path.to_string(),
                allowed,
            }
        };
        warn!(method = %raw_method, path = %path, "Unparseable request method");
        err.into_response()
    }
}

fn log_dispatch_error(request_id: RequestId, err: &DispatchError) {
    match err {
        DispatchError::PathNotFound { .. } | DispatchError::MethodNotAllowed { .. } => {
            info!(request_id = %request_id, status = err.status(), error = %err, "No route");
        }
        DispatchError::MalformedBody { .. } => {
            info!(
                request_id = %request_id,
                status = 400,
                error = %err,
                "Rejected request body"
            );
        }
        DispatchError::Handler {
            error: HandlerError::Internal(_),
            ..
        } => {
            // Full detail stays server side.
            error!(request_id = %request_id, status = 500, error = %err, "Handler failed");
        }
        DispatchError::Handler { .. } => {
            info!(
                request_id = %request_id,
                status = err.status(),
                error = %err,
                "Handler returned error"
            );
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
