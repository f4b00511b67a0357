//! Error kinds for registration and request handling.
//!
//! Registration errors are returned from [`RouteTable::register`](crate::router::RouteTable::register)
//! and are fatal at startup. Everything that can go wrong while handling a request is a
//! [`DispatchError`], which the [`Dispatcher`](crate::dispatcher::Dispatcher) turns into a
//! JSON response before it leaves the router.

use crate::dispatcher::HandlerResponse;
use http::Method;
use serde_json::json;
use std::fmt;

/// Error raised while building the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// An entry with the same method and the same pattern shape already exists.
    ///
    /// Parameter names do not take part in the comparison: `/users/{id}` and
    /// `/users/{name}` are the same route.
    DuplicateRoute {
        /// Method of the rejected registration
        method: Method,
        /// Pattern text of the rejected registration
        pattern: String,
    },
    /// The pattern text could not be compiled.
    InvalidPattern {
        /// The offending pattern text
        pattern: String,
        /// Why it was rejected
        reason: String,
    },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::DuplicateRoute { method, pattern } => {
                write!(f, "duplicate route: {method} {pattern} is already registered")
            }
            RegistrationError::InvalidPattern { pattern, reason } => {
                write!(f, "invalid route pattern '{pattern}': {reason}")
            }
        }
    }
}

impl std::error::Error for RegistrationError {}

/// Error produced by a handler.
///
/// The first three variants are "known" kinds: their message is considered safe to
/// show to the caller. [`HandlerError::Internal`] wraps anything else; its detail is
/// logged and never written to the response.
#[derive(Debug)]
pub enum HandlerError {
    /// The request was understood but its content is unacceptable (400)
    BadRequest(String),
    /// The addressed resource does not exist (404)
    NotFound(String),
    /// The request conflicts with the current state of the resource (409)
    Conflict(String),
    /// Any other failure (500)
    Internal(anyhow::Error),
}

impl HandlerError {
    /// Wrap an arbitrary error as an opaque internal failure.
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        HandlerError::Internal(err.into())
    }

    /// HTTP status for this error kind
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            HandlerError::BadRequest(_) => 400,
            HandlerError::NotFound(_) => 404,
            HandlerError::Conflict(_) => 409,
            HandlerError::Internal(_) => 500,
        }
    }

    /// Message that may be returned to the caller, `None` for internal failures.
    #[must_use]
    pub fn public_message(&self) -> Option<&str> {
        match self {
            HandlerError::BadRequest(m) | HandlerError::NotFound(m) | HandlerError::Conflict(m) => {
                Some(m.as_str())
            }
            HandlerError::Internal(_) => None,
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::BadRequest(m) => write!(f, "bad request: {m}"),
            HandlerError::NotFound(m) => write!(f, "not found: {m}"),
            HandlerError::Conflict(m) => write!(f, "conflict: {m}"),
            HandlerError::Internal(e) => write!(f, "internal handler failure: {e:#}"),
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandlerError::Internal(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        HandlerError::Internal(err)
    }
}

/// Request-time failure, always recovered into a response.
#[derive(Debug)]
pub enum DispatchError {
    /// No registered pattern has the shape of the request path (404)
    PathNotFound {
        /// Request method
        method: String,
        /// Request path
        path: String,
    },
    /// A pattern matched the path but none is registered for the method (405)
    MethodNotAllowed {
        /// Request method
        method: String,
        /// Request path
        path: String,
        /// Methods registered for the matching patterns, in conventional order
        allowed: Vec<Method>,
    },
    /// The request declared a JSON body that does not parse (400)
    MalformedBody {
        /// Request method
        method: String,
        /// Request path
        path: String,
        /// Parser diagnostic (line/column), contains no server state
        detail: String,
    },
    /// The handler returned an error or panicked
    Handler {
        /// Request method
        method: String,
        /// Request path
        path: String,
        /// What the handler produced
        error: HandlerError,
    },
}

impl DispatchError {
    /// HTTP status this error is answered with
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::PathNotFound { .. } => 404,
            DispatchError::MethodNotAllowed { .. } => 405,
            DispatchError::MalformedBody { .. } => 400,
            DispatchError::Handler { error, .. } => error.status(),
        }
    }

    /// Convert into the structured error response.
    ///
    /// The body always carries `error` (the reason phrase), `method` and `path`.
    /// Internal handler failures never leak their detail.
    #[must_use]
    pub fn into_response(self) -> HandlerResponse {
        let status = self.status();
        let reason = status_reason(status);
        match self {
            DispatchError::PathNotFound { method, path } => HandlerResponse::json(
                status,
                json!({ "error": reason, "method": method, "path": path }),
            ),
            DispatchError::MethodNotAllowed {
                method,
                path,
                allowed,
            } => {
                let allowed: Vec<&str> = allowed.iter().map(Method::as_str).collect();
                let mut resp = HandlerResponse::json(
                    status,
                    json!({
                        "error": reason,
                        "method": method,
                        "path": path,
                        "allowed": allowed,
                    }),
                );
                resp.set_header("allow", allowed.join(", "));
                resp
            }
            DispatchError::MalformedBody {
                method,
                path,
                detail,
            } => HandlerResponse::json(
                status,
                json!({ "error": reason, "method": method, "path": path, "detail": detail }),
            ),
            DispatchError::Handler {
                method,
                path,
                error,
            } => match error.public_message() {
                Some(message) => HandlerResponse::json(
                    status,
                    json!({ "error": reason, "method": method, "path": path, "message": message }),
                ),
                None => HandlerResponse::json(
                    status,
                    json!({ "error": reason, "method": method, "path": path }),
                ),
            },
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::PathNotFound { method, path } => {
                write!(f, "no route for {method} {path}")
            }
            DispatchError::MethodNotAllowed {
                method,
                path,
                allowed,
            } => {
                let allowed: Vec<&str> = allowed.iter().map(Method::as_str).collect();
                write!(
                    f,
                    "method {method} not allowed for {path} (allowed: {})",
                    allowed.join(", ")
                )
            }
            DispatchError::MalformedBody { path, detail, .. } => {
                write!(f, "malformed JSON body for {path}: {detail}")
            }
            DispatchError::Handler {
                method,
                path,
                error,
            } => write!(f, "handler for {method} {path} failed: {error}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Handler { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Canonical reason phrase for the statuses this crate produces.
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => http::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(405), "Method Not Allowed");
        assert_eq!(status_reason(418), "I'm a teapot");
        assert_eq!(status_reason(599), "Unknown");
    }

    #[test]
    fn test_handler_error_statuses() {
        assert_eq!(HandlerError::BadRequest("x".into()).status(), 400);
        assert_eq!(HandlerError::NotFound("x".into()).status(), 404);
        assert_eq!(HandlerError::Conflict("x".into()).status(), 409);
        assert_eq!(HandlerError::internal(anyhow::anyhow!("boom")).status(), 500);
    }

    #[test]
    fn test_internal_error_detail_is_not_public() {
        let err = HandlerError::internal(anyhow::anyhow!("db password=hunter2"));
        assert!(err.public_message().is_none());
        let resp = DispatchError::Handler {
            method: "GET".into(),
            path: "/x".into(),
            error: err,
        }
        .into_response();
        assert_eq!(resp.status, 500);
        assert!(!resp.body.to_string().contains("hunter2"));
        assert_eq!(resp.body["error"], "Internal Server Error");
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let resp = DispatchError::MethodNotAllowed {
            method: "PATCH".into(),
            path: "/users/1".into(),
            allowed: vec![Method::GET, Method::PUT, Method::DELETE],
        }
        .into_response();
        assert_eq!(resp.status, 405);
        assert_eq!(resp.get_header("Allow"), Some("GET, PUT, DELETE"));
        assert_eq!(resp.body["allowed"], json!(["GET", "PUT", "DELETE"]));
    }

    #[test]
    fn test_registration_error_display() {
        let err = RegistrationError::DuplicateRoute {
            method: Method::GET,
            pattern: "/users/{id}".into(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate route: GET /users/{id} is already registered"
        );
    }
}
