//! # Dispatcher Module
//!
//! The dispatcher turns a request into a response: it resolves the method and path
//! against the [`RouteTable`](crate::router::RouteTable), builds the
//! [`RequestContext`](crate::context::RequestContext), invokes the bound handler and
//! converts every request-time failure into a structured JSON response.
//!
//! ## Handler Registration
//!
//! Handlers are plain functions or closures registered on the route table at
//! startup. The table is then frozen into a dispatcher:
//!
//! ```rust
//! use http::Method;
//! use serde_json::json;
//! use switchyard::context::RequestBody;
//! use switchyard::dispatcher::{Dispatcher, HandlerResponse};
//! use switchyard::router::RouteTable;
//!
//! let mut table = RouteTable::new();
//! table
//!     .register(Method::GET, "/pets/{id}", |req| {
//!         Ok(HandlerResponse::ok(json!({ "id": req.get_path_param("id") })))
//!     })
//!     .unwrap();
//! let dispatcher = Dispatcher::new(table);
//!
//! let resp = dispatcher.handle(&Method::GET, "/pets/7", "", RequestBody::empty());
//! assert_eq!(resp.status, 200);
//! assert_eq!(resp.body, json!({ "id": "7" }));
//! ```
//!
//! ## Error Handling
//!
//! | Situation | Status |
//! |---|---|
//! | no pattern has the path's shape | 404 |
//! | the path exists under other methods | 405 (+ `Allow`) |
//! | JSON body does not parse | 400 |
//! | `HandlerError::BadRequest` / `NotFound` / `Conflict` | 400 / 404 / 409 |
//! | `HandlerError::Internal` or a panic | 500, detail only in logs |
//!
//! Each request is handled exactly once: no retries, no caching, no queueing.

mod core;

pub use crate::context::RequestContext;
pub use core::{
    Dispatcher, Handler, HandlerResponse, HandlerResult, HeaderVec, MAX_INLINE_HEADERS,
};
