//! # switchyard
//!
//! **switchyard** maps an incoming HTTP request (method + path) to exactly one
//! registered handler, extracts path and query parameters, parses the JSON body and
//! returns a structured JSON response. It runs on the `may` coroutine runtime and
//! serves HTTP through `may_minihttp`.
//!
//! ## Architecture
//!
//! - **[`router`]** - Route patterns, the route table and resolution precedence
//! - **[`context`]** - Request context: path params, query params, parsed body
//! - **[`dispatcher`]** - Lookup, context build, handler invocation, error responses
//! - **[`errors`]** - Registration, handler and dispatch error types
//! - **[`server`]** - HTTP hosting layer over `may_minihttp`
//! - **[`registry`]** / **[`controllers`]** - The bundled sample API
//! - **[`inventory`]** - Route listing and exports (curl, Postman, Insomnia, HTTPie)
//! - **[`logging`]** / **[`runtime_config`]** - Environment-driven setup
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as server::AppService
//!     participant Dispatcher
//!     participant Table as router::RouteTable
//!     participant Handler
//!
//!     Client->>Server: HTTP request
//!     Server->>Server: parse_request (method, path, query, body)
//!     Server->>Dispatcher: handle_with_request_id
//!     Dispatcher->>Table: resolve(method, path)
//!     alt no route
//!         Table-->>Dispatcher: NotFound / MethodNotAllowed
//!         Dispatcher-->>Server: 404 / 405
//!     else matched
//!         Table-->>Dispatcher: RouteMatch + path params
//!         Dispatcher->>Dispatcher: RequestContext::build (400 on bad JSON)
//!         Dispatcher->>Handler: call(&ctx)
//!         Handler-->>Dispatcher: HandlerResult
//!         Dispatcher-->>Server: HandlerResponse
//!     end
//!     Server-->>Client: JSON response
//! ```
//!
//! ## Precedence
//!
//! Candidates are first filtered by method. Among the patterns that match the path,
//! the one with a literal at the earliest position where candidates differ wins, so
//! `/users/me` beats `/users/{id}` whatever the registration order. Remaining ties go
//! to the earliest registration. When nothing matches for the method but the path
//! exists under another method the answer is 405 with an `Allow` header; otherwise
//! 404.
//!
//! ## Quick Start
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
//!     .register(Method::GET, "/users/me", |_req| Ok(HandlerResponse::ok(json!({"me": true}))))
//!     .unwrap()
//!     .register(Method::GET, "/users/{id}", |req| {
//!         Ok(HandlerResponse::ok(json!({"id": req.get_path_param("id")})))
//!     })
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(table);
//! let me = dispatcher.handle(&Method::GET, "/users/me", "", RequestBody::empty());
//! assert_eq!(me.body, json!({"me": true}));
//! let other = dispatcher.handle(&Method::DELETE, "/users/7", "", RequestBody::empty());
//! assert_eq!(other.status, 405);
//! ```
//!
//! ## Serving
//!
//! ```rust,no_run
//! use switchyard::dispatcher::Dispatcher;
//! use switchyard::registry::sample_table;
//! use switchyard::server::{AppService, HttpServer};
//!
//! let service = AppService::new(Dispatcher::new(sample_table().unwrap()));
//! let handle = HttpServer(service).start("127.0.0.1:8080").unwrap();
//! handle.join().unwrap();
//! ```

pub mod cli;
pub mod context;
pub mod controllers;
pub mod dispatcher;
pub mod errors;
pub mod ids;
pub mod inventory;
pub mod logging;
pub mod registry;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use context::{QueryParams, RequestBody, RequestContext};
pub use dispatcher::{Dispatcher, Handler, HandlerResponse, HandlerResult};
pub use errors::{DispatchError, HandlerError, RegistrationError};
pub use router::{Resolution, RouteTable};
