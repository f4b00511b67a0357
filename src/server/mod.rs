//! HTTP hosting layer on top of `may_minihttp`.
//!
//! The server extracts method, path, query, content type and body from each
//! request, hands them to the [`Dispatcher`](crate::dispatcher::Dispatcher) and
//! writes the JSON response back.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_request, split_target, RawRequest};
pub use response::write_handler_response;
pub use service::AppService;
