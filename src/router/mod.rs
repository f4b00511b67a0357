//! # Router Module
//!
//! Path matching and route resolution.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling route patterns (`/users/{id}`) into segment matchers
//! - Keeping the ordered route table built at startup
//! - Resolving a request method and path to at most one entry
//! - Extracting path parameters from the matched pattern
//!
//! ## Matching rules
//!
//! Segment counts must be equal, literal segments compare byte for byte and
//! parameter segments bind any non-empty segment. When several patterns match a
//! path, the one with a literal segment at the earliest differing position wins,
//! then the earliest registration. `/users/posts` therefore beats `/users/{id}`
//! regardless of which was registered first.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use serde_json::json;
//! use switchyard::dispatcher::HandlerResponse;
//! use switchyard::router::{Resolution, RouteTable};
//!
//! let mut table = RouteTable::new();
//! table
//!     .register(Method::GET, "/users/{id}", |req| {
//!         Ok(HandlerResponse::ok(json!({ "id": req.get_path_param("id") })))
//!     })
//!     .unwrap();
//!
//! match table.resolve(&Method::GET, "/users/42") {
//!     Resolution::Matched(m) => assert_eq!(m.get_path_param("id"), Some("42")),
//!     other => panic!("unexpected {other:?}"),
//! }
//! assert!(matches!(table.resolve(&Method::GET, "/users/"), Resolution::NotFound));
//! ```

mod core;
mod pattern;

pub use core::{Resolution, RouteEntry, RouteGroup, RouteMatch, RouteTable};
pub use pattern::{split_path, ParamVec, PathSegments, RoutePattern, Segment, MAX_INLINE_PARAMS};
