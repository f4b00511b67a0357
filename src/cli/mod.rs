//! # CLI Module
//!
//! Command-line interface of the `switchyard` binary.
//!
//! ### `serve`
//!
//! Start the HTTP server with the sample API:
//!
//! ```bash
//! switchyard serve --addr 0.0.0.0:8080
//! ```
//!
//! ### `routes`
//!
//! Print the sample route table, or export it for an API client:
//!
//! ```bash
//! switchyard routes --format json
//! switchyard routes --format curl --base-url http://localhost:8080 > smoke.sh
//! switchyard routes --format postman --env staging > switchyard.postman.json
//! ```
//!
//! Formats: `text`, `json`, `curl`, `curl-markdown`, `postman`, `insomnia`,
//! `httpie`. `--env dev|staging|prod` picks the base URL; `--base-url` overrides it.

mod commands;


pub use commands::{run_cli, Cli, Commands, RoutesFormat};
