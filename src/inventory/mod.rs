//! # Route Inventory
//!
//! Lists the registered routes and exports them for API clients.
//!
//! | Format | Renderer | Output |
//! |---|---|---|
//! | text | [`render_text`] | one `METHOD pattern` line per route |
//! | json | [`render_json`] | pretty JSON array of [`RouteSummary`] |
//! | curl | [`render_curl`] | bash script, one curl command per route |
//! | curl-markdown | [`render_curl_markdown`] | the same commands as a markdown document |
//! | postman | [`render_postman`] | Postman collection v2.1 |
//! | insomnia | [`render_insomnia`] | Insomnia export format 4 |
//! | httpie | [`render_httpie`] | HTTPie collection 1.0.0 |
//!
//! The client exports are addressed at an [`ExportTarget`]: a project name, an
//! [`Environment`] and the base URL requests are sent to.
//!
//! ```rust
//! use switchyard::inventory::{render_postman, summarize, Environment, ExportTarget};
//! use switchyard::registry::sample_table;
//!
//! let routes = summarize(&sample_table().unwrap());
//! let target = ExportTarget::new("switchyard", Environment::Staging);
//! let collection = render_postman(&routes, &target).unwrap();
//! assert!(collection.contains("https://staging-api.example.com"));
//! ```

mod curl;
mod httpie;
mod insomnia;
mod postman;

pub use curl::{render_curl, render_curl_markdown};
pub use httpie::{render_httpie, HttpieCollection};
pub use insomnia::{render_insomnia, InsomniaExport};
pub use postman::{render_postman, PostmanCollection};

use crate::router::RouteTable;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write as _;

/// One registered route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub method: String,
    pub pattern: String,
    /// Parameter names in pattern order
    pub params: Vec<String>,
}

impl RouteSummary {
    /// `METHOD pattern`, the request name used by every client export
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} {}", self.method, self.pattern)
    }

    /// Whether clients should send a JSON body with this request
    #[must_use]
    pub fn has_body(&self) -> bool {
        matches!(self.method.as_str(), "POST" | "PUT" | "PATCH")
    }

    /// The pattern with each `{name}` replaced by `f(name)`.
    fn fill_params(&self, mut f: impl FnMut(&str) -> String) -> String {
        let mut path = self.pattern.clone();
        for name in &self.params {
            path = path.replace(&format!("{{{name}}}"), &f(name));
        }
        path
    }
}

/// Summaries of every route in registration order.
#[must_use]
pub fn summarize(table: &RouteTable) -> Vec<RouteSummary> {
    table
        .routes()
        .map(|e| RouteSummary {
            method: e.method.to_string(),
            pattern: e.pattern.as_str().to_string(),
            params: e.pattern.param_names().map(str::to_string).collect(),
        })
        .collect()
}

/// Deployment environment an export is addressed at.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    #[default]
    Dev,
    Staging,
    Prod,
}

impl Environment {
    /// Display name used in collection titles
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Environment::Dev => "Development",
            Environment::Staging => "Staging",
            Environment::Prod => "Production",
        }
    }

    /// Base URL requests go to unless overridden.
    ///
    /// Development points at the local `switchyard serve` default.
    #[must_use]
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Dev => "http://localhost:8080",
            Environment::Staging => "https://staging-api.example.com",
            Environment::Prod => "https://api.example.com",
        }
    }
}

/// Where exported requests are addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub project: String,
    pub env: Environment,
    /// Without a trailing `/`
    pub base_url: String,
}

impl ExportTarget {
    /// Target the environment's default base URL
    #[must_use]
    pub fn new(project: impl Into<String>, env: Environment) -> Self {
        Self {
            project: project.into(),
            env,
            base_url: env.base_url().to_string(),
        }
    }

    /// Replace the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// `<project> API (<Environment>)`
    #[must_use]
    pub fn collection_name(&self) -> String {
        format!("{} API ({})", self.project, self.env.name())
    }
}

/// One `METHOD pattern` line per route.
#[must_use]
pub fn render_text(routes: &[RouteSummary]) -> String {
    let mut out = String::new();
    for r in routes {
        let _ = writeln!(out, "{:<7} {}", r.method, r.pattern);
    }
    out
}

/// Pretty-printed JSON array.
///
/// # Errors
///
/// Serialization failure.
pub fn render_json(routes: &[RouteSummary]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(routes)
}

/// Routes grouped by method, methods in order of first appearance.
fn by_method(routes: &[RouteSummary]) -> Vec<(&str, Vec<&RouteSummary>)> {
    let mut groups: Vec<(&str, Vec<&RouteSummary>)> = Vec::new();
    for r in routes {
        match groups.iter_mut().find(|(m, _)| *m == r.method) {
            Some((_, members)) => members.push(r),
            None => groups.push((r.method.as_str(), vec![r])),
        }
    }
    groups
}
