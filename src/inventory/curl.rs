//! curl exports: a runnable bash script and a markdown document.

use super::{by_method, ExportTarget, RouteSummary};
use std::fmt::Write as _;

/// A bash script with one curl command per route, grouped by method.
///
/// Requests are addressed at `${BASE_URL}`, set once at the top of the script to
/// the target's base URL. Path parameters get example values.
#[must_use]
pub fn render_curl(routes: &[RouteSummary], target: &ExportTarget) -> String {
    let env = target.env.name();
    let mut out = String::from("#!/bin/bash\n");
    let _ = writeln!(out, "# curl commands for {} API - {env} Environment", target.project);
    let _ = writeln!(out, "# Base URL for {env}");
    let _ = writeln!(out, "BASE_URL=\"{}\"\n", target.base_url);

    for (method, members) in by_method(routes) {
        let _ = writeln!(out, "# {method} Requests");
        let _ = writeln!(out, "# {}\n", "=".repeat(50));
        for r in members {
            let _ = writeln!(out, "# {}", r.title());
            out.push_str(&curl_command(r, "${BASE_URL}"));
            out.push_str("\n\n");
        }
    }
    out
}

/// The curl commands as a markdown document, one fenced block per route.
#[must_use]
pub fn render_curl_markdown(routes: &[RouteSummary], target: &ExportTarget) -> String {
    let mut out = String::from("# API curl Commands\n\n");
    let _ = writeln!(
        out,
        "curl commands for the **{}** API ({})\n",
        target.project,
        target.env.name()
    );
    out.push_str("## Base URL\n\n```bash\n");
    let _ = writeln!(out, "BASE_URL=\"{}\"", target.base_url);
    out.push_str("```\n\n");

    for (method, members) in by_method(routes) {
        let _ = writeln!(out, "## {method} Requests\n");
        for r in members {
            let _ = writeln!(out, "### {}\n", r.title());
            out.push_str("```bash\n");
            out.push_str(&curl_command(r, "${BASE_URL}"));
            out.push_str("\n```\n\n");
        }
    }
    out
}

fn curl_command(route: &RouteSummary, base_url: &str) -> String {
    let path = route.fill_params(|name| example_value(name).to_string());
    let mut cmd = format!(
        "curl -X {} \\\n  -H \"Content-Type: application/json\"",
        route.method
    );
    if route.has_body() {
        cmd.push_str(" \\\n  -d '{}'");
    }
    let _ = write!(cmd, " \\\n  \"{base_url}{path}\"");
    cmd
}

/// Placeholder for a parameter, chosen by its name.
fn example_value(name: &str) -> &'static str {
    let lower = name.to_ascii_lowercase();
    if lower.contains("id") {
        "1"
    } else if lower.contains("name") {
        "example"
    } else {
        "1"
    }
}
