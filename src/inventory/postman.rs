//! Postman collection v2.1 export.

use super::{ExportTarget, RouteSummary};
use serde::Serialize;

const SCHEMA: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

#[derive(Debug, Clone, Serialize)]
pub struct PostmanCollection {
    pub info: PostmanInfo,
    pub item: Vec<PostmanItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostmanInfo {
    pub name: String,
    pub description: String,
    pub schema: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostmanItem {
    pub name: String,
    pub request: PostmanRequest,
    pub response: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostmanRequest {
    pub method: String,
    pub header: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<PostmanBody>,
    pub url: PostmanUrl,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostmanBody {
    pub mode: &'static str,
    pub raw: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostmanUrl {
    pub raw: String,
    pub protocol: String,
    pub host: Vec<String>,
    pub path: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variable: Vec<PostmanVariable>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostmanVariable {
    pub key: String,
    pub value: String,
}

impl PostmanCollection {
    /// One item per route, in registration order
    #[must_use]
    pub fn build(routes: &[RouteSummary], target: &ExportTarget) -> Self {
        let env = target.env.name();
        Self {
            info: PostmanInfo {
                name: target.collection_name(),
                description: format!("API collection for {} - {env} environment", target.project),
                schema: SCHEMA,
            },
            item: routes.iter().map(|r| item(r, &target.base_url)).collect(),
        }
    }
}

fn item(route: &RouteSummary, base_url: &str) -> PostmanItem {
    // Postman addresses path variables as `:name`
    let path = route
        .pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|seg| match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => format!(":{name}"),
            None => seg.to_string(),
        })
        .collect();
    let variable = route
        .params
        .iter()
        .map(|name| PostmanVariable {
            key: name.clone(),
            value: String::new(),
        })
        .collect();
    let (protocol, host) = split_base_url(base_url);

    PostmanItem {
        name: route.title(),
        request: PostmanRequest {
            method: route.method.clone(),
            header: Vec::new(),
            body: route.has_body().then(|| PostmanBody {
                mode: "raw",
                raw: "{}".to_string(),
            }),
            url: PostmanUrl {
                raw: format!("{base_url}{}", route.pattern),
                protocol: protocol.to_string(),
                host: vec![host.to_string()],
                path,
                variable,
            },
        },
        response: Vec::new(),
    }
}

/// `http://host:port` -> (`http`, `host:port`); anything without a scheme (such as
/// a `{{base_url}}` variable) is kept whole as the host.
fn split_base_url(base_url: &str) -> (&str, &str) {
    if let Some(host) = base_url.strip_prefix("http://") {
        ("http", host)
    } else if let Some(host) = base_url.strip_prefix("https://") {
        ("https", host)
    } else {
        ("https", base_url)
    }
}

/// The routes as a pretty-printed Postman collection.
///
/// # Errors
///
/// Serialization failure.
pub fn render_postman(
    routes: &[RouteSummary],
    target: &ExportTarget,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&PostmanCollection::build(routes, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::tests::routes;
    use crate::inventory::Environment;
    use serde_json::{json, Value};

    fn collection(target: &ExportTarget) -> Value {
        serde_json::from_str(&render_postman(&routes(), target).unwrap()).unwrap()
    }

    #[test]
    fn test_postman_info() {
        let c = collection(&ExportTarget::new("shop", Environment::Prod));
        assert_eq!(c["info"]["name"], "shop API (Production)");
        assert_eq!(c["info"]["schema"], SCHEMA);
        assert_eq!(c["item"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_postman_path_variables() {
        let c = collection(&ExportTarget::new("shop", Environment::Dev));
        let item = &c["item"][2];
        assert_eq!(item["name"], "GET /users/{userId}/files/{fileName}");
        assert_eq!(
            item["request"]["url"],
            json!({
                "raw": "http://localhost:8080/users/{userId}/files/{fileName}",
                "protocol": "http",
                "host": ["localhost:8080"],
                "path": ["users", ":userId", "files", ":fileName"],
                "variable": [
                    {"key": "userId", "value": ""},
                    {"key": "fileName", "value": ""}
                ]
            })
        );
        assert!(item["request"].get("body").is_none());
    }

    #[test]
    fn test_postman_body_and_root_path() {
        let c = collection(&ExportTarget::new("shop", Environment::Staging));
        assert_eq!(c["item"][0]["request"]["url"]["path"], json!([]));
        assert!(c["item"][0]["request"]["url"].get("variable").is_none());
        let post = &c["item"][1]["request"];
        assert_eq!(post["body"], json!({"mode": "raw", "raw": "{}"}));
        assert_eq!(post["url"]["protocol"], "https");
        assert_eq!(post["url"]["host"], json!(["staging-api.example.com"]));
    }

    #[test]
    fn test_split_base_url_variable() {
        assert_eq!(split_base_url("{{base_url}}"), ("https", "{{base_url}}"));
    }
}
