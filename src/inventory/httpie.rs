//! HTTPie collection export.

use super::{ExportTarget, RouteSummary};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct HttpieCollection {
    pub meta: HttpieMeta,
    pub entry: HttpieEntry,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpieMeta {
    pub format: &'static str,
    pub version: &'static str,
    pub content_type: &'static str,
    pub schema: &'static str,
    pub docs: &'static str,
    pub source: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HttpieEntry {
    pub name: String,
    pub icon: HttpieIcon,
    pub auth: HttpieAuth,
    pub requests: Vec<HttpieRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HttpieIcon {
    pub name: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HttpieAuth {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpieRequest {
    pub name: String,
    pub url: String,
    pub method: String,
    pub headers: Vec<Value>,
    pub query_params: Vec<HttpieParam>,
    pub path_params: Vec<HttpieParam>,
    pub auth: HttpieAuth,
    pub body: HttpieBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct HttpieParam {
    pub name: String,
    pub value: String,
    pub enabled: bool,
}

/// HTTPie keeps every body kind and marks the active one in `type`.
#[derive(Debug, Clone, Serialize)]
pub struct HttpieBody {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub file: HttpieFile,
    pub text: HttpieText,
    pub form: HttpieForm,
    pub graphql: HttpieGraphql,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HttpieFile {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HttpieText {
    pub value: String,
    pub format: &'static str,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpieForm {
    pub is_multipart: bool,
    pub fields: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HttpieGraphql {
    pub query: String,
    pub variables: String,
}

impl HttpieCollection {
    #[must_use]
    pub fn build(routes: &[RouteSummary], target: &ExportTarget) -> Self {
        Self {
            meta: HttpieMeta {
                format: "httpie",
                version: "1.0.0",
                content_type: "collection",
                schema: "https://schema.httpie.io/1.0.0.json",
                docs: "https://httpie.io/r/help/export-from-httpie",
                source: "switchyard",
            },
            entry: HttpieEntry {
                name: target.collection_name(),
                icon: HttpieIcon {
                    name: "default",
                    color: "gray",
                },
                auth: HttpieAuth { kind: "none" },
                requests: routes.iter().map(|r| request(r, &target.base_url)).collect(),
            },
        }
    }
}

fn request(route: &RouteSummary, base_url: &str) -> HttpieRequest {
    // HTTPie substitutes `{{name}}` from the path params table
    let path = route.fill_params(|name| format!("{{{{{name}}}}}"));
    let path_params = route
        .params
        .iter()
        .map(|name| HttpieParam {
            name: name.clone(),
            value: String::new(),
            enabled: true,
        })
        .collect();
    let (kind, text) = if route.has_body() {
        ("text", "{}")
    } else {
        ("none", "")
    };

    HttpieRequest {
        name: route.title(),
        url: format!("{base_url}{path}"),
        method: route.method.clone(),
        headers: Vec::new(),
        query_params: Vec::new(),
        path_params,
        auth: HttpieAuth { kind: "inherited" },
        body: HttpieBody {
            kind,
            file: HttpieFile::default(),
            text: HttpieText {
                value: text.to_string(),
                format: "application/json",
            },
            form: HttpieForm::default(),
            graphql: HttpieGraphql::default(),
        },
    }
}

/// The routes as a pretty-printed HTTPie collection.
///
/// # Errors
///
/// Serialization failure.
pub fn render_httpie(
    routes: &[RouteSummary],
    target: &ExportTarget,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&HttpieCollection::build(routes, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::tests::routes;
    use crate::inventory::Environment;
    use serde_json::json;

    fn collection() -> Value {
        let target = ExportTarget::new("shop", Environment::Prod);
        serde_json::from_str(&render_httpie(&routes(), &target).unwrap()).unwrap()
    }

    #[test]
    fn test_httpie_meta_and_entry() {
        let c = collection();
        assert_eq!(c["meta"]["format"], "httpie");
        assert_eq!(c["meta"]["contentType"], "collection");
        assert_eq!(c["entry"]["name"], "shop API (Production)");
        assert_eq!(c["entry"]["auth"], json!({"type": "none"}));
        assert_eq!(c["entry"]["requests"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_httpie_path_params() {
        let c = collection();
        let req = &c["entry"]["requests"][2];
        assert_eq!(req["url"], "https://api.example.com/users/{{userId}}/files/{{fileName}}");
        assert_eq!(
            req["pathParams"],
            json!([
                {"name": "userId", "value": "", "enabled": true},
                {"name": "fileName", "value": "", "enabled": true}
            ])
        );
        assert_eq!(req["auth"]["type"], "inherited");
        assert_eq!(req["body"]["type"], "none");
    }

    #[test]
    fn test_httpie_json_body() {
        let c = collection();
        let body = &c["entry"]["requests"][1]["body"];
        assert_eq!(body["type"], "text");
        assert_eq!(body["text"], json!({"value": "{}", "format": "application/json"}));
        assert_eq!(body["form"], json!({"isMultipart": false, "fields": []}));
    }
}
