//! Insomnia export (format 4).
//!
//! Resources are a workspace, one request group holding every request, a base
//! environment carrying `base_url`, a cookie jar and an empty API spec. Requests
//! address `{{base_url}}`, so switching environment in Insomnia retargets them.
//! Timestamps are fixed offsets from [`BASE_TIME`] so an export is reproducible.

use super::{ExportTarget, RouteSummary};
use serde::Serialize;
use serde_json::{Map, Value};

/// Creation time (ms since the epoch) stamped on the first resource
pub const BASE_TIME: i64 = 1_765_300_000_000;

const EXPORT_DATE: &str = "2025-12-10T00:00:00.000Z";

#[derive(Debug, Clone, Serialize)]
pub struct InsomniaExport {
    #[serde(rename = "_type")]
    pub kind: &'static str,
    #[serde(rename = "__export_format")]
    pub export_format: u8,
    #[serde(rename = "__export_date")]
    pub export_date: &'static str,
    #[serde(rename = "__export_source")]
    pub export_source: &'static str,
    pub resources: Vec<InsomniaResource>,
}

/// Fields every resource carries
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMeta {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub modified: i64,
    pub created: i64,
}

impl ResourceMeta {
    fn new(id: impl Into<String>, parent_id: Option<&str>, at: i64) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(str::to_string),
            modified: at,
            created: at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "_type", rename_all = "snake_case")]
pub enum InsomniaResource {
    Workspace(Workspace),
    RequestGroup(RequestGroup),
    Request(Request),
    Environment(BaseEnvironment),
    CookieJar(CookieJar),
    ApiSpec(ApiSpec),
}

#[derive(Debug, Clone, Serialize)]
pub struct Workspace {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub name: String,
    pub description: String,
    pub scope: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestGroup {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub name: String,
    pub description: String,
    pub environment: Map<String, Value>,
    pub meta_sort_key: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub url: String,
    pub name: String,
    pub description: String,
    pub method: String,
    pub body: RequestBody,
    pub parameters: Vec<Value>,
    pub headers: Vec<Value>,
    pub authentication: Map<String, Value>,
    pub meta_sort_key: i64,
    pub is_private: bool,
    pub setting_store_cookies: bool,
    pub setting_send_cookies: bool,
    pub setting_disable_render_request_body: bool,
    pub setting_encode_url: bool,
    pub setting_rebuild_path: bool,
    pub setting_follow_redirects: &'static str,
}

/// Empty object for requests without a body
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseEnvironment {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub name: &'static str,
    pub data: Map<String, Value>,
    pub is_private: bool,
    pub meta_sort_key: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CookieJar {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub name: &'static str,
    pub cookies: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSpec {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub file_name: String,
    pub contents: String,
    pub content_type: &'static str,
}

impl InsomniaExport {
    #[must_use]
    pub fn build(routes: &[RouteSummary], target: &ExportTarget) -> Self {
        let project = id_fragment(&target.project);
        let workspace_id = format!("wrk_{project}");
        let group_id = format!("fld_{project}");
        let after_requests = BASE_TIME + 100 * routes.len() as i64;

        let mut resources = Vec::with_capacity(routes.len() + 5);
        resources.push(InsomniaResource::Workspace(Workspace {
            meta: ResourceMeta::new(workspace_id.as_str(), None, BASE_TIME),
            name: target.collection_name(),
            description: String::new(),
            scope: "collection",
        }));
        resources.push(InsomniaResource::RequestGroup(RequestGroup {
            meta: ResourceMeta::new(
                group_id.as_str(),
                Some(workspace_id.as_str()),
                BASE_TIME + 100,
            ),
            name: format!("{} API", target.project),
            description: "Registered routes".to_string(),
            environment: Map::new(),
            meta_sort_key: -(BASE_TIME + 100),
        }));
        for (i, route) in routes.iter().enumerate() {
            let at = BASE_TIME + 200 + 100 * i as i64;
            let id = format!("req{}_{}", id_fragment(&route.pattern), i + 1);
            resources.push(InsomniaResource::Request(request(route, id, &group_id, at)));
        }

        let mut data = Map::new();
        data.insert("base_url".to_string(), Value::from(target.base_url.as_str()));
        resources.push(InsomniaResource::Environment(BaseEnvironment {
            meta: ResourceMeta::new(
                format!("env_{project}"),
                Some(workspace_id.as_str()),
                after_requests + 400,
            ),
            name: "Base Environment",
            data,
            is_private: false,
            meta_sort_key: after_requests + 400,
        }));
        resources.push(InsomniaResource::CookieJar(CookieJar {
            meta: ResourceMeta::new(
                format!("jar_{project}"),
                Some(workspace_id.as_str()),
                after_requests + 500,
            ),
            name: "Default Jar",
            cookies: Vec::new(),
        }));
        resources.push(InsomniaResource::ApiSpec(ApiSpec {
            meta: ResourceMeta::new(
                format!("spc_{project}"),
                Some(workspace_id.as_str()),
                after_requests + 600,
            ),
            file_name: target.collection_name(),
            contents: String::new(),
            content_type: "yaml",
        }));

        Self {
            kind: "export",
            export_format: 4,
            export_date: EXPORT_DATE,
            export_source: concat!("switchyard:", env!("CARGO_PKG_VERSION")),
            resources,
        }
    }
}

fn request(route: &RouteSummary, id: String, group_id: &str, at: i64) -> Request {
    let body = if route.has_body() {
        RequestBody {
            mime_type: Some("application/json"),
            text: Some("{}".to_string()),
        }
    } else {
        RequestBody::default()
    };
    Request {
        meta: ResourceMeta::new(id, Some(group_id), at),
        url: format!("{{{{base_url}}}}{}", route.pattern),
        name: route.title(),
        description: String::new(),
        method: route.method.clone(),
        body,
        parameters: Vec::new(),
        headers: Vec::new(),
        authentication: Map::new(),
        meta_sort_key: -at,
        is_private: false,
        setting_store_cookies: true,
        setting_send_cookies: true,
        setting_disable_render_request_body: false,
        setting_encode_url: true,
        setting_rebuild_path: true,
        setting_follow_redirects: "global",
    }
}

/// `/users/{userId}` -> `_users_userid`
fn id_fragment(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '{' | '}'))
        .map(|c| match c {
            '/' | '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// The routes as a pretty-printed Insomnia export.
///
/// # Errors
///
/// Serialization failure.
pub fn render_insomnia(
    routes: &[RouteSummary],
    target: &ExportTarget,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&InsomniaExport::build(routes, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::tests::routes;
    use crate::inventory::Environment;
    use serde_json::json;

    fn export() -> Value {
        let target = ExportTarget::new("my-shop", Environment::Staging);
        serde_json::from_str(&render_insomnia(&routes(), &target).unwrap()).unwrap()
    }

    #[test]
    fn test_insomnia_envelope() {
        let e = export();
        assert_eq!(e["_type"], "export");
        assert_eq!(e["__export_format"], 4);
        let types: Vec<&str> = e["resources"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["_type"].as_str().unwrap())
            .collect();
        assert_eq!(
            types,
            [
                "workspace",
                "request_group",
                "request",
                "request",
                "request",
                "environment",
                "cookie_jar",
                "api_spec"
            ]
        );
    }

    #[test]
    fn test_insomnia_workspace_and_environment() {
        let e = export();
        let workspace = &e["resources"][0];
        assert_eq!(workspace["_id"], "wrk_my_shop");
        assert_eq!(workspace["name"], "my-shop API (Staging)");
        assert!(workspace.get("parentId").is_none());
        let env = &e["resources"][5];
        assert_eq!(env["parentId"], "wrk_my_shop");
        assert_eq!(env["data"], json!({"base_url": "https://staging-api.example.com"}));
        assert_eq!(env["created"], BASE_TIME + 700);
    }

    #[test]
    fn test_insomnia_requests() {
        let e = export();
        let get = &e["resources"][4];
        assert_eq!(get["_id"], "req_users_userid_files_filename_3");
        assert_eq!(get["parentId"], "fld_my_shop");
        assert_eq!(get["url"], "{{base_url}}/users/{userId}/files/{fileName}");
        assert_eq!(get["method"], "GET");
        assert_eq!(get["body"], json!({}));
        assert_eq!(get["metaSortKey"], -(BASE_TIME + 400));
        assert_eq!(get["settingFollowRedirects"], "global");

        let post = &e["resources"][3];
        assert_eq!(post["name"], "POST /users");
        assert_eq!(post["body"], json!({"mimeType": "application/json", "text": "{}"}));
    }
}
