// Controllers for the root, health and search endpoints.

use crate::context::RequestContext;
use crate::dispatcher::{HandlerResponse, HandlerResult};
use serde_json::json;

pub fn root(_req: &RequestContext) -> HandlerResult {
    Ok(HandlerResponse::ok(json!({ "message": "Welcome to the API" })))
}

pub fn health(_req: &RequestContext) -> HandlerResult {
    Ok(HandlerResponse::ok(json!({ "status": "ok" })))
}

/// `GET /search?q=&page=&limit=`; absent parameters come back as `null`.
pub fn search(req: &RequestContext) -> HandlerResult {
    Ok(HandlerResponse::ok(json!({
        "query": req.get_query_param("q"),
        "page": req.get_query_param("page"),
        "limit": req.get_query_param("limit"),
    })))
}
