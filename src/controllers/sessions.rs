// Controllers for per-user settings and sessions.

use crate::context::RequestContext;
use crate::dispatcher::{HandlerResponse, HandlerResult};
use serde_json::json;

/// `PUT /settings/{userId}` with an optional `theme`
pub fn update_settings(req: &RequestContext) -> HandlerResult {
    Ok(HandlerResponse::ok(json!({
        "userId": req.get_path_param("userId"),
        "theme": req.body_str("theme"),
    })))
}

pub fn delete_session(req: &RequestContext) -> HandlerResult {
    Ok(HandlerResponse::ok(json!({
        "message": "Session deleted",
        "sessionId": req.get_path_param("sessionId"),
    })))
}
