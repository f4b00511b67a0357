// Controllers mounted under /users.

use super::required_str;
use crate::context::RequestContext;
use crate::dispatcher::{HandlerResponse, HandlerResult};
use serde_json::json;

/// `GET /users?page=&limit=&sort=`
pub fn list(req: &RequestContext) -> HandlerResult {
    Ok(HandlerResponse::ok(json!({
        "users": [],
        "page": req.get_query_param("page"),
        "limit": req.get_query_param("limit"),
        "sort": req.get_query_param("sort"),
    })))
}

pub fn get(req: &RequestContext) -> HandlerResult {
    Ok(HandlerResponse::ok(json!({ "id": req.get_path_param("id") })))
}

/// `POST /users` with `name` and `email`
pub fn create(req: &RequestContext) -> HandlerResult {
    let name = required_str(req, "name")?;
    let email = required_str(req, "email")?;
    Ok(HandlerResponse::created(json!({
        "id": 1,
        "name": name,
        "email": email,
    })))
}

pub fn update(req: &RequestContext) -> HandlerResult {
    Ok(HandlerResponse::ok(json!({
        "id": req.get_path_param("id"),
        "name": req.body_str("name"),
    })))
}

pub fn delete(req: &RequestContext) -> HandlerResult {
    Ok(HandlerResponse::ok(json!({
        "message": "User deleted",
        "id": req.get_path_param("id"),
    })))
}

pub fn list_posts(req: &RequestContext) -> HandlerResult {
    Ok(HandlerResponse::ok(json!({
        "userId": req.get_path_param("userId"),
        "posts": [],
    })))
}
