// Controllers mounted under /products.

use super::{required_number, required_str};
use crate::context::RequestContext;
use crate::dispatcher::{HandlerResponse, HandlerResult};
use serde_json::json;

/// `GET /products?category=&minPrice=&maxPrice=`
pub fn list(req: &RequestContext) -> HandlerResult {
    Ok(HandlerResponse::ok(json!({
        "products": [],
        "category": req.get_query_param("category"),
        "minPrice": req.get_query_param("minPrice"),
        "maxPrice": req.get_query_param("maxPrice"),
    })))
}

pub fn get(req: &RequestContext) -> HandlerResult {
    Ok(HandlerResponse::ok(json!({ "id": req.get_path_param("id") })))
}

/// `POST /products` with a string `name` and a numeric `price`
pub fn create(req: &RequestContext) -> HandlerResult {
    let name = required_str(req, "name")?;
    let price = required_number(req, "price")?;
    Ok(HandlerResponse::created(json!({
        "id": 1,
        "name": name,
        "price": price,
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
        "message": "Product deleted",
        "id": req.get_path_param("id"),
    })))
}

pub fn list_reviews(req: &RequestContext) -> HandlerResult {
    Ok(HandlerResponse::ok(json!({
        "productId": req.get_path_param("productId"),
        "reviews": [],
    })))
}
