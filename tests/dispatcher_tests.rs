//! End-to-end dispatch without a network: lookup, context build, handler
//! invocation and error shaping.

use http::Method;
use serde_json::{json, Value};
use switchyard::context::RequestBody;
use switchyard::dispatcher::{Dispatcher, HandlerResponse};
use switchyard::errors::HandlerError;
use switchyard::ids::RequestId;
use switchyard::router::RouteTable;

fn echo_dispatcher() -> Dispatcher {
    let mut table = RouteTable::new();
    table
        .register(Method::GET, "/users/{id}", |req| {
            Ok(HandlerResponse::ok(json!({
                "id": req.get_path_param("id"),
                "query_id": req.get_query_param("id"),
                "tags": req.get_query_params("tag"),
            })))
        })
        .unwrap()
        .register(Method::POST, "/echo", |req| {
            Ok(HandlerResponse::ok(json!({ "body": req.body.clone() })))
        })
        .unwrap()
        .register(Method::PUT, "/conflict", |_req| {
            Err(HandlerError::Conflict("version mismatch".into()))
        })
        .unwrap()
        .register(Method::GET, "/fail", |_req| {
            Err(anyhow::anyhow!("database password rejected").into())
        })
        .unwrap();
    Dispatcher::new(table)
}

#[test]
fn test_path_and_query_params_reach_handler() {
    let resp = echo_dispatcher().handle(
        &Method::GET,
        "/users/42",
        "id=other&tag=a&tag=b",
        RequestBody::empty(),
    );
    assert_eq!(resp.status, 200);
    assert_eq!(
        resp.body,
        json!({ "id": "42", "query_id": "other", "tags": ["a", "b"] })
    );
}

#[test]
fn test_trailing_empty_segment_is_404() {
    let resp = echo_dispatcher().handle(&Method::GET, "/users/", "", RequestBody::empty());
    assert_eq!(resp.status, 404);
    assert_eq!(
        resp.body,
        json!({ "error": "Not Found", "method": "GET", "path": "/users/" })
    );
}

#[test]
fn test_method_not_allowed_response() {
    let resp = echo_dispatcher().handle(&Method::PATCH, "/users/1", "", RequestBody::empty());
    assert_eq!(resp.status, 405);
    assert_eq!(resp.get_header("Allow"), Some("GET"));
    assert_eq!(resp.body["allowed"], json!(["GET"]));
}

#[test]
fn test_json_body_parsed() {
    let resp = echo_dispatcher().handle(
        &Method::POST,
        "/echo",
        "",
        RequestBody::json(br#"{"name":"ada","tags":[1,2]}"#),
    );
    assert_eq!(resp.body["body"], json!({ "name": "ada", "tags": [1, 2] }));
}

#[test]
fn test_non_json_body_is_absent() {
    let resp = echo_dispatcher().handle(
        &Method::POST,
        "/echo",
        "",
        RequestBody {
            content_type: Some("text/plain"),
            payload: b"not json",
        },
    );
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["body"], Value::Null);
}

#[test]
fn test_malformed_json_is_400_with_detail() {
    let resp = echo_dispatcher().handle(&Method::POST, "/echo", "", RequestBody::json(b"[1,"));
    assert_eq!(resp.status, 400);
    assert_eq!(resp.body["error"], "Bad Request");
    assert!(resp.body["detail"].as_str().is_some_and(|d| !d.is_empty()));
}

#[test]
fn test_known_handler_error_status() {
    let resp = echo_dispatcher().handle(&Method::PUT, "/conflict", "", RequestBody::empty());
    assert_eq!(resp.status, 409);
    assert_eq!(resp.body["message"], "version mismatch");
}

#[test]
fn test_internal_error_is_opaque_500() {
    let resp = echo_dispatcher().handle(&Method::GET, "/fail", "", RequestBody::empty());
    assert_eq!(resp.status, 500);
    assert_eq!(resp.body["error"], "Internal Server Error");
    assert!(!resp.body.to_string().contains("password"));
}

#[test]
fn test_try_handle_exposes_error_kind() {
    let d = echo_dispatcher();
    let err = d
        .try_handle(RequestId::new(), &Method::GET, "/nope", "", RequestBody::empty())
        .unwrap_err();
    assert_eq!(err.status(), 404);
}
