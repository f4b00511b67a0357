// Controller for POST /auth/login.

use super::required_str;
use crate::context::RequestContext;
use crate::dispatcher::{HandlerResponse, HandlerResult};
use serde_json::json;
use tracing::info;

pub fn login(req: &RequestContext) -> HandlerResult {
    let email = required_str(req, "email")?;
    let _password = required_str(req, "password")?;
    info!(request_id = %req.request_id, email = %email, "Login accepted");
    Ok(HandlerResponse::ok(json!({ "message": "Login successful" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RequestBody;
    use crate::errors::HandlerError;
    use crate::ids::RequestId;
    use crate::router::ParamVec;
    use http::Method;

    fn ctx(body: &[u8]) -> RequestContext {
        RequestContext::build(
            RequestId::new(),
            Method::POST,
            "/auth/login",
            "",
            RequestBody::json(body),
            ParamVec::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_login_requires_both_fields() {
        let err = login(&ctx(br#"{"email":"a@b.c"}"#)).unwrap_err();
        assert!(matches!(err, HandlerError::BadRequest(ref m) if m.contains("password")));
        assert!(login(&ctx(br#"{"email":"a@b.c","password":"pw"}"#)).is_ok());
    }
}
