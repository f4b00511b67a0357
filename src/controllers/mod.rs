//! Sample API controllers.
//!
//! Each function is a plain handler (`fn(&RequestContext) -> HandlerResult`) and is
//! bound to its route in [`crate::registry`].

pub mod auth;
pub mod misc;
pub mod products;
pub mod sessions;
pub mod users;

use crate::context::RequestContext;
use crate::errors::HandlerError;
use serde_json::Value;

/// A required string field of the JSON body, or a 400 naming it.
pub(crate) fn required_str<'a>(
    req: &'a RequestContext,
    field: &str,
) -> Result<&'a str, HandlerError> {
    req.body_str(field)
        .ok_or_else(|| HandlerError::BadRequest(format!("missing required field '{field}'")))
}

/// A required numeric field of the JSON body, or a 400 naming it.
pub(crate) fn required_number<'a>(
    req: &'a RequestContext,
    field: &str,
) -> Result<&'a Value, HandlerError> {
    req.body_field(field)
        .filter(|v| v.is_number())
        .ok_or_else(|| HandlerError::BadRequest(format!("field '{field}' must be a number")))
}
