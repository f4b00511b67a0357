use may_minihttp::Request;
use std::io::Read;
use tracing::{debug, info, warn};

/// Request data extracted from a `may_minihttp::Request` before dispatch.
///
/// The body is kept as raw bytes; whether and how it is parsed is decided by the
/// dispatcher once a route has matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    /// HTTP method token as sent (GET, POST, etc.)
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// Raw query string without the leading `?` (empty when absent)
    pub query: String,
    /// `Content-Type` header value
    pub content_type: Option<String>,
    /// `X-Request-Id` header value
    pub request_id: Option<String>,
    /// Body bytes (empty when there is no body)
    pub body: Vec<u8>,
}

/// Split a request target into path and query.
///
/// `/users?limit=10` gives `("/users", "limit=10")`. A missing path becomes `/`.
#[must_use]
pub fn split_target(target: &str) -> (&str, &str) {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let path = if path.is_empty() { "/" } else { path };
    (path, query)
}

/// Parse an incoming HTTP request into a [`RawRequest`].
///
/// A body that cannot be read is treated as empty.
pub fn parse_request(req: Request) -> RawRequest {
    let method = req.method().to_string();
    let (path, query) = split_target(req.path());
    let path = path.to_string();
    let query = query.to_string();
    let http_version = format!("{:?}", req.version());

    let mut content_type = None;
    let mut request_id = None;
    for h in req.headers().iter() {
        if h.name.eq_ignore_ascii_case("content-type") {
            content_type = Some(String::from_utf8_lossy(h.value).into_owned());
        } else if h.name.eq_ignore_ascii_case("x-request-id") {
            request_id = Some(String::from_utf8_lossy(h.value).into_owned());
        }
    }
    debug!(
        header_count = req.headers().len(),
        content_type = ?content_type,
        "Headers extracted"
    );

    let mut body = Vec::new();
    match req.body().read_to_end(&mut body) {
        Ok(size) if size > 0 => {
            info!(
                content_type = content_type.as_deref().unwrap_or(""),
                body_size_bytes = size,
                "Request body read"
            );
        }
        Ok(_) => {}
        Err(e) => {
            warn!(method = %method, path = %path, error = %e, "Request body unreadable");
            body.clear();
        }
    }

    info!(
        method = %method,
        path = %path,
        http_version = %http_version,
        "HTTP request parsed"
    );

    RawRequest {
        method,
        path,
        query,
        content_type,
        request_id,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_target() {
        assert_eq!(split_target("/p?x=1&y=2"), ("/p", "x=1&y=2"));
        assert_eq!(split_target("/users"), ("/users", ""));
        assert_eq!(split_target("?a=b"), ("/", "a=b"));
        assert_eq!(split_target("/search?q=a?b"), ("/search", "q=a?b"));
    }
}
