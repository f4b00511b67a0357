//! Request context construction.
//!
//! A [`RequestContext`] is the single view a handler gets of its request: the path
//! bindings from the matched pattern, the parsed query string and the parsed body.
//! Path parameters and query parameters are separate namespaces, so `/users/{id}`
//! requested with `?id=other` exposes both values.

use crate::ids::RequestId;
use crate::router::ParamVec;
use http::Method;
use serde_json::Value;
use smallvec::SmallVec;
use std::borrow::Cow;
use tracing::debug;

/// Query parameter storage: key plus every value given for it, in order of
/// first appearance.
pub type QueryVec = SmallVec<[(String, SmallVec<[String; 1]>); 8]>;

/// Pairs read from one query string; later pairs are ignored.
///
/// Keys are looked up by linear scan, so this also bounds the parse cost.
pub const MAX_QUERY_PAIRS: usize = 256;

/// Parsed query string preserving duplicate keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: QueryVec,
}

impl QueryParams {
    /// Parse a raw query string (`a=1&b=2&b=3`).
    ///
    /// Pairs are split on `&` and then on the first `=`. A key without `=` maps to an
    /// empty string. Keys and values are percent-decoded; `+` is kept as is. Empty
    /// pairs are skipped and a leading `?` is tolerated. At most
    /// [`MAX_QUERY_PAIRS`] pairs are kept.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        let mut pairs = query.split('&').filter(|p| !p.is_empty());
        for pair in pairs.by_ref().take(MAX_QUERY_PAIRS) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.push(percent_decode(key).into_owned(), percent_decode(value).into_owned());
        }
        let dropped = pairs.count();
        if dropped > 0 {
            debug!(dropped, limit = MAX_QUERY_PAIRS, "Query pairs over limit ignored");
        }
        params
    }

    fn push(&mut self, key: String, value: String) {
        if let Some((_, values)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            values.push(value);
        } else {
            let mut values = SmallVec::new();
            values.push(value);
            self.entries.push((key, values));
        }
    }

    /// First value for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// All values for `key` in request order, empty when absent
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the key was present at all
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Keys in order of first appearance
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of distinct keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no parameter was given
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strict percent-decoding; `+` stays `+` and invalid UTF-8 is replaced lossily.
pub(crate) fn percent_decode(raw: &str) -> Cow<'_, str> {
    if !raw.contains('%') {
        return Cow::Borrowed(raw);
    }
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded,
        Err(_) => {
            let bytes = urlencoding::decode_binary(raw.as_bytes());
            Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// The request body declared JSON but is not valid JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedBodyError {
    /// Parser diagnostic, e.g. `expected value at line 1 column 2`
    pub detail: String,
}

impl std::fmt::Display for MalformedBodyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed JSON body: {}", self.detail)
    }
}

impl std::error::Error for MalformedBodyError {}

/// Whether a `Content-Type` value denotes JSON.
///
/// Accepts `application/json` and any `+json` suffix type. Media type parameters
/// are ignored and the comparison is case-insensitive.
#[must_use]
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Parse a request body.
///
/// Only bodies declared as JSON are parsed. Anything else, and a JSON declaration
/// with an empty payload, yields `Ok(None)`.
///
/// # Errors
///
/// [`MalformedBodyError`] when a JSON-declared body does not parse.
pub fn parse_body(
    content_type: Option<&str>,
    payload: &[u8],
) -> Result<Option<Value>, MalformedBodyError> {
    let Some(ct) = content_type else {
        return Ok(None);
    };
    if !is_json_content_type(ct) || payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    match serde_json::from_slice::<Value>(payload) {
        Ok(value) => {
            debug!(
                body_size_bytes = payload.len(),
                body_fields = value.as_object().map(serde_json::Map::len),
                "JSON body parsed"
            );
            Ok(Some(value))
        }
        Err(e) => {
            debug!(body_size_bytes = payload.len(), error = %e, "JSON body parse failed");
            Err(MalformedBodyError {
                detail: e.to_string(),
            })
        }
    }
}

/// Raw request body as received by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestBody<'a> {
    /// `Content-Type` header value, if any
    pub content_type: Option<&'a str>,
    /// Payload bytes (empty when there is no body)
    pub payload: &'a [u8],
}

impl<'a> RequestBody<'a> {
    /// No body at all
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A JSON body
    #[must_use]
    pub fn json(payload: &'a [u8]) -> Self {
        Self {
            content_type: Some("application/json"),
            payload,
        }
    }
}

/// Everything a handler knows about its request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique request ID for log correlation
    pub request_id: RequestId,
    /// HTTP method
    pub method: Method,
    /// Request path as received (without query string)
    pub path: String,
    /// Path parameters from the matched pattern, in pattern order
    pub path_params: ParamVec,
    /// Query string parameters
    pub query_params: QueryParams,
    /// Parsed JSON body, if the request carried one
    pub body: Option<Value>,
}

impl RequestContext {
    /// Assemble a context from the pieces of a matched request.
    ///
    /// # Errors
    ///
    /// [`MalformedBodyError`] when the body declares JSON but does not parse.
    pub fn build(
        request_id: RequestId,
        method: Method,
        path: &str,
        query: &str,
        body: RequestBody<'_>,
        path_params: ParamVec,
    ) -> Result<Self, MalformedBodyError> {
        let body = parse_body(body.content_type, body.payload)?;
        let query_params = QueryParams::parse(query);
        debug!(
            request_id = %request_id,
            param_count = query_params.len(),
            path_param_count = path_params.len(),
            has_body = body.is_some(),
            "Request context built"
        );
        Ok(Self {
            request_id,
            method,
            path: path.to_string(),
            path_params,
            query_params,
            body,
        })
    }

    /// Get a path parameter by name
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// First value of a query parameter
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name)
    }

    /// All values of a query parameter
    #[inline]
    #[must_use]
    pub fn get_query_params(&self, name: &str) -> &[String] {
        self.query_params.get_all(name)
    }

    /// A top-level field of the JSON body
    #[must_use]
    pub fn body_field(&self, name: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|b| b.get(name))
    }

    /// A top-level string field of the JSON body
    #[must_use]
    pub fn body_str(&self, name: &str) -> Option<&str> {
        self.body_field(name).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_query_duplicates_preserved() {
        let q = QueryParams::parse("q=a&page=2&page=3");
        assert_eq!(q.get_all("q"), &["a".to_string()]);
        assert_eq!(q.get_all("page"), &["2".to_string(), "3".to_string()]);
        assert_eq!(q.get("page"), Some("2"));
        assert_eq!(q.keys().collect::<Vec<_>>(), vec!["q", "page"]);
    }

    #[test]
    fn test_query_key_without_equals() {
        let q = QueryParams::parse("debug&x=1");
        assert!(q.contains_key("debug"));
        assert_eq!(q.get("debug"), Some(""));
        assert_eq!(q.get("x"), Some("1"));
    }

    #[test]
    fn test_query_splits_on_first_equals() {
        let q = QueryParams::parse("expr=a=b");
        assert_eq!(q.get("expr"), Some("a=b"));
    }

    #[test]
    fn test_query_percent_decoding() {
        let q = QueryParams::parse("na%6De=J%C3%B6rg%20K&plus=a+b");
        assert_eq!(q.get("name"), Some("Jörg K"));
        assert_eq!(q.get("plus"), Some("a+b"));
    }

    #[test]
    fn test_query_pairs_capped() {
        let query = (0..MAX_QUERY_PAIRS + 50)
            .map(|i| format!("k{i}=v"))
            .collect::<Vec<_>>()
            .join("&");
        let q = QueryParams::parse(&query);
        assert_eq!(q.len(), MAX_QUERY_PAIRS);
        assert!(q.contains_key(&format!("k{}", MAX_QUERY_PAIRS - 1)));
        assert!(!q.contains_key(&format!("k{MAX_QUERY_PAIRS}")));

        // duplicates count towards the limit
        let dupes = vec!["a=1"; MAX_QUERY_PAIRS + 1].join("&");
        assert_eq!(QueryParams::parse(&dupes).get_all("a").len(), MAX_QUERY_PAIRS);
    }

    #[test]
    fn test_query_invalid_utf8_is_lossy() {
        let q = QueryParams::parse("v=%FF");
        assert_eq!(q.get("v"), Some("\u{FFFD}"));
    }

    #[test]
    fn test_query_skips_empty_pairs_and_question_mark() {
        let q = QueryParams::parse("?a=1&&b=2&");
        assert_eq!(q.len(), 2);
        assert!(QueryParams::parse("").is_empty());
    }

    #[test]
    fn test_json_content_type_detection() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("Application/JSON; charset=utf-8"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(!is_json_content_type("text/plain"));
        assert!(!is_json_content_type("application/x-www-form-urlencoded"));
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(
            parse_body(Some("application/json"), br#"{"a":1}"#).unwrap(),
            Some(json!({"a": 1}))
        );
        assert_eq!(parse_body(Some("text/plain"), b"{not json").unwrap(), None);
        assert_eq!(parse_body(None, br#"{"a":1}"#).unwrap(), None);
        assert_eq!(parse_body(Some("application/json"), b"  \n").unwrap(), None);
        let err = parse_body(Some("application/json"), b"{\"a\":").unwrap_err();
        assert!(err.detail.contains("line 1"));
    }

    #[test]
    fn test_path_and_query_namespaces_are_separate() {
        let mut params = ParamVec::new();
        params.push((Arc::from("id"), "42".to_string()));
        let ctx = RequestContext::build(
            RequestId::new(),
            Method::GET,
            "/users/42",
            "id=other",
            RequestBody::empty(),
            params,
        )
        .unwrap();
        assert_eq!(ctx.get_path_param("id"), Some("42"));
        assert_eq!(ctx.get_query_param("id"), Some("other"));
        assert!(ctx.body.is_none());
    }

    #[test]
    fn test_build_rejects_malformed_json() {
        let err = RequestContext::build(
            RequestId::new(),
            Method::POST,
            "/users",
            "",
            RequestBody::json(b"{oops}"),
            ParamVec::new(),
        )
        .unwrap_err();
        assert!(!err.detail.is_empty());
    }

    #[test]
    fn test_body_accessors() {
        let ctx = RequestContext::build(
            RequestId::new(),
            Method::POST,
            "/auth/login",
            "",
            RequestBody::json(br#"{"email":"a@b.c","attempts":3}"#),
            ParamVec::new(),
        )
        .unwrap();
        assert_eq!(ctx.body_str("email"), Some("a@b.c"));
        assert_eq!(ctx.body_field("attempts"), Some(&json!(3)));
        assert_eq!(ctx.body_str("attempts"), None);
    }
}
