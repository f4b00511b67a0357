use crate::dispatcher::HandlerResponse;
use crate::errors::status_reason;
use dashmap::DashMap;
use may_minihttp::Response;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{error, warn};

/// Upper bound on distinct header lines leaked for `may_minihttp`.
pub const MAX_INTERNED_HEADER_LINES: usize = 1024;

const DEFAULT_CONTENT_TYPE: &str = "Content-Type: application/json";

/// Header lines handed to `may_minihttp`, which only accepts `&'static str`.
///
/// Each distinct line is leaked once and reused. Content types and `Allow` lists
/// repeat across requests; values a handler computes per request do not, so the
/// cache stops growing at its limit and lines it has not seen are refused after
/// that.
struct HeaderLineCache {
    lines: DashMap<String, &'static str>,
    /// Slots reserved in `lines`; never exceeds `limit`
    reserved: AtomicUsize,
    limit: usize,
}

impl HeaderLineCache {
    fn new(limit: usize) -> Self {
        Self {
            lines: DashMap::new(),
            reserved: AtomicUsize::new(0),
            limit,
        }
    }

    fn len(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, name: &str, value: &str) -> Option<&'static str> {
        let line = format!("{}: {}", canonical_header_name(name), value);
        if let Some(existing) = self.lines.get(&line) {
            return Some(*existing);
        }
        let limit = self.limit;
        self.reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < limit).then_some(n + 1)
            })
            .ok()?;
        let mut inserted = false;
        let interned = *self.lines.entry(line).or_insert_with_key(|k| {
            inserted = true;
            Box::leak(k.clone().into_boxed_str())
        });
        if !inserted {
            // another coroutine interned the same line first
            self.reserved.fetch_sub(1, Ordering::AcqRel);
        }
        Some(interned)
    }
}

static HEADER_LINES: Lazy<HeaderLineCache> =
    Lazy::new(|| HeaderLineCache::new(MAX_INTERNED_HEADER_LINES));

/// `content-type` -> `Content-Type`
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Write a dispatcher response onto the wire.
///
/// The body is always serialized as JSON; `Content-Type: application/json` is added
/// when the response does not carry its own, or when its own content type can no
/// longer be interned. Other headers that cannot be interned are skipped with a
/// warning.
pub fn write_handler_response(res: &mut Response, resp: &HandlerResponse) {
    res.status_code(resp.status as usize, status_reason(resp.status));
    let mut content_type_written = false;
    for (name, value) in &resp.headers {
        let is_content_type = name.eq_ignore_ascii_case("content-type");
        match HEADER_LINES.line(name, value) {
            Some(line) => {
                res.header(line);
                content_type_written |= is_content_type;
            }
            None => warn!(
                header = %name,
                limit = MAX_INTERNED_HEADER_LINES,
                "Header line cache full, header dropped"
            ),
        }
    }
    if !content_type_written {
        res.header(DEFAULT_CONTENT_TYPE);
    }
    match serde_json::to_vec(&resp.body) {
        Ok(bytes) => res.body_vec(bytes),
        Err(e) => {
            error!(status = resp.status, error = %e, "Response body serialization failed");
            res.status_code(500, status_reason(500));
            res.body_vec(br#"{"error":"Internal Server Error"}"#.to_vec());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_header_name() {
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("allow"), "Allow");
        assert_eq!(canonical_header_name("X-REQUEST-ID"), "X-Request-Id");
    }

    #[test]
    fn test_header_lines_are_interned() {
        let a = HEADER_LINES.line("allow", "GET, POST").unwrap();
        let b = HEADER_LINES.line("Allow", "GET, POST").unwrap();
        assert_eq!(a, "Allow: GET, POST");
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_header_line_cache_stays_bounded() {
        let cache = HeaderLineCache::new(16);
        let kept = cache.line("content-type", "application/json").unwrap();
        for i in 0..1000 {
            let _ = cache.line("location", &format!("/users/{i}"));
        }
        assert_eq!(cache.len(), 16);
        assert!(cache.line("location", "/users/1000").is_none());
        let again = cache.line("Content-Type", "application/json").unwrap();
        assert!(std::ptr::eq(kept, again));
        // lines seen before the cache filled still resolve
        assert_eq!(cache.line("location", "/users/3"), Some("Location: /users/3"));
    }

    #[test]
    fn test_global_cache_limit() {
        assert_eq!(HEADER_LINES.limit, MAX_INTERNED_HEADER_LINES);
    }
}
