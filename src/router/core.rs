//! Route table - registration and resolution.
//!
//! The table is an ordered list of `(method, pattern, handler)` entries. It is
//! built once at startup and is read-only afterwards, so a single `Arc<RouteTable>`
//! can be shared by every request without locking.

use super::pattern::{split_path, ParamVec, RoutePattern};
use crate::dispatcher::{Handler, HandlerResult, RequestContext};
use crate::errors::RegistrationError;
use http::Method;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A registered route.
#[derive(Clone)]
pub struct RouteEntry {
    /// HTTP method this entry answers
    pub method: Method,
    /// Compiled pattern
    pub pattern: RoutePattern,
    /// Bound handler
    pub handler: Arc<dyn Handler>,
    /// Position in registration order
    pub index: usize,
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Result of successfully matching a request to an entry.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched entry
    pub entry: RouteEntry,
    /// Path parameters in pattern order (e.g., `{id}` → `("id", "123")`)
    pub path_params: ParamVec,
}

impl RouteMatch {
    /// Get a path parameter by name
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Outcome of [`RouteTable::resolve`].
///
/// Path mismatch and method mismatch are distinct so the caller can answer 404 or
/// 405.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A pattern registered for the request method matched
    Matched(RouteMatch),
    /// Some pattern matched the path, but not for this method
    MethodNotAllowed {
        /// Methods registered for the patterns that matched, in conventional order
        allowed: Vec<Method>,
    },
    /// No pattern has the shape of the path
    NotFound,
}

/// Ordered collection of routes.
#[derive(Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a handler for `method` and `pattern`.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::InvalidPattern`] when the pattern does not compile
    /// - [`RegistrationError::DuplicateRoute`] when the method already has a route with
    ///   the same shape; the existing entry is kept
    pub fn register<F>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: F,
    ) -> Result<&mut Self, RegistrationError>
    where
        F: Fn(&RequestContext) -> HandlerResult + Send + Sync + 'static,
    {
        self.register_handler(method, pattern, Arc::new(handler))
    }

    /// Register an already shared handler, e.g. a controller struct.
    ///
    /// # Errors
    ///
    /// Same as [`RouteTable::register`].
    pub fn register_handler(
        &mut self,
        method: Method,
        pattern: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<&mut Self, RegistrationError> {
        let pattern = RoutePattern::parse(pattern)?;
        self.insert(method, pattern, handler)?;
        Ok(self)
    }

    /// Register routes under a shared path prefix.
    ///
    /// Every pattern registered on the [`RouteGroup`] is appended to `prefix`.
    /// Groups can be nested.
    ///
    /// ```rust
    /// use http::Method;
    /// use switchyard::dispatcher::HandlerResponse;
    /// use switchyard::router::RouteTable;
    /// use serde_json::json;
    ///
    /// let mut table = RouteTable::new();
    /// table
    ///     .group("/users", |users| {
    ///         users.register(Method::GET, "/", |_req| Ok(HandlerResponse::ok(json!({"users": []}))))?;
    ///         users.register(Method::GET, "/{id}", |req| {
    ///             Ok(HandlerResponse::ok(json!({"id": req.get_path_param("id")})))
    ///         })?;
    ///         Ok(())
    ///     })
    ///     .unwrap();
    /// assert_eq!(table.len(), 2);
    /// ```
    ///
    /// # Errors
    ///
    /// Propagates the first registration error raised inside the group, or an
    /// invalid prefix.
    pub fn group<F>(&mut self, prefix: &str, build: F) -> Result<&mut Self, RegistrationError>
    where
        F: FnOnce(&mut RouteGroup<'_>) -> Result<(), RegistrationError>,
    {
        let prefix = RoutePattern::parse(prefix)?;
        let mut group = RouteGroup {
            table: &mut *self,
            prefix,
        };
        build(&mut group)?;
        Ok(self)
    }

    fn insert(
        &mut self,
        method: Method,
        pattern: RoutePattern,
        handler: Arc<dyn Handler>,
    ) -> Result<(), RegistrationError> {
        if let Some(existing) = self
            .entries
            .iter()
            .find(|e| e.method == method && e.pattern.same_shape(&pattern))
        {
            warn!(
                method = %method,
                pattern = %pattern,
                existing_pattern = %existing.pattern,
                "Duplicate route rejected"
            );
            return Err(RegistrationError::DuplicateRoute {
                method,
                pattern: pattern.as_str().to_string(),
            });
        }

        debug!(
            method = %method,
            pattern = %pattern,
            params = ?pattern.param_names().collect::<Vec<_>>(),
            index = self.entries.len(),
            "Route registered"
        );

        let index = self.entries.len();
        self.entries.push(RouteEntry {
            method,
            pattern,
            handler,
            index,
        });
        Ok(())
    }

    /// Number of registered routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no routes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order
    pub fn routes(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    /// Log the table summary and every route at debug level.
    pub fn dump_routes(&self) {
        let routes_summary: Vec<String> = self
            .entries
            .iter()
            .take(10)
            .map(|e| format!("{} {}", e.method, e.pattern))
            .collect();
        info!(
            routes_count = self.entries.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );
        for e in &self.entries {
            debug!(method = %e.method, pattern = %e.pattern, index = e.index, "[route]");
        }
    }

    /// Resolve a request to at most one entry.
    ///
    /// Candidates are the entries registered for `method` whose pattern matches the
    /// path. Among them the pattern with a literal at the earliest position where
    /// candidates differ wins; remaining ties go to the earliest registration.
    /// When no candidate exists the table reports either
    /// [`Resolution::MethodNotAllowed`] (the path matched under other methods) or
    /// [`Resolution::NotFound`].
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution {
        debug!(method = %method, path = %path, "Route match attempt");

        let segments = split_path(path);
        let mut best: Option<(&RouteEntry, ParamVec)> = None;
        for entry in self.entries.iter().filter(|e| e.method == *method) {
            let Some(params) = entry.pattern.matches(&segments) else {
                continue;
            };
            let better = match &best {
                None => true,
                // Strictly greater: earlier registrations keep ties.
                Some((current, _)) => {
                    entry.pattern.precedence(&current.pattern) == Ordering::Greater
                }
            };
            if better {
                best = Some((entry, params));
            }
        }

        if let Some((entry, path_params)) = best {
            debug!(
                method = %method,
                path = %path,
                pattern = %entry.pattern,
                path_params = ?path_params,
                "Route matched"
            );
            return Resolution::Matched(RouteMatch {
                entry: entry.clone(),
                path_params,
            });
        }

        let allowed = self.methods_matching(&segments);
        if allowed.is_empty() {
            debug!(method = %method, path = %path, "No route matched");
            Resolution::NotFound
        } else {
            debug!(
                method = %method,
                path = %path,
                allowed = ?allowed,
                "Path matched but method not allowed"
            );
            Resolution::MethodNotAllowed { allowed }
        }
    }

    /// Methods registered for any pattern matching `path`, in conventional order.
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        self.methods_matching(&split_path(path))
    }

    fn methods_matching(&self, segments: &[&str]) -> Vec<Method> {
        let mut allowed: Vec<Method> = Vec::new();
        for entry in &self.entries {
            if !allowed.contains(&entry.method) && entry.pattern.matches(segments).is_some() {
                allowed.push(entry.method.clone());
            }
        }
        allowed.sort_by_key(method_rank);
        allowed
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

/// Registration scope created by [`RouteTable::group`].
pub struct RouteGroup<'t> {
    table: &'t mut RouteTable,
    prefix: RoutePattern,
}

impl RouteGroup<'_> {
    /// Register a handler for `prefix + pattern`.
    ///
    /// # Errors
    ///
    /// Same as [`RouteTable::register`], plus a parameter name shared between the
    /// prefix and the pattern.
    pub fn register<F>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: F,
    ) -> Result<&mut Self, RegistrationError>
    where
        F: Fn(&RequestContext) -> HandlerResult + Send + Sync + 'static,
    {
        self.register_handler(method, pattern, Arc::new(handler))
    }

    /// Register an already shared handler under the group prefix.
    ///
    /// # Errors
    ///
    /// Same as [`RouteGroup::register`].
    pub fn register_handler(
        &mut self,
        method: Method,
        pattern: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<&mut Self, RegistrationError> {
        let inner = RoutePattern::parse(pattern)?;
        let full = RoutePattern::join(&self.prefix, &inner)?;
        self.table.insert(method, full, handler)?;
        Ok(self)
    }

    /// Open a nested group below this one.
    ///
    /// # Errors
    ///
    /// Propagates the first registration error raised inside the nested group.
    pub fn group<F>(&mut self, prefix: &str, build: F) -> Result<&mut Self, RegistrationError>
    where
        F: FnOnce(&mut RouteGroup<'_>) -> Result<(), RegistrationError>,
    {
        let inner = RoutePattern::parse(prefix)?;
        let prefix = RoutePattern::join(&self.prefix, &inner)?;
        let mut nested = RouteGroup {
            table: &mut *self.table,
            prefix,
        };
        build(&mut nested)?;
        Ok(self)
    }

    /// Full prefix of this group
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }
}

/// Sort key giving the conventional method order used in `Allow` headers.
fn method_rank(method: &Method) -> (u8, String) {
    let rank = match *method {
        Method::GET => 0,
        Method::HEAD => 1,
        Method::POST => 2,
        Method::PUT => 3,
        Method::PATCH => 4,
        Method::DELETE => 5,
        Method::OPTIONS => 6,
        Method::TRACE => 7,
        Method::CONNECT => 8,
        _ => 9,
    };
    (rank, method.as_str().to_string())
}
