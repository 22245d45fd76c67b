//! Router core - the request-time lookup path.
//!
//! Given a concrete path and an HTTP method, the router finds every
//! registered pattern that matches, ranks the candidates by specificity, and
//! returns the winning handler descriptor together with the extracted URI
//! template variables. Variables are carried on the per-call [`RouteMatch`],
//! never written onto the shared descriptor, so one descriptor can serve any
//! number of concurrently in-flight requests.

use http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::table::RouteTable;
use crate::error::LookupError;
use crate::pattern::{PathMatcher, VarMap};
use crate::route::HandlerDescriptor;
use crate::specificity::SpecificityRanker;

/// Result of successfully resolving a request path to a route.
///
/// Transient: produced fresh per lookup and valid for exactly one in-flight
/// request.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The winning pattern, as registered (normalized)
    pub pattern: String,
    /// The handler descriptor registered for (pattern, method)
    pub descriptor: Arc<HandlerDescriptor>,
    /// Extracted URI template variables, decoded
    pub variables: VarMap,
}

impl RouteMatch {
    /// Get an extracted variable by name.
    ///
    /// Uses "last write wins" semantics: when several patterns tied for best
    /// specificity bind the same name, the later registration's value is
    /// returned.
    #[inline]
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert the variables to a `HashMap` for compatibility.
    /// Note: this allocates - use `variable()` in hot paths instead.
    #[must_use]
    pub fn variables_map(&self) -> HashMap<String, String> {
        self.variables
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Composition root for lookups: candidate filtering via the path matcher,
/// best-match selection via the specificity ranker.
#[derive(Debug, Clone)]
pub struct Router {
    table: Arc<RouteTable>,
    matcher: PathMatcher,
}

impl Router {
    /// Create a router over a shared route table.
    #[must_use]
    pub fn new(table: Arc<RouteTable>) -> Self {
        Router {
            table,
            matcher: PathMatcher::new(),
        }
    }

    /// The underlying route table.
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Resolve a request path and HTTP method to a handler.
    ///
    /// # Arguments
    ///
    /// * `path` - decoded request path (e.g. `/users/123`)
    /// * `method` - HTTP method token
    ///
    /// # Errors
    ///
    /// * [`LookupError::NotFound`] - no registered pattern matches the path
    /// * [`LookupError::MethodNotAllowed`] - a pattern matches but the method
    ///   is not registered for it; these are distinct failure kinds and map
    ///   to 404 / 405 respectively
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use http::Method;
    ///
    /// let m = router.lookup("/users/123", &Method::GET)?;
    /// assert_eq!(m.variable("id"), Some("123"));
    /// ```
    pub fn lookup(&self, path: &str, method: &Method) -> Result<RouteMatch, LookupError> {
        debug!(method = %method, path = %path, "Route lookup attempt");
        let start = Instant::now();
        let snapshot = self.table.load();

        // Exact-key fast path: no regex evaluation.
        if let Some(entry) = snapshot.entries.get(path) {
            if let Some(descriptor) = entry.get(method) {
                info!(
                    method = %method,
                    path = %path,
                    pattern = %path,
                    handler_name = %descriptor.handler_name,
                    duration_us = start.elapsed().as_micros() as u64,
                    "Route matched (exact)"
                );
                return Ok(RouteMatch {
                    pattern: path.to_string(),
                    descriptor: Arc::clone(descriptor),
                    variables: VarMap::new(),
                });
            }
        }

        let mut candidates: Vec<&str> = Vec::new();
        for pattern in &snapshot.patterns {
            if self.matcher.matches(pattern, path)? {
                candidates.push(pattern.as_str());
            }
        }
        if candidates.is_empty() {
            warn!(
                method = %method,
                path = %path,
                duration_us = start.elapsed().as_micros() as u64,
                "No route matched"
            );
            return Err(LookupError::NotFound {
                method: method.clone(),
                path: path.to_string(),
            });
        }

        let ranker = SpecificityRanker::new(path);
        // stable sort: ties keep registration order
        candidates.sort_by(|a, b| ranker.compare(a, b));
        let best = candidates[0];

        // A pattern normalized without its trailing slash still resolves.
        let entry = match snapshot.entries.get(best) {
            Some(entry) => entry,
            None => {
                let trimmed = best.trim_end_matches('/');
                match snapshot.entries.get(trimmed) {
                    Some(entry) => entry,
                    None => {
                        return Err(LookupError::NotFound {
                            method: method.clone(),
                            path: path.to_string(),
                        })
                    }
                }
            }
        };

        let Some(descriptor) = entry.get(method) else {
            let mut allowed: Vec<Method> = entry.keys().cloned().collect();
            allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
            info!(
                method = %method,
                path = %path,
                pattern = %best,
                allowed = ?allowed,
                "Method not allowed for matched route"
            );
            return Err(LookupError::MethodNotAllowed {
                method: method.clone(),
                path: path.to_string(),
                pattern: best.to_string(),
                allowed,
            });
        };

        // Union variables across every pattern tied for best specificity;
        // later candidates overwrite earlier ones on key collision.
        let mut variables = VarMap::new();
        for candidate in &candidates {
            if ranker.compare(best, candidate) != std::cmp::Ordering::Equal {
                break;
            }
            let extracted = self.matcher.extract_variables(candidate, path)?;
            for (name, value) in extracted {
                match variables.iter_mut().find(|(k, _)| k == &name) {
                    Some(slot) => slot.1 = value,
                    None => variables.push((name, value)),
                }
            }
        }

        let duration = start.elapsed();
        if duration > Duration::from_millis(1) {
            warn!(
                method = %method,
                path = %path,
                pattern = %best,
                handler_name = %descriptor.handler_name,
                variables = ?variables,
                duration_us = duration.as_micros() as u64,
                "Slow route matching detected"
            );
        } else {
            info!(
                method = %method,
                path = %path,
                pattern = %best,
                handler_name = %descriptor.handler_name,
                variables = ?variables,
                duration_us = duration.as_micros() as u64,
                "Route matched"
            );
        }

        Ok(RouteMatch {
            pattern: best.to_string(),
            descriptor: Arc::clone(descriptor),
            variables,
        })
    }
}
