//! Route table: owns the pattern → method → handler mapping.
//!
//! Registration normalizes patterns, detects duplicate definitions, and
//! publishes an immutable snapshot. Lookups read the snapshot without
//! locking; writers serialize on a mutex and replace the snapshot whole
//! (read-copy-update). Mutation is expected only during bootstrap and reload
//! cycles, never mixed with request traffic.

use arc_swap::ArcSwap;
use http::Method;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::error::{PatternError, RegisterError};
use crate::pattern::{compiled, PathMatcher};
use crate::route::HandlerDescriptor;

pub(crate) type MethodMap = HashMap<Method, Arc<HandlerDescriptor>>;

/// Immutable view of the table contents, swapped atomically on mutation.
#[derive(Debug, Default)]
pub(crate) struct TableSnapshot {
    /// Normalized pattern string → per-method handlers
    pub(crate) entries: HashMap<String, MethodMap>,
    /// Patterns in registration order; candidate iteration and specificity
    /// ties depend on this order being stable
    pub(crate) patterns: Vec<String>,
}

/// Normalize a route pattern for registration.
///
/// Each literal segment is lowercased. A variable segment keeps its braces;
/// the name portion is lowercased and an optional `:regex` portion is left
/// untouched. Every segment is compiled eagerly so malformed syntax fails at
/// registration, not at match time.
///
/// # Errors
///
/// * [`PatternError::MixedVariableSegment`] - braces mixed with literal text
/// * [`PatternError::UnbalancedBrace`] / [`PatternError::InvalidRegex`] -
///   propagated from segment compilation
pub fn normalize_pattern(pattern: &str) -> Result<String, PatternError> {
    let mut segments = Vec::new();
    for segment in pattern.split('/') {
        if segment.len() >= 2 && segment.starts_with('{') && segment.ends_with('}') {
            let inner = &segment[1..segment.len() - 1];
            let normalized = match inner.split_once(':') {
                Some((name, regex)) => format!("{{{}:{}}}", name.to_ascii_lowercase(), regex),
                None => format!("{{{}}}", inner.to_ascii_lowercase()),
            };
            segments.push(normalized);
        } else if segment.contains('{') || segment.contains('}') {
            return Err(PatternError::MixedVariableSegment {
                segment: segment.to_string(),
            });
        } else {
            segments.push(segment.to_ascii_lowercase());
        }
    }
    let normalized = segments.join("/");
    for segment in normalized.split('/').filter(|s| !s.is_empty()) {
        if segment != "**" {
            compiled(segment)?;
        }
    }
    Ok(normalized)
}

/// The mapping from normalized pattern to per-method handler descriptors.
///
/// Owns every [`HandlerDescriptor`]; the router and binder only reference
/// them for the duration of one request.
pub struct RouteTable {
    snapshot: ArcSwap<TableSnapshot>,
    write_lock: Mutex<()>,
    matcher: PathMatcher,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        RouteTable {
            snapshot: ArcSwap::from_pointee(TableSnapshot::default()),
            write_lock: Mutex::new(()),
            matcher: PathMatcher::new(),
        }
    }

    /// Register a handler for a pattern and a set of HTTP methods.
    ///
    /// The pattern is normalized, then probed for duplicates: for every
    /// method, the new pattern string is looked up against the existing
    /// table (exact key or pattern match); any hit is a conflict naming both
    /// definitions. On success the `(method → handler)` entries merge into
    /// the per-pattern map, creating one if absent.
    ///
    /// # Errors
    ///
    /// * [`RegisterError::Pattern`] - the pattern is malformed (fatal at
    ///   startup)
    /// * [`RegisterError::Conflict`] - a `(pattern, method)` collision with
    ///   an existing registration
    pub fn register(
        &self,
        pattern: &str,
        methods: &[Method],
        descriptor: HandlerDescriptor,
    ) -> Result<(), RegisterError> {
        let normalized = normalize_pattern(pattern)?;
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let current = self.snapshot.load_full();

        for method in methods {
            if let Some((existing_pattern, existing)) =
                self.find_existing(&current, &normalized, method)?
            {
                return Err(RegisterError::Conflict {
                    pattern: normalized,
                    method: method.clone(),
                    existing_pattern,
                    existing_handler: existing.handler_name.clone(),
                    new_handler: descriptor.handler_name.clone(),
                });
            }
        }

        let mut descriptor = descriptor;
        descriptor.methods = methods.iter().cloned().collect();
        let shared = Arc::new(descriptor);

        let mut next = TableSnapshot {
            entries: current.entries.clone(),
            patterns: current.patterns.clone(),
        };
        if !next.patterns.contains(&normalized) {
            next.patterns.push(normalized.clone());
        }
        let entry = next.entries.entry(normalized.clone()).or_default();
        for method in methods {
            entry.insert(method.clone(), Arc::clone(&shared));
        }

        info!(
            pattern = %normalized,
            methods = ?methods,
            handler_name = %shared.handler_name,
            total_patterns = next.patterns.len(),
            "Route registered"
        );
        self.snapshot.store(Arc::new(next));
        Ok(())
    }

    /// Drop all entries. Used between reload cycles of the owning
    /// application.
    pub fn clear(&self) {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.snapshot.store(Arc::new(TableSnapshot::default()));
        info!("Route table cleared");
    }

    /// Number of registered patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.load().patterns.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered patterns in registration order.
    #[must_use]
    pub fn patterns(&self) -> Vec<String> {
        self.snapshot.load().patterns.clone()
    }

    /// Log every registered route. Useful for verifying that routes loaded
    /// correctly.
    pub fn dump_routes(&self) {
        let snapshot = self.snapshot.load();
        info!(pattern_count = snapshot.patterns.len(), "Route table dump");
        for pattern in &snapshot.patterns {
            if let Some(entry) = snapshot.entries.get(pattern) {
                for (method, descriptor) in entry {
                    info!(
                        method = %method,
                        pattern = %pattern,
                        handler_name = %descriptor.handler_name,
                        "Registered route"
                    );
                }
            }
        }
    }

    pub(crate) fn load(&self) -> Arc<TableSnapshot> {
        self.snapshot.load_full()
    }

    /// Lookup-by-exact-or-pattern-match used by the conflict probe: treats
    /// the new pattern string as a path against existing entries.
    fn find_existing(
        &self,
        snapshot: &TableSnapshot,
        pattern: &str,
        method: &Method,
    ) -> Result<Option<(String, Arc<HandlerDescriptor>)>, PatternError> {
        for existing in &snapshot.patterns {
            let Some(entry) = snapshot.entries.get(existing) else {
                continue;
            };
            let Some(descriptor) = entry.get(method) else {
                continue;
            };
            if existing == pattern || self.matcher.matches(existing, pattern)? {
                return Ok(Some((existing.clone(), Arc::clone(descriptor))));
            }
        }
        Ok(None)
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot.load();
        f.debug_struct("RouteTable")
            .field("patterns", &snapshot.patterns)
            .finish_non_exhaustive()
    }
}
