//! # Router Module
//!
//! Route registration and request-time lookup.
//!
//! ## Overview
//!
//! The router module is responsible for:
//! - Normalizing and registering route patterns with conflict detection
//! - Matching incoming (path, method) pairs to registered handlers
//! - Selecting the most specific pattern when several match
//! - Extracting URI template variables into a per-call [`RouteMatch`]
//!
//! ## Architecture
//!
//! Registration happens during bootstrap or reload: [`RouteTable::register`]
//! normalizes the pattern, probes the existing table for duplicate
//! definitions, and publishes a new immutable snapshot. Request traffic only
//! ever loads snapshots, so lookups are lock-free.
//!
//! [`Router::lookup`] resolves a request in three steps: an exact-key fast
//! path that skips regex evaluation entirely, a candidate scan over every
//! registered pattern, and specificity ranking to pick the winner.
//!
//! ## Example
//!
//! ```rust,ignore
//! use antroute::route::HandlerDescriptor;
//! use antroute::router::{RouteTable, Router};
//! use http::Method;
//! use std::sync::Arc;
//!
//! let table = Arc::new(RouteTable::new());
//! table.register("/pets/{id}", &[Method::GET], descriptor)?;
//!
//! let router = Router::new(table);
//! let m = router.lookup("/pets/123", &Method::GET)?;
//! assert_eq!(m.variable("id"), Some("123"));
//! ```

mod core;
mod table;

pub use core::{RouteMatch, Router};
pub use table::{normalize_pattern, RouteTable};
