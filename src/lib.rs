//! # antroute
//!
//! **antroute** is an Ant-style path-pattern routing engine with
//! specificity-based disambiguation and a typed parameter-binding pipeline.
//!
//! ## Overview
//!
//! The crate covers the registration-to-invocation core of a web router and
//! nothing else: pattern compilation, greedy wildcard matching, URI template
//! variable extraction, conflict-checked route registration, best-match
//! lookup, and declarative argument binding. Transport, middleware chains,
//! and handler dispatch belong to the embedding application.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`pattern`]** - segment compilation (`?`, `*`, `**`, `{name}`,
//!   `{name:regex}`) and the greedy segment-wise matching algorithm
//! - **[`specificity`]** - the fixed multi-criterion comparator that orders
//!   patterns matching the same path from most to least specific
//! - **[`route`]** - the [`Handler`](route::Handler) trait and
//!   [`HandlerDescriptor`](route::HandlerDescriptor) metadata
//! - **[`router`]** - the conflict-checked
//!   [`RouteTable`](router::RouteTable) and the request-time
//!   [`Router`](router::Router) lookup
//! - **[`binder`]** - the [`ArgumentBinder`](binder::ArgumentBinder) that
//!   turns declared parameter bindings plus resolved request data into an
//!   ordered argument list
//! - **[`error`]** - per-kind error types; registration errors are fatal,
//!   lookup and binding errors are per-request values
//!
//! ## Pattern syntax
//!
//! | token | matches |
//! |-------|---------|
//! | `?` | exactly one character within a segment |
//! | `*` | zero or more characters within a segment |
//! | `**` | zero or more whole path segments |
//! | `{name}` | one segment, captured as `name` |
//! | `{name:regex}` | one segment constrained by `regex`, captured as `name` |
//!
//! ## Request handling flow
//!
//! Registration time: route definitions → [`RouteTable::register`](router::RouteTable::register)
//! (normalization + conflict detection). Request time: (path, method) →
//! [`Router::lookup`](router::Router::lookup) → candidate filtering →
//! specificity ranking → [`RouteMatch`](router::RouteMatch) with extracted
//! variables → [`ArgumentBinder::bind`](binder::ArgumentBinder::bind) →
//! handler invocation (outside this crate).
//!
//! ## Example
//!
//! ```rust,ignore
//! use antroute::binder::{ArgumentBinder, CoerceTarget, ParamSpec};
//! use antroute::route::HandlerDescriptor;
//! use antroute::router::{RouteTable, Router};
//! use http::Method;
//! use std::sync::Arc;
//!
//! let table = Arc::new(RouteTable::new());
//! let descriptor = HandlerDescriptor::new("get_user", get_user)
//!     .with_params(vec![ParamSpec::path_variable("id", CoerceTarget::Integer)]);
//! table.register("/user/{id}", &[Method::GET], descriptor)?;
//!
//! let router = Router::new(table);
//! let m = router.lookup("/user/42", &Method::GET)?;
//! let binder = ArgumentBinder::new(m.descriptor.params.clone())?;
//! let args = binder.bind(&Default::default(), &m.variables, None, &[])?;
//! let response = m.descriptor.handler.invoke(&args);
//! ```
//!
//! ## Concurrency
//!
//! Lookup is synchronous and lock-free: the route table publishes immutable
//! snapshots and compiled segments live in a bounded concurrent cache.
//! Registration and [`clear`](router::RouteTable::clear) serialize on a
//! writer lock and are intended for bootstrap/reload, not for mixing with
//! request traffic.

pub mod binder;
pub mod error;
pub mod pattern;
pub mod route;
pub mod router;
pub mod specificity;

pub use binder::{ArgumentBinder, BoundArg, BoundValue, CoerceTarget, ParamSpec};
pub use error::{BindError, LookupError, PatternError, RegisterError};
pub use pattern::{PathMatcher, VarMap};
pub use route::{Handler, HandlerDescriptor};
pub use router::{normalize_pattern, RouteMatch, RouteTable, Router};
pub use specificity::{PatternInfo, SpecificityRanker};
