//! # Pattern Module
//!
//! Compilation and matching of Ant-style path patterns.
//!
//! ## Overview
//!
//! The pattern engine is responsible for:
//! - Compiling pattern segments (`?`, `*`, `{name}`, `{name:regex}`) into
//!   anchored regexes with ordered capture names
//! - Matching concrete paths against patterns segment by segment, including
//!   greedy `**` expansion across whole path segments
//! - Extracting URI template variables for a successful match
//!
//! ## Architecture
//!
//! Two-phase, like every matcher in this crate:
//!
//! 1. **Compilation**: each distinct segment string is compiled once into a
//!    [`CompiledSegment`] and cached in a bounded process-wide LRU. Malformed
//!    syntax fails here, at registration time, never per request.
//!
//! 2. **Matching**: [`PathMatcher`] tokenizes pattern and path and runs the
//!    two-pointer greedy walk, delegating single-segment comparisons to the
//!    cached matchers.
//!
//! ## Example
//!
//! ```rust,ignore
//! use antroute::pattern::PathMatcher;
//!
//! let matcher = PathMatcher::new();
//! assert!(matcher.matches("/a/**/b", "/a/x/y/b")?);
//! let vars = matcher.extract_variables("/user/{id}", "/user/42")?;
//! ```

mod cache;
mod glob;
mod matcher;

pub use cache::{compiled, SEGMENT_CACHE_CAPACITY};
pub use glob::{CompiledSegment, VarMap, MAX_INLINE_VARS};
pub use matcher::PathMatcher;
