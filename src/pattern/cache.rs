//! Process-wide cache of compiled segments.
//!
//! Segment compilation is regex construction, which is far too expensive for
//! the per-request path. The cache is shared by every matcher in the process
//! and is bounded: under pathologically diverse pattern traffic the LRU
//! evicts cold entries instead of growing without limit.

use lru::LruCache;
use once_cell::sync::Lazy;
use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock};

use super::glob::CompiledSegment;
use crate::error::PatternError;

/// Capacity of the compiled-segment cache.
pub const SEGMENT_CACHE_CAPACITY: usize = 1024;

// RwLock for read/write separation: reads use peek() so the shared path never
// needs &mut; recency only updates when a miss inserts.
static SEGMENT_CACHE: Lazy<RwLock<LruCache<String, Arc<CompiledSegment>>>> = Lazy::new(|| {
    RwLock::new(LruCache::new(
        NonZeroUsize::new(SEGMENT_CACHE_CAPACITY).expect("segment cache capacity must be > 0"),
    ))
});

/// Fetch the compiled form of a segment, compiling and caching on miss.
///
/// Safe for concurrent population: a poisoned lock degrades to compiling
/// uncached rather than panicking on the request path.
///
/// # Errors
///
/// Propagates [`PatternError`] from compilation; errors are not cached.
pub fn compiled(segment: &str) -> Result<Arc<CompiledSegment>, PatternError> {
    if let Ok(cache) = SEGMENT_CACHE.read() {
        if let Some(hit) = cache.peek(segment) {
            return Ok(Arc::clone(hit));
        }
    }
    let fresh = Arc::new(CompiledSegment::compile(segment)?);
    if let Ok(mut cache) = SEGMENT_CACHE.write() {
        cache.put(segment.to_string(), Arc::clone(&fresh));
    }
    Ok(fresh)
}

/// Current number of cached segments (test hook).
#[cfg(test)]
pub(crate) fn cache_len() -> usize {
    SEGMENT_CACHE.read().map(|c| c.len()).unwrap_or(0)
}
