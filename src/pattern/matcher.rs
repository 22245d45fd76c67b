//! Segment-wise path matching with greedy `**` expansion.
//!
//! Patterns and paths are tokenized into `/`-separated segments and walked
//! with two pointers. Literal, `?`/`*` and `{name}` segments are compared
//! one-to-one through [`CompiledSegment`] matchers; a `**` segment matches
//! zero or more whole path segments. The middle region between two `**`
//! bounds is resolved by a greedy leftmost-window scan: the first window of
//! path segments that satisfies the literal sub-pattern is accepted and the
//! scan advances past it. This is not backtracking - adjacent `**/**` behave
//! exactly like a single `**`.

use super::cache;
use super::glob::VarMap;
use crate::error::PatternError;

/// Path matcher for Ant-style patterns.
///
/// Stateless apart from tokenization options; cheap to clone and share.
///
/// # Example
///
/// ```rust,ignore
/// let matcher = PathMatcher::new();
/// assert!(matcher.matches("/user/{id}", "/user/42")?);
/// let vars = matcher.extract_variables("/user/{id}", "/user/42")?;
/// assert_eq!(vars[0].1, "42");
/// ```
#[derive(Debug, Clone)]
pub struct PathMatcher {
    trim_tokens: bool,
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PathMatcher {
    /// Create a matcher with default tokenization (no segment trimming).
    #[must_use]
    pub fn new() -> Self {
        PathMatcher { trim_tokens: false }
    }

    /// Create a matcher that trims whitespace from every segment before
    /// comparing.
    #[must_use]
    pub fn with_trim_tokens(trim_tokens: bool) -> Self {
        PathMatcher { trim_tokens }
    }

    /// Full match: does `pattern` match the whole of `path`?
    ///
    /// # Errors
    ///
    /// Propagates [`PatternError`] for malformed pattern segments.
    pub fn matches(&self, pattern: &str, path: &str) -> Result<bool, PatternError> {
        self.do_match(pattern, path, true, &mut None)
    }

    /// Prefix match: could `path` grow into something `pattern` matches?
    ///
    /// Short-circuits true once a `**` is reached in the pattern and all
    /// segments consumed so far matched. Used for "does this pattern
    /// dominate as a namespace" checks.
    ///
    /// # Errors
    ///
    /// Propagates [`PatternError`] for malformed pattern segments.
    pub fn matches_prefix(&self, pattern: &str, path: &str) -> Result<bool, PatternError> {
        self.do_match(pattern, path, false, &mut None)
    }

    /// Extract URI template variables from a matching path.
    ///
    /// Reruns the full-match walk with an output map; every successful
    /// segment match writes its captured values. Callers must pre-check
    /// with [`PathMatcher::matches`].
    ///
    /// # Errors
    ///
    /// * [`PatternError::NotMatched`] - the pattern does not match the path
    /// * [`PatternError::VariableCountMismatch`] - a segment's regex captured
    ///   a different number of groups than it declares (configuration error)
    pub fn extract_variables(&self, pattern: &str, path: &str) -> Result<VarMap, PatternError> {
        let mut vars = VarMap::new();
        if !self.do_match(pattern, path, true, &mut Some(&mut vars))? {
            return Err(PatternError::NotMatched {
                pattern: pattern.to_string(),
                path: path.to_string(),
            });
        }
        Ok(vars)
    }

    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split('/')
            .map(|s| if self.trim_tokens { s.trim() } else { s })
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn do_match(
        &self,
        pattern: &str,
        path: &str,
        full_match: bool,
        vars: &mut Option<&mut VarMap>,
    ) -> Result<bool, PatternError> {
        // Leading-separator presence must agree.
        if pattern.starts_with('/') != path.starts_with('/') {
            return Ok(false);
        }
        let patt = self.tokenize(pattern);
        let dirs = self.tokenize(path);

        // Remaining windows [p_lo, p_hi) and [s_lo, s_hi).
        let (mut p_lo, mut p_hi) = (0usize, patt.len());
        let (mut s_lo, mut s_hi) = (0usize, dirs.len());

        // Walk from the front until a `**` or either side is exhausted.
        while p_lo < p_hi && s_lo < s_hi {
            if patt[p_lo] == "**" {
                break;
            }
            if !segment_matches(patt[p_lo], dirs[s_lo], vars)? {
                return Ok(false);
            }
            p_lo += 1;
            s_lo += 1;
        }

        if s_lo == s_hi {
            // Path exhausted first.
            if p_lo == p_hi {
                return Ok(pattern.ends_with('/') == path.ends_with('/'));
            }
            if !full_match {
                return Ok(true);
            }
            if p_hi - p_lo == 1
                && patt[p_lo] == "*"
                && pattern.ends_with('/') == path.ends_with('/')
            {
                return Ok(true);
            }
            return Ok(patt[p_lo..p_hi].iter().all(|s| *s == "**"));
        }
        if p_lo == p_hi {
            // Pattern exhausted but path segments remain.
            return Ok(false);
        }
        if !full_match && patt[p_lo] == "**" {
            // Prefix mode: everything consumed so far matched.
            return Ok(true);
        }

        // Walk from the back symmetrically.
        while p_lo < p_hi && s_lo < s_hi {
            if patt[p_hi - 1] == "**" {
                break;
            }
            if !segment_matches(patt[p_hi - 1], dirs[s_hi - 1], vars)? {
                return Ok(false);
            }
            p_hi -= 1;
            s_hi -= 1;
        }
        if s_lo == s_hi {
            return Ok(patt[p_lo..p_hi].iter().all(|s| *s == "**"));
        }

        // Middle region bounded by `**` on both sides: greedy leftmost-window
        // scan for each literal sub-pattern.
        while p_lo + 1 < p_hi && s_lo < s_hi {
            let mut next = p_lo + 1;
            while next < p_hi && patt[next] != "**" {
                next += 1;
            }
            if next == p_lo + 1 {
                // Adjacent `**/**` collapses to a single `**`.
                p_lo += 1;
                continue;
            }
            let pat_len = next - p_lo - 1;
            let str_len = s_hi - s_lo;
            if pat_len > str_len {
                return Ok(false);
            }
            let mut found = None;
            'scan: for offset in 0..=(str_len - pat_len) {
                for j in 0..pat_len {
                    if !segment_matches(patt[p_lo + 1 + j], dirs[s_lo + offset + j], vars)? {
                        continue 'scan;
                    }
                }
                found = Some(s_lo + offset);
                break;
            }
            match found {
                Some(at) => {
                    p_lo = next;
                    s_lo = at + pat_len;
                }
                None => return Ok(false),
            }
        }

        // Leftover pattern segments can only be swallowed by `**`.
        Ok(patt[p_lo..p_hi].iter().all(|s| *s == "**"))
    }
}

fn segment_matches(
    segment: &str,
    dir: &str,
    vars: &mut Option<&mut VarMap>,
) -> Result<bool, PatternError> {
    let compiled = cache::compiled(segment)?;
    match vars.as_deref_mut() {
        Some(map) => compiled.capture_into(dir, map),
        None => Ok(compiled.is_match(dir)),
    }
}
