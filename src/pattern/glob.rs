//! Glob compiler - turns one path-pattern segment into an executable matcher.
//!
//! A segment may contain `?` (exactly one character), `*` (zero or more
//! characters), `{name}` (a named capture of anything) or `{name:regex}` (a
//! named capture constrained by a user regex). Literal runs between the
//! specials are regex-quoted verbatim, so `report-?.pdf` matches exactly what
//! it says.

use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;

use crate::error::PatternError;

/// Maximum number of extracted variables before heap allocation.
/// Most route patterns carry ≤4 variables (e.g. `/users/{id}/posts/{post_id}`).
pub const MAX_INLINE_VARS: usize = 8;

/// Stack-allocated variable storage for the match hot path.
///
/// Variable names use `Arc<str>` instead of `String` because:
/// - Names come from compiled patterns (known at registration)
/// - `Arc::clone()` is O(1) atomic increment vs O(n) string copy
/// - Values remain `String` as they're per-request data from the URL
pub type VarMap = SmallVec<[(Arc<str>, String); MAX_INLINE_VARS]>;

/// One compiled path-pattern segment: an anchored regex plus the ordered
/// list of variable names the regex captures (empty for literal and
/// wildcard segments).
#[derive(Debug, Clone)]
pub struct CompiledSegment {
    source: String,
    regex: Regex,
    variables: Vec<Arc<str>>,
}

impl CompiledSegment {
    /// Compile a single pattern segment.
    ///
    /// Transforms glob specials into regex (`?` → `.`, `*` → `.*`,
    /// `{name}` → `(.*)`, `{name:regex}` → `(regex)`) and quotes everything
    /// else. Malformed brace nesting fails here, at construction time, never
    /// at match time.
    ///
    /// # Errors
    ///
    /// * [`PatternError::UnbalancedBrace`] - a `{` group is never closed
    /// * [`PatternError::InvalidRegex`] - a `{name:regex}` regex does not compile
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let seg = CompiledSegment::compile("{id:\\d+}")?;
    /// assert!(seg.is_match("42"));
    /// assert_eq!(seg.variables(), &[Arc::from("id")]);
    /// ```
    pub fn compile(segment: &str) -> Result<Self, PatternError> {
        let mut pattern = String::with_capacity(segment.len() + 8);
        pattern.push('^');
        let mut variables: Vec<Arc<str>> = Vec::new();
        let mut literal = String::new();

        let mut chars = segment.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '?' => {
                    flush_literal(&mut pattern, &mut literal);
                    pattern.push('.');
                }
                '*' => {
                    flush_literal(&mut pattern, &mut literal);
                    pattern.push_str(".*");
                }
                '{' => {
                    flush_literal(&mut pattern, &mut literal);
                    // Track nesting depth so a variable regex may contain
                    // `{m,n}` repetitions.
                    let mut depth = 1usize;
                    let mut group = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        match c {
                            '{' => {
                                depth += 1;
                                group.push(c);
                            }
                            '}' => {
                                depth -= 1;
                                if depth == 0 {
                                    closed = true;
                                    break;
                                }
                                group.push(c);
                            }
                            _ => group.push(c),
                        }
                    }
                    if !closed {
                        return Err(PatternError::UnbalancedBrace {
                            segment: segment.to_string(),
                        });
                    }
                    match group.split_once(':') {
                        Some((name, regex)) => {
                            pattern.push('(');
                            pattern.push_str(regex);
                            pattern.push(')');
                            variables.push(Arc::from(name));
                        }
                        None => {
                            pattern.push_str("(.*)");
                            variables.push(Arc::from(group.as_str()));
                        }
                    }
                }
                _ => literal.push(ch),
            }
        }
        flush_literal(&mut pattern, &mut literal);
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|err| PatternError::InvalidRegex {
            segment: segment.to_string(),
            detail: err.to_string(),
        })?;

        Ok(CompiledSegment {
            source: segment.to_string(),
            regex,
            variables,
        })
    }

    /// The segment text this matcher was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Ordered variable names this segment captures.
    #[must_use]
    pub fn variables(&self) -> &[Arc<str>] {
        &self.variables
    }

    /// Test a path segment against this matcher without extracting anything.
    #[inline]
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Match a path segment and write captured variable values into `vars`.
    ///
    /// Returns `Ok(false)` on a plain mismatch. A successful match whose
    /// captured-group count differs from the declared variable count is a
    /// configuration error, not a soft failure.
    ///
    /// # Errors
    ///
    /// [`PatternError::VariableCountMismatch`] when a user regex inside
    /// `{name:regex}` contains its own capturing groups.
    pub fn capture_into(&self, text: &str, vars: &mut VarMap) -> Result<bool, PatternError> {
        let Some(caps) = self.regex.captures(text) else {
            return Ok(false);
        };
        let captured = caps.len() - 1;
        if captured != self.variables.len() {
            return Err(PatternError::VariableCountMismatch {
                segment: self.source.clone(),
                declared: self.variables.len(),
                captured,
            });
        }
        for (i, name) in self.variables.iter().enumerate() {
            let value = caps.get(i + 1).map_or("", |m| m.as_str()).to_string();
            match vars.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value,
                None => vars.push((Arc::clone(name), value)),
            }
        }
        Ok(true)
    }
}

fn flush_literal(pattern: &mut String, literal: &mut String) {
    if !literal.is_empty() {
        pattern.push_str(&regex::escape(literal));
        literal.clear();
    }
}
