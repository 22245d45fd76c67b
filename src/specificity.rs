//! Specificity ordering for patterns that match the same concrete path.
//!
//! When several registered patterns match one request path, the most
//! specific pattern wins. "Most specific" is decided by a fixed
//! multi-criterion comparator, evaluated in priority order:
//!
//! 1. The literal catch-all `/**` is always least specific.
//! 2. A pattern exactly equal to the path beats every non-exact pattern.
//! 3. A prefix pattern (ends in `/**`) loses to any pattern without double
//!    wildcards, and vice versa.
//! 4. Lower total wildcard score wins (variables + single wildcards +
//!    2 x double wildcards).
//! 5. Longer effective length wins (every `{...}` collapses to one
//!    character), favoring more literal content.
//! 6. Fewer single wildcards wins.
//! 7. Fewer variables wins.
//! 8. Remaining ties are equal; a stable sort preserves registration order.
//!
//! Only standalone `*` and `**` segments count as wildcard segments: a `*`
//! embedded in a longer token such as `*.html` is part of that segment's
//! glob, not a wildcard segment.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static VARIABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^/]+?\}").expect("variable pattern is a valid regex"));

/// Derived per-pattern profile used by the comparator.
#[derive(Debug, Clone)]
pub struct PatternInfo {
    uri_vars: usize,
    single_wildcards: usize,
    double_wildcards: usize,
    catch_all: bool,
    prefix: bool,
    length: usize,
}

impl PatternInfo {
    /// Profile a pattern string.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let uri_vars = VARIABLE_RE.find_iter(pattern).count();
        let mut single_wildcards = 0;
        let mut double_wildcards = 0;
        for segment in pattern.split('/') {
            match segment {
                "*" => single_wildcards += 1,
                "**" => double_wildcards += 1,
                _ => {}
            }
        }
        PatternInfo {
            uri_vars,
            single_wildcards,
            double_wildcards,
            catch_all: pattern == "/**",
            prefix: pattern.ends_with("/**"),
            // every variable placeholder counts as exactly one character
            length: VARIABLE_RE.replace_all(pattern, "#").len(),
        }
    }

    /// Number of `{...}` variables.
    #[must_use]
    pub fn uri_vars(&self) -> usize {
        self.uri_vars
    }

    /// Number of standalone `*` segments.
    #[must_use]
    pub fn single_wildcards(&self) -> usize {
        self.single_wildcards
    }

    /// Number of `**` segments.
    #[must_use]
    pub fn double_wildcards(&self) -> usize {
        self.double_wildcards
    }

    fn total_wildcards(&self) -> usize {
        self.uri_vars + self.single_wildcards + 2 * self.double_wildcards
    }
}

/// Orders candidate patterns for one concrete path, most specific first.
///
/// The comparator is a total order but not consistent with string equality;
/// distinct patterns can rank equal. Callers use a stable sort so tied
/// patterns keep their registration order.
#[derive(Debug, Clone)]
pub struct SpecificityRanker {
    path: String,
}

impl SpecificityRanker {
    /// Build a ranker for the given concrete request path.
    #[must_use]
    pub fn new(path: &str) -> Self {
        SpecificityRanker {
            path: path.to_string(),
        }
    }

    /// Compare two patterns; `Ordering::Less` means `a` is more specific.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let info_a = PatternInfo::new(a);
        let info_b = PatternInfo::new(b);

        if info_a.catch_all && info_b.catch_all {
            return Ordering::Equal;
        }
        if info_a.catch_all {
            return Ordering::Greater;
        }
        if info_b.catch_all {
            return Ordering::Less;
        }

        if a == self.path {
            return if b == self.path {
                Ordering::Equal
            } else {
                Ordering::Less
            };
        }
        if b == self.path {
            return Ordering::Greater;
        }

        if info_a.prefix && info_b.double_wildcards == 0 {
            return Ordering::Greater;
        }
        if info_b.prefix && info_a.double_wildcards == 0 {
            return Ordering::Less;
        }

        match info_a.total_wildcards().cmp(&info_b.total_wildcards()) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        // longer effective length carries more literal content
        match info_b.length.cmp(&info_a.length) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        match info_a.single_wildcards.cmp(&info_b.single_wildcards) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        match info_a.uri_vars.cmp(&info_b.uri_vars) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        Ordering::Equal
    }

    /// Stable-sort candidates in place, most specific first.
    pub fn rank(&self, candidates: &mut [&str]) {
        candidates.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn best<'a>(path: &str, mut candidates: Vec<&'a str>) -> &'a str {
        SpecificityRanker::new(path).rank(&mut candidates);
        candidates[0]
    }

    #[test]
    fn exact_pattern_beats_variable_pattern() {
        assert_eq!(best("/user/42", vec!["/user/{id}", "/user/42"]), "/user/42");
        assert_eq!(best("/user/42", vec!["/user/42", "/user/{id}"]), "/user/42");
    }

    #[test]
    fn catch_all_is_always_least_specific() {
        assert_eq!(best("/x", vec!["/**", "/{name}"]), "/{name}");
        assert_eq!(
            SpecificityRanker::new("/x").compare("/**", "/**"),
            Ordering::Equal
        );
    }

    #[test]
    fn prefix_pattern_loses_to_wildcard_free_pattern() {
        assert_eq!(
            best("/files/report", vec!["/files/**", "/files/*"]),
            "/files/*"
        );
    }

    #[test]
    fn lower_wildcard_score_wins() {
        assert_eq!(
            best("/a/b/c", vec!["/a/*/{x}", "/a/*/c"]),
            "/a/*/c"
        );
    }

    #[test]
    fn longer_literal_content_breaks_score_ties() {
        // same wildcard score (one variable each), more literal text wins
        assert_eq!(
            best("/hotels/new", vec!["/h/{x}", "/hotels/{x}"]),
            "/hotels/{x}"
        );
    }

    #[test]
    fn fewer_single_wildcards_break_length_ties() {
        // equal wildcard score and equal collapsed length; the variable
        // pattern has zero lone stars and wins
        let ranker = SpecificityRanker::new("/a/b");
        assert_eq!(ranker.compare("/{x}/b", "/*/b"), Ordering::Less);
        assert_eq!(ranker.compare("/*/b", "/{x}/b"), Ordering::Greater);
    }

    #[test]
    fn embedded_star_is_not_a_wildcard_segment() {
        let info = PatternInfo::new("/static/*.html");
        assert_eq!(info.single_wildcards(), 0);
        assert_eq!(info.double_wildcards(), 0);
        // and therefore scores below a lone-star pattern
        assert_eq!(
            best("/static/x.html", vec!["/static/*", "/static/*.html"]),
            "/static/*.html"
        );
    }

    #[test]
    fn variable_placeholder_counts_as_one_character() {
        let info = PatternInfo::new("/user/{identifier}");
        assert_eq!(info.uri_vars(), 1);
        // "/user/" plus one collapsed placeholder
        assert_eq!(info.length, 7);
    }

    #[test]
    fn ties_are_equal_and_stable() {
        let ranker = SpecificityRanker::new("/a/b");
        assert_eq!(ranker.compare("/{x}/b", "/{y}/b"), Ordering::Equal);
        let mut candidates = vec!["/{x}/b", "/{y}/b"];
        ranker.rank(&mut candidates);
        assert_eq!(candidates, vec!["/{x}/b", "/{y}/b"]);
    }
}
