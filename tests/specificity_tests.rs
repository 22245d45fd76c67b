//! Tests for specificity ranking
//!
//! # Test Coverage
//!
//! Exercises the fixed comparator priority through the public ranker:
//! catch-all demotion, exact-path promotion, prefix-pattern ordering,
//! wildcard scoring, and the documented tie-breakers.

mod common;

use std::cmp::Ordering;

use antroute::specificity::{PatternInfo, SpecificityRanker};

fn ranked<'a>(path: &str, mut candidates: Vec<&'a str>) -> Vec<&'a str> {
    common::init_tracing();
    SpecificityRanker::new(path).rank(&mut candidates);
    candidates
}

#[test]
fn exact_literal_beats_variable_pattern() {
    let order = ranked("/user/42", vec!["/user/{id}", "/user/42"]);
    assert_eq!(order, vec!["/user/42", "/user/{id}"]);
}

#[test]
fn catch_all_sinks_to_the_bottom() {
    let order = ranked(
        "/hotels/new",
        vec!["/**", "/hotels/{hotel}", "/hotels/new"],
    );
    assert_eq!(order, vec!["/hotels/new", "/hotels/{hotel}", "/**"]);
}

#[test]
fn single_wildcard_beats_double_wildcard_namespace() {
    let order = ranked("/files/report", vec!["/files/**", "/files/*"]);
    assert_eq!(order, vec!["/files/*", "/files/**"]);
}

#[test]
fn lower_wildcard_score_ranks_first() {
    let order = ranked(
        "/hotels/new/list",
        vec!["/hotels/{hotel}/{booking}", "/hotels/{hotel}/list"],
    );
    assert_eq!(order[0], "/hotels/{hotel}/list");
}

#[test]
fn longer_literal_content_ranks_first_on_score_ties() {
    let order = ranked("/hotels/new", vec!["/h/{x}", "/hotels/{x}"]);
    assert_eq!(order[0], "/hotels/{x}");
}

#[test]
fn embedded_star_counts_as_no_wildcard_segment() {
    // deliberately narrow special case: `*` adjacent to literal text within
    // one segment is not a wildcard segment
    let info = PatternInfo::new("/res/*.html");
    assert_eq!(info.single_wildcards(), 0);
    let order = ranked("/res/x.html", vec!["/res/*", "/res/*.html"]);
    assert_eq!(order[0], "/res/*.html");
}

#[test]
fn equal_patterns_compare_equal() {
    let ranker = SpecificityRanker::new("/a/1");
    assert_eq!(ranker.compare("/a/{x}", "/a/{y}"), Ordering::Equal);
    assert_eq!(ranker.compare("/**", "/**"), Ordering::Equal);
}

#[test]
fn comparator_is_antisymmetric_on_fixtures() {
    let ranker = SpecificityRanker::new("/files/report");
    let fixtures = [
        ("/files/report", "/files/{name}"),
        ("/files/{name}", "/files/*"),
        ("/files/*", "/files/**"),
        ("/files/**", "/**"),
    ];
    for (more, less) in fixtures {
        assert_eq!(ranker.compare(more, less), Ordering::Less, "{more} vs {less}");
        assert_eq!(ranker.compare(less, more), Ordering::Greater, "{less} vs {more}");
    }
}
