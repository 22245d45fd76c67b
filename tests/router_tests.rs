//! Tests for route registration and lookup
//!
//! # Test Coverage
//!
//! Validates the router's core responsibilities:
//! - Registration-time normalization and conflict detection
//! - Exact-key fast path and pattern-scan lookup
//! - Specificity-based selection between overlapping patterns
//! - Distinct not-found vs method-not-allowed outcomes
//! - Variable extraction attached to the per-call match result
//!
//! # Test Strategy
//!
//! Build small route tables through the public API and drive lookups the way
//! a dispatch layer would. Handler bodies are trivial; invocation wiring is
//! covered by the binder tests.

mod common;

use std::sync::Arc;

use http::Method;
use serde_json::{json, Value};

use antroute::binder::BoundArg;
use antroute::error::{LookupError, RegisterError};
use antroute::route::HandlerDescriptor;
use antroute::router::{RouteTable, Router};

fn echo_handler(_args: &[BoundArg<'_>]) -> Value {
    json!({"ok": true})
}

fn descriptor(name: &str) -> HandlerDescriptor {
    HandlerDescriptor::new(name, echo_handler)
}

fn router_with(routes: &[(&str, &[Method], &str)]) -> Router {
    common::init_tracing();
    let table = Arc::new(RouteTable::new());
    for (pattern, methods, handler) in routes {
        table
            .register(pattern, methods, descriptor(handler))
            .unwrap_or_else(|e| panic!("registering '{pattern}' failed: {e}"));
    }
    Router::new(table)
}

fn assert_resolves(router: &Router, method: Method, path: &str, expected_handler: &str) {
    match router.lookup(path, &method) {
        Ok(m) => assert_eq!(
            m.descriptor.handler_name, expected_handler,
            "wrong handler for {method} {path}"
        ),
        Err(e) => panic!("expected {method} {path} to resolve: {e}"),
    }
}

#[test]
fn resolves_every_registered_method_independently() {
    let router = router_with(&[
        ("/zoo/animals", &[Method::GET], "list_animals"),
        ("/zoo/animals", &[Method::POST], "create_animal"),
        ("/zoo/animals/{id}", &[Method::GET], "get_animal"),
        ("/zoo/animals/{id}", &[Method::PUT], "update_animal"),
        ("/zoo/animals/{id}", &[Method::DELETE], "delete_animal"),
    ]);
    assert_resolves(&router, Method::GET, "/zoo/animals", "list_animals");
    assert_resolves(&router, Method::POST, "/zoo/animals", "create_animal");
    assert_resolves(&router, Method::GET, "/zoo/animals/7", "get_animal");
    assert_resolves(&router, Method::PUT, "/zoo/animals/7", "update_animal");
    assert_resolves(&router, Method::DELETE, "/zoo/animals/7", "delete_animal");
}

#[test]
fn unregistered_method_is_method_not_allowed_not_404() {
    let router = router_with(&[("/zoo/animals/{id}", &[Method::GET, Method::PUT], "animal")]);
    match router.lookup("/zoo/animals/7", &Method::PATCH) {
        Err(LookupError::MethodNotAllowed { allowed, .. }) => {
            assert_eq!(allowed, vec![Method::GET, Method::PUT]);
        }
        other => panic!("expected MethodNotAllowed, got {other:?}"),
    }
}

#[test]
fn unknown_path_is_not_found() {
    let router = router_with(&[("/zoo/animals", &[Method::GET], "list_animals")]);
    assert!(matches!(
        router.lookup("/zoo/plants", &Method::GET),
        Err(LookupError::NotFound { .. })
    ));
}

#[test]
fn one_register_call_covers_a_method_set() {
    let router = router_with(&[(
        "/zoo/health",
        &[Method::GET, Method::HEAD, Method::OPTIONS],
        "health",
    )]);
    for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
        assert_resolves(&router, method, "/zoo/health", "health");
    }
}

#[test]
fn overlapping_patterns_resolve_by_specificity() {
    // registration order matters to the conflict probe: literals before the
    // variable patterns that would swallow them, the catch-all last
    let router = router_with(&[
        ("/docs/index", &[Method::GET], "docs_index"),
        ("/docs/{page}", &[Method::GET], "docs_page"),
        ("/a/{x}/list", &[Method::GET], "list_by_x"),
        ("/a/special/{y}", &[Method::GET], "special_y"),
        ("/**", &[Method::GET], "catch_all"),
    ]);
    assert_resolves(&router, Method::GET, "/docs/index", "docs_index");
    assert_resolves(&router, Method::GET, "/docs/intro", "docs_page");
    // equal wildcard score; the longer literal content wins
    assert_resolves(&router, Method::GET, "/a/special/list", "special_y");
    assert_resolves(&router, Method::GET, "/totally/unrelated", "catch_all");
}

#[test]
fn winning_pattern_gates_the_method_even_with_a_permissive_fallback() {
    // the best-ranked pattern only knows POST; the catch-all does know GET,
    // but method resolution happens after specificity selection
    let router = router_with(&[
        ("/docs/{page}", &[Method::POST], "update_page"),
        ("/**", &[Method::GET], "catch_all"),
    ]);
    match router.lookup("/docs/intro", &Method::GET) {
        Err(LookupError::MethodNotAllowed {
            pattern, allowed, ..
        }) => {
            assert_eq!(pattern, "/docs/{page}");
            assert_eq!(allowed, vec![Method::POST]);
        }
        other => panic!("expected MethodNotAllowed, got {other:?}"),
    }
}

#[test]
fn duplicate_registration_raises_conflict() {
    common::init_tracing();
    let table = RouteTable::new();
    table
        .register("/user/{id}", &[Method::GET], descriptor("first"))
        .expect("first registration succeeds");
    let err = table
        .register("/user/{id}", &[Method::GET], descriptor("second"))
        .expect_err("duplicate must fail");
    let message = err.to_string();
    assert!(matches!(err, RegisterError::Conflict { .. }));
    // the error names both conflicting definitions
    assert!(message.contains("first"), "{message}");
    assert!(message.contains("second"), "{message}");
}

#[test]
fn same_pattern_new_methods_merge() {
    common::init_tracing();
    let table = Arc::new(RouteTable::new());
    table
        .register("/user/{id}", &[Method::GET], descriptor("get_user"))
        .expect("GET registers");
    table
        .register("/user/{id}", &[Method::POST], descriptor("update_user"))
        .expect("POST merges into the same pattern");
    assert_eq!(table.len(), 1);

    let router = Router::new(table);
    assert_resolves(&router, Method::GET, "/user/42", "get_user");
    assert_resolves(&router, Method::POST, "/user/42", "update_user");
}

#[test]
fn mixed_case_registration_round_trip() {
    let router = router_with(&[("/A/B/{X}", &[Method::GET], "upper_route")]);
    let m = router
        .lookup("/a/b/42", &Method::GET)
        .expect("normalized pattern resolves lowercase path");
    assert_eq!(m.descriptor.handler_name, "upper_route");
    // variable names are lowercased with the pattern
    assert_eq!(m.variable("x"), Some("42"));
    assert_eq!(m.variables_map().get("x").map(String::as_str), Some("42"));
}

#[test]
fn variables_ride_the_match_not_the_descriptor() {
    let router = router_with(&[("/user/{id}", &[Method::GET], "get_user")]);
    let first = router.lookup("/user/1", &Method::GET).expect("resolves");
    let second = router.lookup("/user/2", &Method::GET).expect("resolves");
    // same shared descriptor, distinct per-call variable maps
    assert!(Arc::ptr_eq(&first.descriptor, &second.descriptor));
    assert_eq!(first.variable("id"), Some("1"));
    assert_eq!(second.variable("id"), Some("2"));
}

#[test]
fn concurrent_lookups_share_one_table() {
    let router = router_with(&[
        ("/user/{id}", &[Method::GET], "get_user"),
        ("/files/**", &[Method::GET], "files"),
    ]);
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let router = router.clone();
            std::thread::spawn(move || {
                for i in 0..250 {
                    let m = router
                        .lookup(&format!("/user/{}", t * 1000 + i), &Method::GET)
                        .expect("resolves under concurrency");
                    assert_eq!(m.variable("id"), Some(format!("{}", t * 1000 + i).as_str()));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("lookup thread panicked");
    }
}

#[test]
fn clear_supports_reload_cycles() {
    common::init_tracing();
    let table = Arc::new(RouteTable::new());
    table
        .register("/v1/ping", &[Method::GET], descriptor("ping_v1"))
        .expect("registers");
    let router = Router::new(Arc::clone(&table));
    assert_resolves(&router, Method::GET, "/v1/ping", "ping_v1");

    table.clear();
    assert!(matches!(
        router.lookup("/v1/ping", &Method::GET),
        Err(LookupError::NotFound { .. })
    ));

    table
        .register("/v2/ping", &[Method::GET], descriptor("ping_v2"))
        .expect("re-registers after clear");
    assert_resolves(&router, Method::GET, "/v2/ping", "ping_v2");
}
