use criterion::{black_box, criterion_group, criterion_main, Criterion};
use http::Method;
use serde_json::{json, Value};
use std::sync::Arc;

use antroute::binder::BoundArg;
use antroute::pattern::PathMatcher;
use antroute::route::HandlerDescriptor;
use antroute::router::{RouteTable, Router};

fn null_handler(_args: &[BoundArg<'_>]) -> Value {
    json!(null)
}

fn build_router(route_count: usize) -> Router {
    let table = Arc::new(RouteTable::new());
    for i in 0..route_count {
        table
            .register(
                &format!("/svc{i}/items/{{id}}"),
                &[Method::GET],
                HandlerDescriptor::new(format!("handler_{i}"), null_handler),
            )
            .expect("route registers");
    }
    Router::new(table)
}

fn bench_matching(c: &mut Criterion) {
    let matcher = PathMatcher::new();
    c.bench_function("match_literal", |b| {
        b.iter(|| {
            matcher
                .matches(black_box("/zoo/animals"), black_box("/zoo/animals"))
                .expect("evaluates")
        })
    });
    c.bench_function("match_variable", |b| {
        b.iter(|| {
            matcher
                .matches(black_box("/user/{id}/orders/{order}"), black_box("/user/42/orders/17"))
                .expect("evaluates")
        })
    });
    c.bench_function("match_double_wildcard", |b| {
        b.iter(|| {
            matcher
                .matches(black_box("/a/**/x/**/b"), black_box("/a/q/x/r/s/b"))
                .expect("evaluates")
        })
    });
    c.bench_function("extract_variables", |b| {
        b.iter(|| {
            matcher
                .extract_variables(black_box("/user/{id}/orders/{order}"), black_box("/user/42/orders/17"))
                .expect("extracts")
        })
    });
}

fn bench_lookup(c: &mut Criterion) {
    for route_count in [10usize, 100, 500] {
        let router = build_router(route_count);
        let path = format!("/svc{}/items/42", route_count / 2);
        c.bench_function(&format!("lookup_{route_count}_routes"), |b| {
            b.iter(|| {
                router
                    .lookup(black_box(&path), &Method::GET)
                    .expect("resolves")
            })
        });
    }
}

criterion_group!(benches, bench_matching, bench_lookup);
criterion_main!(benches);
