use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use http::Method;
use serde_json::json;
use switchyard::context::RequestBody;
use switchyard::dispatcher::{Dispatcher, HandlerResponse};
use switchyard::registry::sample_table;
use switchyard::router::RouteTable;

/// Sample API plus a few deep parameterized routes.
fn bench_table() -> RouteTable {
    let mut table = sample_table().unwrap();
    table
        .register(
            Method::GET,
            "/zoo/{category}/animals/{id}/habitats/{habitatId}/sections/{sectionId}",
            |_req| Ok(HandlerResponse::ok(json!({}))),
        )
        .unwrap()
        .register(
            Method::POST,
            "/inventory/{warehouseId}/feeds/{feedId}/items/{itemId}/batches/{batchId}",
            |_req| Ok(HandlerResponse::ok(json!({}))),
        )
        .unwrap();
    table
}

fn bench_resolve(c: &mut Criterion) {
    let table = bench_table();
    let paths = [
        (Method::GET, "/"),
        (Method::GET, "/users/123"),
        (Method::GET, "/users/123/posts"),
        (Method::DELETE, "/products/9"),
        (Method::GET, "/zoo/mammals/animals/7/habitats/3/sections/12"),
        (Method::POST, "/inventory/w1/feeds/f2/items/i3/batches/b4"),
        (Method::GET, "/does/not/exist"),
        (Method::PATCH, "/users/1"),
    ];

    c.bench_function("resolve_mixed", |b| {
        b.iter(|| {
            for (method, path) in &paths {
                let res = table.resolve(method, path);
                black_box(&res);
            }
        })
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let dispatcher = Dispatcher::new(bench_table());
    let body = br#"{"name":"Ada","email":"ada@x.io"}"#;

    c.bench_function("dispatch_get_with_query", |b| {
        b.iter(|| {
            let resp = dispatcher.handle(
                &Method::GET,
                "/search",
                "q=router&page=2&limit=50",
                RequestBody::empty(),
            );
            black_box(resp);
        })
    });

    c.bench_function("dispatch_post_json", |b| {
        b.iter(|| {
            let resp = dispatcher.handle(&Method::POST, "/users", "", RequestBody::json(body));
            black_box(resp);
        })
    });
}

criterion_group!(benches, bench_resolve, bench_dispatch);
criterion_main!(benches);
