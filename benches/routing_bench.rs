//! Benchmarks for service worker routing and cookie parsing
//!
//! Run with: cargo bench

use cloudstore::food_diary::csrf_token;
use cloudstore::sw::{Notification, PushPayload, Request, RouteTable};
use cloudstore::NotificationConfig;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn sample_requests() -> Vec<Request> {
    vec![
        Request::get("https://cloudstore.uz/api/online-status/"),
        Request::get("https://cloudstore.uz/static/blog/style.css"),
        Request::get("https://cloudstore.uz/media/covers/1024.jpg"),
        Request::navigate("https://cloudstore.uz/kitoblar/?q=alpomish"),
        Request::get("https://cloudstore.uz/kitoblar/12/").with_method("POST"),
        Request::get("https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/css/all.min.css"),
    ]
}

fn bench_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing");
    let table = RouteTable::default();
    let requests = sample_requests();

    group.throughput(Throughput::Elements(requests.len() as u64));
    group.bench_function("resolve_mixed", |b| {
        b.iter(|| {
            for request in &requests {
                black_box(table.resolve(black_box(request)));
            }
        })
    });

    group.finish();
}

fn bench_csrf(c: &mut Criterion) {
    let mut group = c.benchmark_group("csrf");

    let short = "csrftoken=a1b2c3";
    let long = (0..40)
        .map(|i| format!("cookie{}=value{}", i, i))
        .chain(std::iter::once("csrftoken=a1b2c3".to_string()))
        .collect::<Vec<_>>()
        .join("; ");

    group.bench_function("single_cookie", |b| {
        b.iter(|| csrf_token(black_box(short), "csrftoken"))
    });
    group.bench_function("forty_cookies", |b| {
        b.iter(|| csrf_token(black_box(&long), "csrftoken"))
    });

    group.finish();
}

fn bench_push(c: &mut Criterion) {
    let config = NotificationConfig::default();
    let payload = r#"{"title": "Yangi xabar", "body": "Sizga xabar keldi", "url": "/xabarlar/"}"#;

    c.bench_function("push_notification", |b| {
        b.iter(|| Notification::from_payload(PushPayload::parse(black_box(Some(payload))), &config))
    });
}

criterion_group!(benches, bench_routing, bench_csrf, bench_push);
criterion_main!(benches);
