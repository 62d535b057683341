//! Cache lookup benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use depot_test_utils::scenario_cache;

fn bench_get_packages_by_name(c: &mut Criterion) {
    let (cache, ids) = scenario_cache();
    let name = cache.package(ids.foo_1_0).unwrap().name().to_string();

    c.bench_function("cache/get_packages_by_name", |b| {
        b.iter(|| {
            let hits: Vec<_> = cache.get_packages(Some(black_box(&name))).collect();
            black_box(hits.len())
        });
    });
}

fn bench_get_packages_all(c: &mut Criterion) {
    let (cache, _ids) = scenario_cache();

    c.bench_function("cache/get_packages_all", |b| {
        b.iter(|| {
            let hits: Vec<_> = cache.get_packages(None).collect();
            black_box(hits.len())
        });
    });
}

fn bench_who_requires(c: &mut Criterion) {
    let (cache, _ids) = scenario_cache();

    c.bench_function("cache/get_requires_by_name", |b| {
        b.iter(|| {
            let hits: Vec<_> = cache.get_requires(Some("libcommon")).collect();
            black_box(hits.len())
        });
    });
}

criterion_group!(benches, bench_get_packages_by_name, bench_get_packages_all, bench_who_requires);
criterion_main!(benches);
