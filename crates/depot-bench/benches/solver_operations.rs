//! Solver resolution benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use depot_policy::{InstallPolicy, LockSet};
use depot_resolver::{solve, Priorities, Queue, QueueOp};
use depot_test_utils::scenario_cache;

fn bench_solve_simple_install(c: &mut Criterion) {
    let (cache, ids) = scenario_cache();
    let policy = InstallPolicy::new(LockSet::new(vec![]));
    let priorities: Priorities = cache.get_packages(None).map(|p| (p.id(), 0)).collect();

    let mut queue = Queue::new();
    queue.insert(ids.foo_1_0, QueueOp::Install);

    c.bench_function("solver/install_single_package", |b| {
        b.iter(|| black_box(solve(&cache, &queue, &policy, &priorities)));
    });
}

fn bench_solve_upgrade_same_name(c: &mut Criterion) {
    let (cache, ids) = scenario_cache();
    let policy = InstallPolicy::new(LockSet::new(vec![]));
    let priorities: Priorities = cache.get_packages(None).map(|p| (p.id(), 0)).collect();

    let mut queue = Queue::new();
    queue.insert(ids.baz_2_0, QueueOp::Install);

    c.bench_function("solver/upgrade_same_name_package", |b| {
        b.iter(|| black_box(solve(&cache, &queue, &policy, &priorities)));
    });
}

criterion_group!(benches, bench_solve_simple_install, bench_solve_upgrade_same_name);
criterion_main!(benches);
