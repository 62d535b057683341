//! End-to-end solver scenarios (S1-S5): literal cache + queue + policy in,
//! literal changeset out.

use depot_policy::{InstallPolicy, UpgradePolicy};
use depot_resolver::{solve, ChangeOp, Priorities, Queue, QueueOp};
use depot_test_utils::scenario_cache;
use rstest::rstest;

#[rstest]
fn s1_exact_install_no_deps() {
    let (cache, ids) = scenario_cache();
    let mut queue = Queue::new();
    queue.insert(ids.foo_1_0, QueueOp::Install);

    let changeset = solve(&cache, &queue, &InstallPolicy::default(), &Priorities::default()).unwrap();

    assert_eq!(changeset.get(ids.foo_1_0), ChangeOp::Install);
    assert_eq!(changeset.len(), 1);
}

#[rstest]
fn s2_install_with_requirement() {
    let (cache, ids) = scenario_cache();
    let mut queue = Queue::new();
    queue.insert(ids.bar_2_0, QueueOp::Install);

    let changeset = solve(&cache, &queue, &InstallPolicy::default(), &Priorities::default()).unwrap();

    assert_eq!(changeset.get(ids.bar_2_0), ChangeOp::Install);
    assert_eq!(changeset.get(ids.libx_1_2), ChangeOp::Install);
    assert_eq!(changeset.len(), 2);
}

#[rstest]
fn s3_upgrade_replaces_installed() {
    let (cache, ids) = scenario_cache();
    let mut queue = Queue::new();
    queue.insert(ids.baz_2_0, QueueOp::Install);

    let changeset = solve(&cache, &queue, &UpgradePolicy::default(), &Priorities::default()).unwrap();

    assert_eq!(changeset.get(ids.baz_2_0), ChangeOp::Install);
    assert_eq!(changeset.get(ids.baz_1_0), ChangeOp::Remove);
    assert_eq!(changeset.len(), 2);
}

#[rstest]
fn s4_unsatisfiable_requirement() {
    let (cache, ids) = scenario_cache();
    let mut queue = Queue::new();
    queue.insert(ids.qux_1_0, QueueOp::Install);

    let err = solve(&cache, &queue, &InstallPolicy::default(), &Priorities::default()).unwrap_err();
    assert!(format!("{err}").contains("missing>=1"));
}

#[rstest]
fn s5_conflict_with_locked() {
    let (cache, ids) = scenario_cache();
    let mut queue = Queue::new();
    queue.insert(ids.beta_1_0, QueueOp::Install);

    let policy = InstallPolicy::new(depot_policy::LockSet::new(vec!["alpha".to_string()]));
    let err = solve(&cache, &queue, &policy, &Priorities::default()).unwrap_err();
    assert!(format!("{err}").contains("alpha-1.0"));
}
