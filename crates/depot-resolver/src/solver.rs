//! Bounded backtracking resolution (§4.7): seed, propagate, branch, accept.

use std::collections::HashSet;

use depot_cache::{Cache, DependsEntry, ProvidesEntry};
use depot_core::{AHashMap, Depends, Error, Package, PackageId, Result};
use depot_policy::{Candidate, Policy};
use tracing::debug;

use crate::changeset::{ChangeOp, Changeset};
use crate::queue::{Queue, QueueOp};

/// Default work budget: the number of branch/propagation steps before the
/// solver gives up and returns its best partial solution.
pub const DEFAULT_BUDGET: u32 = 10_000;

/// Per-package channel priority, precomputed by the caller (loader/channel
/// metadata lives above this crate). Missing entries are treated as `0`.
pub type Priorities = AHashMap<PackageId, i64>;

/// Resolves `queue` against `cache` under `policy`, with the default work
/// budget.
pub fn solve(cache: &Cache, queue: &Queue, policy: &dyn Policy, priorities: &Priorities) -> Result<Changeset> {
    solve_with_budget(cache, queue, policy, priorities, DEFAULT_BUDGET)
}

/// Resolves `queue` against `cache` under `policy`, with an explicit step
/// budget.
pub fn solve_with_budget(
    cache: &Cache,
    queue: &Queue,
    policy: &dyn Policy,
    priorities: &Priorities,
    budget: u32,
) -> Result<Changeset> {
    let (mut changeset, fixed) = seed(cache, queue, policy)?;
    let mut remaining = budget;
    solve_rec(cache, policy, priorities, &mut changeset, &fixed, &mut remaining)?;
    Ok(changeset)
}

/// Folds the queue into an initial changeset. `Reinstall` is represented
/// directly as `ChangeOp::Reinstall` (treated like `Install` by propagation,
/// since a reinstalled package still provides/requires everything it did).
/// `Fix` packages are not changed but their requirements are still checked.
fn seed(cache: &Cache, queue: &Queue, policy: &dyn Policy) -> Result<(Changeset, HashSet<PackageId>)> {
    let mut changeset = Changeset::new();
    let mut fixed = HashSet::new();
    for (&id, op) in queue {
        let name = cache.package(id).map_or_else(|| "?".to_string(), |p| p.name().to_string());
        match op {
            QueueOp::Install | QueueOp::Upgrade => {
                if policy.is_locked(&name) {
                    return Err(Error::locked(name));
                }
                changeset.set(id, ChangeOp::Install);
            }
            QueueOp::Remove => {
                if policy.is_locked(&name) {
                    return Err(Error::locked(name));
                }
                changeset.set(id, ChangeOp::Remove);
            }
            QueueOp::Reinstall => {
                if policy.is_locked(&name) {
                    return Err(Error::locked(name));
                }
                changeset.set(id, ChangeOp::Reinstall);
            }
            QueueOp::Fix => {
                fixed.insert(id);
            }
            QueueOp::Keep => {}
        }
    }
    Ok((changeset, fixed))
}

fn is_active(cache: &Cache, cs: &Changeset, id: PackageId) -> bool {
    match cs.get(id) {
        ChangeOp::Install | ChangeOp::Reinstall => true,
        ChangeOp::Remove => false,
        ChangeOp::Keep => cache.package(id).is_some_and(Package::installed),
    }
}

fn matched_providers(cache: &Cache, entry: &DependsEntry) -> Vec<PackageId> {
    entry
        .providedby()
        .iter()
        .filter_map(|pid| cache.provides_entry(*pid))
        .flat_map(ProvidesEntry::packages)
        .copied()
        .collect()
}

fn find_requires_entry<'c>(cache: &'c Cache, d: &Depends) -> Option<&'c DependsEntry> {
    cache.get_requires(Some(d.name())).find(|e| e.value() == d)
}

fn find_conflicts_entry<'c>(cache: &'c Cache, d: &Depends) -> Option<&'c DependsEntry> {
    cache.get_conflicts(Some(d.name())).find(|e| e.value() == d)
}

fn find_obsoletes_entry<'c>(cache: &'c Cache, d: &Depends) -> Option<&'c DependsEntry> {
    cache.get_obsoletes(Some(d.name())).find(|e| e.value() == d)
}

fn is_satisfied(cache: &Cache, cs: &Changeset, entry: &DependsEntry) -> bool {
    matched_providers(cache, entry).into_iter().any(|pid| is_active(cache, cs, pid))
}

/// Schedules `REMOVE` of `victim`, failing the branch if it is locked.
fn schedule_remove(cs: &mut Changeset, policy: &dyn Policy, victim: &Package) -> Result<bool> {
    if cs.get(victim.id()) == ChangeOp::Remove {
        return Ok(false);
    }
    if policy.is_locked(victim.name()) {
        return Err(Error::locked(victim.to_string()));
    }
    cs.set(victim.id(), ChangeOp::Remove);
    Ok(true)
}

/// One deterministic propagation pass: same-name exclusivity, conflicts,
/// obsoletes, and cascading removal for already-installed packages. Returns
/// whether anything changed (caller loops to fixpoint).
fn propagate_deterministic(cache: &Cache, policy: &dyn Policy, cs: &mut Changeset) -> Result<bool> {
    let mut changed = false;

    let installing: Vec<PackageId> =
        cache.get_packages(None).map(Package::id).filter(|&id| matches!(cs.get(id), ChangeOp::Install | ChangeOp::Reinstall)).collect();

    for pid in installing {
        let Some(p) = cache.package(pid) else { continue };

        // Same-name exclusivity: two different identities of the same name
        // cannot both be active (RPM-style package replacement, §4.1).
        for q in cache.get_packages(Some(p.name())) {
            if q.id() == pid || !is_active(cache, cs, q.id()) {
                continue;
            }
            changed |= schedule_remove(cs, policy, q)?;
        }

        // Conflicts are symmetric: p's own declared conflicts remove the
        // package they match, and any already-active package that declares
        // a conflict matching p is removed too (RPM `Conflicts` is a
        // relation between two packages, not a one-way declaration).
        for c in p.conflicts() {
            let Some(entry) = find_conflicts_entry(cache, c) else { continue };
            for qid in matched_providers(cache, entry) {
                if qid == pid || !is_active(cache, cs, qid) {
                    continue;
                }
                if let Some(q) = cache.package(qid) {
                    changed |= schedule_remove(cs, policy, q)?;
                }
            }
        }
        for q in cache.get_packages(None) {
            if q.id() == pid || !is_active(cache, cs, q.id()) {
                continue;
            }
            for c in q.conflicts() {
                let Some(entry) = find_conflicts_entry(cache, c) else { continue };
                if matched_providers(cache, entry).contains(&pid) {
                    changed |= schedule_remove(cs, policy, q)?;
                    break;
                }
            }
        }

        for o in p.obsoletes() {
            let Some(entry) = find_obsoletes_entry(cache, o) else { continue };
            for qid in matched_providers(cache, entry) {
                if qid == pid || !is_active(cache, cs, qid) {
                    continue;
                }
                if let Some(q) = cache.package(qid) {
                    changed |= schedule_remove(cs, policy, q)?;
                }
            }
        }
    }

    // Cascading removal: an installed, kept package whose requirement is no
    // longer satisfied must itself be removed.
    let kept_installed: Vec<PackageId> = cache
        .get_packages(None)
        .filter(|p| p.installed() && cs.get(p.id()) != ChangeOp::Remove)
        .map(Package::id)
        .collect();

    for pid in kept_installed {
        let Some(p) = cache.package(pid) else { continue };
        if matches!(cs.get(pid), ChangeOp::Install | ChangeOp::Reinstall) {
            continue;
        }
        for r in p.requires() {
            let Some(entry) = find_requires_entry(cache, r) else { continue };
            if !is_satisfied(cache, cs, entry) {
                changed |= schedule_remove(cs, policy, p)?;
                break;
            }
        }
    }

    Ok(changed)
}

fn first_unsatisfied<'c>(
    cache: &'c Cache,
    cs: &Changeset,
    fixed: &HashSet<PackageId>,
) -> Option<(PackageId, &'c DependsEntry)> {
    let mut candidates: Vec<PackageId> = cache
        .get_packages(None)
        .map(Package::id)
        .filter(|&id| matches!(cs.get(id), ChangeOp::Install | ChangeOp::Reinstall) || fixed.contains(&id))
        .collect();
    candidates.sort_unstable();

    for pid in candidates {
        let Some(p) = cache.package(pid) else { continue };
        for r in p.requires() {
            let Some(entry) = find_requires_entry(cache, r) else { continue };
            if !is_satisfied(cache, cs, entry) {
                return Some((pid, entry));
            }
        }
    }
    None
}

fn ranked_candidates(cache: &Cache, policy: &dyn Policy, priorities: &Priorities, cs: &Changeset, entry: &DependsEntry) -> Vec<PackageId> {
    let mut candidates: Vec<PackageId> =
        matched_providers(cache, entry).into_iter().filter(|&id| !is_active(cache, cs, id)).collect();
    candidates.sort_by(|&a, &b| {
        let pa = cache.package(a).expect("candidate package exists");
        let pb = cache.package(b).expect("candidate package exists");
        let wa = policy.weight(Candidate { package: pa, channel_priority: priorities.get(&a).copied().unwrap_or(0) });
        let wb = policy.weight(Candidate { package: pb, channel_priority: priorities.get(&b).copied().unwrap_or(0) });
        wb.cmp(&wa).then_with(|| pa.identity().cmp(pb.identity())).then_with(|| a.cmp(&b))
    });
    candidates.dedup();
    candidates
}

fn solve_rec(
    cache: &Cache,
    policy: &dyn Policy,
    priorities: &Priorities,
    cs: &mut Changeset,
    fixed: &HashSet<PackageId>,
    budget: &mut u32,
) -> Result<()> {
    loop {
        if *budget == 0 {
            debug!("solver budget exhausted; returning best partial changeset");
            return Ok(());
        }
        *budget -= 1;

        if propagate_deterministic(cache, policy, cs)? {
            continue;
        }

        let Some((pid, entry)) = first_unsatisfied(cache, cs, fixed) else {
            return Ok(());
        };
        let requirer = cache.package(pid).map_or_else(|| "?".to_string(), |p| p.to_string());
        debug!(requirer = %requirer, requirement = %entry.value(), "branching on choice point");

        let candidates = ranked_candidates(cache, policy, priorities, cs, entry);
        if candidates.is_empty() {
            return Err(Error::dependency(format!("no provider satisfies {}", entry.value()), vec![entry.value().to_string()]));
        }

        for candidate in candidates {
            let mut branch = cs.clone();
            branch.set(candidate, ChangeOp::Install);
            match solve_rec(cache, policy, priorities, &mut branch, fixed, budget) {
                Ok(()) => {
                    *cs = branch;
                    return Ok(());
                }
                Err(Error::Dependency { .. } | Error::Locked { .. }) => {
                    if *budget == 0 {
                        return Ok(());
                    }
                }
                Err(e) => return Err(e),
            }
        }
        return Err(Error::dependency(format!("no provider satisfies {}", entry.value()), vec![entry.value().to_string()]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_cache::Cache as CacheImpl;
    use depot_core::{LoadSink, LoaderId, Provides, RelOp, Version};
    use depot_policy::InstallPolicy;

    fn ver(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn install_with_no_deps_is_a_single_entry_changeset() {
        let mut cache = CacheImpl::new();
        let foo = cache.declare_package(LoaderId(0), "foo", "1.0", "", false).unwrap();
        cache.link_deps();

        let mut queue = Queue::new();
        queue.insert(foo, QueueOp::Install);
        let policy = InstallPolicy::default();
        let changeset = solve(&cache, &queue, &policy, &Priorities::default()).unwrap();

        assert_eq!(changeset.get(foo), ChangeOp::Install);
        assert_eq!(changeset.len(), 1);
    }

    #[test]
    fn install_pulls_in_a_missing_requirement() {
        let mut cache = CacheImpl::new();
        let bar = cache.declare_package(LoaderId(0), "bar", "2.0", "", false).unwrap();
        let libx = cache.declare_package(LoaderId(0), "libx", "1.2", "", false).unwrap();
        cache.add_requires(bar, Depends::new("libx", RelOp::Ge, Some(ver("1"))));
        cache.add_provides(libx, Provides::new("libx", Some(ver("1.2"))));
        cache.link_deps();

        let mut queue = Queue::new();
        queue.insert(bar, QueueOp::Install);
        let policy = InstallPolicy::default();
        let changeset = solve(&cache, &queue, &policy, &Priorities::default()).unwrap();

        assert_eq!(changeset.get(bar), ChangeOp::Install);
        assert_eq!(changeset.get(libx), ChangeOp::Install);
    }

    #[test]
    fn unsatisfiable_requirement_is_a_dependency_error() {
        let mut cache = CacheImpl::new();
        let qux = cache.declare_package(LoaderId(0), "qux", "1.0", "", false).unwrap();
        cache.add_requires(qux, Depends::new("missing", RelOp::Ge, Some(ver("1"))));
        cache.link_deps();

        let mut queue = Queue::new();
        queue.insert(qux, QueueOp::Install);
        let policy = InstallPolicy::default();
        let err = solve(&cache, &queue, &policy, &Priorities::default()).unwrap_err();
        assert!(format!("{err}").contains("missing>=1"));
    }
}
