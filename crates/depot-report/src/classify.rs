//! Pure classification of a changeset into a human-facing report (§4.8).

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use depot_cache::Cache;
use depot_core::PackageId;
use depot_resolver::Changeset;

/// Per-package fields of the change report, keyed by [`PackageId`].
///
/// `upgrading`/`downgrading` are keyed by the package being *installed*;
/// `upgraded`/`downgraded` are the inverse, keyed by the package being
/// *removed*. `requires` is keyed by the installed package that pulled
/// something in; `requiredby` and `conflicts` are keyed by the removed
/// package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    install: BTreeSet<PackageId>,
    remove: BTreeSet<PackageId>,
    upgrading: BTreeMap<PackageId, BTreeSet<PackageId>>,
    downgrading: BTreeMap<PackageId, BTreeSet<PackageId>>,
    upgraded: BTreeMap<PackageId, BTreeSet<PackageId>>,
    downgraded: BTreeMap<PackageId, BTreeSet<PackageId>>,
    requires: BTreeMap<PackageId, BTreeSet<PackageId>>,
    requiredby: BTreeMap<PackageId, BTreeSet<PackageId>>,
    conflicts: BTreeMap<PackageId, BTreeSet<PackageId>>,
}

/// The ordered detail for a single package, matching the field precedence
/// `gepeto/interfaces/gtk/changes.py` uses when rendering a change: Upgrades
/// and Downgrades first (each pair recorded so Conflicts never re-lists it),
/// then Requires, then Required By, then the remaining Conflicts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageChangeDetail {
    /// Older same-named versions this install replaces.
    pub upgrades: Vec<PackageId>,
    /// Newer same-named versions this install replaces.
    pub downgrades: Vec<PackageId>,
    /// Fresh installs pulled in by this package's requirements.
    pub requires: Vec<PackageId>,
    /// Installed packages that depended on this removed package.
    pub required_by: Vec<PackageId>,
    /// Removed packages that conflicted with this package.
    pub conflicts: Vec<PackageId>,
}

impl Report {
    /// Packages being installed (including reinstalled).
    #[must_use]
    pub fn install(&self) -> &BTreeSet<PackageId> {
        &self.install
    }

    /// Packages being removed.
    #[must_use]
    pub fn remove(&self) -> &BTreeSet<PackageId> {
        &self.remove
    }

    /// Builds the report's ordered per-package detail.
    #[must_use]
    pub fn describe(&self, pkg: PackageId) -> PackageChangeDetail {
        let upgrades: Vec<_> = self.upgrading.get(&pkg).into_iter().flatten().copied().collect();
        let downgrades: Vec<_> = self.downgrading.get(&pkg).into_iter().flatten().copied().collect();
        let requires: Vec<_> = self.requires.get(&pkg).into_iter().flatten().copied().collect();
        let required_by: Vec<_> = self.requiredby.get(&pkg).into_iter().flatten().copied().collect();
        let conflicts: Vec<_> = self.conflicts.get(&pkg).into_iter().flatten().copied().collect();
        PackageChangeDetail { upgrades, downgrades, requires, required_by, conflicts }
    }

    /// Older versions of `p.name()` removed as part of installing `p`.
    #[must_use]
    pub fn upgrading_for(&self, p: PackageId) -> &BTreeSet<PackageId> {
        static EMPTY: BTreeSet<PackageId> = BTreeSet::new();
        self.upgrading.get(&p).unwrap_or(&EMPTY)
    }

    /// Newer versions of `p.name()` removed as part of installing `p`.
    #[must_use]
    pub fn downgrading_for(&self, p: PackageId) -> &BTreeSet<PackageId> {
        static EMPTY: BTreeSet<PackageId> = BTreeSet::new();
        self.downgrading.get(&p).unwrap_or(&EMPTY)
    }

    /// Packages installed over the removed package `q`.
    #[must_use]
    pub fn upgraded_by(&self, q: PackageId) -> &BTreeSet<PackageId> {
        static EMPTY: BTreeSet<PackageId> = BTreeSet::new();
        self.upgraded.get(&q).unwrap_or(&EMPTY)
    }

    /// Packages downgraded to by removing `q`.
    #[must_use]
    pub fn downgraded_by(&self, q: PackageId) -> &BTreeSet<PackageId> {
        static EMPTY: BTreeSet<PackageId> = BTreeSet::new();
        self.downgraded.get(&q).unwrap_or(&EMPTY)
    }

    /// Fresh installs pulled in as dependencies of `p`.
    #[must_use]
    pub fn requires_for(&self, p: PackageId) -> &BTreeSet<PackageId> {
        static EMPTY: BTreeSet<PackageId> = BTreeSet::new();
        self.requires.get(&p).unwrap_or(&EMPTY)
    }

    /// Installed packages that depended on removed package `p`.
    #[must_use]
    pub fn requiredby_for(&self, p: PackageId) -> &BTreeSet<PackageId> {
        static EMPTY: BTreeSet<PackageId> = BTreeSet::new();
        self.requiredby.get(&p).unwrap_or(&EMPTY)
    }

    /// Removed packages that conflicted with `p`, excluding any pair already
    /// classified as an upgrade or downgrade.
    #[must_use]
    pub fn conflicts_for(&self, p: PackageId) -> &BTreeSet<PackageId> {
        static EMPTY: BTreeSet<PackageId> = BTreeSet::new();
        self.conflicts.get(&p).unwrap_or(&EMPTY)
    }
}

/// Classifies `changeset` against `cache` into a [`Report`].
#[must_use]
pub fn build(cache: &Cache, changeset: &Changeset) -> Report {
    let install: BTreeSet<PackageId> = changeset.installs().collect();
    let remove: BTreeSet<PackageId> = changeset.removes().collect();

    let mut report = Report { install: install.clone(), remove: remove.clone(), ..Report::default() };
    let mut done: BTreeSet<(PackageId, PackageId)> = BTreeSet::new();

    // Upgrades/Downgrades: same-name install/remove pairs, ordered by version.
    for &p in &install {
        let Some(pkg) = cache.package(p) else { continue };
        for &r in &remove {
            let Some(rpkg) = cache.package(r) else { continue };
            if pkg.name() != rpkg.name() {
                continue;
            }
            match pkg.version().compare(rpkg.version()) {
                Ordering::Greater => {
                    report.upgrading.entry(p).or_default().insert(r);
                    report.upgraded.entry(r).or_default().insert(p);
                }
                Ordering::Less => {
                    report.downgrading.entry(p).or_default().insert(r);
                    report.downgraded.entry(r).or_default().insert(p);
                }
                Ordering::Equal => {}
            }
            done.insert((p, r));
        }
    }

    // Requires: other fresh installs that provide something this package requires.
    for &p in &install {
        let Some(pkg) = cache.package(p) else { continue };
        for &q in &install {
            if p == q {
                continue;
            }
            let Some(qpkg) = cache.package(q) else { continue };
            let pulled_in = pkg.requires().iter().any(|dep| qpkg.provides().iter().any(|prov| dep.matches(prov)));
            if pulled_in {
                report.requires.entry(p).or_default().insert(q);
            }
        }
    }

    // Required By: installed packages (not themselves removed) that depend on a removed package.
    for &r in &remove {
        let Some(rpkg) = cache.package(r) else { continue };
        for other in cache.get_packages(None) {
            if !other.installed() || remove.contains(&other.id()) {
                continue;
            }
            let depends_on_r = other.requires().iter().any(|dep| rpkg.provides().iter().any(|prov| dep.matches(prov)));
            if depends_on_r {
                report.requiredby.entry(r).or_default().insert(other.id());
            }
        }
    }

    // Conflicts: remaining (non upgrade/downgrade) install/remove pairs where either
    // side's declared Conflicts matches the other's Provides (symmetric, per the solver).
    for &p in &install {
        let Some(pkg) = cache.package(p) else { continue };
        for &r in &remove {
            if done.contains(&(p, r)) {
                continue;
            }
            let Some(rpkg) = cache.package(r) else { continue };
            let conflicting = pkg.conflicts().iter().any(|dep| rpkg.provides().iter().any(|prov| dep.matches(prov)))
                || rpkg.conflicts().iter().any(|dep| pkg.provides().iter().any(|prov| dep.matches(prov)));
            if conflicting {
                report.conflicts.entry(p).or_default().insert(r);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_resolver::ChangeOp;
    use depot_test_utils::scenario_cache;

    #[test]
    fn s3_upgrade_is_classified_both_ways() {
        let (cache, ids) = scenario_cache();
        let mut cs = Changeset::new();
        cs.set(ids.baz_2_0, ChangeOp::Install);
        cs.set(ids.baz_1_0, ChangeOp::Remove);

        let report = build(&cache, &cs);
        assert!(report.upgrading_for(ids.baz_2_0).contains(&ids.baz_1_0));
        assert!(report.upgraded_by(ids.baz_1_0).contains(&ids.baz_2_0));
        assert!(report.conflicts_for(ids.baz_2_0).is_empty(), "an upgrade pair should not also appear as a conflict");
    }

    #[test]
    fn s2_requires_links_the_pulled_in_package() {
        let (cache, ids) = scenario_cache();
        let mut cs = Changeset::new();
        cs.set(ids.bar_2_0, ChangeOp::Install);
        cs.set(ids.libx_1_2, ChangeOp::Install);

        let report = build(&cache, &cs);
        assert!(report.requires_for(ids.bar_2_0).contains(&ids.libx_1_2));
    }

    #[test]
    fn s5_conflict_pair_is_reported() {
        let (cache, ids) = scenario_cache();
        let mut cs = Changeset::new();
        cs.set(ids.beta_1_0, ChangeOp::Install);
        cs.set(ids.alpha_1_0, ChangeOp::Remove);

        let report = build(&cache, &cs);
        assert!(report.conflicts_for(ids.beta_1_0).contains(&ids.alpha_1_0));
    }
}
