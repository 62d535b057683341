//! The `Policy` contract: how the solver weighs competing candidates and
//! which packages it must never move (§4.6, §4.7).

use depot_core::Package;

use crate::locks::LockSet;
use crate::priorities::ChannelPriorities;

/// A weighted candidate, as seen at a solver choice point.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The candidate package.
    pub package: &'a Package,
    /// The highest priority among the channels that offer this identity.
    pub channel_priority: i64,
}

/// Ranks candidate packages at a choice point and reports locked packages.
///
/// Higher [`Policy::weight`] is explored first (best-first, §4.7). Ties are
/// broken by the solver using `Identity`'s `(name asc, version desc, tag asc)`
/// order, so a policy only needs to rank on criteria *beyond* raw version.
pub trait Policy: std::fmt::Debug {
    /// The exploration weight for `candidate`; higher sorts first.
    fn weight(&self, candidate: Candidate<'_>) -> i64;

    /// Whether `name` is locked and must not change state.
    fn is_locked(&self, name: &str) -> bool;
}

/// Prefers the highest channel priority, indifferent to whether the
/// candidate is already installed — the default policy for `install`.
#[derive(Debug, Clone, Default)]
pub struct InstallPolicy {
    locks: LockSet,
}

impl InstallPolicy {
    /// Builds an install policy enforcing `locks`.
    #[must_use]
    pub fn new(locks: LockSet) -> Self {
        Self { locks }
    }
}

impl Policy for InstallPolicy {
    fn weight(&self, candidate: Candidate<'_>) -> i64 {
        candidate.channel_priority
    }

    fn is_locked(&self, name: &str) -> bool {
        self.locks.is_locked(name)
    }
}

/// Prefers the highest channel priority, then strongly favors candidates
/// that are not already installed at the same identity — the default policy
/// for `upgrade`, which should make progress rather than settle back on the
/// status quo when priorities tie.
#[derive(Debug, Clone, Default)]
pub struct UpgradePolicy {
    locks: LockSet,
}

impl UpgradePolicy {
    /// Builds an upgrade policy enforcing `locks`.
    #[must_use]
    pub fn new(locks: LockSet) -> Self {
        Self { locks }
    }
}

impl Policy for UpgradePolicy {
    fn weight(&self, candidate: Candidate<'_>) -> i64 {
        let installed_penalty = i64::from(candidate.package.installed());
        candidate.channel_priority * 1000 - installed_penalty
    }

    fn is_locked(&self, name: &str) -> bool {
        self.locks.is_locked(name)
    }
}

/// Wraps `ChannelPriorities` with the channel alias each of a package's
/// loaders belongs to, computing the priority the policy sees.
#[must_use]
pub fn channel_priority_of<'a>(
    priorities: &ChannelPriorities,
    name: &str,
    aliases: impl Iterator<Item = &'a str>,
) -> i64 {
    aliases.map(|alias| priorities.priority_for(name, alias)).max().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::{Identity, PackageId, Version};

    fn pkg(name: &str, ver: &str, installed: bool) -> Package {
        let mut p = Package::new(PackageId(0), Identity::new(name, Version::parse(ver).unwrap(), ""));
        if installed {
            p.add_loader(depot_core::LoaderId(0), true);
        }
        p
    }

    #[test]
    fn install_policy_ranks_by_channel_priority_only() {
        let policy = InstallPolicy::default();
        let a = pkg("foo", "1.0", false);
        let b = pkg("foo", "1.0", true);
        assert_eq!(
            policy.weight(Candidate { package: &a, channel_priority: 5 }),
            policy.weight(Candidate { package: &b, channel_priority: 5 })
        );
    }

    #[test]
    fn upgrade_policy_prefers_not_already_installed_on_a_tie() {
        let policy = UpgradePolicy::default();
        let installed = pkg("foo", "1.0", true);
        let available = pkg("foo", "1.0", false);
        let w_installed = policy.weight(Candidate { package: &installed, channel_priority: 1 });
        let w_available = policy.weight(Candidate { package: &available, channel_priority: 1 });
        assert!(w_available > w_installed);
    }

    #[test]
    fn locked_names_are_reported() {
        let policy = InstallPolicy::new(LockSet::new(vec!["foo".to_string()]));
        assert!(policy.is_locked("foo"));
        assert!(!policy.is_locked("bar"));
    }
}
