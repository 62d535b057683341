//! The solver's output: a pure mapping of package identity to planned state (§3).

use std::collections::BTreeMap;
use std::fmt;

use depot_core::PackageId;

/// A package's planned state in a changeset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeOp {
    /// Install this identity.
    Install,
    /// Remove this identity.
    Remove,
    /// Remove then re-install this identity unchanged.
    Reinstall,
    /// No change. Never stored explicitly — a package absent from the
    /// changeset is implicitly `Keep`.
    Keep,
}

impl fmt::Display for ChangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Install => "INSTALL",
            Self::Remove => "REMOVE",
            Self::Reinstall => "REINSTALL",
            Self::Keep => "KEEP",
        };
        write!(f, "{s}")
    }
}

/// A pure value: package identity → planned state. No references into the
/// cache are carried beyond package ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset(BTreeMap<PackageId, ChangeOp>);

impl Changeset {
    /// An empty changeset (every package implicitly `Keep`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The planned state for `id`; `Keep` if absent.
    #[must_use]
    pub fn get(&self, id: PackageId) -> ChangeOp {
        self.0.get(&id).copied().unwrap_or(ChangeOp::Keep)
    }

    /// Sets `id`'s planned state. Setting `Keep` removes any existing entry,
    /// preserving the "absent means Keep" invariant.
    pub fn set(&mut self, id: PackageId, op: ChangeOp) {
        if op == ChangeOp::Keep {
            self.0.remove(&id);
        } else {
            self.0.insert(id, op);
        }
    }

    /// Iterates `(id, op)` pairs in ascending id order, for deterministic output.
    pub fn iter(&self) -> impl Iterator<Item = (PackageId, ChangeOp)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// The number of non-`Keep` entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether every package is `Keep`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every package id planned for `Install` or `Reinstall`.
    pub fn installs(&self) -> impl Iterator<Item = PackageId> + '_ {
        self.0.iter().filter(|(_, op)| matches!(op, ChangeOp::Install | ChangeOp::Reinstall)).map(|(id, _)| *id)
    }

    /// Every package id planned for `Remove`.
    pub fn removes(&self) -> impl Iterator<Item = PackageId> + '_ {
        self.0.iter().filter(|(_, op)| *op == ChangeOp::Remove).map(|(id, _)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_entries_are_keep() {
        let cs = Changeset::new();
        assert_eq!(cs.get(PackageId(0)), ChangeOp::Keep);
    }

    #[test]
    fn setting_keep_removes_the_entry() {
        let mut cs = Changeset::new();
        cs.set(PackageId(0), ChangeOp::Install);
        assert_eq!(cs.len(), 1);
        cs.set(PackageId(0), ChangeOp::Keep);
        assert!(cs.is_empty());
    }
}
