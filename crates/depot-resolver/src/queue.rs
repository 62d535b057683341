//! The solver's input: a queue mapping package identity to desired op (§4.7).

use std::collections::BTreeMap;

use depot_core::PackageId;

/// An operation requested for a package identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueOp {
    /// Install this identity.
    Install,
    /// Remove this identity.
    Remove,
    /// Remove then re-install this identity unchanged.
    Reinstall,
    /// Install this identity, replacing any other installed identity of the
    /// same name (same mechanics as `Install`; the distinction is intent).
    Upgrade,
    /// Re-satisfy this already-installed package's requirements without
    /// changing its own state.
    Fix,
    /// No change (equivalent to omission; accepted for symmetry with
    /// `Changeset`).
    Keep,
}

/// The solver's request: which packages should change state, and how.
pub type Queue = BTreeMap<PackageId, QueueOp>;
