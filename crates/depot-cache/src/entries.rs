//! Arena entries and the back-links between them (§3, §9).

use std::fmt;
use std::sync::Arc;

use depot_core::{Depends, PackageId, Provides};
use smallvec::SmallVec;

/// Stable index of a deduplicated Provides entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProvidesId(pub u32);

/// Stable index of a deduplicated Requires/Conflicts/Obsoletes entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependsId(pub u32);

/// Which relation list a [`DependsEntry`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependsKind {
    /// `p.requires`
    Requires,
    /// `p.conflicts`
    Conflicts,
    /// `p.obsoletes`
    Obsoletes,
}

impl fmt::Display for DependsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Requires => "Requires",
            Self::Conflicts => "Conflicts",
            Self::Obsoletes => "Obsoletes",
        };
        write!(f, "{s}")
    }
}

/// A deduplicated Provides value plus its declarers and back-links.
#[derive(Debug, Clone)]
pub struct ProvidesEntry {
    pub(crate) value: Provides,
    /// Packages that declare this Provides (inv. 4).
    pub(crate) packages: SmallVec<[PackageId; 4]>,
    /// Requires/Conflicts/Obsoletes entries that this Provides satisfies (inv. 3).
    pub(crate) requiredby: SmallVec<[DependsId; 4]>,
}

impl ProvidesEntry {
    /// The underlying Provides value.
    #[must_use]
    pub fn value(&self) -> &Provides {
        &self.value
    }

    /// Packages declaring this Provides.
    #[must_use]
    pub fn packages(&self) -> &[PackageId] {
        &self.packages
    }

    /// Requires/Conflicts/Obsoletes entries satisfied by this Provides.
    #[must_use]
    pub fn requiredby(&self) -> &[DependsId] {
        &self.requiredby
    }
}

/// A deduplicated Requires/Conflicts/Obsoletes value plus its declarers and
/// back-links.
#[derive(Debug, Clone)]
pub struct DependsEntry {
    pub(crate) value: Depends,
    pub(crate) kind: DependsKind,
    /// Packages declaring this relation.
    pub(crate) packages: SmallVec<[PackageId; 4]>,
    /// Provides entries that satisfy this relation (inv. 1, 2).
    pub(crate) providedby: SmallVec<[ProvidesId; 4]>,
}

impl DependsEntry {
    /// The underlying Depends value.
    #[must_use]
    pub fn value(&self) -> &Depends {
        &self.value
    }

    /// Which relation list this entry belongs to.
    #[must_use]
    pub const fn kind(&self) -> DependsKind {
        self.kind
    }

    /// Packages declaring this relation.
    #[must_use]
    pub fn packages(&self) -> &[PackageId] {
        &self.packages
    }

    /// Provides entries that satisfy this relation.
    #[must_use]
    pub fn providedby(&self) -> &[ProvidesId] {
        &self.providedby
    }
}

/// Name-indexed arena ids, keyed by interned capability/package name.
pub type NameIndex<T> = std::collections::HashMap<Arc<str>, Vec<T>, ahash::RandomState>;
