//! Package identity and declared relations (§3).

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::relation::{Depends, Provides};
use crate::version::Version;

/// Stable index of a package inside a [`crate::Cache`]'s arena.
///
/// Assigned on insertion and never reused within the lifetime of a cache,
/// so it is safe to use as a back-link target even while other packages are
/// being mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(pub u32);

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable index of a registered [`crate::Loader`] inside a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoaderId(pub u32);

/// A package's identity: `(name, version, architecture-or-backend-tag)`.
#[derive(Debug, Clone)]
pub struct Identity {
    name: Arc<str>,
    version: Version,
    tag: Arc<str>,
}

impl Identity {
    /// Builds an identity. `tag` is the architecture or backend discriminator
    /// (e.g. `x86_64`, `noarch`, a backend name) — use `""` when the backend
    /// carries no such concept.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, version: Version, tag: impl Into<Arc<str>>) -> Self {
        Self { name: name.into(), version, tag: tag.into() }
    }

    /// The package name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The package version.
    #[must_use]
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The architecture-or-backend tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tag.is_empty() {
            write!(f, "{}-{}", self.name, self.version)
        } else {
            write!(f, "{}-{}.{}", self.name, self.version, self.tag)
        }
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version && self.tag == other.tag
    }
}
impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version.canonical_key().hash(state);
        self.tag.hash(state);
    }
}

/// Packages are totally ordered by `(name asc, version desc, tag asc)`.
impl PartialOrd for Identity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Identity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| other.version.compare(&self.version))
            .then_with(|| self.tag.cmp(&other.tag))
    }
}

/// A package known to the cache: its identity, declared relations, installed
/// flag, and the loaders that contributed it.
#[derive(Debug, Clone)]
pub struct Package {
    id: PackageId,
    identity: Identity,
    provides: Vec<Provides>,
    requires: Vec<Depends>,
    conflicts: Vec<Depends>,
    obsoletes: Vec<Depends>,
    installed: bool,
    loaders: SmallVec<[LoaderId; 2]>,
}

impl Package {
    /// Builds a package with no declared relations and no owning loaders yet;
    /// callers add relations and loaders before registering it with a cache.
    #[must_use]
    pub fn new(id: PackageId, identity: Identity) -> Self {
        Self {
            id,
            identity,
            provides: Vec::new(),
            requires: Vec::new(),
            conflicts: Vec::new(),
            obsoletes: Vec::new(),
            installed: false,
            loaders: SmallVec::new(),
        }
    }

    /// This package's stable cache index.
    #[must_use]
    pub const fn id(&self) -> PackageId {
        self.id
    }

    /// This package's identity.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The package name (shorthand for `identity().name()`).
    #[must_use]
    pub fn name(&self) -> &str {
        self.identity.name()
    }

    /// The package version (shorthand for `identity().version()`).
    #[must_use]
    pub fn version(&self) -> &Version {
        self.identity.version()
    }

    /// Declared Provides.
    #[must_use]
    pub fn provides(&self) -> &[Provides] {
        &self.provides
    }

    /// Declared Requires.
    #[must_use]
    pub fn requires(&self) -> &[Depends] {
        &self.requires
    }

    /// Declared Conflicts.
    #[must_use]
    pub fn conflicts(&self) -> &[Depends] {
        &self.conflicts
    }

    /// Declared Obsoletes.
    #[must_use]
    pub fn obsoletes(&self) -> &[Depends] {
        &self.obsoletes
    }

    /// Whether this package is currently installed (ORed across its loaders).
    #[must_use]
    pub const fn installed(&self) -> bool {
        self.installed
    }

    /// The loaders that have contributed this package's identity.
    #[must_use]
    pub fn loaders(&self) -> &[LoaderId] {
        &self.loaders
    }

    /// Adds a Provides, skipping exact duplicates.
    pub fn add_provides(&mut self, p: Provides) {
        if !self.provides.contains(&p) {
            self.provides.push(p);
        }
    }

    /// Adds a Requires, skipping exact duplicates.
    pub fn add_requires(&mut self, d: Depends) {
        if !self.requires.contains(&d) {
            self.requires.push(d);
        }
    }

    /// Adds a Conflicts, skipping exact duplicates.
    pub fn add_conflicts(&mut self, d: Depends) {
        if !self.conflicts.contains(&d) {
            self.conflicts.push(d);
        }
    }

    /// Adds an Obsoletes, skipping exact duplicates.
    pub fn add_obsoletes(&mut self, d: Depends) {
        if !self.obsoletes.contains(&d) {
            self.obsoletes.push(d);
        }
    }

    /// Registers a loader as claiming this package, ORing the installed flag.
    pub fn add_loader(&mut self, loader: LoaderId, loader_installed: bool) {
        if !self.loaders.contains(&loader) {
            self.loaders.push(loader);
        }
        self.installed |= loader_installed;
    }

    /// Removes a loader; returns true if this package now has no loaders and
    /// should be destroyed.
    pub fn remove_loader(&mut self, loader: LoaderId) -> bool {
        self.loaders.retain(|l| *l != loader);
        self.loaders.is_empty()
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity)
    }
}

/// Equality is by identity, not by cache-assigned id or relation contents.
impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}
impl Eq for Package {}

impl PartialOrd for Package {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Package {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity.cmp(&other.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;

    fn pkg(name: &str, ver: &str, id: u32) -> Package {
        Package::new(PackageId(id), Identity::new(name, Version::parse(ver).unwrap(), ""))
    }

    #[test]
    fn ordering_is_name_asc_then_version_desc() {
        let a = pkg("foo", "1.0", 0);
        let b = pkg("foo", "2.0", 1);
        assert!(b < a, "higher version should sort first within the same name");

        let c = pkg("bar", "9.0", 2);
        assert!(c < a, "name ordering dominates version");
    }

    #[test]
    fn equality_ignores_cache_id() {
        let a = pkg("foo", "1.0", 0);
        let b = pkg("foo", "1.0", 5);
        assert_eq!(a, b);
    }

    #[test]
    fn identity_hash_agrees_with_eq_across_equal_but_differently_spelled_versions() {
        use std::hash::{DefaultHasher, Hash, Hasher};

        fn hash_of(id: &Identity) -> u64 {
            let mut hasher = DefaultHasher::new();
            id.hash(&mut hasher);
            hasher.finish()
        }

        let a = Identity::new("foo", Version::parse("1.0").unwrap(), "");
        let b = Identity::new("foo", Version::parse("0:1.0").unwrap(), "");
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn loader_union_ors_installed() {
        let mut p = pkg("foo", "1.0", 0);
        p.add_loader(LoaderId(0), false);
        assert!(!p.installed());
        p.add_loader(LoaderId(1), true);
        assert!(p.installed());
    }

    #[test]
    fn removing_last_loader_signals_destruction() {
        let mut p = pkg("foo", "1.0", 0);
        p.add_loader(LoaderId(0), true);
        p.add_loader(LoaderId(1), false);
        assert!(!p.remove_loader(LoaderId(0)));
        assert!(p.remove_loader(LoaderId(1)));
    }
}
