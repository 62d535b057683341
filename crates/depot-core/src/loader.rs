//! The loader contract (§4.3): how a backend populates the cache.

use crate::error::Result;
use crate::package::LoaderId;

/// A channel-specific loader that materializes packages into a cache.
///
/// Multiple loaders may claim the same package identity; the cache merges
/// them, unioning relations and ORing `installed`. Implementations must make
/// `load` idempotent for a given backing store.
pub trait Loader: std::fmt::Debug + Send + Sync {
    /// Populates packages and relations into `sink`.
    ///
    /// `sink` is intentionally generic over the cache's insertion API rather
    /// than naming `depot_cache::Cache` directly, since `depot-core` does not
    /// depend on `depot-cache`.
    fn load(&mut self, sink: &mut dyn LoadSink) -> Result<()>;

    /// Detaches this loader's packages from the cache. Implementations need
    /// not track anything beyond their own identity: the cache is
    /// responsible for removing packages whose loader set becomes empty.
    fn unload(&mut self);

    /// Whether this loader's packages are considered installed.
    fn get_installed(&self) -> bool;

    /// The originating channel alias, used for priority resolution.
    fn get_channel(&self) -> &str;

    /// This loader's stable id, once registered with a cache.
    fn id(&self) -> Option<LoaderId>;

    /// Called once by the cache when this loader is registered.
    fn set_id(&mut self, id: LoaderId);
}

/// What a [`Loader`] writes into during `load`. Implemented by
/// `depot_cache::Cache` so loaders never need to depend on it directly.
pub trait LoadSink {
    /// Declares a package with the given identity, returning its stable id.
    /// Calling this twice with the same identity from different loaders
    /// merges onto a single package, per the loader contract.
    fn declare_package(
        &mut self,
        loader: LoaderId,
        name: &str,
        version: &str,
        tag: &str,
        installed: bool,
    ) -> Result<crate::package::PackageId>;

    /// Adds a Provides declaration to a previously-declared package.
    fn add_provides(&mut self, package: crate::package::PackageId, provides: crate::relation::Provides);

    /// Adds a Requires declaration to a previously-declared package.
    fn add_requires(&mut self, package: crate::package::PackageId, depends: crate::relation::Depends);

    /// Adds a Conflicts declaration to a previously-declared package.
    fn add_conflicts(&mut self, package: crate::package::PackageId, depends: crate::relation::Depends);

    /// Adds an Obsoletes declaration to a previously-declared package.
    fn add_obsoletes(&mut self, package: crate::package::PackageId, depends: crate::relation::Depends);
}
