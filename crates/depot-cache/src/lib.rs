//! Arena-backed package cache (§3, §9): owns packages and deduplicated
//! relations, indexed by name, with closed `providedby`/`requiredby`
//! back-links.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod entries;

pub use cache::Cache;
pub use entries::{DependsEntry, DependsId, DependsKind, NameIndex, ProvidesEntry, ProvidesId};

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::{Depends, LoadSink, LoaderId, Provides, RelOp, Version};

    fn ver(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn declaring_the_same_identity_twice_merges_onto_one_package() {
        let mut cache = Cache::new();
        let a = cache.declare_package(LoaderId(0), "foo", "1.0", "", true).unwrap();
        let b = cache.declare_package(LoaderId(1), "foo", "1.0", "", false).unwrap();
        assert_eq!(a, b);
        let pkg = cache.package(a).unwrap();
        assert!(pkg.installed(), "installed flags are ORed across loaders");
        assert_eq!(pkg.loaders().len(), 2);
    }

    #[test]
    fn declaring_the_same_identity_with_differently_spelled_equal_versions_merges() {
        let mut cache = Cache::new();
        let a = cache.declare_package(LoaderId(0), "foo", "1.0", "", true).unwrap();
        let b = cache.declare_package(LoaderId(1), "foo", "0:1.0", "", false).unwrap();
        assert_eq!(a, b, "implicit and explicit zero epoch are the same identity");
        assert_eq!(cache.package(a).unwrap().loaders().len(), 2);

        let mut cache = Cache::new();
        let c = cache.declare_package(LoaderId(0), "bar", "1.09", "", true).unwrap();
        let d = cache.declare_package(LoaderId(1), "bar", "1.9", "", false).unwrap();
        assert_eq!(c, d, "a leading zero in a digit run is the same identity");
        let pkg = cache.package(c).unwrap();
        assert_eq!(pkg.loaders().len(), 2);
        assert_eq!(cache.get_packages(Some("bar")).count(), 1);
    }

    #[test]
    fn link_deps_closes_providedby_and_requiredby() {
        let mut cache = Cache::new();
        let foo = cache.declare_package(LoaderId(0), "foo", "1.0", "", false).unwrap();
        let bar = cache.declare_package(LoaderId(0), "bar", "1.0", "", false).unwrap();
        cache.add_provides(foo, Provides::new("libx", Some(ver("1.0"))));
        cache.add_requires(bar, Depends::new("libx", RelOp::Ge, Some(ver("1.0"))));
        cache.link_deps();

        let provides: Vec<_> = cache.get_provides(Some("libx")).collect();
        assert_eq!(provides.len(), 1);
        assert_eq!(provides[0].requiredby().len(), 1);
        assert_eq!(provides[0].packages(), &[foo]);

        let requires: Vec<_> = cache.get_requires(Some("libx")).collect();
        assert_eq!(requires.len(), 1);
        assert_eq!(requires[0].providedby().len(), 1, "requires should link back to the matching provides entry");
    }

    #[test]
    fn unversioned_requires_does_not_link_to_versioned_provides_mismatch() {
        let mut cache = Cache::new();
        let foo = cache.declare_package(LoaderId(0), "foo", "1.0", "", false).unwrap();
        let bar = cache.declare_package(LoaderId(0), "bar", "1.0", "", false).unwrap();
        cache.add_provides(foo, Provides::new("libx", Some(ver("1.0"))));
        cache.add_requires(bar, Depends::new("libx", RelOp::Ge, Some(ver("2.0"))));
        cache.link_deps();

        let requires: Vec<_> = cache.get_requires(Some("libx")).collect();
        assert!(requires[0].providedby().is_empty());
    }

    #[test]
    fn unload_destroys_packages_with_no_remaining_loader() {
        let mut cache = Cache::new();
        let id = cache.declare_package(LoaderId(0), "foo", "1.0", "", true).unwrap();
        cache.unload_loader(LoaderId(0));
        assert!(cache.package(id).is_none());
    }

    #[test]
    fn unload_keeps_package_claimed_by_another_loader() {
        let mut cache = Cache::new();
        let id = cache.declare_package(LoaderId(0), "foo", "1.0", "", true).unwrap();
        let other = cache.declare_package(LoaderId(1), "foo", "1.0", "", false).unwrap();
        assert_eq!(id, other);
        cache.unload_loader(LoaderId(0));
        assert!(cache.package(id).is_some(), "loader 1 still claims this identity");
    }
}
