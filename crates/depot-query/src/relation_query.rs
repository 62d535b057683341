//! `whoprovides` / `whorequires` / `whoconflicts` / `whoobsoletes` grammar (§4.5).
//!
//! Each accepts repeatable `name[=version]` specs, with `name` optionally
//! matched as a regex.

use depot_cache::{Cache, DependsEntry, DependsKind, ProvidesEntry};
use depot_core::{Result, Version};

use crate::pattern::Pattern;

/// A parsed `name[=version]` query spec.
#[derive(Debug, Clone)]
pub struct Spec {
    name: String,
    version: Option<Version>,
}

impl Spec {
    /// Parses `name` or `name=version`.
    pub fn parse(text: &str) -> Result<Self> {
        match text.split_once('=') {
            Some((name, version)) => Ok(Self { name: name.to_string(), version: Some(Version::parse(version)?) }),
            None => Ok(Self { name: text.to_string(), version: None }),
        }
    }

    fn matches_provides(&self, pattern: &Pattern, entry: &ProvidesEntry) -> bool {
        if !pattern.matches(entry.value().name()) {
            return false;
        }
        match (&self.version, entry.value().version()) {
            (None, _) => true,
            (Some(want), Some(have)) => want == have,
            (Some(_), None) => false,
        }
    }

    fn matches_depends(&self, pattern: &Pattern, entry: &DependsEntry) -> bool {
        if !pattern.matches(entry.value().name()) {
            return false;
        }
        match (&self.version, entry.value().version()) {
            (None, _) => true,
            (Some(want), Some(have)) => want == have,
            (Some(_), None) => false,
        }
    }
}

/// Provides entries matching any of `specs`.
pub fn who_provides<'c>(cache: &'c Cache, specs: &[Spec], regex: bool) -> Result<Vec<&'c ProvidesEntry>> {
    collect_provides(cache, specs, regex)
}

/// Requires entries matching any of `specs`.
pub fn who_requires<'c>(cache: &'c Cache, specs: &[Spec], regex: bool) -> Result<Vec<&'c DependsEntry>> {
    collect_depends(cache, specs, regex, DependsKind::Requires)
}

/// Conflicts entries matching any of `specs`.
pub fn who_conflicts<'c>(cache: &'c Cache, specs: &[Spec], regex: bool) -> Result<Vec<&'c DependsEntry>> {
    collect_depends(cache, specs, regex, DependsKind::Conflicts)
}

/// Obsoletes entries matching any of `specs`.
pub fn who_obsoletes<'c>(cache: &'c Cache, specs: &[Spec], regex: bool) -> Result<Vec<&'c DependsEntry>> {
    collect_depends(cache, specs, regex, DependsKind::Obsoletes)
}

fn collect_provides<'c>(cache: &'c Cache, specs: &[Spec], regex: bool) -> Result<Vec<&'c ProvidesEntry>> {
    let mut out = Vec::new();
    for spec in specs {
        let pattern = Pattern::compile(&spec.name, regex)?;
        for entry in cache.get_provides(None) {
            if spec.matches_provides(&pattern, entry) {
                out.push(entry);
            }
        }
    }
    Ok(out)
}

fn collect_depends<'c>(cache: &'c Cache, specs: &[Spec], regex: bool, kind: DependsKind) -> Result<Vec<&'c DependsEntry>> {
    let mut out = Vec::new();
    for spec in specs {
        let pattern = Pattern::compile(&spec.name, regex)?;
        let entries = match kind {
            DependsKind::Requires => cache.get_requires(None),
            DependsKind::Conflicts => cache.get_conflicts(None),
            DependsKind::Obsoletes => cache.get_obsoletes(None),
        };
        for entry in entries {
            if spec.matches_depends(&pattern, entry) {
                out.push(entry);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_cache::Cache as CacheImpl;
    use depot_core::{Depends, LoadSink, LoaderId, Provides, RelOp};

    fn ver(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn fixture() -> CacheImpl {
        let mut cache = CacheImpl::new();
        let foo = cache.declare_package(LoaderId(0), "foo", "1.0", "", false).unwrap();
        let bar = cache.declare_package(LoaderId(0), "bar", "1.0", "", false).unwrap();
        cache.add_provides(foo, Provides::new("libx", Some(ver("1.0"))));
        cache.add_requires(bar, Depends::new("libx", RelOp::Ge, Some(ver("1.0"))));
        cache.link_deps();
        cache
    }

    #[test]
    fn who_provides_matches_exact_name() {
        let cache = fixture();
        let specs = vec![Spec::parse("libx").unwrap()];
        let hits = who_provides(&cache, &specs, false).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn who_provides_with_version_filters_mismatches() {
        let cache = fixture();
        let specs = vec![Spec::parse("libx=2.0").unwrap()];
        let hits = who_provides(&cache, &specs, false).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn who_requires_matches_by_name() {
        let cache = fixture();
        let specs = vec![Spec::parse("libx").unwrap()];
        let hits = who_requires(&cache, &specs, false).unwrap();
        assert_eq!(hits.len(), 1);
    }
}
