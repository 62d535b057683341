//! The cache: owns packages and relations, indexes them by name, and keeps
//! `providedby`/`requiredby` back-links closed (§4.4).

use std::sync::Arc;

use depot_core::{
    Depends, Identity, LoadSink, Loader, LoaderId, Package, PackageId, Provides, Result, Version,
};
use smallvec::SmallVec;

use crate::entries::{DependsEntry, DependsId, DependsKind, NameIndex, ProvidesEntry, ProvidesId};

/// `(name, version.canonical_key(), tag)` — the canonical key, not the raw
/// version string, so loaders declaring the same identity with differently
/// spelled but version-equal strings (`"1.0"` vs `"0:1.0"`) merge.
type IdentityKey = (String, String, String);

/// Owns the full set of known packages and their deduplicated relations.
///
/// Mutated only by [`Cache::load`] / [`Cache::unload`]; the solver holds only
/// a shared reference to it for the duration of resolution.
#[derive(Debug, Default)]
pub struct Cache {
    packages: Vec<Option<Package>>,
    identity_index: std::collections::HashMap<IdentityKey, PackageId, ahash::RandomState>,
    name_index: NameIndex<PackageId>,

    provides_entries: Vec<ProvidesEntry>,
    depends_entries: Vec<DependsEntry>,

    provides_by_name: NameIndex<ProvidesId>,
    requires_by_name: NameIndex<DependsId>,
    conflicts_by_name: NameIndex<DependsId>,
    obsoletes_by_name: NameIndex<DependsId>,

    loaders: Vec<Box<dyn Loader>>,
}

impl Cache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a loader, assigning it a stable [`LoaderId`]. The loader is
    /// not driven until the next [`Cache::load`].
    pub fn register_loader(&mut self, mut loader: Box<dyn Loader>) -> LoaderId {
        let id = LoaderId(self.loaders.len() as u32);
        loader.set_id(id);
        self.loaders.push(loader);
        id
    }

    /// Drives every registered loader's `load`, then rebuilds back-links.
    /// Idempotent: re-running with loaders backed by the same store produces
    /// the same cache state (identities merge rather than duplicate).
    pub fn load(&mut self) -> Result<()> {
        let mut loaders = std::mem::take(&mut self.loaders);
        for loader in &mut loaders {
            loader.load(self)?;
        }
        self.loaders = loaders;
        self.link_deps();
        Ok(())
    }

    /// Unloads every registered loader, detaching their packages and
    /// destroying any package left with no owning loader.
    pub fn unload(&mut self) {
        let ids: Vec<LoaderId> = self.loaders.iter().filter_map(Loader::id).collect();
        let mut loaders = std::mem::take(&mut self.loaders);
        for loader in &mut loaders {
            loader.unload();
        }
        self.loaders = loaders;
        for id in ids {
            self.detach_loader(id);
        }
        self.link_deps();
    }

    /// Detaches a single loader's packages without driving any loader
    /// callback, e.g. to reload one channel in isolation.
    pub fn unload_loader(&mut self, loader: LoaderId) {
        self.detach_loader(loader);
        self.link_deps();
    }

    fn detach_loader(&mut self, loader: LoaderId) {
        let mut destroyed = Vec::new();
        for slot in &mut self.packages {
            if let Some(pkg) = slot {
                if pkg.remove_loader(loader) {
                    destroyed.push(pkg.id());
                }
            }
        }
        for id in destroyed {
            if let Some(pkg) = self.packages[id.0 as usize].take() {
                if let Some(names) = self.name_index.get_mut(&Arc::<str>::from(pkg.name())) {
                    names.retain(|p| *p != id);
                }
                self.identity_index.retain(|_, v| *v != id);
                self.prune_relations_for(id);
            }
        }
    }

    fn prune_relations_for(&mut self, id: PackageId) {
        for entry in &mut self.provides_entries {
            entry.packages.retain(|p| *p != id);
        }
        for entry in &mut self.depends_entries {
            entry.packages.retain(|p| *p != id);
        }
    }

    /// All known packages, or only those named `name`.
    pub fn get_packages(&self, name: Option<&str>) -> impl Iterator<Item = &Package> + '_ {
        match name {
            Some(name) => {
                let ids: &[PackageId] = self.name_index.get(name).map_or(&[], Vec::as_slice);
                Box::new(ids.iter().filter_map(|id| self.packages[id.0 as usize].as_ref()))
                    as Box<dyn Iterator<Item = &Package> + '_>
            }
            None => Box::new(self.packages.iter().filter_map(Option::as_ref)),
        }
    }

    /// A single package by its stable id.
    #[must_use]
    pub fn package(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Indexed Provides entries, optionally filtered by name.
    pub fn get_provides(&self, name: Option<&str>) -> impl Iterator<Item = &ProvidesEntry> + '_ {
        self.provides_by(name)
    }

    /// Indexed Requires entries, optionally filtered by name.
    pub fn get_requires(&self, name: Option<&str>) -> impl Iterator<Item = &DependsEntry> + '_ {
        self.depends_by(name, DependsKind::Requires)
    }

    /// Indexed Conflicts entries, optionally filtered by name.
    pub fn get_conflicts(&self, name: Option<&str>) -> impl Iterator<Item = &DependsEntry> + '_ {
        self.depends_by(name, DependsKind::Conflicts)
    }

    /// Indexed Obsoletes entries, optionally filtered by name.
    pub fn get_obsoletes(&self, name: Option<&str>) -> impl Iterator<Item = &DependsEntry> + '_ {
        self.depends_by(name, DependsKind::Obsoletes)
    }

    /// A single Provides entry by id.
    #[must_use]
    pub fn provides_entry(&self, id: ProvidesId) -> Option<&ProvidesEntry> {
        self.provides_entries.get(id.0 as usize)
    }

    /// A single Requires/Conflicts/Obsoletes entry by id.
    #[must_use]
    pub fn depends_entry(&self, id: DependsId) -> Option<&DependsEntry> {
        self.depends_entries.get(id.0 as usize)
    }

    fn intern_provides(&mut self, package: PackageId, provides: Provides) -> ProvidesId {
        let name: Arc<str> = Arc::from(provides.name());
        if let Some(ids) = self.provides_by_name.get(&name) {
            for &pid in ids {
                if self.provides_entries[pid.0 as usize].value == provides {
                    let entry = &mut self.provides_entries[pid.0 as usize];
                    if !entry.packages.contains(&package) {
                        entry.packages.push(package);
                    }
                    return pid;
                }
            }
        }
        let id = ProvidesId(self.provides_entries.len() as u32);
        let mut packages = SmallVec::new();
        packages.push(package);
        self.provides_entries.push(ProvidesEntry { value: provides, packages, requiredby: SmallVec::new() });
        self.provides_by_name.entry(name).or_default().push(id);
        id
    }

    fn intern_depends(&mut self, package: PackageId, depends: Depends, kind: DependsKind) -> DependsId {
        let name: Arc<str> = Arc::from(depends.name());
        let by_name = self.by_name_map_mut(kind);
        if let Some(ids) = by_name.get(&name) {
            for &did in ids {
                if self.depends_entries[did.0 as usize].value == depends {
                    let entry = &mut self.depends_entries[did.0 as usize];
                    if !entry.packages.contains(&package) {
                        entry.packages.push(package);
                    }
                    return did;
                }
            }
        }
        let id = DependsId(self.depends_entries.len() as u32);
        let mut packages = SmallVec::new();
        packages.push(package);
        self.depends_entries.push(DependsEntry { value: depends, kind, packages, providedby: SmallVec::new() });
        self.by_name_map_mut(kind).entry(name).or_default().push(id);
        id
    }

    fn by_name_map_mut(&mut self, kind: DependsKind) -> &mut NameIndex<DependsId> {
        match kind {
            DependsKind::Requires => &mut self.requires_by_name,
            DependsKind::Conflicts => &mut self.conflicts_by_name,
            DependsKind::Obsoletes => &mut self.obsoletes_by_name,
        }
    }

    fn by_name_map(&self, kind: DependsKind) -> &NameIndex<DependsId> {
        match kind {
            DependsKind::Requires => &self.requires_by_name,
            DependsKind::Conflicts => &self.conflicts_by_name,
            DependsKind::Obsoletes => &self.obsoletes_by_name,
        }
    }

    /// Rebuilds every `providedby`/`requiredby` back-link from scratch.
    /// Called internally after `load`/`unload`; safe to call directly in
    /// tests that mutate the cache's arenas through the `LoadSink` API
    /// without going through a full reload.
    pub fn link_deps(&mut self) {
        for entry in &mut self.provides_entries {
            entry.requiredby.clear();
        }
        for entry in &mut self.depends_entries {
            entry.providedby.clear();
        }
        for di in 0..self.depends_entries.len() {
            let name: Arc<str> = Arc::from(self.depends_entries[di].value.name());
            let value = self.depends_entries[di].value.clone();
            let Some(pids) = self.provides_by_name.get(&name).cloned() else { continue };
            for pid in pids {
                if value.matches(&self.provides_entries[pid.0 as usize].value) {
                    self.depends_entries[di].providedby.push(pid);
                    self.provides_entries[pid.0 as usize].requiredby.push(DependsId(di as u32));
                }
            }
        }
    }
}

impl LoadSink for Cache {
    fn declare_package(
        &mut self,
        loader: LoaderId,
        name: &str,
        version: &str,
        tag: &str,
        installed: bool,
    ) -> Result<PackageId> {
        let parsed_version = Version::parse(version)?;
        let key: IdentityKey = (name.to_string(), parsed_version.canonical_key(), tag.to_string());
        if let Some(&id) = self.identity_index.get(&key) {
            if let Some(pkg) = self.packages[id.0 as usize].as_mut() {
                pkg.add_loader(loader, installed);
            }
            return Ok(id);
        }
        let id = PackageId(self.packages.len() as u32);
        let identity = Identity::new(name, parsed_version, tag);
        let mut pkg = Package::new(id, identity);
        pkg.add_loader(loader, installed);
        self.packages.push(Some(pkg));
        self.identity_index.insert(key, id);
        self.name_index.entry(Arc::from(name)).or_default().push(id);
        Ok(id)
    }

    fn add_provides(&mut self, package: PackageId, provides: Provides) {
        if let Some(pkg) = self.packages[package.0 as usize].as_mut() {
            pkg.add_provides(provides.clone());
        }
        self.intern_provides(package, provides);
    }

    fn add_requires(&mut self, package: PackageId, depends: Depends) {
        if let Some(pkg) = self.packages[package.0 as usize].as_mut() {
            pkg.add_requires(depends.clone());
        }
        self.intern_depends(package, depends, DependsKind::Requires);
    }

    fn add_conflicts(&mut self, package: PackageId, depends: Depends) {
        if let Some(pkg) = self.packages[package.0 as usize].as_mut() {
            pkg.add_conflicts(depends.clone());
        }
        self.intern_depends(package, depends, DependsKind::Conflicts);
    }

    fn add_obsoletes(&mut self, package: PackageId, depends: Depends) {
        if let Some(pkg) = self.packages[package.0 as usize].as_mut() {
            pkg.add_obsoletes(depends.clone());
        }
        self.intern_depends(package, depends, DependsKind::Obsoletes);
    }
}

// Typed wrappers over the generic-by-name lookup, since trait objects over
// `ProvidesEntry`/`DependsEntry` can't share one generic helper without
// boxing the iterator on every call.
impl Cache {
    fn provides_by(&self, name: Option<&str>) -> Box<dyn Iterator<Item = &ProvidesEntry> + '_> {
        match name {
            Some(name) => {
                let ids: &[ProvidesId] = self.provides_by_name.get(name).map_or(&[], Vec::as_slice);
                Box::new(ids.iter().map(move |id| &self.provides_entries[id.0 as usize]))
            }
            None => Box::new(self.provides_entries.iter()),
        }
    }

    fn depends_by(&self, name: Option<&str>, kind: DependsKind) -> Box<dyn Iterator<Item = &DependsEntry> + '_> {
        let by_name = self.by_name_map(kind);
        match name {
            Some(name) => {
                let ids: &[DependsId] = by_name.get(name).map_or(&[], Vec::as_slice);
                Box::new(ids.iter().map(move |id| &self.depends_entries[id.0 as usize]))
            }
            None => Box::new(self.depends_entries.iter().filter(move |e| e.kind == kind)),
        }
    }
}
