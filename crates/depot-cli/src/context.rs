//! Shared command context: the cache, config state, and policy inputs every
//! command needs.
//!
//! Real backend loaders (rpm-md, deb, composer, ...) are out of scope here;
//! this context populates its cache from the same literal fixture the core
//! crates use for their scenario tests, so every command has real data to
//! operate against end to end.

use depot_cache::Cache;
use depot_config::{ConfigState, StateStore};
use depot_core::Result;
use depot_policy::{ChannelPriorities, LockSet, WILDCARD};
use depot_resolver::Priorities;

/// Everything a command needs beyond its own arguments.
pub struct Context {
    /// The package cache commands query and solve against.
    pub cache: Cache,
    /// The persisted configuration tree.
    pub config: ConfigState,
    /// Per-channel priority weights derived from `config.package_priorities`.
    pub priorities: ChannelPriorities,
    /// Locked package name patterns derived from `config.package_locks`.
    pub locks: LockSet,
}

impl Context {
    /// Loads configuration from the standard location and builds the demo cache.
    pub fn load() -> Result<Self> {
        let config = StateStore::standard().load()?;
        Self::from_config(config)
    }

    /// Builds a context from an already-loaded config state.
    pub fn from_config(config: ConfigState) -> Result<Self> {
        let (cache, _ids) = depot_test_utils::scenario_cache();

        let mut priorities = ChannelPriorities::new(config.default_priority);
        for (name, by_alias) in &config.package_priorities {
            for (alias, priority) in by_alias {
                priorities.set(name, alias, *priority);
            }
        }

        let locks = LockSet::new(config.package_locks.clone());

        Ok(Self { cache, config, priorities, locks })
    }

    /// Resolves each known package's priority weight.
    ///
    /// Loader-to-channel-alias tracking is out of scope here (no concrete
    /// backend loader is implemented), so every package resolves its
    /// priority under the wildcard alias.
    #[must_use]
    pub fn priorities(&self) -> Priorities {
        self.cache
            .get_packages(None)
            .map(|pkg| (pkg.id(), self.priorities.priority_for(pkg.name(), WILDCARD)))
            .collect()
    }
}
