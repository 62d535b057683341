//! `package-priorities`: `name -> alias-or-wildcard -> integer` (§4.6).
//!
//! Shape and lookup order follow the persisted priority map: an exact
//! `(name, alias)` entry wins; failing that, `(name, "")` (the wildcard,
//! displayed to users as `*`) applies; failing that, the policy's default.

use std::sync::Arc;

use depot_core::AHashMap;

/// The wildcard alias key, matching any channel.
pub const WILDCARD: &str = "";

/// Per-package, per-channel priority overrides.
#[derive(Debug, Clone, Default)]
pub struct ChannelPriorities {
    table: AHashMap<Arc<str>, AHashMap<Arc<str>, i64>>,
    default_priority: i64,
}

impl ChannelPriorities {
    /// Builds a priority table with the given fallback for unlisted packages.
    #[must_use]
    pub fn new(default_priority: i64) -> Self {
        Self { table: AHashMap::default(), default_priority }
    }

    /// Sets the priority for `name` on `alias` (`""` for the wildcard).
    pub fn set(&mut self, name: impl Into<Arc<str>>, alias: impl Into<Arc<str>>, priority: i64) {
        self.table.entry(name.into()).or_default().insert(alias.into(), priority);
    }

    /// Resolves the priority for `name` declared by channel `alias`: an exact
    /// `(name, alias)` entry, then `(name, "")`, then the default.
    #[must_use]
    pub fn priority_for(&self, name: &str, alias: &str) -> i64 {
        let Some(by_alias) = self.table.get(name) else { return self.default_priority };
        if let Some(p) = by_alias.get(alias) {
            return *p;
        }
        by_alias.get(WILDCARD).copied().unwrap_or(self.default_priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_alias_wins_over_wildcard() {
        let mut p = ChannelPriorities::new(0);
        p.set("foo", "", 10);
        p.set("foo", "stable", 50);
        assert_eq!(p.priority_for("foo", "stable"), 50);
        assert_eq!(p.priority_for("foo", "testing"), 10);
    }

    #[test]
    fn unlisted_package_gets_the_default() {
        let p = ChannelPriorities::new(7);
        assert_eq!(p.priority_for("unknown", "stable"), 7);
    }
}
