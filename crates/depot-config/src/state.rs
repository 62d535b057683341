//! The persisted configuration tree (§6 "Persisted state layout").

use std::collections::BTreeMap;

use depot_core::Result;
use serde::{Deserialize, Serialize};

use crate::channel::ChannelRecord;

/// `name -> alias-or-"" -> priority`, matching [`depot_policy::ChannelPriorities`]'s
/// wildcard-alias convention.
pub type PackagePriorities = BTreeMap<String, BTreeMap<String, i64>>;

/// The full persisted state tree. Unknown keys round-trip unchanged via
/// `extra`, so a newer or older binary sharing this file never drops data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConfigState {
    /// Registered channels, keyed by alias.
    pub channels: BTreeMap<String, ChannelRecord>,
    /// Per-name, per-alias priority overrides.
    pub package_priorities: PackagePriorities,
    /// Glob patterns naming packages that must not change state.
    pub package_locks: Vec<String>,
    /// Named sets of package identities, for ad-hoc grouping (e.g. `@critical`).
    pub flags: BTreeMap<String, Vec<String>>,
    /// Whether automatic updates are enabled.
    pub auto_update: bool,
    /// Whether changesets should carry verbose unmet-relation-chain explanations.
    pub explain_changesets: bool,
    /// Priority assumed for a channel with no explicit entry.
    pub default_priority: i64,
    /// Keys this binary doesn't recognize, preserved verbatim across
    /// read/modify/write cycles.
    #[serde(flatten)]
    pub extra: BTreeMap<String, sonic_rs::Value>,
}

impl ConfigState {
    /// Parses a state tree from its on-disk JSON representation.
    pub fn from_str(text: &str) -> Result<Self> {
        sonic_rs::from_str(text).map_err(|e| depot_core::Error::config(e.to_string()))
    }

    /// Serializes this state tree back to pretty-printed JSON.
    pub fn to_string_pretty(&self) -> Result<String> {
        sonic_rs::to_string_pretty(self).map_err(|e| depot_core::Error::config(e.to_string()))
    }

    /// Validates every channel record.
    pub fn validate(&self) -> Result<()> {
        for record in self.channels.values() {
            record.validate()?;
        }
        Ok(())
    }

    /// Channels ordered by descending priority, ties broken by alias.
    #[must_use]
    pub fn channels_by_priority(&self) -> Vec<&ChannelRecord> {
        let mut channels: Vec<&ChannelRecord> = self.channels.values().collect();
        channels.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.alias.cmp(&b.alias)));
        channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_top_level_keys_round_trip() {
        let text = r#"{"channels":{},"package-priorities":{},"package-locks":[],"flags":{},
            "auto-update":true,"explain-changesets":false,"default-priority":0,
            "future-feature":{"nested":true}}"#;
        let state = ConfigState::from_str(text).unwrap();
        assert_eq!(state.extra.get("future-feature").unwrap().to_string(), r#"{"nested":true}"#);

        let rewritten = state.to_string_pretty().unwrap();
        let reparsed = ConfigState::from_str(&rewritten).unwrap();
        assert!(reparsed.extra.contains_key("future-feature"));
    }

    #[test]
    fn empty_document_defaults_every_known_field() {
        let state = ConfigState::from_str("{}").unwrap();
        assert!(state.channels.is_empty());
        assert!(!state.auto_update);
        assert_eq!(state.default_priority, 0);
    }

    #[test]
    fn channels_are_ranked_by_priority_then_alias() {
        let text = r#"{"channels":{
            "b":{"type":"local","alias":"b","name":"B","priority":5},
            "a":{"type":"local","alias":"a","name":"A","priority":5},
            "c":{"type":"local","alias":"c","name":"C","priority":10}
        }}"#;
        let state = ConfigState::from_str(text).unwrap();
        let ranked: Vec<&str> = state.channels_by_priority().iter().map(|c| c.alias.as_str()).collect();
        assert_eq!(ranked, vec!["c", "a", "b"]);
    }
}
