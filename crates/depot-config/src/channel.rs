//! Channel records: alias → backend-specific metadata (§6 "Channel data").

use std::collections::BTreeMap;

use depot_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single channel's record. Backend-specific fields (e.g. `baseurl`) live
/// in `extra` so new backends never require a schema change here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChannelRecord {
    /// The backend/loader type this channel is served by.
    #[serde(rename = "type")]
    pub kind: String,
    /// The channel's stable alias, used as its key in [`crate::ConfigState::channels`].
    pub alias: String,
    /// Human-facing name.
    pub name: String,
    /// Human-facing description.
    #[serde(default)]
    pub description: String,
    /// Priority; higher wins ties during resolution.
    #[serde(default)]
    pub priority: i64,
    /// Whether this channel was added manually (vs. auto-discovered).
    #[serde(default)]
    pub manual: bool,
    /// Whether this channel may be removed by the user.
    #[serde(default = "default_removable")]
    pub removable: bool,
    /// Backend-specific fields not named above (e.g. `baseurl`).
    #[serde(flatten)]
    pub extra: BTreeMap<String, sonic_rs::Value>,
}

const fn default_removable() -> bool {
    true
}

/// Channel types that are loaded from a location and therefore require a
/// `baseurl` entry in `extra`. The `local` type reads from the filesystem
/// it's already pointed at and carries no remote location.
const REQUIRES_BASEURL: &[&str] = &["rpm-md", "deb", "composer", "http"];

impl ChannelRecord {
    /// Validates this record: rejects a missing `baseurl` for backends that
    /// need one, and a non-integer `priority` (caught upstream by
    /// deserialization, checked again here so direct construction is safe).
    pub fn validate(&self) -> Result<()> {
        if REQUIRES_BASEURL.contains(&self.kind.as_str()) && !self.extra.contains_key("baseurl") {
            return Err(Error::channel_data(&self.alias, format!("channel type '{}' requires a 'baseurl'", self.kind)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, extra: BTreeMap<String, sonic_rs::Value>) -> ChannelRecord {
        ChannelRecord {
            kind: kind.to_string(),
            alias: "main".to_string(),
            name: "Main".to_string(),
            description: String::new(),
            priority: 10,
            manual: true,
            removable: true,
            extra,
        }
    }

    #[test]
    fn missing_baseurl_on_a_remote_backend_is_rejected() {
        let record = record("rpm-md", BTreeMap::new());
        let err = record.validate().unwrap_err();
        assert!(format!("{err}").contains("baseurl"));
    }

    #[test]
    fn local_backend_does_not_require_a_baseurl() {
        let record = record("local", BTreeMap::new());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn baseurl_present_passes_validation() {
        let mut extra = BTreeMap::new();
        extra.insert("baseurl".to_string(), sonic_rs::json!("https://example.test/repo"));
        let record = record("rpm-md", extra);
        assert!(record.validate().is_ok());
    }
}
