//! Locates and persists the state tree on disk (§6).

use std::path::{Path, PathBuf};

use depot_core::{Error, Result};
use directories::ProjectDirs;

use crate::state::ConfigState;

/// Resolves the on-disk path for the persisted state tree and loads/saves it.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// A store rooted at an explicit path, e.g. for tests or `--config-file`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A store at the platform's standard config location
    /// (`~/.config/depot/state.json` on Linux, the platform equivalent
    /// elsewhere), following `directories::ProjectDirs`'s qualifier/
    /// organization/application triple convention.
    #[must_use]
    pub fn standard() -> Self {
        let path = ProjectDirs::from("dev", "depot", "depot")
            .map_or_else(|| PathBuf::from("depot-state.json"), |dirs| dirs.config_dir().join("state.json"));
        Self { path }
    }

    /// The resolved path this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the state tree, defaulting to an empty one if the file doesn't exist yet.
    pub fn load(&self) -> Result<ConfigState> {
        if !self.path.exists() {
            return Ok(ConfigState::default());
        }
        let text = std::fs::read_to_string(&self.path).map_err(|e| Error::config(e.to_string()))?;
        let state = ConfigState::from_str(&text)?;
        state.validate()?;
        Ok(state)
    }

    /// Persists the state tree, creating parent directories as needed.
    pub fn save(&self, state: &ConfigState) -> Result<()> {
        state.validate()?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::config(e.to_string()))?;
        }
        let text = state.to_string_pretty()?;
        std::fs::write(&self.path, text).map_err(|e| Error::config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelRecord;

    #[test]
    fn loading_a_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::at(dir.path().join("state.json"));
        let state = store.load().unwrap();
        assert!(state.channels.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::at(dir.path().join("state.json"));

        let mut state = ConfigState::default();
        state.channels.insert(
            "main".to_string(),
            ChannelRecord {
                kind: "local".to_string(),
                alias: "main".to_string(),
                name: "Main".to_string(),
                description: String::new(),
                priority: 10,
                manual: true,
                removable: true,
                extra: std::collections::BTreeMap::new(),
            },
        );
        store.save(&state).unwrap();

        let reloaded = store.load().unwrap();
        assert!(reloaded.channels.contains_key("main"));
    }
}
