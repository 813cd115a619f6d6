//! Workspace manager configuration.
//!
//! Environment variables:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `DECK_STORAGE_KEY` | Key of the persisted workspace record | `deck.workspaces` |
//! | `DECK_STATE_DIR` | Directory for [`FileStore`](crate::FileStore) | `$XDG_STATE_HOME/deck` |
//! | `DECK_SEED_TEMPLATE` | Template used to seed an empty workspace list | unset |

use std::path::PathBuf;

use crate::storage::state_dir_or_fallback;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "deck.workspaces";

const APP_DIR: &str = "deck";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    pub storage_key: String,
    pub state_dir: PathBuf,
    /// Template id instantiated when the loaded state holds no workspaces.
    pub seed_template: Option<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            state_dir: state_dir_or_fallback().join(APP_DIR),
            seed_template: None,
        }
    }
}

impl WorkspaceConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(key) = get("DECK_STORAGE_KEY") {
            config.storage_key = key;
        }
        if let Some(dir) = get("DECK_STATE_DIR") {
            config.state_dir = PathBuf::from(dir);
        }
        config.seed_template = get("DECK_SEED_TEMPLATE");
        config
    }

    #[must_use]
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    #[must_use]
    pub fn state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = dir.into();
        self
    }

    #[must_use]
    pub fn seed_template(mut self, template_id: impl Into<String>) -> Self {
        self.seed_template = Some(template_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = WorkspaceConfig::from_lookup(lookup(&[]));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert!(config.state_dir.ends_with("deck"));
        assert_eq!(config.seed_template, None);
    }

    #[test]
    fn environment_overrides_apply() {
        let config = WorkspaceConfig::from_lookup(lookup(&[
            ("DECK_STORAGE_KEY", "desk-7.layouts"),
            ("DECK_STATE_DIR", "/var/lib/deck"),
            ("DECK_SEED_TEMPLATE", "trading"),
        ]));
        assert_eq!(config.storage_key, "desk-7.layouts");
        assert_eq!(config.state_dir, PathBuf::from("/var/lib/deck"));
        assert_eq!(config.seed_template.as_deref(), Some("trading"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = WorkspaceConfig::from_lookup(lookup(&[("DECK_STORAGE_KEY", "  ")]));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }
}
