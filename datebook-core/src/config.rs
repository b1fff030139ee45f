//! Datebook configuration.

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EVENT_COLOR, MOBILE_BREAKPOINT, STORAGE_KEY};
use crate::error::{DatebookError, DatebookResult};

static DEFAULT_DATA_DIR: &str = "~/.local/share/datebook";

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("datebook"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

fn default_color() -> String {
    DEFAULT_EVENT_COLOR.to_string()
}

fn default_mobile_breakpoint() -> u32 {
    MOBILE_BREAKPOINT
}

/// How the next event id is determined when a store is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    /// Highest stored numeric id + 1. Deleting the newest event and reloading
    /// hands its id out again.
    #[default]
    Recompute,
    /// Counter kept in its own slot; ids are never reused.
    Persisted,
}

/// Configuration at ~/.config/datebook/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DatebookConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default = "default_color")]
    pub default_color: String,

    #[serde(default)]
    pub id_policy: IdPolicy,

    /// Viewport width below which the editor popup is centered
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: u32,
}

impl Default for DatebookConfig {
    fn default() -> Self {
        DatebookConfig {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            default_color: default_color(),
            id_policy: IdPolicy::default(),
            mobile_breakpoint: default_mobile_breakpoint(),
        }
    }
}

impl DatebookConfig {
    pub fn config_path() -> DatebookResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DatebookError::Config("Could not determine config directory".into()))?
            .join("datebook");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, creating a commented default file on first run.
    pub fn load() -> DatebookResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file. `DATEBOOK_*` environment variables
    /// override file values (e.g. `DATEBOOK_ID_POLICY=persisted`).
    pub fn load_from(path: &Path) -> DatebookResult<Self> {
        Self::builder(path)
            .add_source(Environment::with_prefix("DATEBOOK"))
            .build()
            .map_err(|e| DatebookError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DatebookError::Config(e.to_string()))
    }

    fn builder(path: &Path) -> ::config::ConfigBuilder<::config::builder::DefaultState> {
        Config::builder().add_source(File::from(path.to_path_buf()).required(false))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn save(&self) -> DatebookResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> DatebookResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| DatebookError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)
            .map_err(|e| DatebookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> DatebookResult<()> {
        let contents = format!(
            "\
# datebook configuration

# Where events are stored:
# data_dir = \"{}\"

# Storage slot holding the event list:
# storage_key = \"{}\"

# Color for events created without one:
# default_color = \"{}\"

# \"recompute\" (next id = highest stored id + 1) or \"persisted\" (never reuse ids):
# id_policy = \"recompute\"

# Below this viewport width the editor popup is centered:
# mobile_breakpoint = {}
",
            DEFAULT_DATA_DIR, STORAGE_KEY, DEFAULT_EVENT_COLOR, MOBILE_BREAKPOINT
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatebookError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DatebookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commented_default_config_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datebook/config.toml");

        DatebookConfig::create_default_config(&path).unwrap();
        let config = DatebookConfig::builder(&path)
            .build()
            .unwrap()
            .try_deserialize::<DatebookConfig>()
            .unwrap();

        assert_eq!(config, DatebookConfig::default());
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "storage_key = \"work-events\"\nid_policy = \"persisted\"\nmobile_breakpoint = 480\n",
        )
        .unwrap();

        let config = DatebookConfig::builder(&path)
            .build()
            .unwrap()
            .try_deserialize::<DatebookConfig>()
            .unwrap();

        assert_eq!(config.storage_key, "work-events");
        assert_eq!(config.id_policy, IdPolicy::Persisted);
        assert_eq!(config.mobile_breakpoint, 480);
        assert_eq!(config.default_color, DEFAULT_EVENT_COLOR);
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = DatebookConfig {
            data_dir: PathBuf::from("/tmp/datebook"),
            default_color: "#10B981".into(),
            ..DatebookConfig::default()
        };

        config.save_to(&path).unwrap();
        let loaded: DatebookConfig = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_data_path_expands_tilde() {
        let config = DatebookConfig {
            data_dir: PathBuf::from("~/events"),
            ..DatebookConfig::default()
        };
        assert!(!config.data_path().to_string_lossy().starts_with('~'));
    }
}
