//! Shared application settings (database path, seed file, preferences namespace).
//!
//! The settings file is always `~/.config/storefront/settings.toml`, and
//! path resolution is the same for every front end.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Namespace preference keys are stored under unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "online-store";

/// Canonical path to the shared settings file: `~/.config/storefront/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("storefront").join("settings.toml")
}

/// Per-user data directory: `~/.local/share/storefront` on Linux.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("storefront")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub preferences: PreferenceSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Product database file. Defaults to `<data_dir>/catalog.db`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
    /// YAML seed list replacing the built-in catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceSettings {
    pub namespace: String,
    /// Directory holding preference files. Defaults to `<data_dir>/preferences`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for PreferenceSettings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            directory: None,
        }
    }
}

impl Settings {
    /// Load settings from the shared settings file. A missing or unreadable
    /// file yields defaults.
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Write settings to the shared settings file.
    pub fn save(&self) -> io::Result<()> {
        self.save_to(&settings_path())
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(io::Error::other)?;

        // Write atomically
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Resolve the database path using a priority chain:
    ///
    /// 1. CLI override (if `Some`)
    /// 2. `catalog.database` in `settings.toml`
    /// 3. `<data_dir>/catalog.db`
    pub fn database_path(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.catalog.database.clone())
            .unwrap_or_else(|| data_dir().join("catalog.db"))
    }

    /// Seed file to load, if any. A CLI override wins over the settings file.
    pub fn seed_file(&self, cli_override: Option<PathBuf>) -> Option<PathBuf> {
        cli_override.or_else(|| self.catalog.seed_file.clone())
    }

    pub fn preferences_dir(&self) -> PathBuf {
        self.preferences
            .directory
            .clone()
            .unwrap_or_else(|| data_dir().join("preferences"))
    }

    /// Pretty-printed TOML for display.
    pub fn to_toml_string(&self) -> Option<String> {
        toml::to_string_pretty(self).ok()
    }
}
