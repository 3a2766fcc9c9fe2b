// SensorConsole
// Supplied without warranty.
// Use at your own risk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classifier::Category;
use crate::error::SettingsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Appearance {
    Dark,
    Light,
}

impl std::fmt::Display for Appearance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Appearance::Dark => write!(f, "Dark"),
            Appearance::Light => write!(f, "Light"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub port_name: String,
    pub appearance: Appearance,
    pub chart_category: Category,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port_name: "COM7".to_string(),
            appearance: Appearance::Dark,
            chart_category: Category::Turbidity,
        }
    }
}

impl Settings {
    /// Log folder: Documents/SensorConsole_logs, falling back to Desktop,
    /// then the current directory.
    pub fn log_dir() -> PathBuf {
        let base = dirs::document_dir()
            .or_else(dirs::desktop_dir)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        base.join("SensorConsole_logs")
    }

    pub fn default_path() -> PathBuf {
        Self::log_dir().join("settings.json")
    }

    /// Missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Option<Self>, SettingsError> {
        if !path.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&s)?))
    }

    /// Defaults are used when the file is absent or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("settings load from {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Writes to a temporary file first and renames it over `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;

        fs::write(&tmp, json.as_bytes())?;
        if path.exists() {
            let _ = fs::remove_file(path);
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
