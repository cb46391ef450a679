//! Persisted user preferences.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Bundled sample data, used when nothing else was loaded before.
pub const DEFAULT_CSV: &str = "data/yearly_deaths_by_clinic.csv";

/// Saved to `<config_dir>/mortality-dashboard/settings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Last successfully loaded CSV.
    pub csv_path: Option<PathBuf>,
    /// Last selected range as `(start, end)`.
    pub year_range: Option<(i32, i32)>,
    /// Where exports are written; falls back to the current directory.
    pub export_dir: Option<PathBuf>,
    /// Open the first exported chart with the system viewer.
    pub open_after_export: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            csv_path: None,
            year_range: None,
            export_dir: None,
            open_after_export: true,
        }
    }
}

impl AppSettings {
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join("mortality-dashboard").join("settings.json")
    }

    /// Returns defaults when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring unreadable settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Write via a temp file and rename, creating parent directories.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// CSV to open at startup: the remembered file if it still exists,
    /// otherwise the bundled sample when present.
    pub fn startup_csv(&self) -> Option<PathBuf> {
        self.csv_path
            .as_ref()
            .filter(|p| p.exists())
            .cloned()
            .or_else(|| {
                let bundled = PathBuf::from(DEFAULT_CSV);
                bundled.exists().then_some(bundled)
            })
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
