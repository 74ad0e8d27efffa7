use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TellerError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Accounts file bulk-loaded at the start of every session.
    #[serde(default)]
    pub load_file: Option<String>,
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_color() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            load_file: None,
            color: default_color(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("teller")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::warn!("could not read {}: {e}", path.display());
            return Settings::default();
        }
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        log::warn!("ignoring malformed {}: {e}", path.display());
        Settings::default()
    })
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| TellerError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
