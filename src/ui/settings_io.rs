use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::ui::settings::{AppSettings, API_BASE_URL_ENV};

fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("narrative_branches");
    path.push("settings.json");
    path
}

/// Stored settings, falling back to defaults when the file is missing or
/// unreadable. The environment override is applied on top.
pub fn load_settings() -> AppSettings {
    let path = settings_path();
    let stored = fs::read_to_string(&path)
        .ok()
        .and_then(|s| match serde_json::from_str(&s) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Ignoring unreadable settings at {}: {e}", path.display());
                None
            }
        })
        .unwrap_or_default();

    AppSettings::with_env_override(stored, std::env::var(API_BASE_URL_ENV).ok())
        .with_valid_ui_scale()
}

pub fn save_settings(settings: &AppSettings) -> Result<()> {
    let path = settings_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("Settings saved to {}", path.display());
    Ok(())
}
