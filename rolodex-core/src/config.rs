//! Configuration management
//!
//! Settings live in `settings.json` inside the rolodex directory, in the
//! same camelCase format the desktop app writes:
//! ```json
//! {
//!   "api": { "baseUrl": "https://api.example.com", "apiKey": "..." }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    api: ApiSettings,
    // Preserve settings written by other tools
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSettings {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Rolodex configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Config {
    /// Load config from the rolodex directory
    ///
    /// The base URL and API key can each be overridden via environment:
    /// `ROLODEX_BASE_URL` and `ROLODEX_API_KEY` take precedence over the
    /// settings file (for CI/testing).
    pub fn load(rolodex_dir: &Path) -> Result<Self> {
        let settings_path = rolodex_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let base_url = std::env::var("ROLODEX_BASE_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| raw.api.base_url.clone());
        let api_key = std::env::var("ROLODEX_API_KEY")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| raw.api.api_key.clone());

        Ok(Self {
            base_url,
            api_key,
            _raw_settings: raw,
        })
    }

    /// Save config to the rolodex directory
    /// Preserves settings that this tool doesn't manage
    pub fn save(&self, rolodex_dir: &Path) -> Result<()> {
        let settings_path = rolodex_dir.join("settings.json");

        // Load existing settings to preserve fields we don't manage
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        // Update only the fields we manage
        settings.api.base_url = self.base_url.clone();
        settings.api.api_key = self.api_key.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}
