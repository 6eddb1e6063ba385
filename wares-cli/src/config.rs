//! CLI configuration stored in the user's config directory.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name, used for config and data directory paths
pub const APP_NAME: &str = "wares";

const CONFIG_FILE: &str = "config.json";
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Persisted CLI settings
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server to talk to when no --server flag is given
    pub server_url: Option<String>,
    /// Email of the last successful login, offered as the default
    pub last_email: Option<String>,
}

impl Config {
    /// Load the config file, or defaults when it doesn't exist
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config file at {}", path.display()))
    }

    /// Write the config file
    pub fn save(&self) -> Result<()> {
        let path = config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Server URL resolution: flag, then environment, then config, then
    /// the default.
    pub fn resolve_server_url(&self, flag: Option<&str>) -> String {
        if let Some(url) = flag {
            return url.to_string();
        }
        if let Ok(url) = std::env::var("WARES_SERVER_URL") {
            return url;
        }
        self.server_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }
}

fn config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not determine the config directory")?;
    Ok(dir.join(APP_NAME).join(CONFIG_FILE))
}
