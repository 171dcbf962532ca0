//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the backend API base URL, the preferred locale, and
//! the last used login email.
//!
//! Configuration is stored at `~/.config/admingate/config.json`. The
//! `ADMINGATE_API_URL` environment variable (optionally from a `.env`
//! file) overrides the configured base URL.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "admingate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the configured API base URL
const API_URL_ENV: &str = "ADMINGATE_API_URL";

/// Locale sent as `Accept-Language` when none is configured
const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub locale: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Resolve the backend base URL. The environment variable wins over
    /// the config file so deployments can repoint without editing state.
    pub fn api_base_url(&self) -> Result<String> {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .or_else(|| self.api_url.clone())
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No API base URL configured (set {} or api_url in config)",
                    API_URL_ENV
                )
            })
    }

    pub fn locale(&self) -> String {
        self.locale
            .clone()
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted session file.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_defaults_to_en() {
        let config = Config::default();
        assert_eq!(config.locale(), "en");

        let config = Config {
            locale: Some("ar".to_string()),
            ..Default::default()
        };
        assert_eq!(config.locale(), "ar");
    }

    #[test]
    fn test_api_base_url_strips_trailing_slash() {
        let config = Config {
            api_url: Some("https://api.example.test/".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.api_base_url().expect("url configured"),
            "https://api.example.test"
        );
    }
}
