use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// City fetched when the widget first appears.
pub const DEFAULT_CITY: &str = "lagos";

/// Public OpenWeather host. Point `base_url` at a proxy to keep the key off the client.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const BASE_URL_ENV: &str = "OPENWEATHER_BASE_URL";
pub const DEFAULT_CITY_ENV: &str = "WEATHER_DEFAULT_CITY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "lagos"
/// base_url = "https://api.openweathermap.org"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub default_city: String,
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_city: DEFAULT_CITY.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `OPENWEATHER_API_KEY`, `OPENWEATHER_BASE_URL` and `WEATHER_DEFAULT_CITY`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Blank values from `lookup` are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = lookup(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(BASE_URL_ENV) {
            self.base_url = url;
        }
        if let Some(city) = lookup(DEFAULT_CITY_ENV) {
            self.default_city = city;
        }

        self
    }

    /// Returns the API key, if a non-blank one is present.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    pub fn set_default_city(&mut self, city: &str) {
        let city = city.trim();
        if !city.is_empty() {
            self.default_city = city.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_lagos_and_public_host() {
        let cfg = Config::default();
        assert_eq!(cfg.default_city, "lagos");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.api_key = Some("   ".into());
        assert!(cfg.api_key().is_none());

        cfg.set_api_key(" KEY ".into());
        assert_eq!(cfg.api_key(), Some("KEY"));
    }

    #[test]
    fn overrides_replace_file_values() {
        let cfg = Config::default().with_overrides(env(&[
            (API_KEY_ENV, "ENV_KEY"),
            (BASE_URL_ENV, "http://proxy.local"),
            (DEFAULT_CITY_ENV, "Nairobi"),
        ]));

        assert_eq!(cfg.api_key(), Some("ENV_KEY"));
        assert_eq!(cfg.base_url, "http://proxy.local");
        assert_eq!(cfg.default_city, "Nairobi");
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let cfg = cfg.with_overrides(env(&[(API_KEY_ENV, ""), (DEFAULT_CITY_ENV, "  ")]));

        assert_eq!(cfg.api_key(), Some("FILE_KEY"));
        assert_eq!(cfg.default_city, "lagos");
    }

    #[test]
    fn blank_default_city_is_not_stored() {
        let mut cfg = Config::default();
        cfg.set_default_city("   ");
        assert_eq!(cfg.default_city, "lagos");

        cfg.set_default_city(" Accra ");
        assert_eq!(cfg.default_city, "Accra");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.set_default_city("Kano");
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = \"abc\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.api_key(), Some("abc"));
        assert_eq!(cfg.default_city, DEFAULT_CITY);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
