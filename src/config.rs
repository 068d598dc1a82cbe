use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::gate::DAILY_FREE_LIMIT_SECONDS;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub gate: GateSettings,

    #[serde(default)]
    pub enhancer: EnhancerSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Free-tier gate settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GateSettings {
    /// Daily free reading allowance (seconds)
    #[serde(default = "default_free_limit")]
    pub daily_free_limit_seconds: u64,

    /// Period of the reading tick (milliseconds)
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

/// Generative-text service settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnhancerSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Falls back to GEMINI_API_KEY, then API_KEY
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Catalog source
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogSettings {
    /// YAML catalog file; the built-in catalog is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_free_limit() -> u64 {
    DAILY_FREE_LIMIT_SECONDS
}

fn default_tick_interval() -> u64 {
    1000
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            daily_free_limit_seconds: default_free_limit(),
            tick_interval_ms: default_tick_interval(),
        }
    }
}

impl GateSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for EnhancerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl EnhancerSettings {
    /// API key from the config file or the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the explicit path, else the default path if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = get_config_path()?;
        if default_path.exists() {
            Self::load(&default_path)
        } else {
            tracing::debug!("No config at {}, using defaults", default_path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.gate.daily_free_limit_seconds == 0 {
            anyhow::bail!("Daily free limit must be at least 1 second");
        }

        if self.gate.tick_interval_ms == 0 {
            anyhow::bail!("Tick interval must be at least 1 millisecond");
        }

        let url = url::Url::parse(&self.enhancer.base_url).context("Invalid enhancer base URL")?;
        if url.scheme() != "https" {
            anyhow::bail!("Enhancer base URL must use HTTPS (got: {})", url.scheme());
        }

        if self.enhancer.timeout_secs == 0 {
            anyhow::bail!("Enhancer timeout must be at least 1 second");
        }

        Ok(())
    }
}

/// Get the per-user config file path
pub fn get_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("bf", "Biblio Burkina", "biblio")
        .context("Could not determine a home directory for the config file")?;
    Ok(dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use predicates::prelude::*;

    #[test]
    fn default_values() {
        let config = AppConfig::default();
        assert_eq!(config.gate.daily_free_limit_seconds, 1800);
        assert_eq!(config.gate.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.enhancer.model, "gemini-3-flash-preview");
        assert_eq!(config.enhancer.timeout_secs, 15);
        assert_eq!(config.logging.level, "info");
        assert!(config.catalog.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_limit() {
        let mut config = AppConfig::default();
        config.gate.daily_free_limit_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_tick_interval() {
        let mut config = AppConfig::default();
        config.gate.tick_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_plain_http_endpoint() {
        let mut config = AppConfig::default();
        config.enhancer.base_url = "http://example.com/v1beta".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("config.toml");
        file.write_str("[gate]\ndaily_free_limit_seconds = 600\n").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.gate.daily_free_limit_seconds, 600);
        assert_eq!(config.gate.tick_interval_ms, 1000);
        assert_eq!(config.enhancer.timeout_secs, 15);
    }

    #[test]
    fn save_then_load() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("nested/config.toml");

        let mut config = AppConfig::default();
        config.gate.tick_interval_ms = 250;
        config.save(file.path()).unwrap();

        file.assert(predicate::str::contains("tick_interval_ms = 250"));
        let loaded = AppConfig::load(file.path()).unwrap();
        assert_eq!(loaded.gate.tick_interval_ms, 250);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("config.toml");
        file.write_str("[gate]\ndaily_free_limit_seconds = 0\n").unwrap();

        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn configured_api_key_wins() {
        let settings = EnhancerSettings {
            api_key: Some("from-file".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.resolve_api_key().as_deref(), Some("from-file"));
    }
}
