//! Configuration Management
//!
//! Handles persistent configuration storage for tcat.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "TCAT_API_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Base URL baked in at build time, if any
const BUILD_BASE_URL: Option<&str> = option_env!("TCAT_API_URL");

fn default_timeout_secs() -> u64 {
    30
}

/// Notification display settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NotificationConfig {
    /// minimal | detailed | verbose
    pub detail_level: String,
    pub toast_duration_secs: u64,
    pub max_history: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            detail_level: "detailed".to_string(),
            toast_duration_secs: 5,
            max_history: 50,
        }
    }
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Catalog API base URL
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Last viewed resource
    #[serde(default)]
    pub last_resource: Option<String>,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_secs: default_timeout_secs(),
            last_resource: None,
            notifications: NotificationConfig::default(),
        }
    }
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tcat").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path; missing or malformed files yield defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective base URL (CLI > env > config > build-time > default)
    pub fn effective_base_url(&self, cli: Option<&str>) -> String {
        let env = std::env::var(API_URL_ENV).ok();
        resolve_base_url(cli, env.as_deref(), self.base_url.as_deref())
    }

    /// Get effective request timeout (CLI > config)
    pub fn effective_timeout(&self, cli: Option<u64>) -> Duration {
        Duration::from_secs(cli.unwrap_or(self.request_timeout_secs).max(1))
    }

    /// Set last viewed resource and save
    pub fn set_last_resource(&mut self, resource: &str) -> Result<()> {
        self.last_resource = Some(resource.to_string());
        self.save()
    }
}

/// First non-blank candidate wins, trailing slashes trimmed
fn resolve_base_url(cli: Option<&str>, env: Option<&str>, config: Option<&str>) -> String {
    [cli, env, config, BUILD_BASE_URL]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_BASE_URL)
        .trim_end_matches('/')
        .to_string()
}
