//! Configuration Management
//!
//! Handles persistent configuration storage for dbplatform. Values given on
//! the command line (or through their environment variables) win over the
//! file, and the file wins over built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PLATFORM_URL: &str = "https://localhost:9443";
pub const DEFAULT_SERVER_NAME: &str = "myserver";

/// User configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub platform_url: Option<String>,
    #[serde(default)]
    pub server_name: Option<String>,
    /// End user the catalog authorizes calls for
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub integrator_guid: Option<String>,
    #[serde(default)]
    pub integrator_name: Option<String>,
    #[serde(default)]
    pub max_page_size: Option<u32>,
}

/// Values supplied for this run only
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub platform_url: Option<String>,
    pub server_name: Option<String>,
    pub user_id: Option<String>,
    pub integrator_guid: Option<String>,
    pub integrator_name: Option<String>,
    pub max_page_size: Option<u32>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dbplatform").join("config.json"))
    }

    /// Load configuration from disk; a missing or unreadable file yields defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Cannot read config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path().context("no configuration directory on this platform")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;

        Ok(path)
    }

    /// Layer run-time values over the stored ones
    pub fn with_overrides(self, overrides: Overrides) -> Self {
        Config {
            platform_url: overrides.platform_url.or(self.platform_url),
            server_name: overrides.server_name.or(self.server_name),
            user_id: overrides.user_id.or(self.user_id),
            integrator_guid: overrides.integrator_guid.or(self.integrator_guid),
            integrator_name: overrides.integrator_name.or(self.integrator_name),
            max_page_size: overrides.max_page_size.or(self.max_page_size),
        }
    }

    pub fn effective_platform_url(&self) -> String {
        self.platform_url
            .clone()
            .unwrap_or_else(|| DEFAULT_PLATFORM_URL.to_string())
    }

    pub fn effective_server_name(&self) -> String {
        self.server_name
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string())
    }

    pub fn effective_max_page_size(&self) -> u32 {
        self.max_page_size
            .unwrap_or(dbplatform::validate::DEFAULT_MAX_PAGE_SIZE)
    }

    /// Fill in defaults so that `config save` records what was actually used
    pub fn resolved(&self) -> Self {
        Config {
            platform_url: Some(self.effective_platform_url()),
            server_name: Some(self.effective_server_name()),
            max_page_size: Some(self.effective_max_page_size()),
            ..self.clone()
        }
    }
}
