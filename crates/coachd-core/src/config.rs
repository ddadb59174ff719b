//! Configuration loading and management.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default gateway port.
pub const DEFAULT_PORT: u16 = 8420;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion provider settings.
    pub provider: ProviderConfig,

    /// HTTP gateway settings.
    pub gateway: GatewayConfig,

    /// Session store settings.
    pub store: StoreConfig,

    /// Agent loop limits.
    pub limits: LimitsConfig,
}

/// Completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key. Usually supplied via `COACHD_API_KEY` rather than on disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API.
    pub api_base: String,

    /// Model identifier.
    pub model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// HTTP gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address.
    pub bind: String,

    /// Port number.
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Which session store backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// In-memory store (sessions lost on restart).
    #[default]
    Memory,

    /// File-backed store under `store.path`.
    File,
}

/// Session store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend kind.
    pub kind: StoreKind,

    /// Base directory for the file backend.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::Memory,
            path: PathBuf::from("data/sessions"),
        }
    }
}

/// Agent loop limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Tool-call iteration cap for the standard assistant loop.
    pub assistant_max_iterations: usize,

    /// Tool-call iteration cap for the guided intake loop.
    pub intake_max_iterations: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            assistant_max_iterations: 5,
            intake_max_iterations: 10,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        let data = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Config =
            serde_json::from_str(&data).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// Apply environment variable overrides.
    ///
    /// `COACHD_API_KEY`, `COACHD_API_BASE`, `COACHD_MODEL`, `COACHD_PORT`.
    pub fn apply_env(mut self) -> Self {
        if let Ok(key) = std::env::var("COACHD_API_KEY") {
            if !key.is_empty() {
                self.provider.api_key = Some(key);
            }
        }
        if let Ok(base) = std::env::var("COACHD_API_BASE") {
            if !base.is_empty() {
                self.provider.api_base = base;
            }
        }
        if let Ok(model) = std::env::var("COACHD_MODEL") {
            if !model.is_empty() {
                self.provider.model = model;
            }
        }
        if let Ok(port) = std::env::var("COACHD_PORT") {
            if let Ok(port) = port.parse() {
                self.gateway.port = port;
            }
        }
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_base.is_empty() {
            return Err(ConfigError::Validation("provider.api_base is empty".to_string()).into());
        }
        if self.provider.model.is_empty() {
            return Err(ConfigError::Validation("provider.model is empty".to_string()).into());
        }
        if self.limits.assistant_max_iterations == 0 || self.limits.intake_max_iterations == 0 {
            return Err(
                ConfigError::Validation("iteration caps must be at least 1".to_string()).into(),
            );
        }
        Ok(())
    }
}
