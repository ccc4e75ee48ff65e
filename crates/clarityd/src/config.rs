//! Configuration management for clarityd.
//!
//! Loads settings from /etc/clarity/config.toml or uses defaults.
//! The model credential is resolved once here and handed to the generator.

use anyhow::Result;
use clarity_shared::ClarityError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/clarity/config.toml";

/// Default config file path for fallback
pub const DEFAULT_CONFIG_PATH: &str = "/var/lib/clarity/config.toml";

/// Generator (LLM) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chat model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Inline API key (takes precedence over `api_key_env`)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable read for the API key when `api_key` is unset
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Longest rawText accepted, in characters
    #[serde(default = "default_max_raw_text")]
    pub max_raw_text_chars: usize,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_raw_text() -> usize {
    20_000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout(),
            max_raw_text_chars: default_max_raw_text(),
        }
    }
}

impl LlmConfig {
    /// Resolve the credential: inline key first, then the configured env var.
    pub fn resolve_api_key(&self) -> Result<String, ClarityError> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Same as [`resolve_api_key`](Self::resolve_api_key) with an injected lookup
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Result<String, ClarityError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key
            .clone()
            .or_else(|| lookup(&self.api_key_env))
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ClarityError::MissingCredential(self.api_key_env.clone()))
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:7870".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset (e.g. "info", "clarityd=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load config: explicit path, then system paths, then defaults
    pub fn load(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            match Self::load_from_path(path) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to load {}: {}", path.display(), e),
            }
        }
        Self::load_from_path(Path::new(CONFIG_PATH))
            .or_else(|_| Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH)))
            .unwrap_or_else(|e| {
                warn!("Config not found, using defaults: {}", e);
                Config::default()
            })
    }

    /// Load config from specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ClarityError::Config(e.to_string()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
