//! Configuration for verdantd.
//!
//! Loads settings from a toml file or falls back to defaults. The API
//! credential is never stored in the file by default; it is taken from the
//! `VERDANT_API_KEY` (or legacy `GEMINI_API_KEY`) environment variable.

use crate::gateway::{Backoff, RetryPolicy};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Default config file path.
pub const CONFIG_PATH: &str = "/etc/verdant/config.toml";

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory where rendered documents are written and served from.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,
}

fn default_port() -> u16 {
    5000
}

fn default_reports_dir() -> String {
    "reports".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            reports_dir: default_reports_dir(),
        }
    }
}

/// Telemetry store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_endpoint")]
    pub endpoint: String,

    /// Read timeout; the store read is a single best-effort attempt.
    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

fn default_store_endpoint() -> String {
    "http://127.0.0.1:8086".to_string()
}

fn default_store_timeout() -> u64 {
    5
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: default_store_endpoint(),
            timeout_secs: default_store_timeout(),
        }
    }
}

/// Generative-text API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Bearer credential. Normally supplied via environment, not the file.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Output-length cap sent with every request.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Per-attempt timeout, distinct from the overall retry-ceiling bound.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_llm_endpoint() -> String {
    "https://api.gemini.com".to_string()
}

fn default_llm_model() -> String {
    "gemini-pro".to_string()
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            api_key: None,
            max_output_tokens: default_max_output_tokens(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Retry/backoff configuration for the report gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// One of "fixed", "exponential", "exponential_jitter".
    #[serde(default = "default_strategy")]
    pub strategy: String,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound for exponential growth.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_strategy() -> String {
    "fixed".to_string()
}

fn default_base_delay_ms() -> u64 {
    2_000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            strategy: default_strategy(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetryConfig {
    /// Build the gateway policy. Unknown strategy names fall back to fixed
    /// with a warning rather than refusing to start.
    pub fn to_policy(&self) -> RetryPolicy {
        let base = Duration::from_millis(self.base_delay_ms);
        let cap = Duration::from_millis(self.max_delay_ms);

        let backoff = match self.strategy.as_str() {
            "fixed" => Backoff::Fixed(base),
            "exponential" => Backoff::Exponential { base, cap },
            "exponential_jitter" => Backoff::ExponentialJitter { base, cap },
            other => {
                warn!("Unknown retry strategy '{}', using fixed", other);
                Backoff::Fixed(base)
            }
        };

        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff,
        }
    }
}

/// Full daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl Config {
    /// Load config from `path`, falling back to defaults when missing or
    /// unreadable. The environment credential always wins over the file.
    pub fn load(path: &Path) -> Self {
        let mut config = Self::load_from_path(path).unwrap_or_else(|e| {
            warn!("Config not found at {}, using defaults: {}", path.display(), e);
            Config::default()
        });
        config.apply_env();
        config
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Overlay environment settings onto the file config.
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("VERDANT_API_KEY") {
            self.llm.api_key = Some(key);
        } else if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.llm.api_key = Some(key);
        }

        if let Ok(port) = std::env::var("PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => warn!("Ignoring unparseable PORT value '{}'", port),
            }
        }
    }
}
