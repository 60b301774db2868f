use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::pipeline::backend::{HttpRemoteService, RoutingMode};
use crate::pipeline::structuring::{OllamaClient, StructuringEngine};

/// Application-level constants
pub const APP_NAME: &str = "Structify";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_REMOTE_URL: &str = "STRUCTIFY_REMOTE_URL";
pub const ENV_ROUTING: &str = "STRUCTIFY_ROUTING";
pub const ENV_AI_URL: &str = "STRUCTIFY_AI_URL";
pub const ENV_AI_MODEL: &str = "STRUCTIFY_AI_MODEL";
pub const ENV_AI_TIMEOUT_SECS: &str = "STRUCTIFY_AI_TIMEOUT_SECS";
pub const ENV_PROBE_TIMEOUT_SECS: &str = "STRUCTIFY_PROBE_TIMEOUT_SECS";
pub const ENV_REMOTE_TIMEOUT_SECS: &str = "STRUCTIFY_REMOTE_TIMEOUT_SECS";
pub const ENV_BIND: &str = "STRUCTIFY_BIND";
pub const ENV_DB: &str = "STRUCTIFY_DB";

pub const DEFAULT_REMOTE_URL: &str = "http://localhost:8000";
pub const DEFAULT_AI_MODEL: &str = "llama3.1";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: String, value: String },

    #[error("Failed to build client: {0}")]
    Client(String),
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "structify=info,structify_lib=info,tower_http=info"
}

/// Get the application data directory
/// (`<platform data dir>/Structify`, or `./Structify` when none exists).
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the result database.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("structify.db")
}

/// Runtime configuration, read from `STRUCTIFY_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub remote_url: String,
    pub routing: RoutingMode,
    /// Ollama base URL. `None` disables AI structuring (heuristic only).
    pub ai_url: Option<String>,
    pub ai_model: String,
    pub ai_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub remote_timeout_secs: u64,
    pub bind: SocketAddr,
    pub db_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset and blank values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let routing = match get(ENV_ROUTING) {
            Some(value) => value.parse().map_err(|_| invalid(ENV_ROUTING, &value))?,
            None => RoutingMode::default(),
        };

        let bind_value = get(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_value
            .parse()
            .map_err(|_| invalid(ENV_BIND, &bind_value))?;

        Ok(Self {
            remote_url: get(ENV_REMOTE_URL).unwrap_or_else(|| DEFAULT_REMOTE_URL.to_string()),
            routing,
            ai_url: get(ENV_AI_URL),
            ai_model: get(ENV_AI_MODEL).unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            ai_timeout_secs: parse_secs(get(ENV_AI_TIMEOUT_SECS), ENV_AI_TIMEOUT_SECS, DEFAULT_AI_TIMEOUT_SECS)?,
            probe_timeout_secs: parse_secs(
                get(ENV_PROBE_TIMEOUT_SECS),
                ENV_PROBE_TIMEOUT_SECS,
                DEFAULT_PROBE_TIMEOUT_SECS,
            )?,
            remote_timeout_secs: parse_secs(
                get(ENV_REMOTE_TIMEOUT_SECS),
                ENV_REMOTE_TIMEOUT_SECS,
                DEFAULT_REMOTE_TIMEOUT_SECS,
            )?,
            bind,
            db_path: get(ENV_DB).map(PathBuf::from).unwrap_or_else(default_db_path),
        })
    }

    /// Structuring engine backed by Ollama when `ai_url` is set, heuristic-only otherwise.
    pub fn structuring_engine(&self) -> Result<StructuringEngine, ConfigError> {
        match &self.ai_url {
            Some(url) => {
                let client = OllamaClient::new(url, &self.ai_model, self.ai_timeout_secs)
                    .map_err(|e| ConfigError::Client(e.to_string()))?;
                tracing::info!(url = %url, model = %self.ai_model, "AI structuring enabled");
                Ok(StructuringEngine::new(Arc::new(client)))
            }
            None => {
                tracing::info!("AI structuring disabled, heuristic only");
                Ok(StructuringEngine::heuristic_only())
            }
        }
    }

    pub fn remote_service(&self) -> Result<HttpRemoteService, ConfigError> {
        HttpRemoteService::new(
            &self.remote_url,
            Duration::from_secs(self.probe_timeout_secs),
            self.remote_timeout_secs,
        )
        .map_err(|e| ConfigError::Client(e.to_string()))
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_secs(value: Option<String>, key: &str, default: u64) -> Result<u64, ConfigError> {
    match value {
        Some(v) => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => Err(invalid(key, &v)),
        },
        None => Ok(default),
    }
}
