//! Service Settings
//!
//! Layered from built-in defaults, an optional settings file and
//! `RUL__`-prefixed environment variables (e.g. `RUL__SERVER__BIND_ADDR`).

use crate::rate_limit::RateLimitConfig;
use config::{Config, ConfigError, Environment, File};
use inference_engine::PredictorOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings file looked up when none is given explicitly
pub const DEFAULT_SETTINGS_FILE: &str = "rul-service";

/// Top-level service settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub logging: LogSettings,
    pub rate_limit: RateLimitConfig,
    pub predictor: PredictorOptions,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address to bind
    pub bind_addr: String,
    /// Maximum accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Locations of the trained artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// XGBoost model in JSON format
    pub model_path: PathBuf,
    /// Prognostics configuration (alpha, beta, window size)
    pub config_path: PathBuf,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("Assets/model.json"),
            config_path: PathBuf::from("Assets/config.json"),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Maximum level: trace, debug, info, warn or error
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl ServiceSettings {
    /// Load settings; the file is optional, environment overrides it
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(path.unwrap_or(DEFAULT_SETTINGS_FILE)).required(path.is_some()),
            )
            .add_source(
                Environment::with_prefix("RUL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
