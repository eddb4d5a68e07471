// src/config.rs
//! Process configuration, read once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_ANALYSIS_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_TRYON_MODEL: &str = "google/gemini-2.5-flash-image";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Settings for the outbound inference gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub url: String,
    /// `None` leaves the HTTP client's default in place.
    pub timeout: Option<Duration>,
    /// Extra attempts for `Unavailable` failures only.
    pub max_retries: u32,
}

impl GatewayConfig {
    pub fn new(api_key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            url: url.into(),
            timeout: None,
            max_retries: 0,
        }
    }
}

/// Model identifiers per task.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub analysis: String,
    pub tryon: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            analysis: DEFAULT_ANALYSIS_MODEL.to_string(),
            tryon: DEFAULT_TRYON_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub models: ModelConfig,
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `AI_GATEWAY_API_KEY`
    ///
    /// Optional:
    /// - `AI_GATEWAY_URL`, `AI_GATEWAY_TIMEOUT_SECS`, `AI_GATEWAY_MAX_RETRIES`
    /// - `ANALYSIS_MODEL`, `TRYON_MODEL`
    /// - `BIND_ADDR`, `STATIC_DIR`, `MAX_BODY_BYTES`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get("AI_GATEWAY_API_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("AI_GATEWAY_API_KEY".to_string()))?;

        let url = get("AI_GATEWAY_URL").unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string());

        let timeout = get("AI_GATEWAY_TIMEOUT_SECS")
            .map(|v| parse::<u64>("AI_GATEWAY_TIMEOUT_SECS", &v))
            .transpose()?
            .map(Duration::from_secs);

        let max_retries = get("AI_GATEWAY_MAX_RETRIES")
            .map(|v| parse::<u32>("AI_GATEWAY_MAX_RETRIES", &v))
            .transpose()?
            .unwrap_or(0);

        let models = ModelConfig {
            analysis: get("ANALYSIS_MODEL").unwrap_or_else(|| DEFAULT_ANALYSIS_MODEL.to_string()),
            tryon: get("TRYON_MODEL").unwrap_or_else(|| DEFAULT_TRYON_MODEL.to_string()),
        };

        let bind_addr = parse::<SocketAddr>(
            "BIND_ADDR",
            &get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let static_dir = get("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let max_body_bytes = get("MAX_BODY_BYTES")
            .map(|v| parse::<usize>("MAX_BODY_BYTES", &v))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        Ok(Self {
            gateway: GatewayConfig {
                api_key,
                url,
                timeout,
                max_retries,
            },
            models,
            bind_addr,
            static_dir,
            max_body_bytes,
        })
    }
}

fn parse<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}
