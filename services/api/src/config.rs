//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use axum::http::HeaderValue;
use lucid_logs_core::DEFAULT_INSIGHT_WINDOW;
use std::net::SocketAddr;
use tracing::Level;

/// Gemini's OpenAI-compatible endpoint.
pub const DEFAULT_INSIGHT_API_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_INSIGHT_MODEL: &str = "gemini-2.5-flash";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_allowed_origin: HeaderValue,
    pub insight_api_key: Option<String>,
    pub insight_api_base: String,
    pub insight_model: String,
    pub insight_window: usize,
    pub seed_sample_sessions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: Level::INFO,
            cors_allowed_origin: HeaderValue::from_static("http://localhost:5173"),
            insight_api_key: None,
            insight_api_base: DEFAULT_INSIGHT_API_BASE.to_string(),
            insight_model: DEFAULT_INSIGHT_MODEL.to_string(),
            insight_window: DEFAULT_INSIGHT_WINDOW,
            seed_sample_sessions: true,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // --- Server Settings ---
        let bind_address = match lookup("BIND_ADDRESS") {
            Some(value) => value.parse::<SocketAddr>().map_err(|e| {
                ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
            })?,
            None => defaults.bind_address,
        };

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_allowed_origin = match lookup("CORS_ALLOWED_ORIGIN") {
            Some(value) => value.parse::<HeaderValue>().map_err(|e| {
                ConfigError::InvalidValue("CORS_ALLOWED_ORIGIN".to_string(), e.to_string())
            })?,
            None => defaults.cors_allowed_origin,
        };

        // --- Insight Service Settings ---
        let insight_api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|key| !key.trim().is_empty());
        let insight_api_base = lookup("INSIGHT_API_BASE").unwrap_or(defaults.insight_api_base);
        let insight_model = lookup("INSIGHT_MODEL").unwrap_or(defaults.insight_model);

        let insight_window = match lookup("INSIGHT_WINDOW") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(window) if window > 0 => window,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "INSIGHT_WINDOW".to_string(),
                        format!("'{}' is not a positive integer", value),
                    ))
                }
            },
            None => defaults.insight_window,
        };

        // --- Journal Settings ---
        let seed_sample_sessions = match lookup("SEED_SAMPLE_SESSIONS") {
            Some(value) => parse_flag(&value).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "SEED_SAMPLE_SESSIONS".to_string(),
                    format!("'{}' is not a boolean", value),
                )
            })?,
            None => defaults.seed_sample_sessions,
        };

        Ok(Self {
            bind_address,
            log_level,
            cors_allowed_origin,
            insight_api_key,
            insight_api_base,
            insight_model,
            insight_window,
            seed_sample_sessions,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
