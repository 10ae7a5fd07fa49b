//! Environment-driven configuration.

use std::env;

use crate::error::{ParleyError, Result};

/// Default trailing-edge timeout on provider calls, in seconds.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Default token lifetime: 7 days, in minutes.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 10_080;

/// Runtime configuration assembled from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP bind address (`PARLEY_BIND`)
    pub bind: String,
    /// SQLite connection string (`PARLEY_DATABASE_URL`)
    pub database_url: String,
    /// Token signing secret (`PARLEY_TOKEN_SECRET`, required)
    pub token_secret: String,
    /// Token lifetime in minutes (`PARLEY_TOKEN_TTL_MINUTES`)
    pub token_ttl_minutes: i64,
    /// Generative provider API key (`GEMINI_API_KEY`, required)
    pub provider_api_key: String,
    /// Generative model identifier (`GEMINI_MODEL`)
    pub provider_model: String,
    /// Per-call provider timeout in seconds (`PARLEY_PROVIDER_TIMEOUT_SECS`)
    pub provider_timeout_secs: u64,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when a required variable is missing.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind: env_or("PARLEY_BIND", "127.0.0.1:8000"),
            database_url: env_or("PARLEY_DATABASE_URL", "sqlite://parley.db?mode=rwc"),
            token_secret: env_required("PARLEY_TOKEN_SECRET")?,
            token_ttl_minutes: env_parsed("PARLEY_TOKEN_TTL_MINUTES", DEFAULT_TOKEN_TTL_MINUTES),
            provider_api_key: env_required("GEMINI_API_KEY")?,
            provider_model: env_or("GEMINI_MODEL", "gemini-2.0-flash-exp"),
            provider_timeout_secs: env_parsed(
                "PARLEY_PROVIDER_TIMEOUT_SECS",
                DEFAULT_PROVIDER_TIMEOUT_SECS,
            ),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}

fn env_required(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ParleyError::config(format!(
            "required environment variable {} is not set",
            key
        ))),
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
