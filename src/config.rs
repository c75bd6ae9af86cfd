//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::RetryPolicy;

/// Default Gemini model used for narrative generation.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Service configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API key for the text-generation endpoint.
    pub api_key: SecretString,
    /// Model name passed to the provider.
    pub model: String,
    /// Results webhook. When unset, results are only logged.
    pub webhook_url: Option<String>,
    /// HTTP listen port.
    pub port: u16,
    /// Backoff policy for transient LLM failures.
    pub retry: RetryPolicy,
    /// Sessions untouched for this long are dropped.
    pub session_idle: Duration,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    ///
    /// - `GEMINI_API_KEY` (required)
    /// - `REIFEGRAD_MODEL` (default `gemini-2.0-flash`)
    /// - `REIFEGRAD_WEBHOOK_URL` (optional)
    /// - `REIFEGRAD_PORT` (default 8080)
    /// - `REIFEGRAD_MAX_RETRIES` (default 3)
    /// - `REIFEGRAD_RETRY_DELAY_MS` (default 1000)
    /// - `REIFEGRAD_SESSION_IDLE_MINUTES` (default 120)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let model = lookup("REIFEGRAD_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let webhook_url = lookup("REIFEGRAD_WEBHOOK_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let port: u16 = parse_or(&lookup, "REIFEGRAD_PORT", 8080)?;
        let max_retries: u32 = parse_or(&lookup, "REIFEGRAD_MAX_RETRIES", 3)?;
        let delay_ms: u64 = parse_or(&lookup, "REIFEGRAD_RETRY_DELAY_MS", 1000)?;
        let idle_minutes: u64 = parse_or(&lookup, "REIFEGRAD_SESSION_IDLE_MINUTES", 120)?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            model,
            webhook_url,
            port,
            retry: RetryPolicy {
                max_retries,
                initial_delay: Duration::from_millis(delay_ms),
            },
            session_idle: Duration::from_secs(idle_minutes * 60),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}
