//! LLM integration.
//!
//! The questionnaire only needs plain text completions, served by Gemini's
//! REST API. [`RetryingProvider`] wraps any provider with backoff on
//! transient (503) failures.

pub mod gemini;
pub mod json;
pub mod provider;
pub mod retry;

pub use gemini::GeminiProvider;
pub use json::{extract_json_object, parse_embedded};
pub use provider::*;
pub use retry::{RetryPolicy, RetryingProvider, retry_with_backoff};

use std::sync::Arc;

use crate::config::AppConfig;

/// Create the configured provider, wrapped with the configured retry policy.
pub fn create_provider(config: &AppConfig) -> Arc<dyn LlmProvider> {
    let gemini: Arc<dyn LlmProvider> =
        Arc::new(GeminiProvider::new(config.api_key.clone(), &config.model));
    tracing::info!(
        "Using Gemini (model: {}, max retries: {})",
        config.model,
        config.retry.max_retries
    );
    Arc::new(RetryingProvider::new(gemini, config.retry))
}
