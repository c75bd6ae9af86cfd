//! Error types for the maturity questionnaire service.

use std::time::Duration;

/// Error returned by session operations that reach beyond the state machine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Questionnaire error: {0}")]
    Questionnaire(#[from] QuestionnaireError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Generation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while validating a question catalog.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Steps must be numbered 1..N without gaps, found step {found} at position {expected}")]
    NonContiguousSteps { expected: u32, found: u32 },

    #[error("Step {step} has no questions")]
    EmptyStep { step: u32 },

    #[error("Question id {id} appears more than once")]
    DuplicateQuestionId { id: String },

    #[error("Question id {id} does not match its place in step {step} (expected {expected})")]
    BadQuestionId {
        id: String,
        step: u32,
        expected: String,
    },
}

/// Navigation and answer errors from the questionnaire state machine.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum QuestionnaireError {
    #[error("Answer submitted for question {got}, but question {expected} is active")]
    InvalidQuestion { expected: String, got: String },

    #[error("No earlier question to go back to")]
    NoHistory,

    #[error("Cannot {operation} while in {mode} mode")]
    InvalidTransition {
        mode: &'static str,
        operation: &'static str,
    },

    #[error("Step {0} does not exist")]
    UnknownStep(u32),

    #[error("Question {question_id} does not exist in step {step}")]
    UnknownQuestion { step: u32, question_id: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} is temporarily unavailable")]
    ServiceUnavailable { provider: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Could not parse structured output: {reason}")]
    MalformedResponse { reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Whether the request may succeed if repeated unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ServiceUnavailable { .. })
    }
}

/// Result sink errors. These are logged and never surfaced to the visitor.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Delivery to {target} failed: {reason}")]
    DeliveryFailed { target: String, reason: String },

    #[error("No delivery target configured")]
    NotConfigured,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
