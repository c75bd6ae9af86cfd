//! Result sinks: where finished analyses are delivered.
//!
//! Delivery is best effort. Callers log failures and carry on.

pub mod payload;
pub mod webhook;

pub use payload::WebhookPayload;
pub use webhook::WebhookSink;

use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::Catalog;
use crate::error::DeliveryError;
use crate::questionnaire::{AnswerSet, UserInfo};
use crate::scoring::PillarScores;

#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Short name for log lines.
    fn name(&self) -> &str;

    async fn send_result(
        &self,
        answers: &AnswerSet,
        user_info: &UserInfo,
        scores: &PillarScores,
    ) -> Result<(), DeliveryError>;
}

/// Sink used when no webhook is configured: logs a summary and succeeds.
pub struct LogSink {
    catalog: Arc<Catalog>,
}

impl LogSink {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ResultSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn send_result(
        &self,
        answers: &AnswerSet,
        user_info: &UserInfo,
        scores: &PillarScores,
    ) -> Result<(), DeliveryError> {
        let payload =
            WebhookPayload::build(&self.catalog, answers, user_info, scores, chrono::Utc::now());
        tracing::info!(
            company = %payload.user_info.company,
            answers = payload.answers.len(),
            overall = payload.scores.overall,
            "Analysis result (no webhook configured)"
        );
        tracing::debug!(payload = %serde_json::to_string(&payload)?, "Result payload");
        Ok(())
    }
}

/// Pick the webhook sink when a URL is configured, the log sink otherwise.
pub fn create_sink(catalog: Arc<Catalog>, webhook_url: Option<&str>) -> Arc<dyn ResultSink> {
    match webhook_url.map(|url| WebhookSink::new(url, catalog.clone())) {
        Some(Ok(sink)) => {
            tracing::info!("Delivering results to webhook");
            Arc::new(sink)
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Webhook unusable, logging results instead");
            Arc::new(LogSink::new(catalog))
        }
        None => {
            tracing::info!("No webhook configured, logging results");
            Arc::new(LogSink::new(catalog))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::maturity_catalog;

    #[tokio::test]
    async fn log_sink_always_succeeds() {
        let sink = LogSink::new(Arc::new(maturity_catalog()));
        let mut answers = AnswerSet::new();
        answers.insert("1.1".into(), "3".into());
        sink.send_result(&answers, &UserInfo::default(), &PillarScores::uniform(3.0))
            .await
            .unwrap();
    }

    #[test]
    fn create_sink_picks_by_url() {
        let catalog = Arc::new(maturity_catalog());
        assert_eq!(create_sink(catalog.clone(), None).name(), "log");
        assert_eq!(create_sink(catalog.clone(), Some("  ")).name(), "log");
        assert_eq!(
            create_sink(catalog, Some("https://hooks.example.com/x")).name(),
            "webhook"
        );
    }
}
