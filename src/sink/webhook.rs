//! HTTP webhook delivery.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::catalog::Catalog;
use crate::error::DeliveryError;
use crate::questionnaire::{AnswerSet, UserInfo};
use crate::scoring::PillarScores;

use super::ResultSink;
use super::payload::WebhookPayload;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts the results payload as JSON to a fixed URL.
pub struct WebhookSink {
    url: String,
    catalog: Arc<Catalog>,
    client: reqwest::Client,
    timeout: Duration,
}

impl WebhookSink {
    pub fn new(url: &str, catalog: Arc<Catalog>) -> Result<Self, DeliveryError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DeliveryError::NotConfigured);
        }
        Ok(Self {
            url: url.to_string(),
            catalog,
            client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Limit for one POST, connect to last body byte.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn failed(&self, reason: impl Into<String>) -> DeliveryError {
        DeliveryError::DeliveryFailed {
            target: self.url.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ResultSink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send_result(
        &self,
        answers: &AnswerSet,
        user_info: &UserInfo,
        scores: &PillarScores,
    ) -> Result<(), DeliveryError> {
        let payload =
            WebhookPayload::build(&self.catalog, answers, user_info, scores, chrono::Utc::now());

        let resp = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.failed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Webhook rejected results payload");
            return Err(self.failed(format!("HTTP {status}")));
        }

        tracing::info!(answers = payload.answers.len(), "Webhook delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::Json;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;

    use super::*;
    use crate::catalog::maturity_catalog;

    type Captured = Arc<Mutex<Vec<(HeaderMap, serde_json::Value)>>>;

    async fn capture(
        State(captured): State<Captured>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> StatusCode {
        captured.lock().unwrap().push((headers, body));
        StatusCode::OK
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/hook")
    }

    #[test]
    fn blank_url_is_not_configured() {
        let err = WebhookSink::new("   ", Arc::new(maturity_catalog())).err();
        assert!(matches!(err, Some(DeliveryError::NotConfigured)));
    }

    #[tokio::test]
    async fn posts_json_payload() {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route("/hook", post(capture))
            .with_state(captured.clone());
        let url = spawn(app).await;

        let sink = WebhookSink::new(&url, Arc::new(maturity_catalog())).unwrap();
        let mut answers = AnswerSet::new();
        answers.insert("2.1".into(), "5".into());
        let user = UserInfo {
            email: "x@y.de".into(),
            ..Default::default()
        };

        sink.send_result(&answers, &user, &PillarScores::uniform(1.0))
            .await
            .unwrap();

        let captured = captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        let (headers, body) = &captured[0];
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["accept"], "application/json");
        assert_eq!(body["userInfo"]["email"], "x@y.de");
        assert_eq!(body["answers"][0]["answer"]["label"], "Exzellent");
        assert_eq!(body["scores"]["overall"], 1.0);
    }

    #[tokio::test]
    async fn non_success_status_is_delivery_failure() {
        let app = Router::new().route("/hook", post(|| async { StatusCode::BAD_GATEWAY }));
        let url = spawn(app).await;

        let sink = WebhookSink::new(&url, Arc::new(maturity_catalog())).unwrap();
        let err = sink
            .send_result(&AnswerSet::new(), &UserInfo::default(), &PillarScores::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::DeliveryFailed { reason, .. } if reason.contains("502")));
    }

    #[tokio::test]
    async fn unanswered_post_times_out() {
        let app = Router::new().route(
            "/hook",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                StatusCode::OK
            }),
        );
        let url = spawn(app).await;

        let sink = WebhookSink::new(&url, Arc::new(maturity_catalog()))
            .unwrap()
            .with_timeout(Duration::from_millis(100));
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            sink.send_result(&AnswerSet::new(), &UserInfo::default(), &PillarScores::default()),
        )
        .await
        .expect("request is cut off by the sink timeout");
        assert!(matches!(result, Err(DeliveryError::DeliveryFailed { .. })));
    }
}
