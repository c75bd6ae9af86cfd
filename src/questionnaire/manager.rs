//! QuestionnaireManager: one session's state machine plus its narrative
//! generator and result sink.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::{Catalog, Question};
use crate::error::{Error, LlmError, QuestionnaireError};
use crate::narrative::{CategoryAnalysis, NarrativeGenerator};
use crate::report::render_report;
use crate::scoring::{Pillar, PillarScores, overall_level, pillar_scores};
use crate::sink::ResultSink;

use super::machine::{GenerationTicket, QuestionnaireStateMachine};
use super::state::{
    AnalysisOutcome, AnswerSet, NavigationPosition, SessionMode, UserInfo,
};

/// Shown to the visitor when generation fails.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Es gab einen Fehler bei der Generierung der Analyse. Bitte versuchen Sie es später erneut.";

/// Upper bound on one result delivery before the analysis is shown anyway.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(15);

/// Serialisable snapshot of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    #[serde(flatten)]
    pub mode: SessionMode,
    pub position: NavigationPosition,
    pub step_count: u32,
    pub can_go_back: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<Question>,
    pub answers: AnswerSet,
    pub scores: PillarScores,
    pub user_info: UserInfo,
    pub reached_summary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisOutcome>,
}

/// Serialises every operation on one session through a single lock.
///
/// The lock is released while the narrative generator and the sink run;
/// the outcome is committed only if the session was not restarted in the
/// meantime.
pub struct QuestionnaireManager {
    id: Uuid,
    machine: Mutex<QuestionnaireStateMachine>,
    generator: Arc<dyn NarrativeGenerator>,
    sink: Arc<dyn ResultSink>,
    delivery_timeout: Duration,
}

impl QuestionnaireManager {
    pub fn new(
        catalog: Arc<Catalog>,
        generator: Arc<dyn NarrativeGenerator>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), catalog, generator, sink)
    }

    pub fn with_id(
        id: Uuid,
        catalog: Arc<Catalog>,
        generator: Arc<dyn NarrativeGenerator>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            id,
            machine: Mutex::new(QuestionnaireStateMachine::new(catalog)),
            generator,
            sink,
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }

    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn snapshot(&self) -> SessionView {
        let machine = self.machine.lock().await;
        self.view(&machine)
    }

    fn view(&self, machine: &QuestionnaireStateMachine) -> SessionView {
        let state = machine.state();
        SessionView {
            id: self.id,
            mode: state.mode.clone(),
            position: state.position,
            step_count: machine.catalog().step_count(),
            can_go_back: machine.can_go_back(),
            current_question: machine.current_question().cloned(),
            answers: state.answers.clone(),
            scores: pillar_scores(&state.answers),
            user_info: state.user_info.clone(),
            reached_summary: state.reached_summary,
            last_error: state.last_error.clone(),
            result: state.result.clone(),
        }
    }

    /// Apply `op` under the lock and return the resulting view.
    async fn apply<F>(&self, op: F) -> Result<SessionView, QuestionnaireError>
    where
        F: FnOnce(&mut QuestionnaireStateMachine) -> Result<(), QuestionnaireError>,
    {
        let mut machine = self.machine.lock().await;
        op(&mut machine)?;
        Ok(self.view(&machine))
    }

    pub async fn submit_answer(
        &self,
        question_id: &str,
        answer: &str,
    ) -> Result<SessionView, QuestionnaireError> {
        self.apply(|m| m.submit_answer(question_id, answer)).await
    }

    pub async fn go_back(&self) -> Result<SessionView, QuestionnaireError> {
        self.apply(|m| m.go_back().map(|_| ())).await
    }

    pub async fn change_step(&self, step: u32) -> Result<SessionView, QuestionnaireError> {
        self.apply(|m| m.change_step(step)).await
    }

    pub async fn edit_question(
        &self,
        step: u32,
        question_id: &str,
    ) -> Result<SessionView, QuestionnaireError> {
        self.apply(|m| m.edit_question(step, question_id)).await
    }

    pub async fn return_to_summary(&self) -> Result<SessionView, QuestionnaireError> {
        self.apply(|m| m.return_to_summary()).await
    }

    pub async fn set_user_info(&self, user_info: UserInfo) -> SessionView {
        let mut machine = self.machine.lock().await;
        machine.set_user_info(user_info);
        self.view(&machine)
    }

    pub async fn restart(&self) -> SessionView {
        let mut machine = self.machine.lock().await;
        machine.restart();
        info!(session_id = %self.id, "Session restarted");
        self.view(&machine)
    }

    /// Markdown report of a finished analysis.
    pub async fn report(&self) -> Result<String, QuestionnaireError> {
        let machine = self.machine.lock().await;
        let outcome = machine.state().result.as_ref().ok_or_else(|| {
            QuestionnaireError::InvalidTransition {
                mode: machine.mode().name(),
                operation: "render the report",
            }
        })?;
        Ok(render_report(
            machine.catalog(),
            machine.answers(),
            outcome,
        ))
    }

    /// Score the answers, ask the generator for focus areas, narrative and
    /// per-pillar analyses, deliver to the sink, and show the result.
    ///
    /// The work runs on its own task, so the session leaves Generating even
    /// if the caller is dropped. On generator failure the session returns to
    /// the summary with `last_error` set and the error is returned. Sink
    /// failures are only logged.
    pub async fn request_generation(self: &Arc<Self>) -> Result<SessionView, Error> {
        let ticket = self.machine.lock().await.begin_generation()?;
        let epoch = ticket.epoch;
        info!(
            session_id = %self.id,
            answers = ticket.answers.len(),
            "Generating analysis"
        );

        let this = Arc::clone(self);
        let task = tokio::spawn(async move { this.finish_generation(ticket).await });
        match task.await {
            Ok(result) => result,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Generation task did not finish");
                self.machine
                    .lock()
                    .await
                    .fail_generation(epoch, GENERATION_FAILED_MESSAGE);
                Err(e.into())
            }
        }
    }

    async fn finish_generation(&self, ticket: GenerationTicket) -> Result<SessionView, Error> {
        match self.generate(&ticket).await {
            Ok(outcome) => {
                let mut machine = self.machine.lock().await;
                if machine.complete_generation(ticket.epoch, outcome) {
                    info!(session_id = %self.id, "Analysis ready");
                } else {
                    warn!(session_id = %self.id, "Session restarted during generation, discarding analysis");
                }
                Ok(self.view(&machine))
            }
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Analysis generation failed");
                let mut machine = self.machine.lock().await;
                if !machine.fail_generation(ticket.epoch, GENERATION_FAILED_MESSAGE) {
                    warn!(session_id = %self.id, "Session restarted during generation, ignoring failure");
                }
                Err(e.into())
            }
        }
    }

    async fn generate(&self, ticket: &GenerationTicket) -> Result<AnalysisOutcome, LlmError> {
        let focus_areas = self
            .generator
            .generate_focus_areas(&ticket.answers, &ticket.scores)
            .await?;
        let narrative = self.generator.generate_narrative(&ticket.answers).await?;
        let category_analyses = self.category_analyses(ticket).await;

        self.deliver(ticket).await;

        Ok(AnalysisOutcome {
            narrative,
            focus_areas,
            category_analyses,
            level: overall_level(&ticket.scores),
            scores: ticket.scores,
            generated_at: Utc::now(),
        })
    }

    /// Per-pillar analyses. A failed pillar is logged and left out.
    async fn category_analyses(
        &self,
        ticket: &GenerationTicket,
    ) -> BTreeMap<Pillar, CategoryAnalysis> {
        let mut analyses = BTreeMap::new();
        for pillar in Pillar::ALL {
            match self
                .generator
                .generate_category_analysis(pillar, &ticket.answers, ticket.scores.get(pillar))
                .await
            {
                Ok(analysis) => {
                    analyses.insert(pillar, analysis);
                }
                Err(e) => {
                    warn!(session_id = %self.id, %pillar, error = %e, "Pillar analysis failed");
                }
            }
        }
        analyses
    }

    async fn deliver(&self, ticket: &GenerationTicket) {
        let send = self
            .sink
            .send_result(&ticket.answers, &ticket.user_info, &ticket.scores);
        match tokio::time::timeout(self.delivery_timeout, send).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(
                session_id = %self.id,
                sink = self.sink.name(),
                error = %e,
                "Result delivery failed"
            ),
            Err(_) => warn!(
                session_id = %self.id,
                sink = self.sink.name(),
                timeout_ms = self.delivery_timeout.as_millis() as u64,
                "Result delivery timed out"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::catalog::maturity_catalog;
    use crate::error::DeliveryError;
    use crate::llm::{
        CompletionRequest, CompletionResponse, FinishReason, LlmProvider, RetryPolicy,
        RetryingProvider,
    };
    use crate::narrative::{FocusAreas, LlmNarrativeGenerator};
    use crate::scoring::MaturityLabel;

    /// Fails with 503 for the first `failures` calls, then answers.
    struct FlakyLlm {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl LlmProvider for FlakyLlm {
        fn model_name(&self) -> &str {
            "flaky"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                return Err(LlmError::ServiceUnavailable {
                    provider: "flaky".into(),
                });
            }
            let prompt = request.messages.last().map(|m| m.content.as_str()).unwrap_or("");
            let content = if prompt.contains("quickWins") {
                r#"{"quickWins": [{"title": "Schulung", "description": "d", "timeline": "2 Wochen"}], "strategicFocus": []}"#
            } else if prompt.contains("recommendations") {
                r#"{"summary": ["Solide"], "recommendations": ["Weiter so"]}"#
            } else {
                "## Aktueller Status\nSolide Basis."
            };
            Ok(CompletionResponse {
                content: content.to_string(),
                input_tokens: 1,
                output_tokens: 1,
                finish_reason: FinishReason::Stop,
                response_id: None,
            })
        }
    }

    /// Counts deliveries; optionally fails each one.
    #[derive(Default)]
    struct RecordingSink {
        fail: bool,
        sent: AtomicU32,
    }

    #[async_trait]
    impl ResultSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send_result(
            &self,
            _answers: &AnswerSet,
            _user_info: &UserInfo,
            _scores: &PillarScores,
        ) -> Result<(), DeliveryError> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DeliveryError::DeliveryFailed {
                    target: "test".into(),
                    reason: "unreachable".into(),
                });
            }
            Ok(())
        }
    }

    /// Accepts the delivery and never answers.
    struct StalledSink;

    #[async_trait]
    impl ResultSink for StalledSink {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn send_result(
            &self,
            _answers: &AnswerSet,
            _user_info: &UserInfo,
            _scores: &PillarScores,
        ) -> Result<(), DeliveryError> {
            std::future::pending().await
        }
    }

    /// Always fails with a permanent error.
    struct BrokenGenerator;

    #[async_trait]
    impl NarrativeGenerator for BrokenGenerator {
        async fn generate_narrative(&self, _answers: &AnswerSet) -> Result<String, LlmError> {
            Err(LlmError::AuthFailed {
                provider: "test".into(),
            })
        }

        async fn generate_focus_areas(
            &self,
            _answers: &AnswerSet,
            _scores: &PillarScores,
        ) -> Result<FocusAreas, LlmError> {
            Ok(FocusAreas::default())
        }

        async fn generate_category_analysis(
            &self,
            _pillar: Pillar,
            _answers: &AnswerSet,
            _score: f64,
        ) -> Result<CategoryAnalysis, LlmError> {
            Ok(CategoryAnalysis::default())
        }
    }

    /// Signals `started` and blocks until `release` is notified. Pillar
    /// analyses always fail.
    struct GatedGenerator {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl NarrativeGenerator for GatedGenerator {
        async fn generate_narrative(&self, _answers: &AnswerSet) -> Result<String, LlmError> {
            Ok("late".into())
        }

        async fn generate_focus_areas(
            &self,
            _answers: &AnswerSet,
            _scores: &PillarScores,
        ) -> Result<FocusAreas, LlmError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(FocusAreas::default())
        }

        async fn generate_category_analysis(
            &self,
            _pillar: Pillar,
            _answers: &AnswerSet,
            _score: f64,
        ) -> Result<CategoryAnalysis, LlmError> {
            Err(LlmError::MalformedResponse {
                reason: "no object".into(),
            })
        }
    }

    fn flaky_generator(catalog: Arc<Catalog>, failures: u32) -> Arc<dyn NarrativeGenerator> {
        let flaky: Arc<dyn LlmProvider> = Arc::new(FlakyLlm {
            failures,
            calls: AtomicU32::new(0),
        });
        let llm = Arc::new(RetryingProvider::new(
            flaky,
            RetryPolicy {
                max_retries: 3,
                initial_delay: Duration::from_millis(1),
            },
        ));
        Arc::new(LlmNarrativeGenerator::new(llm, catalog))
    }

    fn gated_manager() -> (Arc<QuestionnaireManager>, Arc<Notify>, Arc<Notify>) {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let manager = Arc::new(QuestionnaireManager::new(
            Arc::new(maturity_catalog()),
            Arc::new(GatedGenerator {
                started: started.clone(),
                release: release.clone(),
            }),
            Arc::new(RecordingSink::default()),
        ));
        (manager, started, release)
    }

    /// Answer every question in catalog order with "3" (or a text).
    async fn answer_everything(manager: &QuestionnaireManager) -> SessionView {
        let mut view = manager.snapshot().await;
        while let Some(question) = view.current_question.clone() {
            let answer = if question.is_scale() { "3" } else { "a) Beispiel" };
            view = manager.submit_answer(&question.id, answer).await.unwrap();
        }
        view
    }

    #[tokio::test]
    async fn generation_survives_two_rejections() {
        let catalog = Arc::new(maturity_catalog());
        let sink = Arc::new(RecordingSink::default());
        let manager = Arc::new(QuestionnaireManager::new(
            catalog.clone(),
            flaky_generator(catalog, 2),
            sink.clone(),
        ));

        let view = answer_everything(&manager).await;
        assert_eq!(view.mode, SessionMode::Summary);

        let view = manager.request_generation().await.unwrap();
        assert_eq!(view.mode, SessionMode::Result);
        assert!(view.last_error.is_none());

        let result = view.result.unwrap();
        assert_eq!(result.narrative, "## Aktueller Status\nSolide Basis.");
        assert_eq!(result.focus_areas.quick_wins[0].title, "Schulung");
        assert_eq!(result.scores, PillarScores::uniform(3.0));
        assert_eq!(result.level.label, MaturityLabel::Competent);
        assert_eq!(result.category_analyses.len(), Pillar::ALL.len());
        assert_eq!(
            result.category_analyses[&Pillar::Strategy].recommendations,
            vec!["Weiter so"]
        );
        assert_eq!(sink.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sink_failure_still_reaches_result() {
        let catalog = Arc::new(maturity_catalog());
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let manager = Arc::new(QuestionnaireManager::new(
            catalog.clone(),
            flaky_generator(catalog, 0),
            sink.clone(),
        ));

        answer_everything(&manager).await;
        let view = manager.request_generation().await.unwrap();
        assert_eq!(view.mode, SessionMode::Result);
        assert!(view.last_error.is_none());
        assert_eq!(sink.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stalled_sink_is_cut_off() {
        let catalog = Arc::new(maturity_catalog());
        let manager = Arc::new(
            QuestionnaireManager::new(
                catalog.clone(),
                flaky_generator(catalog, 0),
                Arc::new(StalledSink),
            )
            .with_delivery_timeout(Duration::from_millis(50)),
        );

        answer_everything(&manager).await;
        let view = tokio::time::timeout(Duration::from_secs(5), manager.request_generation())
            .await
            .expect("generation finishes despite the stalled sink")
            .unwrap();
        assert_eq!(view.mode, SessionMode::Result);
        assert!(view.result.is_some());
    }

    #[tokio::test]
    async fn generator_failure_returns_to_summary() {
        let catalog = Arc::new(maturity_catalog());
        let sink = Arc::new(RecordingSink::default());
        let manager = Arc::new(QuestionnaireManager::new(
            catalog,
            Arc::new(BrokenGenerator),
            sink.clone(),
        ));

        answer_everything(&manager).await;
        let err = manager.request_generation().await.unwrap_err();
        assert!(matches!(err, Error::Llm(LlmError::AuthFailed { .. })));

        let view = manager.snapshot().await;
        assert_eq!(view.mode, SessionMode::Summary);
        assert_eq!(view.last_error.as_deref(), Some(GENERATION_FAILED_MESSAGE));
        assert!(view.result.is_none());
        assert_eq!(sink.sent.load(Ordering::SeqCst), 0);

        // May be retried from the summary.
        assert!(manager.request_generation().await.is_err());
    }

    #[tokio::test]
    async fn generation_requires_summary() {
        let catalog = Arc::new(maturity_catalog());
        let manager = Arc::new(QuestionnaireManager::new(
            catalog.clone(),
            flaky_generator(catalog, 0),
            Arc::new(RecordingSink::default()),
        ));
        let err = manager.request_generation().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Questionnaire(QuestionnaireError::InvalidTransition { mode: "normal", .. })
        ));
    }

    #[tokio::test]
    async fn dropped_caller_still_commits_result() {
        let (manager, started, release) = gated_manager();
        answer_everything(&manager).await;

        let caller = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.request_generation().await })
        };
        started.notified().await;
        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());
        release.notify_one();

        let view = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let view = manager.snapshot().await;
                if view.mode != SessionMode::Generating {
                    return view;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("session leaves Generating");

        assert_eq!(view.mode, SessionMode::Result);
        let result = view.result.unwrap();
        assert_eq!(result.narrative, "late");
        // Failed pillar analyses are left out, not fatal.
        assert!(result.category_analyses.is_empty());
    }

    #[tokio::test]
    async fn restart_during_generation_discards_result() {
        let (manager, started, release) = gated_manager();
        answer_everything(&manager).await;

        let task = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.request_generation().await })
        };

        started.notified().await;
        assert_eq!(manager.snapshot().await.mode, SessionMode::Generating);
        manager.restart().await;
        release.notify_one();

        let view = task.await.unwrap().unwrap();
        assert_eq!(view.mode, SessionMode::Normal);
        assert!(view.result.is_none());
        assert!(view.answers.is_empty());
        assert_eq!(view.position, NavigationPosition::START);
    }

    #[tokio::test]
    async fn report_needs_result() {
        let catalog = Arc::new(maturity_catalog());
        let manager = Arc::new(QuestionnaireManager::new(
            catalog.clone(),
            flaky_generator(catalog, 0),
            Arc::new(RecordingSink::default()),
        ));
        assert!(manager.report().await.is_err());

        answer_everything(&manager).await;
        manager.request_generation().await.unwrap();
        let report = manager.report().await.unwrap();
        assert!(report.contains("Solide Basis."));
        assert!(report.contains("## Analyse nach Bereich"));
    }

    #[tokio::test]
    async fn view_serializes_flat_mode() {
        let catalog = Arc::new(maturity_catalog());
        let manager = QuestionnaireManager::new(
            catalog.clone(),
            flaky_generator(catalog, 0),
            Arc::new(RecordingSink::default()),
        );
        let view = manager.edit_question(2, "2.3").await.unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["mode"], "editing");
        assert_eq!(json["question_id"], "2.3");
        assert_eq!(json["current_question"]["id"], "2.3");
        assert_eq!(json["position"]["step"], 2);
    }
}
