//! Narrative generation: the markdown analysis, focus-area recommendations and
//! per-pillar analyses produced by the language model.

pub mod prompts;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::LlmError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider, parse_embedded};
use crate::questionnaire::AnswerSet;
use crate::scoring::{Pillar, PillarScores};

/// One recommended action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub timeline: String,
    /// The visitor answer this recommendation builds on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_answer: Option<String>,
}

/// Short-term and long-term recommendations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusAreas {
    #[serde(default)]
    pub quick_wins: Vec<FocusItem>,
    #[serde(default)]
    pub strategic_focus: Vec<FocusItem>,
}

impl FocusAreas {
    pub fn is_empty(&self) -> bool {
        self.quick_wins.is_empty() && self.strategic_focus.is_empty()
    }
}

/// Observations and recommendations for a single pillar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAnalysis {
    #[serde(default)]
    pub summary: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Produces the texts shown on the result page.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Markdown analysis of the complete answer set.
    async fn generate_narrative(&self, answers: &AnswerSet) -> Result<String, LlmError>;

    /// Structured quick wins and strategic initiatives.
    async fn generate_focus_areas(
        &self,
        answers: &AnswerSet,
        scores: &PillarScores,
    ) -> Result<FocusAreas, LlmError>;

    /// Observations and recommendations for one pillar, based on the
    /// answers of that pillar's step.
    async fn generate_category_analysis(
        &self,
        pillar: Pillar,
        answers: &AnswerSet,
        score: f64,
    ) -> Result<CategoryAnalysis, LlmError>;
}

/// Narrative generator backed by an [`LlmProvider`].
pub struct LlmNarrativeGenerator {
    llm: Arc<dyn LlmProvider>,
    catalog: Arc<Catalog>,
}

impl LlmNarrativeGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>, catalog: Arc<Catalog>) -> Self {
        Self { llm, catalog }
    }

    async fn ask(&self, prompt: String, max_tokens: u32) -> Result<String, LlmError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(prompts::NARRATIVE_SYSTEM),
            ChatMessage::user(prompt),
        ])
        .with_max_tokens(max_tokens)
        .with_temperature(0.7);

        let response = self.llm.complete(request).await?;
        tracing::debug!(
            model = self.llm.model_name(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "LLM completion finished"
        );
        Ok(response.content)
    }
}

#[async_trait]
impl NarrativeGenerator for LlmNarrativeGenerator {
    async fn generate_narrative(&self, answers: &AnswerSet) -> Result<String, LlmError> {
        let prompt = prompts::narrative_prompt(&self.catalog, answers);
        let text = self.ask(prompt, 4096).await?;
        Ok(text.trim().to_string())
    }

    async fn generate_focus_areas(
        &self,
        answers: &AnswerSet,
        scores: &PillarScores,
    ) -> Result<FocusAreas, LlmError> {
        let prompt = prompts::focus_areas_prompt(answers, scores);
        let text = self.ask(prompt, 2048).await?;
        parse_embedded(&text)
    }

    async fn generate_category_analysis(
        &self,
        pillar: Pillar,
        answers: &AnswerSet,
        score: f64,
    ) -> Result<CategoryAnalysis, LlmError> {
        let in_step: AnswerSet = self
            .catalog
            .step(pillar.step())
            .map(|step| {
                step.questions
                    .iter()
                    .filter_map(|q| answers.get(&q.id).map(|a| (q.id.clone(), a.clone())))
                    .collect()
            })
            .unwrap_or_default();
        let prompt = prompts::category_prompt(pillar.display_name(), &in_step, score);
        let text = self.ask(prompt, 1024).await?;
        parse_embedded(&text)
    }
}
