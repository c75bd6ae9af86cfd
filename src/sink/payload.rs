//! Results payload sent to the webhook.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::questionnaire::{AnswerSet, UserInfo};
use crate::scoring::{PillarScores, scale_label_for};

pub const PAYLOAD_VERSION: &str = "1.0";
pub const PAYLOAD_SOURCE: &str = "KI-Reifegrad-Analyse";
pub const PAYLOAD_FORMAT: &str = "json";

const UNKNOWN_QUESTION: &str = "Unknown Question";
const UNKNOWN_STEP: &str = "Unknown Step";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    /// RFC 3339, millisecond precision.
    pub timestamp: String,
    pub user_info: UserInfo,
    pub answers: Vec<AnswerEntry>,
    pub scores: PayloadScores,
    pub metadata: PayloadMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub question_id: String,
    pub question_text: String,
    pub step_title: String,
    pub answer: AnswerValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerValue {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadScores {
    pub competence: f64,
    pub tools: f64,
    pub structure: f64,
    pub products: f64,
    pub strategy: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadMetadata {
    pub version: String,
    pub source: String,
    pub format: String,
}

impl Default for PayloadMetadata {
    fn default() -> Self {
        Self {
            version: PAYLOAD_VERSION.to_string(),
            source: PAYLOAD_SOURCE.to_string(),
            format: PAYLOAD_FORMAT.to_string(),
        }
    }
}

impl WebhookPayload {
    pub fn build(
        catalog: &Catalog,
        answers: &AnswerSet,
        user_info: &UserInfo,
        scores: &PillarScores,
        now: DateTime<Utc>,
    ) -> Self {
        let answers = answers
            .iter()
            .map(|(id, value)| answer_entry(catalog, id, value))
            .collect();

        Self {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            user_info: user_info.clone(),
            answers,
            scores: PayloadScores {
                competence: scores.competence,
                tools: scores.tools,
                structure: scores.structure,
                products: scores.products,
                strategy: scores.strategy,
                overall: scores.overall_precise(),
            },
            metadata: PayloadMetadata::default(),
        }
    }
}

fn answer_entry(catalog: &Catalog, id: &str, value: &str) -> AnswerEntry {
    let found = catalog.find_question(id);

    let label = found
        .filter(|(_, q)| q.is_scale())
        .and_then(|_| scale_label_for(value))
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string());

    AnswerEntry {
        question_id: id.to_string(),
        question_text: found.map_or(UNKNOWN_QUESTION, |(_, q)| q.text.as_str()).to_string(),
        step_title: found.map_or(UNKNOWN_STEP, |(s, _)| s.title.as_str()).to_string(),
        answer: AnswerValue {
            value: value.to_string(),
            label,
        },
    }
}
