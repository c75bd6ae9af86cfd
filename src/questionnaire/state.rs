//! Session state: position, history, answers and mode of one questionnaire run.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::narrative::{CategoryAnalysis, FocusAreas};
use crate::scoring::{OverallLevel, Pillar, PillarScores};

/// Question id → raw answer. Multi-select answers are newline-joined labels.
pub type AnswerSet = BTreeMap<String, String>;

/// Pointer into the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationPosition {
    pub step: u32,
    pub question_index: usize,
}

impl NavigationPosition {
    pub const START: NavigationPosition = NavigationPosition {
        step: 1,
        question_index: 0,
    };

    pub fn new(step: u32, question_index: usize) -> Self {
        Self {
            step,
            question_index,
        }
    }
}

impl std::fmt::Display for NavigationPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{},{}}}", self.step, self.question_index)
    }
}

/// Visited positions, oldest first.
///
/// Never empty; the last entry is always the current position. Revisits are
/// appended, not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationHistory(Vec<NavigationPosition>);

impl NavigationHistory {
    pub fn new(start: NavigationPosition) -> Self {
        Self(vec![start])
    }

    pub fn push(&mut self, position: NavigationPosition) {
        self.0.push(position);
    }

    /// Drop the current entry and return the one before it.
    ///
    /// Returns `None` (and leaves the history untouched) when only one
    /// entry remains.
    pub fn pop_back(&mut self) -> Option<NavigationPosition> {
        if self.0.len() <= 1 {
            return None;
        }
        self.0.pop();
        self.0.last().copied()
    }

    pub fn current(&self) -> NavigationPosition {
        // Invariant: never empty.
        self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.0.len() > 1
    }

    pub fn as_slice(&self) -> &[NavigationPosition] {
        &self.0
    }
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new(NavigationPosition::START)
    }
}

/// What the visitor is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SessionMode {
    /// Answering questions in catalog order.
    Normal,
    /// Reviewing all answers.
    Summary,
    /// Re-answering one question; the next answer returns to `Summary`.
    Editing { question_id: String },
    /// Narrative request in flight.
    Generating,
    /// Analysis shown.
    Result,
}

impl SessionMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Summary => "summary",
            Self::Editing { .. } => "editing",
            Self::Generating => "generating",
            Self::Result => "result",
        }
    }

    pub fn editing_target(&self) -> Option<&str> {
        match self {
            Self::Editing { question_id } => Some(question_id),
            _ => None,
        }
    }
}

impl Default for SessionMode {
    fn default() -> Self {
        Self::Normal
    }
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Editing { question_id } => write!(f, "editing({question_id})"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Contact details collected from the lead form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub email: String,
    pub name: String,
    pub company: String,
    pub employees: String,
}

/// Everything produced by a successful generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    /// Markdown narrative from the language model.
    pub narrative: String,
    pub focus_areas: FocusAreas,
    /// Per-pillar observations. Pillars whose analysis failed are absent.
    #[serde(default)]
    pub category_analyses: BTreeMap<Pillar, CategoryAnalysis>,
    pub scores: PillarScores,
    pub level: OverallLevel,
    pub generated_at: DateTime<Utc>,
}

/// Full state of one questionnaire session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub position: NavigationPosition,
    pub history: NavigationHistory,
    pub answers: AnswerSet,
    pub mode: SessionMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub user_info: UserInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisOutcome>,
    /// Set once the last question of the last step has been answered.
    pub reached_summary: bool,
    /// Bumped on restart so that in-flight generations can be recognised as stale.
    pub generation_epoch: u64,
}

impl SessionState {
    /// Fresh state at `{1,0}` carrying the given epoch.
    pub fn with_epoch(generation_epoch: u64) -> Self {
        Self {
            position: NavigationPosition::START,
            history: NavigationHistory::default(),
            answers: AnswerSet::new(),
            mode: SessionMode::Normal,
            last_error: None,
            user_info: UserInfo::default(),
            result: None,
            reached_summary: false,
            generation_epoch,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::with_epoch(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_starts_with_one_entry() {
        let history = NavigationHistory::default();
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), NavigationPosition::START);
        assert!(!history.can_go_back());
    }

    #[test]
    fn pop_back_refuses_last_entry() {
        let mut history = NavigationHistory::default();
        assert_eq!(history.pop_back(), None);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn pop_back_returns_prior_actual_entry() {
        let mut history = NavigationHistory::default();
        history.push(NavigationPosition::new(3, 0));
        history.push(NavigationPosition::new(1, 0));
        history.push(NavigationPosition::new(1, 1));

        assert_eq!(history.pop_back(), Some(NavigationPosition::new(1, 0)));
        assert_eq!(history.pop_back(), Some(NavigationPosition::new(3, 0)));
        assert_eq!(history.current(), NavigationPosition::new(3, 0));
    }

    #[test]
    fn revisits_are_not_deduplicated() {
        let mut history = NavigationHistory::default();
        history.push(NavigationPosition::START);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn mode_serializes_with_tag() {
        let json = serde_json::to_value(SessionMode::Editing {
            question_id: "2.3".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"mode": "editing", "question_id": "2.3"}));

        let json = serde_json::to_value(SessionMode::Summary).unwrap();
        assert_eq!(json, serde_json::json!({"mode": "summary"}));
    }

    #[test]
    fn mode_display() {
        assert_eq!(SessionMode::Normal.to_string(), "normal");
        assert_eq!(
            SessionMode::Editing {
                question_id: "1.2".into()
            }
            .to_string(),
            "editing(1.2)"
        );
    }

    #[test]
    fn default_state() {
        let state = SessionState::default();
        assert_eq!(state.position, NavigationPosition::START);
        assert_eq!(state.history.as_slice(), &[NavigationPosition::START]);
        assert!(state.answers.is_empty());
        assert_eq!(state.mode, SessionMode::Normal);
        assert!(state.last_error.is_none());
        assert!(!state.reached_summary);
    }

    #[test]
    fn history_serializes_as_plain_list() {
        let history = NavigationHistory::default();
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json, serde_json::json!([{"step": 1, "question_index": 0}]));
    }
}
