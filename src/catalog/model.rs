//! Question catalog data model.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Separator between chosen labels in a multi-select answer.
pub const MULTI_SELECT_DELIMITER: char = '\n';

/// Lowest value on the Likert scale.
pub const SCALE_MIN: u8 = 1;
/// Highest value on the Likert scale.
pub const SCALE_MAX: u8 = 5;

/// The shape of answer a question expects. Set once in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerKind {
    /// Numeric rating between `min` and `max` inclusive.
    Scale { min: u8, max: u8 },
    /// Exactly one option.
    SingleChoice { options: Vec<String> },
    /// Any subset of options, joined with [`MULTI_SELECT_DELIMITER`].
    MultiChoice { options: Vec<String> },
    /// Free text.
    FreeText {
        multiline: bool,
        optional: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
}

/// A single catalog question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// `"<step>.<n>"`, 1-based `n`.
    pub id: String,
    pub text: String,
    #[serde(flatten)]
    pub kind: AnswerKind,
}

impl Question {
    pub fn scale(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind: AnswerKind::Scale {
                min: SCALE_MIN,
                max: SCALE_MAX,
            },
        }
    }

    pub fn single_choice<I, S>(id: impl Into<String>, text: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            text: text.into(),
            kind: AnswerKind::SingleChoice {
                options: options.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn multi_choice<I, S>(id: impl Into<String>, text: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            text: text.into(),
            kind: AnswerKind::MultiChoice {
                options: options.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn free_text(
        id: impl Into<String>,
        text: impl Into<String>,
        placeholder: impl Into<String>,
        optional: bool,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind: AnswerKind::FreeText {
                multiline: true,
                optional,
                placeholder: Some(placeholder.into()),
            },
        }
    }

    pub fn is_scale(&self) -> bool {
        matches!(self.kind, AnswerKind::Scale { .. })
    }

    /// Render a raw answer for display. Multi-select labels are comma-joined.
    pub fn display_answer(&self, raw: &str) -> String {
        match self.kind {
            AnswerKind::MultiChoice { .. } => raw
                .split(MULTI_SELECT_DELIMITER)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            _ => raw.to_string(),
        }
    }
}

/// A top-level group of questions. One step per pillar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
}

/// Immutable, validated list of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    steps: Vec<Step>,
}

impl Catalog {
    /// Validate and wrap a list of steps.
    ///
    /// Steps must be numbered 1..N in order, every step needs at least one
    /// question, and question ids must read `"<step>.<n>"` with `n` counting
    /// from 1.
    pub fn new(steps: Vec<Step>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for (pos, step) in steps.iter().enumerate() {
            let expected_step = pos as u32 + 1;
            if step.id != expected_step {
                return Err(CatalogError::NonContiguousSteps {
                    expected: expected_step,
                    found: step.id,
                });
            }
            if step.questions.is_empty() {
                return Err(CatalogError::EmptyStep { step: step.id });
            }
            for (index, question) in step.questions.iter().enumerate() {
                if !seen.insert(question.id.clone()) {
                    return Err(CatalogError::DuplicateQuestionId {
                        id: question.id.clone(),
                    });
                }
                let expected = format!("{}.{}", step.id, index + 1);
                if question.id != expected {
                    return Err(CatalogError::BadQuestionId {
                        id: question.id.clone(),
                        step: step.id,
                        expected,
                    });
                }
            }
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step_count(&self) -> u32 {
        self.steps.len() as u32
    }

    pub fn step(&self, id: u32) -> Option<&Step> {
        id.checked_sub(1)
            .and_then(|i| self.steps.get(i as usize))
    }

    pub fn question_at(&self, step: u32, index: usize) -> Option<&Question> {
        self.step(step)?.questions.get(index)
    }

    /// Locate a question anywhere in the catalog.
    pub fn find_question(&self, id: &str) -> Option<(&Step, &Question)> {
        self.steps.iter().find_map(|step| {
            step.questions
                .iter()
                .find(|q| q.id == id)
                .map(|q| (step, q))
        })
    }

    /// Index of `question_id` within `step`, if it belongs there.
    pub fn index_in_step(&self, step: u32, question_id: &str) -> Option<usize> {
        self.step(step)?
            .questions
            .iter()
            .position(|q| q.id == question_id)
    }

    /// Whether `(step, index)` is the final question of the final step.
    pub fn is_last(&self, step: u32, index: usize) -> bool {
        step == self.step_count()
            && self
                .step(step)
                .is_some_and(|s| index + 1 == s.questions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: u32, ids: &[&str]) -> Step {
        Step {
            id,
            title: format!("Step {id}"),
            description: String::new(),
            questions: ids.iter().map(|q| Question::scale(*q, "?")).collect(),
        }
    }

    #[test]
    fn accepts_well_formed_catalog() {
        let catalog = Catalog::new(vec![step(1, &["1.1", "1.2"]), step(2, &["2.1"])]).unwrap();
        assert_eq!(catalog.step_count(), 2);
        assert_eq!(catalog.question_at(1, 1).unwrap().id, "1.2");
        assert!(catalog.question_at(2, 1).is_none());
        assert!(catalog.question_at(0, 0).is_none());
        assert!(catalog.question_at(3, 0).is_none());
    }

    #[test]
    fn rejects_gaps_in_steps() {
        let err = Catalog::new(vec![step(1, &["1.1"]), step(3, &["3.1"])]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::NonContiguousSteps {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn rejects_empty_step() {
        let err = Catalog::new(vec![step(1, &[])]).unwrap_err();
        assert_eq!(err, CatalogError::EmptyStep { step: 1 });
    }

    #[test]
    fn rejects_duplicate_and_misplaced_ids() {
        let err = Catalog::new(vec![step(1, &["1.1", "1.1"])]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateQuestionId { .. }));

        let err = Catalog::new(vec![step(1, &["1.1", "1.3"])]).unwrap_err();
        assert!(matches!(err, CatalogError::BadQuestionId { ref expected, .. } if expected == "1.2"));
    }

    #[test]
    fn lookups() {
        let catalog = Catalog::new(vec![step(1, &["1.1", "1.2"]), step(2, &["2.1", "2.2"])]).unwrap();
        let (s, q) = catalog.find_question("2.2").unwrap();
        assert_eq!(s.id, 2);
        assert_eq!(q.id, "2.2");
        assert!(catalog.find_question("9.9").is_none());
        assert_eq!(catalog.index_in_step(2, "2.2"), Some(1));
        assert_eq!(catalog.index_in_step(1, "2.2"), None);
        assert!(catalog.is_last(2, 1));
        assert!(!catalog.is_last(1, 1));
        assert!(!catalog.is_last(2, 0));
    }

    #[test]
    fn multi_choice_display_joins_labels() {
        let q = Question::multi_choice("1.6", "Pick", ["a) One", "b) Two"]);
        assert_eq!(q.display_answer("a) One\nb) Two"), "a) One, b) Two");

        let scale = Question::scale("1.1", "Rate");
        assert_eq!(scale.display_answer("4"), "4");
    }

    #[test]
    fn question_kind_serializes_with_tag() {
        let q = Question::scale("1.1", "Rate");
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["kind"], "scale");
        assert_eq!(json["min"], 1);
        assert_eq!(json["max"], 5);
        assert_eq!(json["id"], "1.1");
    }
}
