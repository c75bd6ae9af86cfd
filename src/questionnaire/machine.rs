//! Questionnaire state machine: deterministic transitions over a
//! [`SessionState`].
//!
//! Modes progress Normal → Summary → Generating → Result. Summary can be
//! left for Editing (one question, then back to Summary) or for Normal via a
//! step jump. Restart always returns to Normal at `{1,0}`.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::{Catalog, Question};
use crate::error::QuestionnaireError;
use crate::scoring::{PillarScores, pillar_scores};

use super::state::{
    AnalysisOutcome, AnswerSet, NavigationPosition, SessionMode, SessionState, UserInfo,
};

/// Snapshot handed out when generation starts.
///
/// The epoch must be presented again when committing the outcome; a ticket
/// from before a restart is rejected.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub epoch: u64,
    pub answers: AnswerSet,
    pub user_info: UserInfo,
    pub scores: PillarScores,
}

/// Owns one session's state and applies every transition to it.
pub struct QuestionnaireStateMachine {
    catalog: Arc<Catalog>,
    state: SessionState,
}

impl QuestionnaireStateMachine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            state: SessionState::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> &SessionMode {
        &self.state.mode
    }

    pub fn position(&self) -> NavigationPosition {
        self.state.position
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.state.answers
    }

    pub fn can_go_back(&self) -> bool {
        matches!(
            self.state.mode,
            SessionMode::Normal | SessionMode::Editing { .. }
        ) && self.state.history.can_go_back()
    }

    /// The question to show, if the session is in a question-answering mode.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state.mode {
            SessionMode::Normal | SessionMode::Editing { .. } => self
                .catalog
                .question_at(self.state.position.step, self.state.position.question_index),
            _ => None,
        }
    }

    fn invalid(&self, operation: &'static str) -> QuestionnaireError {
        QuestionnaireError::InvalidTransition {
            mode: self.state.mode.name(),
            operation,
        }
    }

    fn move_to(&mut self, position: NavigationPosition) {
        self.state.position = position;
        self.state.history.push(position);
    }

    /// Store an answer and advance.
    ///
    /// In Normal mode the answer must be for the question at the current
    /// position; the machine then moves to the next question, the next
    /// step, or the summary after the final question. In Editing mode the
    /// answer must be for the editing target and the machine returns to the
    /// summary without moving.
    pub fn submit_answer(
        &mut self,
        question_id: &str,
        raw_answer: impl Into<String>,
    ) -> Result<(), QuestionnaireError> {
        let expected = match &self.state.mode {
            SessionMode::Editing { question_id } => question_id.clone(),
            SessionMode::Normal => self
                .current_question()
                .map(|q| q.id.clone())
                .ok_or(QuestionnaireError::UnknownStep(self.state.position.step))?,
            _ => return Err(self.invalid("submit an answer")),
        };
        if expected != question_id {
            return Err(QuestionnaireError::InvalidQuestion {
                expected,
                got: question_id.to_string(),
            });
        }

        self.state
            .answers
            .insert(question_id.to_string(), raw_answer.into());

        if let SessionMode::Editing { .. } = self.state.mode {
            debug!(question_id, "Edited answer, back to summary");
            self.state.mode = SessionMode::Summary;
            return Ok(());
        }

        let NavigationPosition {
            step,
            question_index,
        } = self.state.position;
        let step_len = self
            .catalog
            .step(step)
            .map(|s| s.questions.len())
            .ok_or(QuestionnaireError::UnknownStep(step))?;

        if question_index + 1 < step_len {
            self.move_to(NavigationPosition::new(step, question_index + 1));
        } else if step < self.catalog.step_count() {
            self.move_to(NavigationPosition::new(step + 1, 0));
        } else {
            debug!("Final question answered, showing summary");
            self.state.mode = SessionMode::Summary;
            self.state.reached_summary = true;
        }
        Ok(())
    }

    /// Return to the previously visited position. Answers are kept.
    ///
    /// While editing, the question at the previous position becomes the
    /// editing target.
    pub fn go_back(&mut self) -> Result<NavigationPosition, QuestionnaireError> {
        let editing = match self.state.mode {
            SessionMode::Normal => false,
            SessionMode::Editing { .. } => true,
            _ => return Err(self.invalid("go back")),
        };
        let previous = self
            .state
            .history
            .pop_back()
            .ok_or(QuestionnaireError::NoHistory)?;
        self.state.position = previous;

        if editing {
            let target = self
                .catalog
                .question_at(previous.step, previous.question_index)
                .map(|q| q.id.clone())
                .ok_or(QuestionnaireError::UnknownStep(previous.step))?;
            self.state.mode = SessionMode::Editing { question_id: target };
        }
        Ok(previous)
    }

    /// Jump to another step. The jump is recorded in the history.
    ///
    /// While editing, the editing target is shown if it belongs to
    /// `target_step`; otherwise the step's first question is shown and
    /// becomes the new target.
    pub fn change_step(&mut self, target_step: u32) -> Result<(), QuestionnaireError> {
        if matches!(self.state.mode, SessionMode::Generating | SessionMode::Result) {
            return Err(self.invalid("change step"));
        }
        let step = self
            .catalog
            .step(target_step)
            .ok_or(QuestionnaireError::UnknownStep(target_step))?;

        match &self.state.mode {
            SessionMode::Editing { question_id } => {
                let index = self
                    .catalog
                    .index_in_step(target_step, question_id)
                    .unwrap_or(0);
                let target = step.questions[index].id.clone();
                self.state.mode = SessionMode::Editing {
                    question_id: target,
                };
                self.move_to(NavigationPosition::new(target_step, index));
            }
            _ => {
                self.state.mode = SessionMode::Normal;
                self.move_to(NavigationPosition::new(target_step, 0));
            }
        }
        Ok(())
    }

    /// Re-open a single answered (or unanswered) question for editing.
    pub fn edit_question(
        &mut self,
        step_id: u32,
        question_id: &str,
    ) -> Result<(), QuestionnaireError> {
        if matches!(self.state.mode, SessionMode::Generating | SessionMode::Result) {
            return Err(self.invalid("edit a question"));
        }
        if self.catalog.step(step_id).is_none() {
            return Err(QuestionnaireError::UnknownStep(step_id));
        }
        let index = self.catalog.index_in_step(step_id, question_id).ok_or_else(|| {
            QuestionnaireError::UnknownQuestion {
                step: step_id,
                question_id: question_id.to_string(),
            }
        })?;

        self.state.mode = SessionMode::Editing {
            question_id: question_id.to_string(),
        };
        self.move_to(NavigationPosition::new(step_id, index));
        Ok(())
    }

    /// Show the summary.
    ///
    /// From Editing the edit is abandoned; from Result the analysis is
    /// dropped so that answers can be changed; from Normal only once the
    /// summary has been reached before.
    pub fn return_to_summary(&mut self) -> Result<(), QuestionnaireError> {
        match self.state.mode {
            SessionMode::Summary => {}
            SessionMode::Editing { .. } => self.state.mode = SessionMode::Summary,
            SessionMode::Result => {
                self.state.result = None;
                self.state.mode = SessionMode::Summary;
            }
            SessionMode::Normal if self.state.reached_summary => {
                self.state.mode = SessionMode::Summary;
            }
            SessionMode::Normal | SessionMode::Generating => {
                return Err(self.invalid("return to the summary"));
            }
        }
        Ok(())
    }

    pub fn set_user_info(&mut self, user_info: UserInfo) {
        self.state.user_info = user_info;
    }

    /// Enter Generating and hand out what the collaborators need.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, QuestionnaireError> {
        if self.state.mode != SessionMode::Summary {
            return Err(self.invalid("generate the analysis"));
        }
        self.state.mode = SessionMode::Generating;
        self.state.last_error = None;
        Ok(GenerationTicket {
            epoch: self.state.generation_epoch,
            answers: self.state.answers.clone(),
            user_info: self.state.user_info.clone(),
            scores: pillar_scores(&self.state.answers),
        })
    }

    fn ticket_is_current(&self, epoch: u64) -> bool {
        epoch == self.state.generation_epoch && self.state.mode == SessionMode::Generating
    }

    /// Store a finished analysis. Returns `false` if the ticket is stale.
    pub fn complete_generation(&mut self, epoch: u64, outcome: AnalysisOutcome) -> bool {
        if !self.ticket_is_current(epoch) {
            return false;
        }
        self.state.result = Some(outcome);
        self.state.last_error = None;
        self.state.mode = SessionMode::Result;
        true
    }

    /// Record a failed generation and go back to the summary. Returns
    /// `false` if the ticket is stale.
    pub fn fail_generation(&mut self, epoch: u64, message: impl Into<String>) -> bool {
        if !self.ticket_is_current(epoch) {
            return false;
        }
        self.state.last_error = Some(message.into());
        self.state.mode = SessionMode::Summary;
        true
    }

    /// Reset everything to the initial state.
    pub fn restart(&mut self) {
        let epoch = self.state.generation_epoch.wrapping_add(1);
        self.state = SessionState::with_epoch(epoch);
    }
}
