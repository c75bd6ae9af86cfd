//! Questionnaire sessions: state, transitions and the async manager.

pub mod machine;
pub mod manager;
pub mod state;

pub use machine::{GenerationTicket, QuestionnaireStateMachine};
pub use manager::{GENERATION_FAILED_MESSAGE, QuestionnaireManager, SessionView};
pub use state::{
    AnalysisOutcome, AnswerSet, NavigationHistory, NavigationPosition, SessionMode, SessionState,
    UserInfo,
};
