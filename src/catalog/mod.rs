//! Question catalog: the static, ordered steps and questions of the
//! assessment.

pub mod model;
pub mod questions;

pub use model::{
    AnswerKind, Catalog, MULTI_SELECT_DELIMITER, Question, SCALE_MAX, SCALE_MIN, Step,
};
pub use questions::maturity_catalog;
