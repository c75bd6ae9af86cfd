//! Reifegrad: AI maturity questionnaire service.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod llm;
pub mod narrative;
pub mod questionnaire;
pub mod report;
pub mod scoring;
pub mod sink;
