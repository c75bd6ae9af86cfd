//! REST endpoints for questionnaire sessions.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::catalog::MULTI_SELECT_DELIMITER;
use crate::error::{Error, QuestionnaireError};
use crate::questionnaire::{GENERATION_FAILED_MESSAGE, QuestionnaireManager, SessionView, UserInfo};

use super::registry::SessionRegistry;

/// Shared state for session routes.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
}

type ApiError = (StatusCode, Json<Value>);

/// Build the questionnaire REST routes.
pub fn session_routes(registry: Arc<SessionRegistry>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/catalog", get(get_catalog))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session))
        .route("/api/sessions/{id}/answers", post(submit_answer))
        .route("/api/sessions/{id}/back", post(go_back))
        .route("/api/sessions/{id}/step", post(change_step))
        .route("/api/sessions/{id}/edit", post(edit_question))
        .route("/api/sessions/{id}/summary", post(return_to_summary))
        .route("/api/sessions/{id}/user-info", post(set_user_info))
        .route("/api/sessions/{id}/generate", post(generate))
        .route("/api/sessions/{id}/restart", post(restart))
        .route("/api/sessions/{id}/report", get(report))
        .with_state(AppState { registry })
}

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({"error": message.into()})))
}

/// HTTP status for a rejected transition.
pub fn status_for(err: &QuestionnaireError) -> StatusCode {
    match err {
        QuestionnaireError::InvalidTransition { .. } | QuestionnaireError::NoHistory => {
            StatusCode::CONFLICT
        }
        QuestionnaireError::InvalidQuestion { .. }
        | QuestionnaireError::UnknownStep(_)
        | QuestionnaireError::UnknownQuestion { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn view_response(result: Result<SessionView, QuestionnaireError>) -> Response {
    match result {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => error(status_for(&e), e.to_string()).into_response(),
    }
}

async fn lookup(state: &AppState, id: &str) -> Result<Arc<QuestionnaireManager>, ApiError> {
    let session_id =
        Uuid::parse_str(id).map_err(|_| error(StatusCode::BAD_REQUEST, "Invalid session ID"))?;
    state
        .registry
        .get(session_id)
        .await
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Session not found"))
}

// ── Health & catalog ────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "reifegrad"
    }))
}

async fn get_catalog(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!(state.registry.catalog()))
}

// ── Sessions ────────────────────────────────────────────────────────────

async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let manager = state.registry.create().await;
    (StatusCode::CREATED, Json(manager.snapshot().await))
}

async fn get_session(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match lookup(&state, &id).await {
        Ok(manager) => Json(manager.snapshot().await).into_response(),
        Err(e) => e.into_response(),
    }
}

/// A single answer, or the selected options of a multi-choice question.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnswerValue {
    One(String),
    Many(Vec<String>),
}

impl AnswerValue {
    fn into_raw(self) -> String {
        match self {
            Self::One(s) => s,
            Self::Many(items) => items.join(MULTI_SELECT_DELIMITER.to_string().as_str()),
        }
    }
}

#[derive(Deserialize)]
struct AnswerRequest {
    question_id: String,
    answer: AnswerValue,
}

async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AnswerRequest>,
) -> Response {
    let manager = match lookup(&state, &id).await {
        Ok(m) => m,
        Err(e) => return e.into_response(),
    };
    let raw = body.answer.into_raw();
    view_response(manager.submit_answer(&body.question_id, &raw).await)
}

async fn go_back(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match lookup(&state, &id).await {
        Ok(manager) => view_response(manager.go_back().await),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
struct StepRequest {
    step: u32,
}

async fn change_step(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StepRequest>,
) -> Response {
    match lookup(&state, &id).await {
        Ok(manager) => view_response(manager.change_step(body.step).await),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
struct EditRequest {
    step: u32,
    question_id: String,
}

async fn edit_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<EditRequest>,
) -> Response {
    match lookup(&state, &id).await {
        Ok(manager) => view_response(manager.edit_question(body.step, &body.question_id).await),
        Err(e) => e.into_response(),
    }
}

async fn return_to_summary(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match lookup(&state, &id).await {
        Ok(manager) => view_response(manager.return_to_summary().await),
        Err(e) => e.into_response(),
    }
}

async fn set_user_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UserInfo>,
) -> Response {
    match lookup(&state, &id).await {
        Ok(manager) => Json(manager.set_user_info(body).await).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn generate(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let manager = match lookup(&state, &id).await {
        Ok(m) => m,
        Err(e) => return e.into_response(),
    };
    match manager.request_generation().await {
        Ok(view) => Json(view).into_response(),
        Err(Error::Questionnaire(e)) => error(status_for(&e), e.to_string()).into_response(),
        Err(Error::Llm(_)) => {
            error(StatusCode::SERVICE_UNAVAILABLE, GENERATION_FAILED_MESSAGE).into_response()
        }
        Err(e) => error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn restart(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match lookup(&state, &id).await {
        Ok(manager) => Json(manager.restart().await).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn report(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let manager = match lookup(&state, &id).await {
        Ok(m) => m,
        Err(e) => return e.into_response(),
    };
    match manager.report().await {
        Ok(markdown) => (
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            markdown,
        )
            .into_response(),
        Err(e) => error(status_for(&e), e.to_string()).into_response(),
    }
}
