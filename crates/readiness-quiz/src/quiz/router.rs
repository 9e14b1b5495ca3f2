use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{SessionId, ValidationError};
use super::lead::LeadForm;
use super::questions;
use super::score::Score;
use super::service::{QuizService, QuizServiceError, SubmissionStatus};
use super::sink::{AnalyticsPublisher, LeadSink, SessionStore, SessionStoreError};
use super::tiers::TierResult;

/// Router exposing the quiz to a browser widget.
pub fn quiz_router<S, L, A>(service: Arc<QuizService<S, L, A>>) -> Router
where
    S: SessionStore + 'static,
    L: LeadSink + 'static,
    A: AnalyticsPublisher + 'static,
{
    Router::new()
        .route("/api/v1/quiz/questions", get(questions_handler))
        .route("/api/v1/quiz/tiers", get(tier_handler))
        .route("/api/v1/quiz/sessions", post(start_handler::<S, L, A>))
        .route(
            "/api/v1/quiz/sessions/:session_id",
            get(snapshot_handler::<S, L, A>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/answers",
            post(answer_handler::<S, L, A>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/advance",
            post(advance_handler::<S, L, A>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/results",
            get(results_handler::<S, L, A>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/lead",
            post(lead_handler::<S, L, A>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerRequest {
    pub(crate) question_id: String,
    pub(crate) value: i64,
}

/// Body for the advance endpoint. With `from` set, the call completes a scheduled
/// transition and is ignored if the session has already moved on. A body that does not
/// parse is rejected rather than treated as a plain advance.
#[derive(Debug, Deserialize)]
pub(crate) struct AdvanceRequest {
    #[serde(default)]
    pub(crate) from: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TierQuery {
    pub(crate) score: f64,
}

pub(crate) async fn questions_handler() -> Response {
    (StatusCode::OK, Json(questions::catalog())).into_response()
}

pub(crate) async fn tier_handler(Query(query): Query<TierQuery>) -> Response {
    match Score::from_value(query.score) {
        Ok(score) => (StatusCode::OK, Json(TierResult::for_score(score))).into_response(),
        Err(err) => validation_response(err),
    }
}

pub(crate) async fn start_handler<S, L, A>(
    State(service): State<Arc<QuizService<S, L, A>>>,
) -> Response
where
    S: SessionStore + 'static,
    L: LeadSink + 'static,
    A: AnalyticsPublisher + 'static,
{
    match service.start() {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn snapshot_handler<S, L, A>(
    State(service): State<Arc<QuizService<S, L, A>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    L: LeadSink + 'static,
    A: AnalyticsPublisher + 'static,
{
    match service.snapshot(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn answer_handler<S, L, A>(
    State(service): State<Arc<QuizService<S, L, A>>>,
    Path(session_id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Response
where
    S: SessionStore + 'static,
    L: LeadSink + 'static,
    A: AnalyticsPublisher + 'static,
{
    match service.answer(&SessionId(session_id), &request.question_id, request.value) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn advance_handler<S, L, A>(
    State(service): State<Arc<QuizService<S, L, A>>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Response
where
    S: SessionStore + 'static,
    L: LeadSink + 'static,
    A: AnalyticsPublisher + 'static,
{
    let from = match parse_advance_body(&body) {
        Ok(from) => from,
        Err(err) => {
            let payload = json!({ "error": format!("invalid advance request: {err}") });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    let id = SessionId(session_id);
    let outcome = match from {
        Some(from) => service.complete_transition(&id, from),
        None => service.advance(&id),
    };

    match outcome {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Only an empty body means a plain advance; anything else must parse.
fn parse_advance_body(body: &[u8]) -> Result<Option<u8>, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let request: AdvanceRequest = serde_json::from_slice(body)?;
    Ok(request.from)
}

pub(crate) async fn results_handler<S, L, A>(
    State(service): State<Arc<QuizService<S, L, A>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    L: LeadSink + 'static,
    A: AnalyticsPublisher + 'static,
{
    match service.results(&SessionId(session_id)) {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn lead_handler<S, L, A>(
    State(service): State<Arc<QuizService<S, L, A>>>,
    Path(session_id): Path<String>,
    Json(form): Json<LeadForm>,
) -> Response
where
    S: SessionStore + 'static,
    L: LeadSink + 'static,
    A: AnalyticsPublisher + 'static,
{
    match service.submit_lead(&SessionId(session_id), form).await {
        Ok(status @ SubmissionStatus::Scheduled { .. }) => {
            (StatusCode::ACCEPTED, Json(status)).into_response()
        }
        Ok(status @ SubmissionStatus::Failed { .. }) => {
            (StatusCode::BAD_GATEWAY, Json(status)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn validation_response(error: ValidationError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}

fn error_response(error: QuizServiceError) -> Response {
    let status = match &error {
        QuizServiceError::Validation(err) => return validation_response(err.clone()),
        QuizServiceError::Store(SessionStoreError::NotFound) => StatusCode::NOT_FOUND,
        QuizServiceError::Incomplete { .. } | QuizServiceError::AlreadyComplete => {
            StatusCode::CONFLICT
        }
        QuizServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
