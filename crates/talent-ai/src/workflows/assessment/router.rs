use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::clients::{CandidateRoster, QuestionCatalog, ScoringService};
use super::domain::{module_catalog, Answer, CandidateId, CandidateRef, ModuleId, QuestionId};
use super::error::AssessmentError;
use super::presenter::SessionView;
use super::repository::{SessionStore, StoreError};
use super::service::{AssessmentService, AssessmentServiceError};
use super::session::SessionState;

#[derive(Debug, Deserialize)]
pub struct SelectModulesRequest {
    pub modules: Vec<ModuleId>,
}

#[derive(Debug, Deserialize)]
pub struct RecordAnswerRequest {
    pub question_id: QuestionId,
    pub answer: Answer,
}

/// Router builder exposing the assessment run lifecycle.
pub fn assessment_router<C, S, T>(service: Arc<AssessmentService<C, S, T>>) -> Router
where
    C: QuestionCatalog + 'static,
    S: ScoringService + 'static,
    T: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/assessments/modules", get(modules_handler))
        .route("/api/v1/assessments", post(start_handler::<C, S, T>))
        .route(
            "/api/v1/assessments/:candidate_id",
            get(session_handler::<C, S, T>).delete(abandon_handler::<C, S, T>),
        )
        .route(
            "/api/v1/assessments/:candidate_id/modules",
            put(select_modules_handler::<C, S, T>),
        )
        .route(
            "/api/v1/assessments/:candidate_id/questions",
            post(begin_questions_handler::<C, S, T>),
        )
        .route(
            "/api/v1/assessments/:candidate_id/responses",
            post(record_handler::<C, S, T>),
        )
        .route(
            "/api/v1/assessments/:candidate_id/advance",
            post(advance_handler::<C, S, T>),
        )
        .route(
            "/api/v1/assessments/:candidate_id/reset",
            post(reset_handler::<C, S, T>),
        )
        .with_state(service)
}

/// Router builder exposing the candidate roster for the selection stage.
pub fn candidate_router<R>(roster: Arc<R>) -> Router
where
    R: CandidateRoster + 'static,
{
    Router::new()
        .route("/api/v1/candidates", get(candidates_handler::<R>))
        .with_state(roster)
}

pub(crate) async fn modules_handler() -> Response {
    (StatusCode::OK, Json(module_catalog())).into_response()
}

pub(crate) async fn candidates_handler<R>(State(roster): State<Arc<R>>) -> Response
where
    R: CandidateRoster + 'static,
{
    match roster.list_candidates().await {
        Ok(candidates) => (StatusCode::OK, Json(json!({ "candidates": candidates }))).into_response(),
        Err(err) => {
            warn!(error = %err, "candidate roster unavailable; rendering an empty roster");
            let payload = json!({
                "candidates": [],
                "warning": err.to_string(),
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn start_handler<C, S, T>(
    State(service): State<Arc<AssessmentService<C, S, T>>>,
    Json(candidate): Json<CandidateRef>,
) -> Response
where
    C: QuestionCatalog + 'static,
    S: ScoringService + 'static,
    T: SessionStore + 'static,
{
    let candidate_id = candidate.id;
    match service.start(candidate) {
        Ok(session) => session_response(StatusCode::CREATED, &session),
        Err(error) => error_response(&service, candidate_id, error),
    }
}

pub(crate) async fn session_handler<C, S, T>(
    State(service): State<Arc<AssessmentService<C, S, T>>>,
    Path(candidate_id): Path<u64>,
) -> Response
where
    C: QuestionCatalog + 'static,
    S: ScoringService + 'static,
    T: SessionStore + 'static,
{
    let candidate = CandidateId(candidate_id);
    respond(&service, candidate, service.get(candidate))
}

pub(crate) async fn select_modules_handler<C, S, T>(
    State(service): State<Arc<AssessmentService<C, S, T>>>,
    Path(candidate_id): Path<u64>,
    Json(request): Json<SelectModulesRequest>,
) -> Response
where
    C: QuestionCatalog + 'static,
    S: ScoringService + 'static,
    T: SessionStore + 'static,
{
    let candidate = CandidateId(candidate_id);
    let outcome = service.select_modules(candidate, &request.modules);
    respond(&service, candidate, outcome)
}

pub(crate) async fn begin_questions_handler<C, S, T>(
    State(service): State<Arc<AssessmentService<C, S, T>>>,
    Path(candidate_id): Path<u64>,
) -> Response
where
    C: QuestionCatalog + 'static,
    S: ScoringService + 'static,
    T: SessionStore + 'static,
{
    let candidate = CandidateId(candidate_id);
    let outcome = service.begin_questions(candidate).await;
    respond(&service, candidate, outcome)
}

pub(crate) async fn record_handler<C, S, T>(
    State(service): State<Arc<AssessmentService<C, S, T>>>,
    Path(candidate_id): Path<u64>,
    Json(request): Json<RecordAnswerRequest>,
) -> Response
where
    C: QuestionCatalog + 'static,
    S: ScoringService + 'static,
    T: SessionStore + 'static,
{
    let candidate = CandidateId(candidate_id);
    let outcome = service.record(candidate, &request.question_id, request.answer);
    respond(&service, candidate, outcome)
}

pub(crate) async fn advance_handler<C, S, T>(
    State(service): State<Arc<AssessmentService<C, S, T>>>,
    Path(candidate_id): Path<u64>,
) -> Response
where
    C: QuestionCatalog + 'static,
    S: ScoringService + 'static,
    T: SessionStore + 'static,
{
    let candidate = CandidateId(candidate_id);
    let outcome = service.advance(candidate).await;
    respond(&service, candidate, outcome)
}

pub(crate) async fn reset_handler<C, S, T>(
    State(service): State<Arc<AssessmentService<C, S, T>>>,
    Path(candidate_id): Path<u64>,
) -> Response
where
    C: QuestionCatalog + 'static,
    S: ScoringService + 'static,
    T: SessionStore + 'static,
{
    let candidate = CandidateId(candidate_id);
    respond(&service, candidate, service.reset(candidate))
}

pub(crate) async fn abandon_handler<C, S, T>(
    State(service): State<Arc<AssessmentService<C, S, T>>>,
    Path(candidate_id): Path<u64>,
) -> Response
where
    C: QuestionCatalog + 'static,
    S: ScoringService + 'static,
    T: SessionStore + 'static,
{
    let candidate = CandidateId(candidate_id);
    match service.abandon(candidate) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(&service, candidate, error),
    }
}

fn respond<C, S, T>(
    service: &AssessmentService<C, S, T>,
    candidate: CandidateId,
    outcome: Result<SessionState, AssessmentServiceError>,
) -> Response
where
    C: QuestionCatalog + 'static,
    S: ScoringService + 'static,
    T: SessionStore + 'static,
{
    match outcome {
        Ok(session) => session_response(StatusCode::OK, &session),
        Err(error) => error_response(service, candidate, error),
    }
}

fn session_response(status: StatusCode, session: &SessionState) -> Response {
    (status, Json(SessionView::from_session(session))).into_response()
}

fn error_response<C, S, T>(
    service: &AssessmentService<C, S, T>,
    candidate: CandidateId,
    error: AssessmentServiceError,
) -> Response
where
    C: QuestionCatalog + 'static,
    S: ScoringService + 'static,
    T: SessionStore + 'static,
{
    match error {
        AssessmentServiceError::Store(StoreError::NotFound) => {
            let payload = json!({
                "error": StoreError::NotFound.to_string(),
                "candidate_id": candidate,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        AssessmentServiceError::Store(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
        AssessmentServiceError::Assessment(error) => {
            let status = assessment_status(&error);
            let session = service
                .get(candidate)
                .ok()
                .map(|session| SessionView::from_session(&session));
            let payload = json!({
                "error": error.to_string(),
                "classification": error.classification(),
                "session": session,
            });
            (status, Json(payload)).into_response()
        }
    }
}

fn assessment_status(error: &AssessmentError) -> StatusCode {
    match error {
        AssessmentError::NoModulesSelected
        | AssessmentError::InvalidAnswer(_)
        | AssessmentError::InvalidStage { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AssessmentError::CatalogUnavailable { .. }
        | AssessmentError::DuplicateQuestionId { .. }
        | AssessmentError::StaleResult { .. } => StatusCode::CONFLICT,
        AssessmentError::ScoringUnavailable(_)
        | AssessmentError::ScoringRejected(_)
        | AssessmentError::MalformedProfile(_) => StatusCode::BAD_GATEWAY,
    }
}
