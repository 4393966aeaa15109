use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use talent_ai::workflows::assessment::{
    assessment_router, candidate_router, AssessmentService, CandidateRoster, QuestionCatalog,
    ScoringService, SessionStore,
};

pub(crate) fn with_assessment_routes<C, S, T, R>(
    service: Arc<AssessmentService<C, S, T>>,
    roster: Arc<R>,
) -> axum::Router
where
    C: QuestionCatalog + 'static,
    S: ScoringService + 'static,
    T: SessionStore + 'static,
    R: CandidateRoster + 'static,
{
    assessment_router(service)
        .merge(candidate_router(roster))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
