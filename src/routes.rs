//! REST endpoints driving the questionnaire flow.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::dashboard::DASHBOARD;
use crate::error::FlowError;
use crate::flow::skills::skill_catalog;
use crate::flow::{FlowSession, FlowSnapshot, ProfileUpdate};

/// Shared state for flow routes.
#[derive(Clone)]
pub struct FlowRouteState {
    pub session: Arc<FlowSession>,
}

/// Build the flow REST routes.
pub fn flow_routes(session: Arc<FlowSession>) -> Router {
    let state = FlowRouteState { session };

    Router::new()
        .route("/health", get(health))
        .route("/api/flow", get(get_flow))
        .route("/api/flow/start", post(start))
        .route("/api/flow/profile", put(update_profile))
        .route("/api/flow/next", post(next))
        .route("/api/flow/back", post(back))
        .route("/api/flow/skills/toggle", post(toggle_skill))
        .route("/api/flow/submit", post(submit))
        .route("/api/flow/steps/{index}/toggle", post(toggle_step))
        .route("/api/flow/reset", post(reset))
        .route("/api/skills", get(list_skills))
        .route("/api/dashboard", get(dashboard))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "upskill-pilot"
    }))
}

// ── Flow ────────────────────────────────────────────────────────────────

/// Map a flow action result onto a response.
///
/// Rejections carry the current snapshot so the client can re-render, e.g.
/// to show the "select at least one skill" message.
async fn respond(state: &FlowRouteState, result: Result<FlowSnapshot, FlowError>) -> Response {
    match result {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(err) => {
            let status = match err {
                FlowError::InvalidTransition { .. } => StatusCode::CONFLICT,
                FlowError::IncompleteProfile
                | FlowError::NoSkillsSelected
                | FlowError::StepOutOfRange { .. }
                | FlowError::SkillNumberOutOfRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            };
            debug!(error = %err, status = %status, "Flow action rejected");
            let flow = state.session.snapshot().await;
            (
                status,
                Json(serde_json::json!({
                    "error": err.to_string(),
                    "flow": flow,
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/flow
async fn get_flow(State(state): State<FlowRouteState>) -> impl IntoResponse {
    Json(state.session.snapshot().await)
}

async fn start(State(state): State<FlowRouteState>) -> Response {
    let result = state.session.start().await;
    respond(&state, result).await
}

/// PUT /api/flow/profile
///
/// Partial edit of name, currentRole and careerGoal.
async fn update_profile(
    State(state): State<FlowRouteState>,
    Json(update): Json<ProfileUpdate>,
) -> Response {
    let result = state.session.update_profile(update).await;
    respond(&state, result).await
}

async fn next(State(state): State<FlowRouteState>) -> Response {
    let result = state.session.next().await;
    respond(&state, result).await
}

async fn back(State(state): State<FlowRouteState>) -> Response {
    let result = state.session.back().await;
    respond(&state, result).await
}

#[derive(Debug, Deserialize)]
struct ToggleSkillRequest {
    skill: String,
}

async fn toggle_skill(
    State(state): State<FlowRouteState>,
    Json(req): Json<ToggleSkillRequest>,
) -> Response {
    let result = state.session.toggle_skill(&req.skill).await;
    respond(&state, result).await
}

/// POST /api/flow/submit
///
/// Waits for the generation to finish. A failed generation is not an HTTP
/// error: the flow is back on the skills step with the message set.
async fn submit(State(state): State<FlowRouteState>) -> Response {
    let result = state.session.submit().await.map(|(_, snapshot)| snapshot);
    respond(&state, result).await
}

async fn toggle_step(State(state): State<FlowRouteState>, Path(index): Path<usize>) -> Response {
    let result = state.session.toggle_step(index).await;
    respond(&state, result).await
}

async fn reset(State(state): State<FlowRouteState>) -> impl IntoResponse {
    Json(state.session.reset().await)
}

// ── Static data ─────────────────────────────────────────────────────────

async fn list_skills() -> impl IntoResponse {
    Json(skill_catalog())
}

async fn dashboard() -> impl IntoResponse {
    Json(DASHBOARD)
}
