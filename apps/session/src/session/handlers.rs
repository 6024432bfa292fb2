//! Axum route handlers for the Session API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::comparison::JobDetails;
use crate::models::snapshot::SessionSnapshot;
use crate::session::analysis::{fetch_analysis, AnalysisBundle};
use crate::session::WorkspaceView;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MountQuery {
    pub comparison: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordTailoringRequest {
    pub tailored_resume_id: i64,
    #[serde(default)]
    pub job: JobDetails,
}

#[derive(Debug, Deserialize)]
pub struct EditSectionRequest {
    pub value: Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalysisRequest {
    /// Defaults to the tailored resume currently shown.
    #[serde(default)]
    pub tailored_resume_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OnboardingStatus {
    pub completed: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/session?comparison=<id>
///
/// Page load: resolves which session to show and returns it.
pub async fn handle_mount(
    State(state): State<AppState>,
    Query(query): Query<MountQuery>,
) -> Json<WorkspaceView> {
    let mut workspace = state.workspace.lock().await;
    Json(workspace.mount(state.backend.as_ref(), query.comparison).await)
}

/// GET /api/v1/session/current
pub async fn handle_current(State(state): State<AppState>) -> Json<WorkspaceView> {
    Json(state.workspace.lock().await.view())
}

/// PUT /api/v1/session
///
/// Write-through from the frontend: stores the snapshot as sent.
pub async fn handle_replace_snapshot(
    State(state): State<AppState>,
    Json(snapshot): Json<SessionSnapshot>,
) -> Result<Json<WorkspaceView>, AppError> {
    let mut workspace = state.workspace.lock().await;
    Ok(Json(workspace.replace_snapshot(snapshot).await?))
}

/// DELETE /api/v1/session
///
/// New resume / reset form.
pub async fn handle_reset(State(state): State<AppState>) -> Result<Json<WorkspaceView>, AppError> {
    let mut workspace = state.workspace.lock().await;
    Ok(Json(workspace.reset().await?))
}

/// POST /api/v1/session/tailored
///
/// A tailoring request finished. Loads the result and its base resume from the
/// backend and makes them the current session.
pub async fn handle_record_tailoring(
    State(state): State<AppState>,
    Json(request): Json<RecordTailoringRequest>,
) -> Result<Json<WorkspaceView>, AppError> {
    let tailored = state
        .backend
        .tailored_resume(request.tailored_resume_id)
        .await?
        .into_tailored();
    let selected = state.backend.base_resume(tailored.base_resume_id).await?;

    let mut workspace = state.workspace.lock().await;
    Ok(Json(
        workspace
            .record_tailoring(selected, tailored, request.job)
            .await?,
    ))
}

/// PATCH /api/v1/session/sections/:section
pub async fn handle_edit_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(request): Json<EditSectionRequest>,
) -> Result<Json<WorkspaceView>, AppError> {
    let mut workspace = state.workspace.lock().await;
    Ok(Json(workspace.edit_section(&section, request.value).await?))
}

/// DELETE /api/v1/session/error
pub async fn handle_dismiss_error(State(state): State<AppState>) -> Json<WorkspaceView> {
    Json(state.workspace.lock().await.dismiss_error())
}

/// POST /api/v1/session/analysis
///
/// Runs the three analysis calls in parallel. Panels that fail are reported
/// individually; the request itself still succeeds.
pub async fn handle_analysis(
    State(state): State<AppState>,
    request: Option<Json<AnalysisRequest>>,
) -> Result<Json<AnalysisBundle>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let current = state.workspace.lock().await.tailored_id();
    let tailored_resume_id = request
        .tailored_resume_id
        .or(current)
        .ok_or_else(|| AppError::Validation("No tailored resume to analyze".to_string()))?;

    let bundle = fetch_analysis(
        state.backend.as_ref(),
        &state.workspace,
        tailored_resume_id,
    )
    .await;
    Ok(Json(bundle))
}

/// GET /api/v1/onboarding
pub async fn handle_get_onboarding(
    State(state): State<AppState>,
) -> Result<Json<OnboardingStatus>, AppError> {
    let completed = state.store.onboarding_completed().await?;
    Ok(Json(OnboardingStatus { completed }))
}

/// PUT /api/v1/onboarding
pub async fn handle_set_onboarding(
    State(state): State<AppState>,
    Json(status): Json<OnboardingStatus>,
) -> Result<Json<OnboardingStatus>, AppError> {
    state.store.set_onboarding_completed(status.completed).await?;
    Ok(Json(status))
}
