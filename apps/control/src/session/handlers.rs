//! Axum route handlers for the console session.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::document::{render_document, RenderedDocument, StructuredDocument};
use crate::errors::AppError;
use crate::models::{ApplicationId, JobId, ResumeId, ResumeRecord};
use crate::session::dashboard::{load_dashboard, DashboardSummary};
use crate::session::detail_cache::CacheSnapshot;
use crate::session::generation::GenerationState;
use crate::session::{JobRowView, RowView};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct JobsPageResponse {
    pub jobs: Vec<JobRowView>,
    pub loaded: bool,
    pub banner: Option<String>,
    pub selected_resume: Option<ResumeId>,
}

#[derive(Debug, Serialize)]
pub struct ResumesPageResponse {
    pub resumes: Vec<ResumeRecord>,
    pub loaded: bool,
    pub banner: Option<String>,
    pub selected_resume: Option<ResumeId>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationsPageResponse {
    pub rows: Vec<RowView>,
    pub loaded: bool,
    pub banner: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectResumeRequest {
    pub resume_id: ResumeId,
}

#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub job_id: JobId,
    pub generation: GenerationState,
}

#[derive(Debug, Serialize)]
pub struct RenderedDocumentResponse {
    pub document: RenderedDocument,
    pub plain_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Page builders
// ────────────────────────────────────────────────────────────────────────────

fn jobs_page(state: &AppState) -> JobsPageResponse {
    let view = state.session.jobs.view();
    JobsPageResponse {
        jobs: state.session.job_rows(),
        loaded: view.loaded,
        banner: view.banner,
        selected_resume: state.session.selected_resume(),
    }
}

fn resumes_page(state: &AppState) -> ResumesPageResponse {
    let view = state.session.resumes.view();
    ResumesPageResponse {
        resumes: view.items,
        loaded: view.loaded,
        banner: view.banner,
        selected_resume: state.session.selected_resume(),
    }
}

fn applications_page(state: &AppState) -> ApplicationsPageResponse {
    let view = state.session.applications.view();
    ApplicationsPageResponse {
        rows: state.session.rows(),
        loaded: view.loaded,
        banner: view.banner,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/dashboard
pub async fn handle_dashboard(State(state): State<AppState>) -> Json<DashboardSummary> {
    Json(load_dashboard(state.pipeline.as_ref()).await)
}

/// GET /api/v1/jobs
///
/// Loads the job list (and the resume list backing the selector) on first
/// visit; later visits return the session's copy.
pub async fn handle_get_jobs(State(state): State<AppState>) -> Json<JobsPageResponse> {
    if !state.session.jobs.is_loaded() {
        state.session.reload_jobs(state.pipeline.as_ref()).await;
    }
    if !state.session.resumes.is_loaded() {
        state.session.reload_resumes(state.pipeline.as_ref()).await;
    }
    Json(jobs_page(&state))
}

/// POST /api/v1/jobs/reload
pub async fn handle_reload_jobs(State(state): State<AppState>) -> Json<JobsPageResponse> {
    state.session.reload_jobs(state.pipeline.as_ref()).await;
    Json(jobs_page(&state))
}

/// POST /api/v1/jobs/:id/generate
///
/// Starts generation and returns immediately with the `requesting` state.
/// Poll the generation endpoint for the outcome.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
) -> Result<(StatusCode, Json<GenerationResponse>), AppError> {
    // Dropping the handle detaches the task; it still runs to completion.
    let _detached = state
        .session
        .trigger_generation(state.pipeline.clone(), job_id)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(GenerationResponse {
            job_id,
            generation: state.session.generation.state(job_id),
        }),
    ))
}

/// GET /api/v1/jobs/:id/generation
pub async fn handle_get_generation(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
) -> Json<GenerationResponse> {
    Json(GenerationResponse {
        job_id,
        generation: state.session.generation.state(job_id),
    })
}

/// GET /api/v1/resumes
pub async fn handle_get_resumes(State(state): State<AppState>) -> Json<ResumesPageResponse> {
    if !state.session.resumes.is_loaded() {
        state.session.reload_resumes(state.pipeline.as_ref()).await;
    }
    Json(resumes_page(&state))
}

/// POST /api/v1/resumes/reload
pub async fn handle_reload_resumes(State(state): State<AppState>) -> Json<ResumesPageResponse> {
    state.session.reload_resumes(state.pipeline.as_ref()).await;
    Json(resumes_page(&state))
}

/// PUT /api/v1/resumes/selection
pub async fn handle_select_resume(
    State(state): State<AppState>,
    Json(request): Json<SelectResumeRequest>,
) -> Result<Json<ResumesPageResponse>, AppError> {
    state.session.select_resume(request.resume_id)?;
    Ok(Json(resumes_page(&state)))
}

/// GET /api/v1/applications
pub async fn handle_get_applications(
    State(state): State<AppState>,
) -> Json<ApplicationsPageResponse> {
    if !state.session.applications.is_loaded() {
        state
            .session
            .reload_applications(state.pipeline.as_ref())
            .await;
    }
    Json(applications_page(&state))
}

/// POST /api/v1/applications/reload
pub async fn handle_reload_applications(
    State(state): State<AppState>,
) -> Json<ApplicationsPageResponse> {
    state
        .session
        .reload_applications(state.pipeline.as_ref())
        .await;
    Json(applications_page(&state))
}

/// GET /api/v1/applications/:id
///
/// Re-reads one row, e.g. to see a background detail fetch land.
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<ApplicationId>,
) -> Result<Json<RowView>, AppError> {
    Ok(Json(state.session.row(id)?))
}

/// POST /api/v1/applications/:id/toggle
///
/// Returns the row right after the toggle; a detail fetch it started
/// finishes in the background (`loading: true` until then).
pub async fn handle_toggle_application(
    State(state): State<AppState>,
    Path(id): Path<ApplicationId>,
) -> Result<Json<RowView>, AppError> {
    let (row, _fetch) = state
        .session
        .toggle_application(state.pipeline.clone(), id)?;
    Ok(Json(row))
}

/// GET /api/v1/applications/:id/document
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(id): Path<ApplicationId>,
) -> Result<Json<StructuredDocument>, AppError> {
    Ok(Json(state.session.document(id)?))
}

/// GET /api/v1/applications/:id/document/rendered
pub async fn handle_get_rendered_document(
    State(state): State<AppState>,
    Path(id): Path<ApplicationId>,
) -> Result<Json<RenderedDocumentResponse>, AppError> {
    let document = render_document(&state.session.document(id)?);
    let plain_text = document.to_plain_text();
    Ok(Json(RenderedDocumentResponse {
        document,
        plain_text,
    }))
}

/// GET /api/v1/cache
pub async fn handle_get_cache(State(state): State<AppState>) -> Json<CacheSnapshot> {
    Json(state.session.details.snapshot())
}

/// POST /api/v1/session/reset
pub async fn handle_reset(State(state): State<AppState>) -> StatusCode {
    state.session.reset();
    StatusCode::NO_CONTENT
}
