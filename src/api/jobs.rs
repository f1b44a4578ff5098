//! Job API endpoints.
//!
//! Routes:
//! - GET /jobs - List all jobs, newest first
//! - POST /jobs - Add a job from a link
//! - GET /jobs/stats - Dashboard counters
//! - GET /jobs/:id - Get a single job
//! - PATCH /jobs/:id - Update status or fields
//! - DELETE /jobs/:id - Delete a job (idempotent)

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{
    models::{Job, JobInput, JobPatchInput, JobStats},
    AppState, Result,
};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: Job,
}

#[derive(Debug, Serialize)]
pub struct JobStatsResponse {
    pub stats: JobStats,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/stats", get(job_stats))
        .route("/:id", get(get_job).patch(update_job).delete(delete_job))
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_jobs(State(state): State<AppState>) -> Result<Json<JobListResponse>> {
    let jobs = state.jobs.list().await?;
    Ok(Json(JobListResponse { jobs }))
}

async fn create_job(
    State(state): State<AppState>,
    payload: std::result::Result<Json<JobInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(input) = payload?;
    let job = state.jobs.create(input).await?;
    Ok((StatusCode::CREATED, Json(JobResponse { job })))
}

async fn job_stats(State(state): State<AppState>) -> Result<Json<JobStatsResponse>> {
    let stats = state.jobs.stats().await?;
    Ok(Json(JobStatsResponse { stats }))
}

async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobResponse>> {
    let job = state.jobs.get(&id).await?;
    Ok(Json(JobResponse { job }))
}

async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<JobPatchInput>, JsonRejection>,
) -> Result<Json<JobResponse>> {
    let Json(input) = payload?;
    let job = state.jobs.patch(&id, input).await?;
    Ok(Json(JobResponse { job }))
}

async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.jobs.delete(&id).await?;
    Ok(Json(DeleteResponse { ok: true }))
}
