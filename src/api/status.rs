//! Status Routes
//!
//! Routes:
//! - GET /health - Basic health check
//! - GET /health/live - Liveness check (server responding)
//! - GET /health/ready - Readiness check (database reachable)

use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{db, AppState};

/// Build status routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check))
        .route("/health/ready", get(readiness_check))
}

// ============================================================================
// Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: DependencyCheck,
}

#[derive(Debug, Serialize)]
pub struct DependencyCheck {
    pub status: HealthStatus,
    pub latency_ms: u64,
    pub jobs: Option<i64>,
    pub message: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = check_database(&state).await;
    let ready = database.status == HealthStatus::Healthy;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ReadinessResponse { ready, database }))
}

/// Check database connectivity.
async fn check_database(state: &AppState) -> DependencyCheck {
    let start = Instant::now();

    let result = match db::health_check(&state.db).await {
        Ok(()) => db::count_jobs(&state.db).await,
        Err(e) => Err(e),
    };

    let latency_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(jobs) => DependencyCheck {
            status: HealthStatus::Healthy,
            latency_ms,
            jobs: Some(jobs),
            message: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database readiness check failed");
            DependencyCheck {
                status: HealthStatus::Unhealthy,
                latency_ms,
                jobs: None,
                message: Some("database unavailable".to_string()),
            }
        }
    }
}
