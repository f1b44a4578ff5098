//! API Routes for the job board
//!
//! This module combines all API routes into a single router.

mod jobs;
pub mod status;

use axum::extract::DefaultBodyLimit;
use axum::response::IntoResponse;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the complete API router.
///
/// Route structure:
/// - /jobs/* - Job tracking
/// - /health/* - Health checks
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(status::routes())
        .nest("/jobs", jobs::routes())
}

/// Build the application with its middleware stack and state attached.
///
/// `max_body_bytes` replaces axum's own extractor limit so the configured
/// value applies in both directions.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .map_response(IntoResponse::into_response)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(DefaultBodyLimit::max(max_body_bytes));

    Router::new()
        .merge(routes())
        .layer(middleware)
        .with_state(state)
}
