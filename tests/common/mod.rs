//! Common test utilities and helpers.
#![allow(dead_code)]

use axum_test::TestServer;
use job_board::db::{self, DbPool};
use job_board::{api, AppState};
use serde_json::{json, Value};

/// Request body limit used by the test servers.
pub const TEST_BODY_LIMIT: usize = 1024 * 1024;

/// Create an in-memory test database with migrations applied
pub async fn setup_test_db() -> DbPool {
    let pool = db::init_pool(":memory:", 1)
        .await
        .expect("Failed to create test database");
    db::migrate(&pool).await.expect("Failed to run migrations");
    pool
}

/// Build a test server over a fresh database
pub async fn test_server() -> TestServer {
    test_server_with_limit(TEST_BODY_LIMIT).await
}

/// Build a test server with a custom request body limit
pub async fn test_server_with_limit(max_body_bytes: usize) -> TestServer {
    let state = AppState::from_pool(setup_test_db().await);
    TestServer::new(api::app(state, max_body_bytes)).expect("Failed to start test server")
}

/// Add a job from a link and return the created job JSON
pub async fn create_job(server: &TestServer, url: &str) -> Value {
    let response = server.post("/jobs").json(&json!({ "url": url })).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["job"].clone()
}

/// Patch a job and return the response body
pub async fn patch_job(server: &TestServer, id: &str, body: Value) -> Value {
    let response = server.patch(&format!("/jobs/{}", id)).json(&body).await;
    response.assert_status_ok();
    response.json::<Value>()["job"].clone()
}
