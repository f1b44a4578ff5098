//! Application state for the job board.
//!
//! Built once at startup and passed to every handler through axum's
//! `State` extractor.

use crate::config::DatabaseConfig;
use crate::db::DbPool;
use crate::services::JobService;
use crate::Result;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,
    /// Job tracking service.
    pub jobs: JobService,
}

impl AppState {
    /// Open the database, migrate it and build the services.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db = crate::db::init_pool(&config.path, config.max_connections).await?;
        crate::db::migrate(&db).await?;

        Ok(Self::from_pool(db))
    }

    /// Build the state around an already-migrated pool.
    pub fn from_pool(db: DbPool) -> Self {
        let jobs = JobService::new(db.clone());
        Self { db, jobs }
    }

    /// Close the pool, waiting for in-flight queries to finish.
    pub async fn close(&self) {
        self.db.close().await;
    }
}
