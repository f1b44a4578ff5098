//! Database layer for the job board.
//!
//! Provides SQLite connection pooling, versioned migrations and the
//! job queries.

mod jobs;
pub mod migrations;
mod pool;

pub use jobs::*;
pub use migrations::{run_migrations, Migration, MIGRATIONS};
pub use pool::{health_check, PoolConfig};

use crate::Result;
use std::path::Path;
use tracing::info;

/// Type alias for the SQLite connection pool.
pub type DbPool = sqlx::SqlitePool;

/// Initialize the database connection pool.
///
/// Creates parent directories if needed and opens the database in WAL mode.
pub async fn init_pool(path: &str, max_connections: u32) -> Result<DbPool> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let config = PoolConfig::for_path(path, max_connections);
    let options = config.build_connect_options(path)?;
    let pool = config.build_pool_options().connect_with(options).await?;

    info!(path, max_connections = config.max_connections, "Database pool initialized");

    Ok(pool)
}

/// Bring the schema up to date.
pub async fn migrate(pool: &DbPool) -> Result<()> {
    let applied = run_migrations(pool).await?;
    if !applied.is_empty() {
        info!(?applied, "Database schema migrated");
    }
    Ok(())
}
