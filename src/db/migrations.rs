//! Versioned schema migrations.
//!
//! Migrations run in order at startup. Each applied version is recorded in
//! `schema_migrations`, so a migration runs at most once per database file.

use sqlx::Row;
use tracing::{debug, info};

use super::DbPool;
use crate::{models, Result};

/// A single schema change.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub sql: &'static str,
}

/// All migrations, ordered by version.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_jobs",
        sql: include_str!("../../migrations/0001_create_jobs.sql"),
    },
    Migration {
        version: 2,
        name: "add_hidden_at",
        sql: include_str!("../../migrations/0002_add_hidden_at.sql"),
    },
];

/// Apply every migration newer than the database's current version.
///
/// Returns the versions applied by this call.
pub async fn run_migrations(pool: &DbPool) -> Result<Vec<i64>> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    if current_version(pool).await? == 0 {
        baseline_existing_schema(pool).await?;
    }

    let current = current_version(pool).await?;
    let mut applied = Vec::new();

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        apply(pool, migration).await?;
        applied.push(migration.version);
    }

    if applied.is_empty() {
        debug!(version = current, "Database schema up to date");
    }

    Ok(applied)
}

/// Highest applied migration version, 0 for a fresh database.
pub async fn current_version(pool: &DbPool) -> Result<i64> {
    let row = sqlx::query("SELECT COALESCE(MAX(version), 0) AS version FROM schema_migrations")
        .fetch_one(pool)
        .await?;
    Ok(row.try_get("version")?)
}

async fn apply(pool: &DbPool, migration: &Migration) -> Result<()> {
    let mut tx = pool.begin().await?;

    for statement in split_statements(migration.sql) {
        sqlx::query(&statement).execute(&mut *tx).await?;
    }

    record(&mut tx, migration).await?;
    tx.commit().await?;

    info!(
        version = migration.version,
        name = migration.name,
        "Applied migration"
    );
    Ok(())
}

async fn record(conn: &mut sqlx::SqliteConnection, migration: &Migration) -> Result<()> {
    sqlx::query("INSERT INTO schema_migrations (version, name, applied_at) VALUES (?, ?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .bind(models::now_iso())
        .execute(conn)
        .await?;
    Ok(())
}

/// Databases created before versioning already hold a `jobs` table.
/// Mark the migrations whose effects are present as applied.
async fn baseline_existing_schema(pool: &DbPool) -> Result<()> {
    let columns: Vec<String> =
        sqlx::query_scalar("SELECT name FROM pragma_table_info('jobs')")
            .fetch_all(pool)
            .await?;

    if columns.is_empty() {
        return Ok(());
    }

    let baseline = if columns.iter().any(|c| c == "hiddenAt") { 2 } else { 1 };

    let mut tx = pool.begin().await?;
    for migration in MIGRATIONS.iter().filter(|m| m.version <= baseline) {
        record(&mut tx, migration).await?;
    }
    tx.commit().await?;

    info!(version = baseline, "Baselined existing jobs schema");
    Ok(())
}

/// Split a migration script into statements, dropping comment lines.
fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|statement| {
            statement
                .lines()
                .filter(|line| !line.trim().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .filter(|statement| !statement.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_pool;

    async fn job_columns(pool: &DbPool) -> Vec<String> {
        sqlx::query_scalar("SELECT name FROM pragma_table_info('jobs')")
            .fetch_all(pool)
            .await
            .unwrap()
    }

    #[test]
    fn test_migrations_are_ordered() {
        let versions: Vec<i64> = MIGRATIONS.iter().map(|m| m.version).collect();
        let mut sorted = versions.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(versions, sorted);
    }

    #[test]
    fn test_split_statements() {
        let statements = split_statements(MIGRATIONS[0].sql);
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS jobs"));
    }

    #[tokio::test]
    async fn test_fresh_database_gets_all_migrations() {
        let pool = init_pool(":memory:", 1).await.unwrap();

        let applied = run_migrations(&pool).await.unwrap();
        assert_eq!(applied, vec![1, 2]);
        assert_eq!(current_version(&pool).await.unwrap(), 2);

        let columns = job_columns(&pool).await;
        for expected in [
            "id", "title", "company", "url", "source", "notes", "status", "createdAt",
            "appliedAt", "hiddenAt",
        ] {
            assert!(columns.iter().any(|c| c == expected), "missing column {}", expected);
        }
    }

    #[tokio::test]
    async fn test_rerun_is_noop() {
        let pool = init_pool(":memory:", 1).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let applied = run_migrations(&pool).await.unwrap();
        assert!(applied.is_empty());
    }

    #[tokio::test]
    async fn test_legacy_table_without_hidden_at_is_upgraded() {
        let pool = init_pool(":memory:", 1).await.unwrap();
        sqlx::query(
            "CREATE TABLE jobs (id TEXT PRIMARY KEY, title TEXT NOT NULL, company TEXT, url TEXT, \
             source TEXT, notes TEXT, status TEXT NOT NULL, createdAt TEXT NOT NULL, appliedAt TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let applied = run_migrations(&pool).await.unwrap();
        assert_eq!(applied, vec![2]);
        assert!(job_columns(&pool).await.iter().any(|c| c == "hiddenAt"));
    }

    #[tokio::test]
    async fn test_legacy_table_with_hidden_at_is_baselined() {
        let pool = init_pool(":memory:", 1).await.unwrap();
        sqlx::query(
            "CREATE TABLE jobs (id TEXT PRIMARY KEY, title TEXT NOT NULL, company TEXT, url TEXT, \
             source TEXT, notes TEXT, status TEXT NOT NULL, createdAt TEXT NOT NULL, \
             appliedAt TEXT, hiddenAt TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let applied = run_migrations(&pool).await.unwrap();
        assert!(applied.is_empty());
        assert_eq!(current_version(&pool).await.unwrap(), 2);
    }
}
