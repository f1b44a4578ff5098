//! Job database queries.
//!
//! Every operation is a single statement against the `jobs` table.

use crate::models::{CreateJob, Job, JobStatus};
use crate::{Error, Result};

use super::DbPool;

/// Insert a new job in the `todo` state.
pub async fn create_job(pool: &DbPool, input: CreateJob) -> Result<Job> {
    sqlx::query_as::<_, Job>(
        r#"
        INSERT INTO jobs (id, title, company, url, source, notes, status, createdAt, appliedAt, hiddenAt)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, NULL, NULL)
        RETURNING *
        "#,
    )
    .bind(&input.id)
    .bind(&input.title)
    .bind(&input.company)
    .bind(&input.url)
    .bind(&input.source)
    .bind(&input.notes)
    .bind(JobStatus::Todo)
    .bind(&input.created_at)
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Get a job by ID.
pub async fn get_job(pool: &DbPool, id: &str) -> Result<Job> {
    sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Job not found: {}", id)))
}

/// List all jobs, newest first.
/// Uses idx_jobs_createdAt; equal timestamps fall back to insertion order.
pub async fn list_jobs(pool: &DbPool) -> Result<Vec<Job>> {
    sqlx::query_as::<_, Job>("SELECT * FROM jobs ORDER BY createdAt DESC, rowid DESC")
        .fetch_all(pool)
        .await
        .map_err(Error::Database)
}

/// Persist every mutable column of `job`.
///
/// `id` and `createdAt` are never written. Fails with `NotFound` if the
/// row no longer exists.
pub async fn update_job(pool: &DbPool, job: &Job) -> Result<Job> {
    sqlx::query_as::<_, Job>(
        r#"
        UPDATE jobs SET
            title = ?,
            company = ?,
            url = ?,
            source = ?,
            notes = ?,
            status = ?,
            appliedAt = ?,
            hiddenAt = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&job.title)
    .bind(&job.company)
    .bind(&job.url)
    .bind(&job.source)
    .bind(&job.notes)
    .bind(job.status)
    .bind(&job.applied_at)
    .bind(&job.hidden_at)
    .bind(&job.id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Job not found: {}", job.id)))
}

/// Delete a job. Returns whether a row was removed; a missing id is not an error.
pub async fn delete_job(pool: &DbPool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Count jobs.
pub async fn count_jobs(pool: &DbPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jobs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
