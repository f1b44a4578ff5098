//! Job service.
//!
//! Validates requests, applies the status lifecycle rules and persists
//! the result through the job store.

use chrono::Utc;
use tracing::{debug, info};

use crate::db::{self, DbPool};
use crate::error::Result;
use crate::models::{self, Job, JobInput, JobPatchInput, JobStats};

/// Service for managing tracked jobs.
#[derive(Clone)]
pub struct JobService {
    db: DbPool,
}

impl JobService {
    /// Create a new job service.
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// All jobs, newest first.
    pub async fn list(&self) -> Result<Vec<Job>> {
        db::list_jobs(&self.db).await
    }

    /// Get a job by ID.
    pub async fn get(&self, id: &str) -> Result<Job> {
        db::get_job(&self.db, id).await
    }

    /// Add a job from a link.
    pub async fn create(&self, input: JobInput) -> Result<Job> {
        let create = input.into_create(models::new_id(), models::now_iso())?;
        let job = db::create_job(&self.db, create).await?;

        info!(id = %job.id, source = ?job.source, "Created job");

        Ok(job)
    }

    /// Apply a partial update.
    ///
    /// The patch is validated before the job is looked up, so a malformed
    /// body is rejected even for an unknown id.
    pub async fn patch(&self, id: &str, input: JobPatchInput) -> Result<Job> {
        let patch = input.validate()?;
        let prev = db::get_job(&self.db, id).await?;

        let next = prev.apply_patch(&patch, &models::now_iso());
        let job = db::update_job(&self.db, &next).await?;

        match prev.transitioned(&job) {
            Some((from, to)) => info!(
                id = %job.id,
                from = from.as_str(),
                to = to.as_str(),
                "Job status changed"
            ),
            None => debug!(id = %job.id, "Updated job"),
        }

        Ok(job)
    }

    /// Delete a job. Succeeds whether or not it existed.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let removed = db::delete_job(&self.db, id).await?;
        if removed {
            info!(id, "Deleted job");
        } else {
            debug!(id, "Delete requested for unknown job");
        }
        Ok(())
    }

    /// Dashboard counters as of now.
    pub async fn stats(&self) -> Result<JobStats> {
        let jobs = self.list().await?;
        Ok(JobStats::compute(&jobs, Utc::now()))
    }
}
