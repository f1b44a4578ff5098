//! Job posting model and its status lifecycle rules.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;

use crate::error::{Error, Result, ValidationErrors};

/// Workflow state of a tracked job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Todo,
    Applied,
    Hidden,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Todo => "todo",
            JobStatus::Applied => "applied",
            JobStatus::Hidden => "hidden",
        }
    }

}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "todo" => Ok(JobStatus::Todo),
            "applied" => Ok(JobStatus::Applied),
            "hidden" => Ok(JobStatus::Hidden),
            _ => Err(()),
        }
    }
}

/// A tracked job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub status: JobStatus,
    pub created_at: String,
    /// First time the job entered `applied`. Never cleared.
    pub applied_at: Option<String>,
    /// First time the job entered `hidden`. Never cleared.
    pub hidden_at: Option<String>,
}

impl Job {
    /// Build the next version of this job from a validated patch.
    ///
    /// Supplied fields replace the current ones; `id`, `created_at` and the
    /// status stamps are not patchable. Entering `applied` or `hidden` from a
    /// different status stamps the matching timestamp, but only the first
    /// time: an existing stamp is kept even after leaving and re-entering.
    pub fn apply_patch(&self, patch: &JobPatch, now: &str) -> Job {
        let mut next = self.clone();

        if let Some(title) = &patch.title {
            next.title = title.clone();
        }
        if let Some(company) = &patch.company {
            next.company = Some(company.clone());
        }
        if let Some(url) = &patch.url {
            next.url = Some(url.clone());
        }
        if let Some(source) = &patch.source {
            next.source = Some(source.clone());
        }
        if let Some(notes) = &patch.notes {
            next.notes = Some(notes.clone());
        }

        if let Some(status) = patch.status {
            next.status = status;
            if status != self.status {
                match status {
                    JobStatus::Applied if next.applied_at.is_none() => {
                        next.applied_at = Some(now.to_string());
                    }
                    JobStatus::Hidden if next.hidden_at.is_none() => {
                        next.hidden_at = Some(now.to_string());
                    }
                    _ => {}
                }
            }
        }

        next
    }

    /// Whether the status changed between `self` and `next`.
    pub fn transitioned(&self, next: &Job) -> Option<(JobStatus, JobStatus)> {
        (self.status != next.status).then_some((self.status, next.status))
    }
}

/// Body of a create request, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobInput {
    pub url: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

/// Validated input for inserting a new job row.
#[derive(Debug, Clone)]
pub struct CreateJob {
    pub id: String,
    pub title: String,
    pub company: Option<String>,
    pub url: String,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl JobInput {
    /// Validate the input and fill in the derived title and source.
    ///
    /// Optional text fields are trimmed and dropped when empty.
    pub fn into_create(self, id: String, created_at: String) -> Result<CreateJob> {
        let mut errors = ValidationErrors::default();

        let url = match self.url.as_deref() {
            None => {
                errors.add("url", "Required");
                None
            }
            Some(raw) => match Url::parse(raw) {
                Ok(parsed) => Some((raw.to_string(), parsed)),
                Err(_) => {
                    errors.add("url", "Invalid url");
                    None
                }
            },
        };

        if matches!(self.title.as_deref(), Some("")) {
            errors.add("title", MIN_LENGTH_MESSAGE);
        }

        errors.into_result()?;
        let Some((raw_url, parsed)) = url else {
            return Err(Error::invalid_field("url", "Required"));
        };

        Ok(CreateJob {
            id,
            title: non_blank(self.title).unwrap_or_else(|| title_from_url(&parsed)),
            company: non_blank(self.company),
            source: non_blank(self.source).or_else(|| infer_source(&parsed)),
            notes: non_blank(self.notes),
            url: raw_url,
            created_at,
        })
    }
}

/// Body of a patch request, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPatchInput {
    pub status: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

/// A validated partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

impl JobPatchInput {
    pub fn validate(self) -> Result<JobPatch> {
        let mut errors = ValidationErrors::default();

        let status = match self.status.as_deref() {
            None => None,
            Some(raw) => {
                let status = raw.parse::<JobStatus>().ok();
                if status.is_none() {
                    errors.add(
                        "status",
                        format!(
                            "Invalid enum value. Expected 'todo' | 'applied' | 'hidden', received '{}'",
                            raw
                        ),
                    );
                }
                status
            }
        };

        if matches!(self.title.as_deref(), Some("")) {
            errors.add("title", MIN_LENGTH_MESSAGE);
        }

        if let Some(url) = self.url.as_deref() {
            if Url::parse(url).is_err() {
                errors.add("url", "Invalid url");
            }
        }

        errors.into_result()?;

        Ok(JobPatch {
            status,
            title: self.title,
            company: self.company,
            url: self.url,
            source: self.source,
            notes: self.notes,
        })
    }
}

const MIN_LENGTH_MESSAGE: &str = "String must contain at least 1 character(s)";

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Default title for a job added from a bare link.
pub fn title_from_url(url: &Url) -> String {
    match url.host_str() {
        Some(host) => {
            let host = host.strip_prefix("www.").unwrap_or(host);
            format!("Job link ({})", host)
        }
        None => "Job link".to_string(),
    }
}

/// Guess the posting platform from the URL host.
pub fn infer_source(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    if host.is_empty() {
        return None;
    }

    let source = if host.contains("x.com") || host.contains("twitter.com") {
        "X".to_string()
    } else if host.contains("linkedin.com") {
        "LinkedIn".to_string()
    } else if host.contains("greenhouse.io") {
        "Greenhouse".to_string()
    } else if host.contains("lever.co") {
        "Lever".to_string()
    } else {
        host
    };

    Some(source)
}

/// Dashboard counters over the full job list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub total: usize,
    pub todo: usize,
    pub applied: usize,
    pub hidden: usize,
    /// Applied more than three days ago and still in `applied`.
    pub needs_follow_up: usize,
    pub this_week: usize,
    pub last_week: usize,
    /// Percentage of all jobs currently in `applied`.
    pub application_rate: u32,
}

/// Days after applying before a job is flagged for follow-up.
const FOLLOW_UP_AFTER_DAYS: i64 = 3;

impl JobStats {
    pub fn compute(jobs: &[Job], now: DateTime<Utc>) -> Self {
        let week_ago = now - Duration::days(7);
        let two_weeks_ago = now - Duration::days(14);

        let mut stats = JobStats {
            total: jobs.len(),
            ..Default::default()
        };

        for job in jobs {
            match job.status {
                JobStatus::Todo => stats.todo += 1,
                JobStatus::Applied => stats.applied += 1,
                JobStatus::Hidden => stats.hidden += 1,
            }

            if job.status == JobStatus::Applied {
                if let Some(applied_at) = job.applied_at.as_deref().and_then(parse_timestamp) {
                    if (now - applied_at).num_days() > FOLLOW_UP_AFTER_DAYS {
                        stats.needs_follow_up += 1;
                    }
                }
            }

            if let Some(created_at) = parse_timestamp(&job.created_at) {
                if created_at > week_ago {
                    stats.this_week += 1;
                } else if created_at < week_ago && created_at > two_weeks_ago {
                    stats.last_week += 1;
                }
            }
        }

        if stats.total > 0 {
            stats.application_rate =
                ((stats.applied as f64 / stats.total as f64) * 100.0).round() as u32;
        }

        stats
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
