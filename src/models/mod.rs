//! Data models for the job board.
//!
//! Defines the job record, its request inputs and the status
//! transition rules.

mod job;

pub use job::*;

use chrono::{SecondsFormat, Utc};

/// Generate a new job id
pub fn new_id() -> String {
    nanoid::nanoid!()
}

/// Current UTC time as an ISO-8601 string with millisecond precision,
/// e.g. `2026-01-01T10:00:00.000Z`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
