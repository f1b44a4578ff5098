//! Service layer for the job board.
//!
//! Contains the business logic that sits between the HTTP handlers and
//! the database queries.

mod jobs;

pub use jobs::JobService;
