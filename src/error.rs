//! Error types for the job board.
//!
//! Uses thiserror for ergonomic error definitions that integrate
//! with axum's response system.

use std::collections::BTreeMap;
use std::fmt;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Request errors
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400
            Self::Validation(_) => StatusCode::BAD_REQUEST,

            // 404
            Self::NotFound(_) => StatusCode::NOT_FOUND,

            // 500
            Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Database(_) => "storage_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Shorthand for a single field-level validation failure.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::default();
        errors.add(field, message);
        Self::Validation(errors)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            Self::Validation(errors) => json!({ "error": errors }),
            Self::NotFound(_) => json!({ "error": "not_found" }),
            other => {
                // Storage details stay in the logs
                tracing::error!(error = %other, code = other.error_code(), "Request failed");
                json!({ "error": "internal_error" })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Structured validation failures, split into form-level messages and
/// per-field messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrors {
    pub form_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// A single form-level error, e.g. for an unreadable body.
    pub fn form(message: impl Into<String>) -> Self {
        Self {
            form_errors: vec![message.into()],
            field_errors: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }

    /// Ok when nothing was recorded, otherwise a validation error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.form_errors.clone();
        for (field, messages) in &self.field_errors {
            parts.push(format!("{}: {}", field, messages.join(", ")));
        }
        write!(f, "{}", parts.join("; "))
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(ValidationErrors::form(rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::invalid_field("url", "Required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::NotFound("job".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_errors_serialize_camel_case() {
        let mut errors = ValidationErrors::default();
        errors.add("url", "Invalid url");
        errors.add("url", "Required");

        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            value,
            json!({ "formErrors": [], "fieldErrors": { "url": ["Invalid url", "Required"] } })
        );
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::default().into_result().is_ok());
        assert!(ValidationErrors::form("bad body").into_result().is_err());
    }
}
