use crate::db::errors::DbError;
use crate::validation::Validator;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// One or more fields broke a business rule. Keyed by field name, one message each
    #[error("Failed validation: {errors:?}")]
    FailedValidation { errors: BTreeMap<String, String> },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<Validator> for Error {
    fn from(v: Validator) -> Self {
        Error::FailedValidation { errors: v.into_errors() }
    }
}

impl Error {
    /// Ok if the validator collected no errors, otherwise the collected errors as a
    /// [`Error::FailedValidation`].
    pub fn ensure_valid(v: Validator) -> Result<()> {
        if v.valid() { Ok(()) } else { Err(v.into()) }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::FailedValidation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::Conflict => StatusCode::CONFLICT,
                DbError::Referential { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Timeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::FailedValidation { .. } => "The request failed validation".to_string(),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "The requested resource could not be found".to_string(),
                DbError::Conflict => "Unable to update the record due to an edit conflict, please try again".to_string(),
                DbError::Referential { .. } => db_err.to_string(),
                DbError::UniqueViolation { table, .. } => match table.as_deref() {
                    Some("positions") => "A position with this title already exists".to_string(),
                    Some("clearances") => "A clearance with this description already exists".to_string(),
                    _ => "Resource already exists".to_string(),
                },
                DbError::ForeignKeyViolation { .. } => "The record is still referenced by other records".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Timeout { .. } => "The database did not respond in time, please try again".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(DbError::Timeout { .. }) => {
                tracing::error!("Database deadline exceeded: {}", self);
            }
            Error::Database(DbError::NotFound) | Error::Database(DbError::Referential { .. }) => {
                tracing::debug!("Client error: {}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::FailedValidation { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();

        match &self {
            Error::FailedValidation { errors } => (status, axum::Json(json!({ "errors": errors }))).into_response(),
            // Dangling references are reported like a failed field check on the reference
            Error::Database(DbError::Referential { reference, .. }) => {
                let errors = BTreeMap::from([(reference.to_string(), self.user_message())]);
                (status, axum::Json(json!({ "errors": errors }))).into_response()
            }
            Error::Database(DbError::UniqueViolation { table, .. }) => {
                let body = json!({
                    "message": self.user_message(),
                    "resource": table.as_deref().unwrap_or("unknown"),
                });
                (status, axum::Json(body)).into_response()
            }
            _ => (status, axum::Json(json!({ "message": self.user_message() }))).into_response(),
        }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                Error::FailedValidation {
                    errors: BTreeMap::from([("customer".to_string(), "must be provided".to_string())]),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (Error::Database(DbError::NotFound), StatusCode::NOT_FOUND),
            (Error::Database(DbError::Conflict), StatusCode::CONFLICT),
            (
                Error::Database(DbError::Referential {
                    reference: "position",
                    value: "x".into(),
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                Error::Database(DbError::Timeout {
                    after: Duration::from_secs(3),
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                Error::Database(DbError::ForeignKeyViolation {
                    constraint: None,
                    table: Some("resources".into()),
                    message: "fk".into(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::Internal {
                    operation: "load config".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (Error::Other(anyhow::anyhow!("boom")), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{err:?}");
        }
    }

    #[test]
    fn test_internal_details_do_not_leak() {
        let err = Error::Database(DbError::Other(anyhow::anyhow!("relation \"secret_table\" does not exist")));
        assert_eq!(err.user_message(), "Database error occurred");

        let err = Error::Internal {
            operation: "Config validation: database.url is empty".into(),
        };
        assert_eq!(err.user_message(), "Internal server error");
    }

    #[test]
    fn test_ensure_valid() {
        assert!(Error::ensure_valid(Validator::new()).is_ok());

        let mut v = Validator::new();
        v.check(false, "hoursPerWeek", "must be greater than zero");
        match Error::ensure_valid(v) {
            Err(Error::FailedValidation { errors }) => {
                assert_eq!(errors["hoursPerWeek"], "must be greater than zero");
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }
}
