//! Unified error handling for the service and its HTTP boundary.
//!
//! Every error is a closed enum variant. The HTTP status and the stable
//! error code are derived by matching on the variant (and its `Field` tag),
//! never by inspecting message text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use domain::{DomainError, Field};
use serde::Serialize;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Caller input
    #[error("{field} is required")]
    MissingRequiredField { field: Field },

    #[error("{message}")]
    Validation { field: Field, message: String },

    #[error("{message}")]
    InvalidData { field: Field, message: String },

    #[error("Invalid request: {0}")]
    BadRequest(String),

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    // Request lifetime
    #[error("Request cancelled or deadline exceeded")]
    Cancelled,

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: String,
    pub status: u16,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingRequiredField { .. } => "MISSING_REQUIRED_FIELD",
            AppError::Validation { .. } => "VALIDATION_FAILED",
            AppError::InvalidData { field, .. } => match field {
                Field::Days => "INVALID_DAYS",
                Field::StartDate => "INVALID_DATE",
                Field::PatientId
                | Field::DoctorId
                | Field::Diagnosis
                | Field::Folio
                | Field::Status => "INVALID_DATA",
            },
            AppError::BadRequest(_) => "INVALID_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Cancelled => "REQUEST_TIMEOUT",
            #[cfg(feature = "database")]
            AppError::Database(_) => "INTERNAL_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingRequiredField { .. }
            | AppError::Validation { .. }
            | AppError::InvalidData { .. }
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Cancelled => StatusCode::REQUEST_TIMEOUT,
            #[cfg(feature = "database")]
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "An unexpected error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An unexpected error occurred".to_string()
            }

            // Show full message for everything the caller can act on
            _ => self.to_string(),
        }
    }

    /// Check if this is the duplicate-key signal from a store
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.code(),
            details: Some(self.user_message()),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MissingRequiredField { field } => AppError::MissingRequiredField { field },
            DomainError::ValidationFailed { field, message } => {
                AppError::Validation { field, message }
            }
            DomainError::InvalidData { field, message } => AppError::InvalidData { field, message },
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(entity.to_string()))
    }
}

/// Convenience constructors
impl AppError {
    pub fn missing(field: Field) -> Self {
        AppError::MissingRequiredField { field }
    }

    pub fn invalid(field: Field, message: impl Into<String>) -> Self {
        AppError::InvalidData {
            field,
            message: message.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_invalid_days_code() {
        let err = AppError::invalid(Field::Days, "Days must be greater than 0");
        assert_eq!(err.code(), "INVALID_DAYS");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_field_specific_codes() {
        assert_eq!(AppError::invalid(Field::StartDate, "x").code(), "INVALID_DATE");
        assert_eq!(AppError::invalid(Field::PatientId, "x").code(), "INVALID_DATA");
        assert_eq!(AppError::missing(Field::Folio).code(), "MISSING_REQUIRED_FIELD");
    }

    #[test]
    fn test_domain_conversion_keeps_kind() {
        let err: AppError = DomainError::validation(Field::PatientId, "bad rut").into();
        assert!(matches!(
            err,
            AppError::Validation {
                field: Field::PatientId,
                ..
            }
        ));

        let err: AppError = DomainError::missing(Field::Diagnosis).into();
        assert!(matches!(
            err,
            AppError::MissingRequiredField {
                field: Field::Diagnosis
            }
        ));
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let err = AppError::internal("connection refused on 10.0.0.3:5432");
        assert_eq!(err.user_message(), "An unexpected error occurred");
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_option_ext() {
        let missing: Option<u8> = None;
        let err = missing.ok_or_not_found("License").unwrap_err();
        assert_eq!(err.to_string(), "License not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::missing(Field::PatientId).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "MISSING_REQUIRED_FIELD");
        assert_eq!(body["details"], "patientId is required");
        assert_eq!(body["status"], 400);
        assert!(body["timestamp"].is_string());
    }
}
