//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use std::fmt;

use thiserror::Error;

/// Input field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    PatientId,
    DoctorId,
    Diagnosis,
    StartDate,
    Days,
    Folio,
    Status,
}

impl Field {
    /// Wire name of the field, as it appears in request and response bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::PatientId => "patientId",
            Field::DoctorId => "doctorId",
            Field::Diagnosis => "diagnosis",
            Field::StartDate => "startDate",
            Field::Days => "days",
            Field::Folio => "folio",
            Field::Status => "status",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A mandatory field was empty
    #[error("{field} is required")]
    MissingRequiredField { field: Field },

    /// A field failed a format check
    #[error("{message}")]
    ValidationFailed { field: Field, message: String },

    /// A field or entity breaks a business rule
    #[error("{message}")]
    InvalidData { field: Field, message: String },
}

impl DomainError {
    /// Create a missing field error
    pub fn missing(field: Field) -> Self {
        DomainError::MissingRequiredField { field }
    }

    /// Create a format validation error
    pub fn validation(field: Field, message: impl Into<String>) -> Self {
        DomainError::ValidationFailed {
            field,
            message: message.into(),
        }
    }

    /// Create a business rule error
    pub fn invalid(field: Field, message: impl Into<String>) -> Self {
        DomainError::InvalidData {
            field,
            message: message.into(),
        }
    }

    /// Field the error refers to
    pub fn field(&self) -> Field {
        match self {
            DomainError::MissingRequiredField { field }
            | DomainError::ValidationFailed { field, .. }
            | DomainError::InvalidData { field, .. } => *field,
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
