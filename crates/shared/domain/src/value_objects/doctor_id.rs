//! Issuing doctor identifier value object.

use std::fmt;

use crate::error::{DomainError, DomainResult, Field};

/// Non-empty identifier of the doctor issuing a license.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DoctorId {
    value: String,
}

impl DoctorId {
    /// # Errors
    /// Returns `MissingRequiredField` if the input is blank.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::missing(Field::DoctorId));
        }
        Ok(Self { value })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
