//! Patient identifier (Chilean RUT) value object.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::RUT_PATTERN;
use crate::error::{DomainError, DomainResult, Field};

static RUT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(RUT_PATTERN).expect("RUT pattern is a valid regex"));

/// Patient identifier in `XXXXXXX-X` or `XXXXXXXX-X` form.
///
/// The check character may be a digit or `k`/`K`. The check digit itself is
/// not recomputed; only the shape is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    value: String,
}

impl Identifier {
    /// Parse and validate a raw patient identifier.
    ///
    /// # Errors
    /// Returns `ValidationFailed` if the input is blank or does not match the
    /// RUT pattern.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(DomainError::validation(
                Field::PatientId,
                "RUT cannot be empty",
            ));
        }

        if !RUT_REGEX.is_match(&value) {
            return Err(DomainError::validation(
                Field::PatientId,
                "RUT format must be XXXXXXX-X or XXXXXXXX-X",
            ));
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

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.value
    }
}
