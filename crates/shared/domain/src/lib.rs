//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the license entity and its invariants, the patient placeholder, and the
//! value objects that keep malformed input out of both.

pub mod constants;
pub mod error;
pub mod license;
pub mod patient;
pub mod value_objects;

pub use constants::*;
pub use error::{DomainError, DomainResult, Field};
pub use license::{License, LicenseResponse, LicenseStatus, NewLicense};
pub use patient::Patient;
pub use value_objects::{Diagnosis, DoctorId, Identifier};
