//! Value objects - immutable, self-validating wrappers around raw input.
//!
//! DDD: compared by value, rejected at construction when malformed, so an
//! invalid identifier or diagnosis can never reach the license entity.

mod diagnosis;
mod doctor_id;
mod identifier;

pub use diagnosis::Diagnosis;
pub use doctor_id::DoctorId;
pub use identifier::Identifier;
