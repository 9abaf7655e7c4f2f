//! Patient domain entity.

use serde::{Deserialize, Serialize};

use crate::value_objects::Identifier;

/// Patient a license can be issued to.
///
/// Licenses reference patients by identifier only; this entity carries no
/// behaviour beyond construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub rut: String,
    pub first_name: String,
    pub last_name: String,
}

impl Patient {
    pub fn new(rut: Identifier, first_name: String, last_name: String) -> Self {
        Self {
            rut: rut.into_inner(),
            first_name,
            last_name,
        }
    }
}
