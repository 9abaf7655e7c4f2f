//! SeaORM entities.

pub mod license;
