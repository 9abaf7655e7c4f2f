//! HTTP request handlers.

pub mod health_handler;
pub mod license_handler;

pub use health_handler::health;
pub use license_handler::license_routes;
