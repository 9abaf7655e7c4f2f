//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::api::handlers::{health_handler, license_handler};
use domain::LicenseResponse;

/// OpenAPI documentation for the license service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "License Service",
        version = "0.1.0",
        description = "Issuance and verification of medical leave licenses",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8081", description = "Local development server")
    ),
    paths(
        health_handler::health,
        license_handler::issue_license,
        license_handler::list_licenses,
        license_handler::get_license,
        license_handler::verify_license,
    ),
    components(
        schemas(
            LicenseResponse,
            license_handler::CreateLicenseRequest,
            license_handler::VerifyResponse,
            health_handler::HealthResponse,
            health_handler::ServiceStatus,
        )
    ),
    tags(
        (name = "Licenses", description = "Issue, look up and verify licenses"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;
