//! Health check handler.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::infra::Database;

/// Message shown when the ping fails; the cause is only logged
const DATABASE_UNREACHABLE: &str = "database unreachable";

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// healthy or degraded
    pub status: String,
    pub service: String,
    pub database: ServiceStatus,
}

/// Dependency status
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Report service and database health
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = database_status(state.database.as_deref()).await;

    let healthy = database.status != "unhealthy";
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        service: state.config.service_name.clone(),
        database,
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

async fn database_status(database: Option<&Database>) -> ServiceStatus {
    match database {
        Some(db) => match db.ping().await {
            Ok(_) => ServiceStatus {
                status: "healthy".to_string(),
                error: None,
            },
            Err(e) => {
                error!(error = %e, "database health check failed");
                ServiceStatus {
                    status: "unhealthy".to_string(),
                    error: Some(DATABASE_UNREACHABLE.to_string()),
                }
            }
        },
        None => ServiceStatus {
            status: "not_configured".to_string(),
            error: None,
        },
    }
}
