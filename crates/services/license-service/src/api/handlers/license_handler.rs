//! License handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{AppError, AppResult};
use domain::{Field, LicenseResponse};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::service::IssueLicenseInput;

/// Date-only layouts accepted for `startDate`, tried in order
const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y"];

/// Date-time layout without offset
const LOCAL_DATETIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";

/// License issuance request.
///
/// Absent fields decode as blank so the issuance workflow reports them as
/// missing.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateLicenseRequest {
    /// Patient RUT
    #[validate(length(max = 50, message = "patientId must be at most 50 characters"))]
    #[schema(example = "12345678-9", max_length = 50)]
    pub patient_id: String,
    /// Issuing doctor identifier
    #[validate(length(max = 50, message = "doctorId must be at most 50 characters"))]
    #[schema(example = "D1", max_length = 50)]
    pub doctor_id: String,
    #[schema(example = "Influenza")]
    pub diagnosis: String,
    /// First day of leave
    #[schema(example = "2024-01-10")]
    pub start_date: Option<String>,
    /// Leave duration in days, must be positive
    #[schema(example = 5)]
    pub days: i32,
}

/// Query for listing a patient's licenses
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PatientQuery {
    /// Patient RUT
    pub patient_id: Option<String>,
}

/// Verification outcome
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    pub valid: bool,
}

impl CreateLicenseRequest {
    fn into_input(self) -> AppResult<IssueLicenseInput> {
        let start_date = match self.start_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_start_date(raw)?),
        };

        Ok(IssueLicenseInput {
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            diagnosis: self.diagnosis,
            start_date,
            days: self.days,
        })
    }
}

/// Parse a start date in any accepted layout, keeping only the date part.
pub fn parse_start_date(raw: &str) -> AppResult<NaiveDate> {
    if let Some(date) = DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(raw, layout).ok())
    {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, LOCAL_DATETIME_LAYOUT) {
        return Ok(ts.date());
    }

    Err(AppError::invalid(
        Field::StartDate,
        format!("invalid startDate '{}'", raw),
    ))
}

/// Create license routes
pub fn license_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(issue_license).get(list_licenses))
        .route("/:folio", get(get_license))
        .route("/:folio/verify", get(verify_license))
}

/// Issue a new medical leave license
#[utoipa::path(
    post,
    path = "/licenses",
    tag = "Licenses",
    request_body = CreateLicenseRequest,
    responses(
        (status = 201, description = "License issued", body = LicenseResponse),
        (status = 400, description = "Missing or invalid field"),
        (status = 500, description = "Unexpected failure")
    )
)]
pub async fn issue_license(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateLicenseRequest>,
) -> AppResult<(StatusCode, Json<LicenseResponse>)> {
    let input = payload.into_input()?;
    let ctx = state.request_context();

    let license = state.licenses.issue_license(&ctx, input).await?;

    Ok((StatusCode::CREATED, Json(license)))
}

/// List all licenses of a patient, newest first
#[utoipa::path(
    get,
    path = "/licenses",
    tag = "Licenses",
    params(PatientQuery),
    responses(
        (status = 200, description = "Licenses of the patient", body = Vec<LicenseResponse>),
        (status = 400, description = "patientId missing")
    )
)]
pub async fn list_licenses(
    State(state): State<AppState>,
    Query(query): Query<PatientQuery>,
) -> AppResult<Json<Vec<LicenseResponse>>> {
    let patient_id = query.patient_id.unwrap_or_default();
    let ctx = state.request_context();

    let licenses = state
        .licenses
        .list_patient_licenses(&ctx, &patient_id)
        .await?;

    Ok(Json(licenses))
}

/// Get a license by folio
#[utoipa::path(
    get,
    path = "/licenses/{folio}",
    tag = "Licenses",
    params(("folio" = String, Path, description = "License folio")),
    responses(
        (status = 200, description = "License found", body = LicenseResponse),
        (status = 404, description = "No license with this folio")
    )
)]
pub async fn get_license(
    State(state): State<AppState>,
    Path(folio): Path<String>,
) -> AppResult<Json<LicenseResponse>> {
    let ctx = state.request_context();
    let license = state.licenses.get_license(&ctx, &folio).await?;
    Ok(Json(license))
}

/// Check that a folio names a currently issued license
#[utoipa::path(
    get,
    path = "/licenses/{folio}/verify",
    tag = "Licenses",
    params(("folio" = String, Path, description = "License folio")),
    responses(
        (status = 200, description = "License is issued", body = VerifyResponse),
        (status = 404, description = "Unknown folio or license no longer issued", body = VerifyResponse)
    )
)]
pub async fn verify_license(
    State(state): State<AppState>,
    Path(folio): Path<String>,
) -> AppResult<(StatusCode, Json<VerifyResponse>)> {
    let ctx = state.request_context();
    let valid = state.licenses.verify_license(&ctx, &folio).await?;

    let status = if valid {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    Ok((status, Json(VerifyResponse { valid })))
}
