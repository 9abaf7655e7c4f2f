//! Patient license history.

use std::sync::Arc;

use tracing::{debug, info_span, Instrument, Span};

use common::{AppError, AppResult};
use domain::{Field, LicenseResponse};

use crate::context::RequestContext;
use crate::repository::LicenseRepository;

/// Lists every license issued to a patient.
pub struct LicensesByPatient {
    repo: Arc<dyn LicenseRepository>,
    span: Span,
}

impl LicensesByPatient {
    pub fn new(repo: Arc<dyn LicenseRepository>) -> Self {
        Self::with_span(repo, info_span!("list_patient_licenses"))
    }

    pub fn with_span(repo: Arc<dyn LicenseRepository>, span: Span) -> Self {
        Self { repo, span }
    }

    /// Newest first. A patient with no licenses yields an empty list.
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        patient_id: &str,
    ) -> AppResult<Vec<LicenseResponse>> {
        self.run(ctx, patient_id).instrument(self.span.clone()).await
    }

    async fn run(
        &self,
        ctx: &RequestContext,
        patient_id: &str,
    ) -> AppResult<Vec<LicenseResponse>> {
        if patient_id.trim().is_empty() {
            return Err(AppError::missing(Field::PatientId));
        }
        ctx.ensure_active()?;

        let licenses = self.repo.find_by_patient_id(ctx, patient_id).await?;
        debug!(patient_id, count = licenses.len(), "patient licenses listed");

        Ok(licenses.into_iter().map(LicenseResponse::from).collect())
    }
}
