//! Service layer - license workflows.
//!
//! Each workflow owns a repository handle and a tracing span supplied at
//! construction. `LicenseManager` bundles them behind the `LicenseService`
//! trait consumed by the HTTP layer.

mod issue_license;
mod license_retriever;
mod license_verifier;
mod licenses_by_patient;

use std::sync::Arc;

use async_trait::async_trait;

use common::AppResult;
use domain::LicenseResponse;

use crate::context::RequestContext;
use crate::repository::LicenseRepository;

pub use issue_license::{IssueLicense, IssueLicenseInput};
pub use license_retriever::LicenseRetriever;
pub use license_verifier::LicenseVerifier;
pub use licenses_by_patient::LicensesByPatient;

/// License service trait for dependency injection.
#[async_trait]
pub trait LicenseService: Send + Sync {
    /// Validate and persist a new license
    async fn issue_license(
        &self,
        ctx: &RequestContext,
        input: IssueLicenseInput,
    ) -> AppResult<LicenseResponse>;

    /// Fetch a license by folio
    async fn get_license(&self, ctx: &RequestContext, folio: &str) -> AppResult<LicenseResponse>;

    /// True only if the folio exists and is currently issued
    async fn verify_license(&self, ctx: &RequestContext, folio: &str) -> AppResult<bool>;

    /// All licenses of a patient, newest first
    async fn list_patient_licenses(
        &self,
        ctx: &RequestContext,
        patient_id: &str,
    ) -> AppResult<Vec<LicenseResponse>>;
}

/// Concrete implementation of LicenseService over a repository.
pub struct LicenseManager {
    issue: IssueLicense,
    retriever: LicenseRetriever,
    verifier: LicenseVerifier,
    by_patient: LicensesByPatient,
}

impl LicenseManager {
    pub fn new(repo: Arc<dyn LicenseRepository>) -> Self {
        Self {
            issue: IssueLicense::new(repo.clone()),
            retriever: LicenseRetriever::new(repo.clone()),
            verifier: LicenseVerifier::new(repo.clone()),
            by_patient: LicensesByPatient::new(repo),
        }
    }
}

#[async_trait]
impl LicenseService for LicenseManager {
    async fn issue_license(
        &self,
        ctx: &RequestContext,
        input: IssueLicenseInput,
    ) -> AppResult<LicenseResponse> {
        self.issue.execute(ctx, input).await
    }

    async fn get_license(&self, ctx: &RequestContext, folio: &str) -> AppResult<LicenseResponse> {
        self.retriever.execute(ctx, folio).await
    }

    async fn verify_license(&self, ctx: &RequestContext, folio: &str) -> AppResult<bool> {
        self.verifier.execute(ctx, folio).await
    }

    async fn list_patient_licenses(
        &self,
        ctx: &RequestContext,
        patient_id: &str,
    ) -> AppResult<Vec<LicenseResponse>> {
        self.by_patient.execute(ctx, patient_id).await
    }
}
