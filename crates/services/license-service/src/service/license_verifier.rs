//! Authenticity check for a folio.

use std::sync::Arc;

use tracing::{info, info_span, Instrument, Span};

use common::{AppError, AppResult};
use domain::{Field, LicenseStatus};

use crate::context::RequestContext;
use crate::repository::LicenseRepository;

/// Answers whether a folio names a license that is currently issued.
pub struct LicenseVerifier {
    repo: Arc<dyn LicenseRepository>,
    span: Span,
}

impl LicenseVerifier {
    pub fn new(repo: Arc<dyn LicenseRepository>) -> Self {
        Self::with_span(repo, info_span!("verify_license"))
    }

    pub fn with_span(repo: Arc<dyn LicenseRepository>, span: Span) -> Self {
        Self { repo, span }
    }

    /// `Ok(false)` covers both unknown folios and licenses no longer issued.
    pub async fn execute(&self, ctx: &RequestContext, folio: &str) -> AppResult<bool> {
        self.run(ctx, folio).instrument(self.span.clone()).await
    }

    async fn run(&self, ctx: &RequestContext, folio: &str) -> AppResult<bool> {
        if folio.trim().is_empty() {
            return Err(AppError::missing(Field::Folio));
        }
        ctx.ensure_active()?;

        let valid = self
            .repo
            .exists_by_folio_and_status(ctx, folio, LicenseStatus::Issued)
            .await?;

        info!(folio, valid, "license verification");
        Ok(valid)
    }
}
