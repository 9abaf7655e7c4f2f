//! Single-license lookup.

use std::sync::Arc;

use tracing::{debug, info_span, warn, Instrument, Span};

use common::{AppError, AppResult, OptionExt};
use domain::{Field, LicenseResponse};

use crate::context::RequestContext;
use crate::repository::LicenseRepository;

/// Fetches one license by folio.
pub struct LicenseRetriever {
    repo: Arc<dyn LicenseRepository>,
    span: Span,
}

impl LicenseRetriever {
    pub fn new(repo: Arc<dyn LicenseRepository>) -> Self {
        Self::with_span(repo, info_span!("get_license"))
    }

    pub fn with_span(repo: Arc<dyn LicenseRepository>, span: Span) -> Self {
        Self { repo, span }
    }

    /// Stored licenses are returned as-is, whatever their status.
    pub async fn execute(&self, ctx: &RequestContext, folio: &str) -> AppResult<LicenseResponse> {
        self.run(ctx, folio).instrument(self.span.clone()).await
    }

    async fn run(&self, ctx: &RequestContext, folio: &str) -> AppResult<LicenseResponse> {
        if folio.trim().is_empty() {
            return Err(AppError::missing(Field::Folio));
        }
        ctx.ensure_active()?;

        let license = self
            .repo
            .find_by_folio(ctx, folio)
            .await?
            .ok_or_not_found("License")
            .map_err(|e| {
                warn!(folio, "license not found");
                e
            })?;

        debug!(folio, status = %license.status, "license retrieved");
        Ok(LicenseResponse::from(license))
    }
}
