//! License repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::{debug, error};

use super::entities::license::{self, ActiveModel, Entity as LicenseEntity};
use crate::context::RequestContext;
use common::{AppError, AppResult};
use domain::{License, LicenseStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// License repository trait for dependency injection.
///
/// Absence is never an error: lookups return `Ok(None)` or an empty list.
/// `save` reports a duplicate folio as `AppError::Conflict` so callers can
/// tell it apart from any other storage failure.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LicenseRepository: Send + Sync {
    /// Persist a new license
    async fn save(&self, ctx: &RequestContext, license: &License) -> AppResult<()>;

    /// Find a license by its certificate number
    async fn find_by_folio(&self, ctx: &RequestContext, folio: &str) -> AppResult<Option<License>>;

    /// All licenses of a patient, most recently created first
    async fn find_by_patient_id(
        &self,
        ctx: &RequestContext,
        patient_id: &str,
    ) -> AppResult<Vec<License>>;

    /// Check whether a license with this folio is in the given status
    async fn exists_by_folio_and_status(
        &self,
        ctx: &RequestContext,
        folio: &str,
        status: LicenseStatus,
    ) -> AppResult<bool>;
}

/// PostgreSQL implementation of LicenseRepository
pub struct LicenseStore {
    db: DatabaseConnection,
}

impl LicenseStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Split unique-constraint violations from other insert failures.
fn classify_insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::conflict("License with this folio")
        }
        _ => AppError::from(err),
    }
}

fn to_domain(model: license::Model) -> AppResult<License> {
    let folio = model.folio.clone();
    License::try_from(model).map_err(|e| {
        error!(folio = %folio, error = %e, "stored license row is not a valid license");
        AppError::internal(format!("corrupt license row {}: {}", folio, e))
    })
}

#[async_trait]
impl LicenseRepository for LicenseStore {
    async fn save(&self, ctx: &RequestContext, license: &License) -> AppResult<()> {
        let active_model = ActiveModel {
            id: NotSet,
            folio: Set(license.folio.clone()),
            patient_id: Set(license.patient_id.clone()),
            doctor_id: Set(license.doctor_id.clone()),
            diagnosis: Set(license.diagnosis.clone()),
            start_date: Set(license.start_date),
            days: Set(license.days),
            status: Set(license.status.to_string()),
            created_at: Set(chrono::Utc::now()),
        };

        let model = ctx
            .bound(async {
                active_model
                    .insert(&self.db)
                    .await
                    .map_err(classify_insert_error)
            })
            .await?;

        debug!(id = model.id, folio = %model.folio, "license row inserted");
        Ok(())
    }

    async fn find_by_folio(&self, ctx: &RequestContext, folio: &str) -> AppResult<Option<License>> {
        let result = ctx
            .bound(async {
                LicenseEntity::find()
                    .filter(license::Column::Folio.eq(folio))
                    .one(&self.db)
                    .await
                    .map_err(AppError::from)
            })
            .await?;

        result.map(to_domain).transpose()
    }

    async fn find_by_patient_id(
        &self,
        ctx: &RequestContext,
        patient_id: &str,
    ) -> AppResult<Vec<License>> {
        let models = ctx
            .bound(async {
                LicenseEntity::find()
                    .filter(license::Column::PatientId.eq(patient_id))
                    .order_by_desc(license::Column::CreatedAt)
                    .order_by_desc(license::Column::Id)
                    .all(&self.db)
                    .await
                    .map_err(AppError::from)
            })
            .await?;

        models.into_iter().map(to_domain).collect()
    }

    async fn exists_by_folio_and_status(
        &self,
        ctx: &RequestContext,
        folio: &str,
        status: LicenseStatus,
    ) -> AppResult<bool> {
        let count = ctx
            .bound(async {
                LicenseEntity::find()
                    .filter(license::Column::Folio.eq(folio))
                    .filter(license::Column::Status.eq(status.as_str()))
                    .count(&self.db)
                    .await
                    .map_err(AppError::from)
            })
            .await?;

        Ok(count > 0)
    }
}
