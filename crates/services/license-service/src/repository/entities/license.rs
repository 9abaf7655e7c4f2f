//! License database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{DomainError, License};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "licenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub folio: String,
    pub patient_id: String,
    pub doctor_id: String,
    #[sea_orm(column_type = "Text")]
    pub diagnosis: String,
    pub start_date: Date,
    pub days: i32,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database row to domain entity.
///
/// Fails only when the stored status is not one the domain knows.
impl TryFrom<Model> for License {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(License {
            folio: model.folio,
            patient_id: model.patient_id,
            doctor_id: model.doctor_id,
            diagnosis: model.diagnosis,
            start_date: model.start_date,
            days: model.days,
            status: model.status.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use domain::LicenseStatus;

    fn row(status: &str) -> Model {
        Model {
            id: 7,
            folio: "L-1704844800-3f9a1c2b".to_string(),
            patient_id: "12345678-9".to_string(),
            doctor_id: "D1".to_string(),
            diagnosis: "flu".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            days: 5,
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_maps_to_license() {
        let license = License::try_from(row("revoked")).unwrap();
        assert_eq!(license.folio, "L-1704844800-3f9a1c2b");
        assert_eq!(license.status, LicenseStatus::Revoked);
        assert_eq!(license.days, 5);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(License::try_from(row("archived")).is_err());
    }
}
