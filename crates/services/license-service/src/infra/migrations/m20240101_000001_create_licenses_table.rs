//! Migration: Create licenses table.

use domain::{MAX_IDENTIFIER_LENGTH, STATUS_ISSUED};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Licenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Licenses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Licenses::Folio)
                            .string_len(MAX_IDENTIFIER_LENGTH)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Licenses::PatientId)
                            .string_len(MAX_IDENTIFIER_LENGTH)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Licenses::DoctorId)
                            .string_len(MAX_IDENTIFIER_LENGTH)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Licenses::Diagnosis).text().not_null())
                    .col(ColumnDef::new(Licenses::StartDate).date().not_null())
                    .col(
                        ColumnDef::new(Licenses::Days)
                            .integer()
                            .not_null()
                            .check(Expr::col(Licenses::Days).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Licenses::Status)
                            .string_len(20)
                            .not_null()
                            .default(STATUS_ISSUED),
                    )
                    .col(
                        ColumnDef::new(Licenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Patient history lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_licenses_patient_id")
                    .table(Licenses::Table)
                    .col(Licenses::PatientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_licenses_patient_id")
                    .table(Licenses::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Licenses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Licenses {
    Table,
    Id,
    Folio,
    PatientId,
    DoctorId,
    Diagnosis,
    StartDate,
    Days,
    Status,
    CreatedAt,
}
