//! Initial database migration.
//!
//! Creates users, the property portfolio, tenants, contracts, invoices and
//! termination requests.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: USERS AND PORTFOLIO
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(Users::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(Users::Phone).string_len(32))
                    .col(ColumnDef::new(Users::Role).string_len(32).not_null())
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Properties::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Properties::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Properties::Address).text().not_null())
                    .col(timestamp(Properties::CreatedAt))
                    .col(timestamp(Properties::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PropertyAssignments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PropertyAssignments::UserId).uuid().not_null())
                    .col(ColumnDef::new(PropertyAssignments::PropertyId).uuid().not_null())
                    .col(timestamp(PropertyAssignments::CreatedAt))
                    .primary_key(
                        Index::create()
                            .col(PropertyAssignments::UserId)
                            .col(PropertyAssignments::PropertyId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PropertyAssignments::Table, PropertyAssignments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PropertyAssignments::Table, PropertyAssignments::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Units::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Units::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Units::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(Units::UnitNumber).string_len(32).not_null())
                    .col(ColumnDef::new(Units::Status).string_len(32).not_null())
                    .col(timestamp(Units::CreatedAt))
                    .col(timestamp(Units::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Units::Table, Units::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_units_property_number")
                    .table(Units::Table)
                    .col(Units::PropertyId)
                    .col(Units::UnitNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: TENANTS AND CONTRACTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tenants::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tenants::UserId).uuid())
                    .col(ColumnDef::new(Tenants::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(Tenants::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(Tenants::Email).string_len(255))
                    .col(timestamp(Tenants::CreatedAt))
                    .col(timestamp(Tenants::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tenants::Table, Tenants::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contracts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Contracts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Contracts::Reference).string_len(64).not_null().unique_key())
                    .col(ColumnDef::new(Contracts::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Contracts::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(Contracts::Status).string_len(32).not_null())
                    .col(ColumnDef::new(Contracts::MonthlyRentCents).big_integer().not_null())
                    .col(ColumnDef::new(Contracts::AdvancePaymentCents).big_integer().not_null())
                    .col(ColumnDef::new(Contracts::StartDate).date().not_null())
                    .col(ColumnDef::new(Contracts::EndDate).date().not_null())
                    .col(ColumnDef::new(Contracts::TerminatedAt).timestamp_with_time_zone())
                    .col(timestamp(Contracts::CreatedAt))
                    .col(timestamp(Contracts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Contracts::Table, Contracts::TenantId)
                            .to(Tenants::Table, Tenants::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Contracts::Table, Contracts::PropertyId)
                            .to(Properties::Table, Properties::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContractUnits::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ContractUnits::ContractId).uuid().not_null())
                    .col(ColumnDef::new(ContractUnits::UnitId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(ContractUnits::ContractId)
                            .col(ContractUnits::UnitId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ContractUnits::Table, ContractUnits::ContractId)
                            .to(Contracts::Table, Contracts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ContractUnits::Table, ContractUnits::UnitId)
                            .to(Units::Table, Units::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Invoices::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Invoices::ContractId).uuid().not_null())
                    .col(ColumnDef::new(Invoices::AmountCents).big_integer().not_null())
                    .col(
                        ColumnDef::new(Invoices::AdvanceAppliedCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(timestamp(Invoices::IssuedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Invoices::Table, Invoices::ContractId)
                            .to(Contracts::Table, Contracts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: TERMINATION WORKFLOW
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(TerminationRequests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TerminationRequests::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TerminationRequests::ContractId).uuid().not_null())
                    .col(ColumnDef::new(TerminationRequests::RequestedBy).uuid().not_null())
                    .col(ColumnDef::new(TerminationRequests::Reason).text().not_null())
                    .col(
                        ColumnDef::new(TerminationRequests::RefundAmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TerminationRequests::BankName).string_len(255))
                    .col(ColumnDef::new(TerminationRequests::AccountName).string_len(255))
                    .col(ColumnDef::new(TerminationRequests::AccountNumber).string_len(34))
                    .col(ColumnDef::new(TerminationRequests::Status).string_len(32).not_null())
                    .col(ColumnDef::new(TerminationRequests::AccountantApprovedBy).uuid())
                    .col(ColumnDef::new(TerminationRequests::AccountantApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(TerminationRequests::OwnerApprovedBy).uuid())
                    .col(ColumnDef::new(TerminationRequests::OwnerApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(TerminationRequests::CompletedBy).uuid())
                    .col(ColumnDef::new(TerminationRequests::CompletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(TerminationRequests::ReceiptReference).string_len(128))
                    .col(ColumnDef::new(TerminationRequests::RejectedBy).uuid())
                    .col(ColumnDef::new(TerminationRequests::RejectedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(TerminationRequests::RejectionReason).text())
                    .col(timestamp(TerminationRequests::CreatedAt))
                    .col(timestamp(TerminationRequests::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(TerminationRequests::Table, TerminationRequests::ContractId)
                            .to(Contracts::Table, Contracts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TerminationRequests::Table, TerminationRequests::RequestedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_termination_requests_status")
                    .table(TerminationRequests::Table)
                    .col(TerminationRequests::Status)
                    .col(TerminationRequests::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TerminationRequests::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContractUnits::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contracts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenants::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Units::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PropertyAssignments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Properties::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

fn timestamp<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    Phone,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
    Name,
    Address,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PropertyAssignments {
    Table,
    UserId,
    PropertyId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Units {
    Table,
    Id,
    PropertyId,
    UnitNumber,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
    UserId,
    FullName,
    Phone,
    Email,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Contracts {
    Table,
    Id,
    Reference,
    TenantId,
    PropertyId,
    Status,
    MonthlyRentCents,
    AdvancePaymentCents,
    StartDate,
    EndDate,
    TerminatedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ContractUnits {
    Table,
    ContractId,
    UnitId,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
    ContractId,
    AmountCents,
    AdvanceAppliedCents,
    IssuedAt,
}

#[derive(DeriveIden)]
enum TerminationRequests {
    Table,
    Id,
    ContractId,
    RequestedBy,
    Reason,
    RefundAmountCents,
    BankName,
    AccountName,
    AccountNumber,
    Status,
    AccountantApprovedBy,
    AccountantApprovedAt,
    OwnerApprovedBy,
    OwnerApprovedAt,
    CompletedBy,
    CompletedAt,
    ReceiptReference,
    RejectedBy,
    RejectedAt,
    RejectionReason,
    CreatedAt,
    UpdatedAt,
}
