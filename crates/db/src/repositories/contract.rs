//! Contracts, their units and the invoices that draw on the advance.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

use estatedesk_core::termination::{ContractStatus as CoreContractStatus, RefundCalculator};

use crate::entities::{
    contract_units, contracts, invoices,
    sea_orm_active_enums::{ContractStatus, UnitStatus},
    units,
};

/// Errors raised while writing contracts.
#[derive(Debug, Error)]
pub enum ContractError {
    /// A contract must let at least one unit.
    #[error("Contract must include at least one unit")]
    NoUnits,

    /// Unit does not exist or belongs to another property.
    #[error("Unit not found on property: {0}")]
    UnitNotFound(Uuid),

    /// Unit is already let or under maintenance.
    #[error("Unit {0} is not available")]
    UnitUnavailable(Uuid),

    /// Amounts must not be negative.
    #[error("{0} must not be negative")]
    NegativeAmount(&'static str),

    /// Contract not found.
    #[error("Contract not found: {0}")]
    ContractNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Fields for a new contract.
#[derive(Debug, Clone)]
pub struct CreateContractInput {
    /// Caller-visible contract code, unique.
    pub reference: String,
    /// Tenant holding the contract.
    pub tenant_id: Uuid,
    /// Property the units belong to.
    pub property_id: Uuid,
    /// Units let by the contract.
    pub unit_ids: Vec<Uuid>,
    /// Initial status.
    pub status: CoreContractStatus,
    /// Rent per month in minor units.
    pub monthly_rent_cents: i64,
    /// Advance paid at signing in minor units.
    pub advance_payment_cents: i64,
    /// First day of the lease.
    pub start_date: NaiveDate,
    /// Last day of the lease.
    pub end_date: NaiveDate,
}

/// Repository for contracts.
#[derive(Debug, Clone)]
pub struct ContractRepository {
    db: DatabaseConnection,
}

impl ContractRepository {
    /// Creates a new contract repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a contract and binds its units.
    ///
    /// Units must be available and belong to the contract's property. An
    /// active contract marks its units occupied.
    ///
    /// # Errors
    ///
    /// Returns a `ContractError` if validation or the database write fails.
    pub async fn create(
        &self,
        input: CreateContractInput,
    ) -> Result<contracts::Model, ContractError> {
        if input.unit_ids.is_empty() {
            return Err(ContractError::NoUnits);
        }
        if input.monthly_rent_cents < 0 {
            return Err(ContractError::NegativeAmount("monthly_rent"));
        }
        if input.advance_payment_cents < 0 {
            return Err(ContractError::NegativeAmount("advance_payment"));
        }

        let txn = self.db.begin().await?;

        for unit_id in &input.unit_ids {
            let unit = units::Entity::find_by_id(*unit_id)
                .filter(units::Column::PropertyId.eq(input.property_id))
                .one(&txn)
                .await?
                .ok_or(ContractError::UnitNotFound(*unit_id))?;
            if unit.status != UnitStatus::Available {
                return Err(ContractError::UnitUnavailable(*unit_id));
            }
        }

        let now = chrono::Utc::now().into();
        let contract = contracts::ActiveModel {
            id: Set(Uuid::new_v4()),
            reference: Set(input.reference.trim().to_string()),
            tenant_id: Set(input.tenant_id),
            property_id: Set(input.property_id),
            status: Set(input.status.into()),
            monthly_rent_cents: Set(input.monthly_rent_cents),
            advance_payment_cents: Set(input.advance_payment_cents),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            terminated_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        for unit_id in &input.unit_ids {
            contract_units::ActiveModel {
                contract_id: Set(contract.id),
                unit_id: Set(*unit_id),
            }
            .insert(&txn)
            .await?;
        }

        if contract.status == ContractStatus::Active {
            units::Entity::update_many()
                .set(units::ActiveModel {
                    status: Set(UnitStatus::Occupied),
                    updated_at: Set(now),
                    ..Default::default()
                })
                .filter(units::Column::Id.is_in(input.unit_ids.clone()))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;

        tracing::info!(
            contract_id = %contract.id,
            reference = %contract.reference,
            units = input.unit_ids.len(),
            "Contract created"
        );

        Ok(contract)
    }

    /// Finds a contract by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<contracts::Model>, DbErr> {
        contracts::Entity::find_by_id(id).one(&self.db).await
    }

    /// Records an invoice against a contract.
    ///
    /// # Errors
    ///
    /// Returns a `ContractError` if the contract does not exist, an amount is
    /// negative, or the insert fails.
    pub async fn record_invoice(
        &self,
        contract_id: Uuid,
        amount_cents: i64,
        advance_applied_cents: i64,
    ) -> Result<invoices::Model, ContractError> {
        if amount_cents < 0 {
            return Err(ContractError::NegativeAmount("amount"));
        }
        if advance_applied_cents < 0 {
            return Err(ContractError::NegativeAmount("advance_applied"));
        }
        if self.find_by_id(contract_id).await?.is_none() {
            return Err(ContractError::ContractNotFound(contract_id));
        }

        let invoice = invoices::ActiveModel {
            id: Set(Uuid::new_v4()),
            contract_id: Set(contract_id),
            amount_cents: Set(amount_cents),
            advance_applied_cents: Set(advance_applied_cents),
            issued_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        Ok(invoice)
    }
}

/// Advance still held for the contract, in minor units.
///
/// Runs on any connection so callers can read it inside their transaction.
pub(crate) async fn remaining_advance_cents<C: ConnectionTrait>(
    conn: &C,
    contract: &contracts::Model,
) -> Result<i64, DbErr> {
    let applied = invoices::Entity::find()
        .filter(invoices::Column::ContractId.eq(contract.id))
        .all(conn)
        .await?;

    Ok(RefundCalculator::remaining_advance_cents(
        contract.advance_payment_cents,
        applied.into_iter().map(|invoice| invoice.advance_applied_cents),
    ))
}
