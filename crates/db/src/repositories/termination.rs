//! Termination repository: persists workflow transitions.
//!
//! Every operation runs in one database transaction. The workflow decision
//! is made by [`TerminationWorkflow`] from the statuses read inside that
//! transaction, and every status write is conditional on the status that was
//! read, so a concurrent transition turns the write into a no-op that is
//! reported as `InvalidState` and rolled back.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, SqlErr,
    TransactionTrait, prelude::DateTimeWithTimeZone, sea_query::JoinType,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use estatedesk_core::auth::{
    AccessPolicy, CallerContext, ResourceScope, TerminationOperation, Visibility,
};
use estatedesk_core::termination::{
    BankDetails, BlockingState, ContractEffect, ContractStatus as CoreContractStatus, Entity,
    RefundCalculator, TerminationAction, TerminationError, TerminationInput,
    TerminationStatus as CoreTerminationStatus, TerminationWorkflow,
    UnitStatus as CoreUnitStatus,
};
use estatedesk_shared::PublicUser;
use estatedesk_shared::types::pagination::{PageRequest, PageResponse};

use crate::entities::{
    contract_units, contracts, properties,
    sea_orm_active_enums::{ContractStatus, TerminationStatus, UnitStatus},
    tenants, termination_requests, units, users,
};

use super::contract::remaining_advance_cents;
use super::user::public_user;

const OPEN_REQUEST_CONFLICT: &str = "An open termination request already exists for this contract";

/// Filters for listing termination requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminationFilter {
    /// Only requests in this status.
    pub status: Option<CoreTerminationStatus>,
    /// Only requests for this contract.
    pub contract_id: Option<Uuid>,
}

/// A unit bound to the contract.
#[derive(Debug, Clone, Serialize)]
pub struct UnitSummary {
    /// Unit ID.
    pub id: Uuid,
    /// Unit number within the property.
    pub unit_number: String,
    /// Current occupancy.
    pub status: CoreUnitStatus,
}

/// The contract a request terminates.
#[derive(Debug, Clone, Serialize)]
pub struct ContractSummary {
    /// Contract ID.
    pub id: Uuid,
    /// Caller-visible contract code.
    pub reference: String,
    /// Current contract status.
    pub status: CoreContractStatus,
    /// Rent per month.
    pub monthly_rent: Decimal,
    /// Advance paid at signing.
    pub advance_payment: Decimal,
    /// Lease start.
    pub start_date: NaiveDate,
    /// Lease end.
    pub end_date: NaiveDate,
    /// Set once the contract is terminated.
    pub terminated_at: Option<DateTime<Utc>>,
    /// Units let by the contract.
    pub units: Vec<UnitSummary>,
}

/// The tenant holding the contract.
#[derive(Debug, Clone, Serialize)]
pub struct TenantSummary {
    /// Tenant ID.
    pub id: Uuid,
    /// Full name.
    pub full_name: String,
    /// Phone used for notices.
    pub phone: String,
}

/// The property of the contract.
#[derive(Debug, Clone, Serialize)]
pub struct PropertySummary {
    /// Property ID.
    pub id: Uuid,
    /// Property name.
    pub name: String,
}

/// A termination request with its related records.
#[derive(Debug, Clone, Serialize)]
pub struct TerminationDetail {
    /// Request ID.
    pub id: Uuid,
    /// Current status.
    pub status: CoreTerminationStatus,
    /// Why termination was requested.
    pub reason: String,
    /// Remaining advance when the request was opened.
    pub refund_amount: Decimal,
    /// Refund destination, if supplied.
    pub bank_details: Option<BankDetails>,
    /// The contract.
    pub contract: ContractSummary,
    /// The tenant.
    pub tenant: TenantSummary,
    /// The property.
    pub property: PropertySummary,
    /// Who opened the request.
    pub requested_by: PublicUser,
    /// Accountant approval.
    pub accountant_approved_by: Option<Uuid>,
    /// When the accountant approved.
    pub accountant_approved_at: Option<DateTime<Utc>>,
    /// Owner approval.
    pub owner_approved_by: Option<Uuid>,
    /// When the owner approved.
    pub owner_approved_at: Option<DateTime<Utc>>,
    /// Who recorded completion.
    pub completed_by: Option<Uuid>,
    /// When it was completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Refund payment receipt.
    pub receipt_reference: Option<String>,
    /// Who rejected.
    pub rejected_by: Option<Uuid>,
    /// When it was rejected.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Why it was rejected.
    pub rejection_reason: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

/// Termination repository for workflow state transitions.
#[derive(Debug, Clone)]
pub struct TerminationRepository {
    db: DatabaseConnection,
}

impl TerminationRepository {
    /// Creates a new termination repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a termination request and moves the contract to
    /// pending termination.
    ///
    /// The refund amount is a snapshot of the remaining advance.
    ///
    /// # Errors
    ///
    /// Checked in order: `NotFound` (contract), `Unauthorized`, `Validation`,
    /// `Conflict` (open request exists), `InvalidState` (contract not active).
    pub async fn create_request(
        &self,
        caller: &CallerContext,
        contract_id: Uuid,
        input: &TerminationInput,
    ) -> Result<TerminationDetail, TerminationError> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let contract = contracts::Entity::find_by_id(contract_id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(TerminationError::NotFound(Entity::Contract))?;

        authorize(caller, TerminationOperation::Create, &contract)?;

        let has_open_request = termination_requests::Entity::find()
            .filter(termination_requests::Column::ContractId.eq(contract_id))
            .filter(termination_requests::Column::Status.is_in(open_statuses()))
            .count(&txn)
            .await
            .map_err(db_error)?
            > 0;

        let refund_cents = remaining_advance_cents(&txn, &contract)
            .await
            .map_err(db_error)?;

        let action = TerminationWorkflow::request(
            contract.status.into(),
            has_open_request,
            input,
            caller.user_id(),
            RefundCalculator::to_decimal(refund_cents),
        )?;
        let contract_effect = action.contract_effect();
        let TerminationAction::Request {
            new_status,
            requested_by,
            reason,
            bank_details,
            ..
        } = action
        else {
            return Err(TerminationError::Internal(
                "workflow returned a non-request action".to_string(),
            ));
        };

        let now: DateTimeWithTimeZone = Utc::now().into();
        let request_id = Uuid::new_v4();
        let (bank_name, account_name, account_number) = match bank_details {
            Some(details) => (
                Some(details.bank_name),
                Some(details.account_name),
                Some(details.account_number),
            ),
            None => (None, None, None),
        };

        termination_requests::ActiveModel {
            id: Set(request_id),
            contract_id: Set(contract_id),
            requested_by: Set(requested_by),
            reason: Set(reason),
            refund_amount_cents: Set(refund_cents),
            bank_name: Set(bank_name),
            account_name: Set(account_name),
            account_number: Set(account_number),
            status: Set(new_status.into()),
            accountant_approved_by: Set(None),
            accountant_approved_at: Set(None),
            owner_approved_by: Set(None),
            owner_approved_at: Set(None),
            completed_by: Set(None),
            completed_at: Set(None),
            receipt_reference: Set(None),
            rejected_by: Set(None),
            rejected_at: Set(None),
            rejection_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                TerminationError::Conflict(OPEN_REQUEST_CONFLICT.to_string())
            }
            _ => db_error(e),
        })?;

        apply_contract_effect(
            &txn,
            contract_id,
            contract_effect,
            TerminationOperation::Create,
            now,
        )
        .await?;

        txn.commit().await.map_err(db_error)?;

        info!(
            request_id = %request_id,
            contract_id = %contract_id,
            user_id = %caller.user_id(),
            refund_cents,
            "Termination request created"
        );

        self.load_detail(request_id).await
    }

    /// First approval, by an accountant of the property or an elevated role.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Unauthorized`, or `InvalidState` unless the request is
    /// pending.
    pub async fn accountant_approve(
        &self,
        caller: &CallerContext,
        request_id: Uuid,
    ) -> Result<TerminationDetail, TerminationError> {
        let approved_by = caller.user_id();
        self.transition(
            caller,
            request_id,
            TerminationOperation::AccountantApprove,
            |current, _| TerminationWorkflow::accountant_approve(current, approved_by),
        )
        .await
    }

    /// Second approval, by an elevated role.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Unauthorized`, or `InvalidState` unless the request is
    /// accountant-approved.
    pub async fn owner_approve(
        &self,
        caller: &CallerContext,
        request_id: Uuid,
    ) -> Result<TerminationDetail, TerminationError> {
        let approved_by = caller.user_id();
        self.transition(
            caller,
            request_id,
            TerminationOperation::OwnerApprove,
            |current, _| TerminationWorkflow::owner_approve(current, approved_by),
        )
        .await
    }

    /// Records the refund receipt, terminates the contract and releases
    /// every unit bound to it.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Unauthorized`, `Validation` for a blank receipt, or
    /// `InvalidState` unless the request is owner-approved and the contract
    /// is pending termination.
    pub async fn complete(
        &self,
        caller: &CallerContext,
        request_id: Uuid,
        receipt_reference: &str,
    ) -> Result<TerminationDetail, TerminationError> {
        let completed_by = caller.user_id();
        self.transition(
            caller,
            request_id,
            TerminationOperation::Complete,
            |current, _| TerminationWorkflow::complete(current, completed_by, receipt_reference),
        )
        .await
    }

    /// Rejects an open request. A contract pending termination reverts to
    /// active.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Unauthorized`, `Validation` for a blank reason, or
    /// `InvalidState` if the request is completed or rejected.
    pub async fn reject(
        &self,
        caller: &CallerContext,
        request_id: Uuid,
        reason: &str,
    ) -> Result<TerminationDetail, TerminationError> {
        let rejected_by = caller.user_id();
        self.transition(
            caller,
            request_id,
            TerminationOperation::Reject,
            |current, contract_status| {
                TerminationWorkflow::reject(current, contract_status, rejected_by, reason)
            },
        )
        .await
    }

    /// Returns one request if the caller may view it.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Unauthorized`.
    pub async fn get(
        &self,
        caller: &CallerContext,
        request_id: Uuid,
    ) -> Result<TerminationDetail, TerminationError> {
        let request = termination_requests::Entity::find_by_id(request_id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(TerminationError::NotFound(Entity::TerminationRequest))?;

        let contract = contracts::Entity::find_by_id(request.contract_id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(TerminationError::NotFound(Entity::Contract))?;

        authorize(caller, TerminationOperation::View, &contract)?;

        single(hydrate(&self.db, vec![request]).await?)
    }

    /// Lists the requests visible to the caller, newest first.
    ///
    /// # Errors
    ///
    /// `Internal` if the query fails.
    pub async fn list(
        &self,
        caller: &CallerContext,
        filter: TerminationFilter,
        page: PageRequest,
    ) -> Result<PageResponse<TerminationDetail>, TerminationError> {
        let page = page.normalized();

        let mut query = termination_requests::Entity::find().join(
            JoinType::InnerJoin,
            termination_requests::Relation::Contracts.def(),
        );

        match AccessPolicy::visibility(caller) {
            Visibility::All => {}
            Visibility::Properties(property_ids) => {
                query = query.filter(contracts::Column::PropertyId.is_in(property_ids));
            }
            Visibility::Tenant(tenant_id) => {
                query = query.filter(contracts::Column::TenantId.eq(tenant_id));
            }
            Visibility::None => {
                return Ok(PageResponse::new(Vec::new(), page.page, page.per_page, 0));
            }
        }

        if let Some(status) = filter.status {
            query = query
                .filter(termination_requests::Column::Status.eq(TerminationStatus::from(status)));
        }
        if let Some(contract_id) = filter.contract_id {
            query = query.filter(termination_requests::Column::ContractId.eq(contract_id));
        }

        let paginator = query
            .order_by_desc(termination_requests::Column::CreatedAt)
            .order_by_desc(termination_requests::Column::Id)
            .paginate(&self.db, page.per_page);

        let total = paginator.num_items().await.map_err(db_error)?;
        let rows = paginator.fetch_page(page.index()).await.map_err(db_error)?;
        let data = hydrate(&self.db, rows).await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    async fn transition<F>(
        &self,
        caller: &CallerContext,
        request_id: Uuid,
        operation: TerminationOperation,
        decide: F,
    ) -> Result<TerminationDetail, TerminationError>
    where
        F: FnOnce(
            CoreTerminationStatus,
            CoreContractStatus,
        ) -> Result<TerminationAction, TerminationError>,
    {
        let txn = self.db.begin().await.map_err(db_error)?;

        let request = termination_requests::Entity::find_by_id(request_id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(TerminationError::NotFound(Entity::TerminationRequest))?;

        let contract = contracts::Entity::find_by_id(request.contract_id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(TerminationError::NotFound(Entity::Contract))?;

        authorize(caller, operation, &contract)?;

        let action = decide(request.status.into(), contract.status.into())?;
        apply_transition(&txn, &request, &action, operation, Utc::now().into()).await?;

        txn.commit().await.map_err(db_error)?;

        info!(
            request_id = %request_id,
            contract_id = %contract.id,
            user_id = %caller.user_id(),
            operation = %operation,
            status = %action.new_status(),
            "Termination request transitioned"
        );

        self.load_detail(request_id).await
    }

    async fn load_detail(&self, request_id: Uuid) -> Result<TerminationDetail, TerminationError> {
        let request = termination_requests::Entity::find_by_id(request_id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(TerminationError::NotFound(Entity::TerminationRequest))?;

        single(hydrate(&self.db, vec![request]).await?)
    }
}

fn db_error(err: DbErr) -> TerminationError {
    TerminationError::Internal(err.to_string())
}

fn open_statuses() -> Vec<TerminationStatus> {
    CoreTerminationStatus::OPEN
        .into_iter()
        .map(TerminationStatus::from)
        .collect()
}

fn single(mut details: Vec<TerminationDetail>) -> Result<TerminationDetail, TerminationError> {
    details
        .pop()
        .ok_or(TerminationError::NotFound(Entity::TerminationRequest))
}

fn authorize(
    caller: &CallerContext,
    operation: TerminationOperation,
    contract: &contracts::Model,
) -> Result<(), TerminationError> {
    let scope = ResourceScope {
        property_id: contract.property_id,
        tenant_id: contract.tenant_id,
    };

    AccessPolicy::authorize(caller, operation, &scope).map_err(|err| {
        warn!(
            user_id = %caller.user_id(),
            role = %caller.role(),
            contract_id = %contract.id,
            error = %err,
            "Termination access denied"
        );
        TerminationError::from_access(caller.role(), &err)
    })
}

/// Writes `action` to the request as it was read, then applies the contract
/// effect.
///
/// The request update only matches while the row still has the status in
/// `read`. If another writer moved it first, nothing is written and the
/// status it now has is reported as `InvalidState`.
async fn apply_transition<C: ConnectionTrait>(
    conn: &C,
    read: &termination_requests::Model,
    action: &TerminationAction,
    operation: TerminationOperation,
    now: DateTimeWithTimeZone,
) -> Result<(), TerminationError> {
    let changes = action_changes(action, now)?;

    let result = termination_requests::Entity::update_many()
        .set(changes)
        .filter(termination_requests::Column::Id.eq(read.id))
        .filter(termination_requests::Column::Status.eq(read.status))
        .exec(conn)
        .await
        .map_err(db_error)?;

    if result.rows_affected == 0 {
        return Err(stale_request(conn, read.id, operation).await);
    }

    apply_contract_effect(conn, read.contract_id, action.contract_effect(), operation, now).await
}

/// Column changes for a transition on an existing request.
fn action_changes(
    action: &TerminationAction,
    now: DateTimeWithTimeZone,
) -> Result<termination_requests::ActiveModel, TerminationError> {
    let mut changes = termination_requests::ActiveModel {
        status: Set(action.new_status().into()),
        updated_at: Set(now),
        ..Default::default()
    };

    match action {
        TerminationAction::AccountantApprove {
            approved_by,
            approved_at,
            ..
        } => {
            changes.accountant_approved_by = Set(Some(*approved_by));
            changes.accountant_approved_at = Set(Some((*approved_at).into()));
        }
        TerminationAction::OwnerApprove {
            approved_by,
            approved_at,
            ..
        } => {
            changes.owner_approved_by = Set(Some(*approved_by));
            changes.owner_approved_at = Set(Some((*approved_at).into()));
        }
        TerminationAction::Complete {
            completed_by,
            completed_at,
            receipt_reference,
            ..
        } => {
            changes.completed_by = Set(Some(*completed_by));
            changes.completed_at = Set(Some((*completed_at).into()));
            changes.receipt_reference = Set(Some(receipt_reference.clone()));
        }
        TerminationAction::Reject {
            rejected_by,
            rejected_at,
            rejection_reason,
            ..
        } => {
            changes.rejected_by = Set(Some(*rejected_by));
            changes.rejected_at = Set(Some((*rejected_at).into()));
            changes.rejection_reason = Set(Some(rejection_reason.clone()));
        }
        TerminationAction::Request { .. } => {
            return Err(TerminationError::Internal(
                "request action applied to an existing termination request".to_string(),
            ));
        }
    }

    Ok(changes)
}

/// Reports the status that beat a conditional update.
async fn stale_request<C: ConnectionTrait>(
    conn: &C,
    request_id: Uuid,
    operation: TerminationOperation,
) -> TerminationError {
    match termination_requests::Entity::find_by_id(request_id)
        .one(conn)
        .await
    {
        Ok(Some(request)) => TerminationError::InvalidState {
            operation,
            state: BlockingState::Request(request.status.into()),
        },
        Ok(None) => TerminationError::NotFound(Entity::TerminationRequest),
        Err(err) => db_error(err),
    }
}

/// Applies a transition's effect to the contract, conditional on the status
/// the effect expects. Terminating also frees every unit of the contract.
async fn apply_contract_effect<C: ConnectionTrait>(
    conn: &C,
    contract_id: Uuid,
    effect: ContractEffect,
    operation: TerminationOperation,
    now: DateTimeWithTimeZone,
) -> Result<(), TerminationError> {
    let (Some(expected), Some(target)) = (effect.expected_status(), effect.target_status()) else {
        return Ok(());
    };

    let mut changes = contracts::ActiveModel {
        status: Set(target.into()),
        updated_at: Set(now),
        ..Default::default()
    };
    if effect == ContractEffect::Terminate {
        changes.terminated_at = Set(Some(now));
    }

    let result = contracts::Entity::update_many()
        .set(changes)
        .filter(contracts::Column::Id.eq(contract_id))
        .filter(contracts::Column::Status.eq(ContractStatus::from(expected)))
        .exec(conn)
        .await
        .map_err(db_error)?;

    if result.rows_affected == 0 {
        let current = contracts::Entity::find_by_id(contract_id)
            .one(conn)
            .await
            .map_err(db_error)?
            .ok_or(TerminationError::NotFound(Entity::Contract))?;
        return Err(TerminationError::InvalidState {
            operation,
            state: BlockingState::Contract(current.status.into()),
        });
    }

    if effect == ContractEffect::Terminate {
        let unit_ids: Vec<Uuid> = contract_units::Entity::find()
            .filter(contract_units::Column::ContractId.eq(contract_id))
            .all(conn)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(|binding| binding.unit_id)
            .collect();

        units::Entity::update_many()
            .set(units::ActiveModel {
                status: Set(UnitStatus::Available),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(units::Column::Id.is_in(unit_ids))
            .exec(conn)
            .await
            .map_err(db_error)?;
    }

    Ok(())
}

/// Loads the related records for a batch of requests.
async fn hydrate<C: ConnectionTrait>(
    conn: &C,
    requests: Vec<termination_requests::Model>,
) -> Result<Vec<TerminationDetail>, TerminationError> {
    if requests.is_empty() {
        return Ok(Vec::new());
    }

    let contract_ids: Vec<Uuid> = requests.iter().map(|r| r.contract_id).collect();
    let contracts_by_id: HashMap<Uuid, contracts::Model> = contracts::Entity::find()
        .filter(contracts::Column::Id.is_in(contract_ids.clone()))
        .all(conn)
        .await
        .map_err(db_error)?
        .into_iter()
        .map(|contract| (contract.id, contract))
        .collect();

    let tenant_ids: Vec<Uuid> = contracts_by_id.values().map(|c| c.tenant_id).collect();
    let tenants_by_id: HashMap<Uuid, tenants::Model> = tenants::Entity::find()
        .filter(tenants::Column::Id.is_in(tenant_ids))
        .all(conn)
        .await
        .map_err(db_error)?
        .into_iter()
        .map(|tenant| (tenant.id, tenant))
        .collect();

    let property_ids: Vec<Uuid> = contracts_by_id.values().map(|c| c.property_id).collect();
    let properties_by_id: HashMap<Uuid, properties::Model> = properties::Entity::find()
        .filter(properties::Column::Id.is_in(property_ids))
        .all(conn)
        .await
        .map_err(db_error)?
        .into_iter()
        .map(|property| (property.id, property))
        .collect();

    let requester_ids: Vec<Uuid> = requests.iter().map(|r| r.requested_by).collect();
    let users_by_id: HashMap<Uuid, users::Model> = users::Entity::find()
        .filter(users::Column::Id.is_in(requester_ids))
        .all(conn)
        .await
        .map_err(db_error)?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    let mut units_by_contract: HashMap<Uuid, Vec<UnitSummary>> = HashMap::new();
    let bindings = contract_units::Entity::find()
        .filter(contract_units::Column::ContractId.is_in(contract_ids))
        .find_also_related(units::Entity)
        .order_by_asc(contract_units::Column::UnitId)
        .all(conn)
        .await
        .map_err(db_error)?;
    for (binding, unit) in bindings {
        if let Some(unit) = unit {
            units_by_contract
                .entry(binding.contract_id)
                .or_default()
                .push(UnitSummary {
                    id: unit.id,
                    unit_number: unit.unit_number,
                    status: unit.status.into(),
                });
        }
    }
    for units in units_by_contract.values_mut() {
        units.sort_by(|a, b| a.unit_number.cmp(&b.unit_number));
    }

    requests
        .into_iter()
        .map(|request| {
            let contract = contracts_by_id
                .get(&request.contract_id)
                .ok_or(TerminationError::NotFound(Entity::Contract))?;
            let tenant = tenants_by_id
                .get(&contract.tenant_id)
                .ok_or(TerminationError::NotFound(Entity::Tenant))?;
            let property = properties_by_id
                .get(&contract.property_id)
                .ok_or(TerminationError::NotFound(Entity::Property))?;
            let requester = users_by_id
                .get(&request.requested_by)
                .ok_or(TerminationError::NotFound(Entity::User))?;
            let units = units_by_contract
                .get(&contract.id)
                .cloned()
                .unwrap_or_default();

            Ok(build_detail(request, contract, tenant, property, requester, units))
        })
        .collect()
}

fn build_detail(
    request: termination_requests::Model,
    contract: &contracts::Model,
    tenant: &tenants::Model,
    property: &properties::Model,
    requester: &users::Model,
    units: Vec<UnitSummary>,
) -> TerminationDetail {
    let bank_details = match (request.bank_name, request.account_name, request.account_number) {
        (Some(bank_name), Some(account_name), Some(account_number)) => Some(BankDetails {
            bank_name,
            account_name,
            account_number,
        }),
        _ => None,
    };

    TerminationDetail {
        id: request.id,
        status: request.status.into(),
        reason: request.reason,
        refund_amount: RefundCalculator::to_decimal(request.refund_amount_cents),
        bank_details,
        contract: ContractSummary {
            id: contract.id,
            reference: contract.reference.clone(),
            status: contract.status.into(),
            monthly_rent: RefundCalculator::to_decimal(contract.monthly_rent_cents),
            advance_payment: RefundCalculator::to_decimal(contract.advance_payment_cents),
            start_date: contract.start_date,
            end_date: contract.end_date,
            terminated_at: contract.terminated_at.map(utc),
            units,
        },
        tenant: TenantSummary {
            id: tenant.id,
            full_name: tenant.full_name.clone(),
            phone: tenant.phone.clone(),
        },
        property: PropertySummary {
            id: property.id,
            name: property.name.clone(),
        },
        requested_by: public_user(requester),
        accountant_approved_by: request.accountant_approved_by,
        accountant_approved_at: request.accountant_approved_at.map(utc),
        owner_approved_by: request.owner_approved_by,
        owner_approved_at: request.owner_approved_at.map(utc),
        completed_by: request.completed_by,
        completed_at: request.completed_at.map(utc),
        receipt_reference: request.receipt_reference,
        rejected_by: request.rejected_by,
        rejected_at: request.rejected_at.map(utc),
        rejection_reason: request.rejection_reason,
        created_at: utc(request.created_at),
        updated_at: utc(request.updated_at),
    }
}

fn utc(value: DateTimeWithTimeZone) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use estatedesk_core::auth::Role;
    use sea_orm::{ConnectOptions, Database};

    use crate::migration::{Migrator, MigratorTrait};
    use crate::repositories::{
        CallerRepository, ContractRepository, CreateContractInput, CreateTenantInput,
        CreateUserInput, PropertyRepository, TenantRepository, UserRepository,
    };

    struct Fixture {
        db: DatabaseConnection,
        admin: CallerContext,
        contract_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let properties = PropertyRepository::new(db.clone());
        let property = properties
            .create_property("Bole Heights", "Bole Road 12")
            .await
            .unwrap();
        let mut unit_ids = Vec::new();
        for number in ["A-01", "A-02"] {
            unit_ids.push(properties.create_unit(property.id, number).await.unwrap().id);
        }

        let admin = UserRepository::new(db.clone())
            .create(CreateUserInput {
                email: "admin@estatedesk.test".to_string(),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$fixture$fixture".to_string(),
                full_name: "System Admin".to_string(),
                phone: None,
                role: Role::SystemAdmin,
            })
            .await
            .unwrap();
        let tenant = TenantRepository::new(db.clone())
            .create(CreateTenantInput {
                user_id: None,
                full_name: "Selam Tesfaye".to_string(),
                phone: "+251911223344".to_string(),
                email: None,
            })
            .await
            .unwrap();
        let contract = ContractRepository::new(db.clone())
            .create(CreateContractInput {
                reference: "CTR-0001".to_string(),
                tenant_id: tenant.id,
                property_id: property.id,
                unit_ids,
                status: CoreContractStatus::Active,
                monthly_rent_cents: 100_000,
                advance_payment_cents: 300_000,
                start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            })
            .await
            .unwrap();

        let (_, admin) = CallerRepository::new(db.clone())
            .resolve(admin.id)
            .await
            .unwrap()
            .unwrap();

        Fixture {
            db,
            admin,
            contract_id: contract.id,
        }
    }

    async fn open_request(f: &Fixture) -> Uuid {
        let input = TerminationInput {
            reason: "relocation".to_string(),
            bank_details: None,
        };
        TerminationRepository::new(f.db.clone())
            .create_request(&f.admin, f.contract_id, &input)
            .await
            .unwrap()
            .id
    }

    async fn read_request(db: &DatabaseConnection, id: Uuid) -> termination_requests::Model {
        termination_requests::Entity::find_by_id(id)
            .one(db)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_complete_on_stale_read_writes_nothing() {
        let f = fixture().await;
        let repo = TerminationRepository::new(f.db.clone());
        let id = open_request(&f).await;
        repo.accountant_approve(&f.admin, id).await.unwrap();
        repo.owner_approve(&f.admin, id).await.unwrap();

        // Read while owner-approved, then another writer rejects first.
        let read = read_request(&f.db, id).await;
        repo.reject(&f.admin, id, "tenant withdrew").await.unwrap();

        let action =
            TerminationWorkflow::complete(read.status.into(), f.admin.user_id(), "R1").unwrap();
        let txn = f.db.begin().await.unwrap();
        let result = apply_transition(
            &txn,
            &read,
            &action,
            TerminationOperation::Complete,
            Utc::now().into(),
        )
        .await;
        txn.rollback().await.unwrap();

        assert!(matches!(
            result,
            Err(TerminationError::InvalidState {
                operation: TerminationOperation::Complete,
                state: BlockingState::Request(CoreTerminationStatus::Rejected),
            })
        ));

        let detail = repo.get(&f.admin, id).await.unwrap();
        assert_eq!(detail.status, CoreTerminationStatus::Rejected);
        assert!(detail.receipt_reference.is_none());
        assert!(detail.completed_by.is_none());
        assert_eq!(detail.contract.status, CoreContractStatus::Active);
        assert!(detail.contract.terminated_at.is_none());
        assert!(
            detail
                .contract
                .units
                .iter()
                .all(|unit| unit.status == CoreUnitStatus::Occupied)
        );
    }

    #[tokio::test]
    async fn test_second_approval_on_stale_read_keeps_first_approval() {
        let f = fixture().await;
        let repo = TerminationRepository::new(f.db.clone());
        let id = open_request(&f).await;

        let read = read_request(&f.db, id).await;
        let first = repo.accountant_approve(&f.admin, id).await.unwrap();

        let action =
            TerminationWorkflow::accountant_approve(read.status.into(), Uuid::new_v4()).unwrap();
        let result = apply_transition(
            &f.db,
            &read,
            &action,
            TerminationOperation::AccountantApprove,
            Utc::now().into(),
        )
        .await;

        assert!(matches!(
            result,
            Err(TerminationError::InvalidState {
                state: BlockingState::Request(CoreTerminationStatus::AccountantApproved),
                ..
            })
        ));

        let detail = repo.get(&f.admin, id).await.unwrap();
        assert_eq!(detail.accountant_approved_by, Some(f.admin.user_id()));
        assert_eq!(detail.accountant_approved_at, first.accountant_approved_at);
    }

    #[tokio::test]
    async fn test_contract_effect_on_stale_contract_status() {
        let f = fixture().await;

        let result = apply_contract_effect(
            &f.db,
            f.contract_id,
            ContractEffect::Terminate,
            TerminationOperation::Complete,
            Utc::now().into(),
        )
        .await;

        assert!(matches!(
            result,
            Err(TerminationError::InvalidState {
                state: BlockingState::Contract(CoreContractStatus::Active),
                ..
            })
        ));

        let unit_statuses: Vec<UnitStatus> = units::Entity::find()
            .all(&f.db)
            .await
            .unwrap()
            .into_iter()
            .map(|unit| unit.status)
            .collect();
        assert_eq!(unit_statuses, vec![UnitStatus::Occupied, UnitStatus::Occupied]);
    }
}
