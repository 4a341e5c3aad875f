//! String-backed enums stored in the database.
//!
//! Each enum mirrors a domain enum in `estatedesk_core` and converts to and
//! from it losslessly.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use estatedesk_core::auth::Role;
use estatedesk_core::termination::{
    ContractStatus as CoreContractStatus, TerminationStatus as CoreTerminationStatus,
    UnitStatus as CoreUnitStatus,
};

/// Role column of `users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Platform operator.
    #[sea_orm(string_value = "system_admin")]
    SystemAdmin,
    /// Portfolio owner.
    #[sea_orm(string_value = "owner")]
    Owner,
    /// Property administrator.
    #[sea_orm(string_value = "property_admin")]
    PropertyAdmin,
    /// Accountant.
    #[sea_orm(string_value = "accountant")]
    Accountant,
    /// Tenant.
    #[sea_orm(string_value = "tenant")]
    Tenant,
}

impl From<UserRole> for Role {
    fn from(value: UserRole) -> Self {
        match value {
            UserRole::SystemAdmin => Self::SystemAdmin,
            UserRole::Owner => Self::Owner,
            UserRole::PropertyAdmin => Self::PropertyAdmin,
            UserRole::Accountant => Self::Accountant,
            UserRole::Tenant => Self::Tenant,
        }
    }
}

impl From<Role> for UserRole {
    fn from(value: Role) -> Self {
        match value {
            Role::SystemAdmin => Self::SystemAdmin,
            Role::Owner => Self::Owner,
            Role::PropertyAdmin => Self::PropertyAdmin,
            Role::Accountant => Self::Accountant,
            Role::Tenant => Self::Tenant,
        }
    }
}

/// Status column of `contracts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Being prepared.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Waiting for review.
    #[sea_orm(string_value = "under_review")]
    UnderReview,
    /// In force.
    #[sea_orm(string_value = "active")]
    Active,
    /// Termination requested.
    #[sea_orm(string_value = "pending_termination")]
    PendingTermination,
    /// Terminated.
    #[sea_orm(string_value = "terminated")]
    Terminated,
    /// Expired.
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl From<ContractStatus> for CoreContractStatus {
    fn from(value: ContractStatus) -> Self {
        match value {
            ContractStatus::Draft => Self::Draft,
            ContractStatus::UnderReview => Self::UnderReview,
            ContractStatus::Active => Self::Active,
            ContractStatus::PendingTermination => Self::PendingTermination,
            ContractStatus::Terminated => Self::Terminated,
            ContractStatus::Expired => Self::Expired,
        }
    }
}

impl From<CoreContractStatus> for ContractStatus {
    fn from(value: CoreContractStatus) -> Self {
        match value {
            CoreContractStatus::Draft => Self::Draft,
            CoreContractStatus::UnderReview => Self::UnderReview,
            CoreContractStatus::Active => Self::Active,
            CoreContractStatus::PendingTermination => Self::PendingTermination,
            CoreContractStatus::Terminated => Self::Terminated,
            CoreContractStatus::Expired => Self::Expired,
        }
    }
}

/// Status column of `units`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    /// Free to let.
    #[sea_orm(string_value = "available")]
    Available,
    /// Let.
    #[sea_orm(string_value = "occupied")]
    Occupied,
    /// Out of service.
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
}

impl From<UnitStatus> for CoreUnitStatus {
    fn from(value: UnitStatus) -> Self {
        match value {
            UnitStatus::Available => Self::Available,
            UnitStatus::Occupied => Self::Occupied,
            UnitStatus::Maintenance => Self::Maintenance,
        }
    }
}

/// Status column of `termination_requests`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum TerminationStatus {
    /// Awaiting accountant.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Awaiting owner.
    #[sea_orm(string_value = "accountant_approved")]
    AccountantApproved,
    /// Awaiting refund.
    #[sea_orm(string_value = "owner_approved")]
    OwnerApproved,
    /// Done.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Turned down.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<TerminationStatus> for CoreTerminationStatus {
    fn from(value: TerminationStatus) -> Self {
        match value {
            TerminationStatus::Pending => Self::Pending,
            TerminationStatus::AccountantApproved => Self::AccountantApproved,
            TerminationStatus::OwnerApproved => Self::OwnerApproved,
            TerminationStatus::Completed => Self::Completed,
            TerminationStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<CoreTerminationStatus> for TerminationStatus {
    fn from(value: CoreTerminationStatus) -> Self {
        match value {
            CoreTerminationStatus::Pending => Self::Pending,
            CoreTerminationStatus::AccountantApproved => Self::AccountantApproved,
            CoreTerminationStatus::OwnerApproved => Self::OwnerApproved,
            CoreTerminationStatus::Completed => Self::Completed,
            CoreTerminationStatus::Rejected => Self::Rejected,
        }
    }
}
