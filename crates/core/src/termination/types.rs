//! Termination domain types.
//!
//! Statuses of the request itself, of the contract it terminates, and of
//! the units bound to that contract, plus the actions produced by the
//! workflow.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Status of a termination request.
///
/// The valid transitions are:
/// - Pending → AccountantApproved (accountant approve)
/// - AccountantApproved → OwnerApproved (owner approve)
/// - OwnerApproved → Completed (complete)
/// - Pending | AccountantApproved | OwnerApproved → Rejected (reject)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationStatus {
    /// Requested, waiting for the accountant.
    Pending,
    /// Accountant signed off on the refund.
    AccountantApproved,
    /// Owner signed off, refund can be paid.
    OwnerApproved,
    /// Refund paid, contract terminated (immutable).
    Completed,
    /// Turned down (immutable).
    Rejected,
}

impl TerminationStatus {
    /// Statuses in which a request still blocks a new one for the same contract.
    pub const OPEN: [Self; 3] = [Self::Pending, Self::AccountantApproved, Self::OwnerApproved];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AccountantApproved => "accountant_approved",
            Self::OwnerApproved => "owner_approved",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "accountant_approved" => Some(Self::AccountantApproved),
            "owner_approved" => Some(Self::OwnerApproved),
            "completed" => Some(Self::Completed),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true once the request can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }
}

impl fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a rental contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Being prepared.
    Draft,
    /// Waiting for internal review.
    UnderReview,
    /// In force.
    Active,
    /// A termination request is open.
    PendingTermination,
    /// Ended by a completed termination.
    Terminated,
    /// Ran past its end date.
    Expired,
}

impl ContractStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::UnderReview => "under_review",
            Self::Active => "active",
            Self::PendingTermination => "pending_termination",
            Self::Terminated => "terminated",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Occupancy status of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    /// Free to let.
    Available,
    /// Bound to a contract.
    Occupied,
    /// Temporarily out of service.
    Maintenance,
}

impl UnitStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        }
    }
}

/// Change a transition makes to the owning contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractEffect {
    /// Contract is left as is.
    Unchanged,
    /// Active → PendingTermination.
    MarkPendingTermination,
    /// PendingTermination → Terminated, and every bound unit becomes available.
    Terminate,
    /// PendingTermination → Active.
    RevertToActive,
}

impl ContractEffect {
    /// The contract status this effect requires before it is applied.
    #[must_use]
    pub const fn expected_status(&self) -> Option<ContractStatus> {
        match self {
            Self::Unchanged => None,
            Self::MarkPendingTermination => Some(ContractStatus::Active),
            Self::Terminate | Self::RevertToActive => Some(ContractStatus::PendingTermination),
        }
    }

    /// The contract status after the effect.
    #[must_use]
    pub const fn target_status(&self) -> Option<ContractStatus> {
        match self {
            Self::Unchanged => None,
            Self::MarkPendingTermination => Some(ContractStatus::PendingTermination),
            Self::Terminate => Some(ContractStatus::Terminated),
            Self::RevertToActive => Some(ContractStatus::Active),
        }
    }
}

/// Optional refund destination supplied with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    /// Bank name.
    pub bank_name: String,
    /// Name on the account.
    pub account_name: String,
    /// Account number.
    pub account_number: String,
}

/// Workflow action representing a state transition with audit data.
#[derive(Debug, Clone)]
pub enum TerminationAction {
    /// Open a new request.
    Request {
        /// Always `Pending`.
        new_status: TerminationStatus,
        /// Who asked.
        requested_by: Uuid,
        /// Trimmed reason.
        reason: String,
        /// Normalized bank details, if given.
        bank_details: Option<BankDetails>,
        /// Refund snapshot.
        refund_amount: Decimal,
        /// Always `MarkPendingTermination`.
        contract_effect: ContractEffect,
    },
    /// First approval.
    AccountantApprove {
        /// Always `AccountantApproved`.
        new_status: TerminationStatus,
        /// The approving user.
        approved_by: Uuid,
        /// When it was approved.
        approved_at: DateTime<Utc>,
    },
    /// Second approval.
    OwnerApprove {
        /// Always `OwnerApproved`.
        new_status: TerminationStatus,
        /// The approving user.
        approved_by: Uuid,
        /// When it was approved.
        approved_at: DateTime<Utc>,
    },
    /// Refund paid, contract ends.
    Complete {
        /// Always `Completed`.
        new_status: TerminationStatus,
        /// Who recorded the completion.
        completed_by: Uuid,
        /// When it was completed.
        completed_at: DateTime<Utc>,
        /// Trimmed receipt reference for the refund payment.
        receipt_reference: String,
        /// Always `Terminate`.
        contract_effect: ContractEffect,
    },
    /// Request turned down.
    Reject {
        /// Always `Rejected`.
        new_status: TerminationStatus,
        /// Who rejected.
        rejected_by: Uuid,
        /// When it was rejected.
        rejected_at: DateTime<Utc>,
        /// Trimmed reason.
        rejection_reason: String,
        /// `RevertToActive` if the contract is pending termination, else `Unchanged`.
        contract_effect: ContractEffect,
    },
}

impl TerminationAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> TerminationStatus {
        match self {
            Self::Request { new_status, .. }
            | Self::AccountantApprove { new_status, .. }
            | Self::OwnerApprove { new_status, .. }
            | Self::Complete { new_status, .. }
            | Self::Reject { new_status, .. } => *new_status,
        }
    }

    /// Returns the effect on the owning contract.
    #[must_use]
    pub fn contract_effect(&self) -> ContractEffect {
        match self {
            Self::Request {
                contract_effect, ..
            }
            | Self::Complete {
                contract_effect, ..
            }
            | Self::Reject {
                contract_effect, ..
            } => *contract_effect,
            Self::AccountantApprove { .. } | Self::OwnerApprove { .. } => {
                ContractEffect::Unchanged
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            TerminationStatus::Pending,
            TerminationStatus::AccountantApproved,
            TerminationStatus::OwnerApproved,
            TerminationStatus::Completed,
            TerminationStatus::Rejected,
        ] {
            assert_eq!(TerminationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(
            TerminationStatus::parse("OWNER_APPROVED"),
            Some(TerminationStatus::OwnerApproved)
        );
        assert_eq!(TerminationStatus::parse("approved"), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(TerminationStatus::Completed.is_terminal());
        assert!(TerminationStatus::Rejected.is_terminal());
        for status in TerminationStatus::OPEN {
            assert!(!status.is_terminal());
        }
    }

    #[test]
    fn test_contract_effect_statuses() {
        assert_eq!(ContractEffect::Unchanged.expected_status(), None);
        assert_eq!(
            ContractEffect::MarkPendingTermination.target_status(),
            Some(ContractStatus::PendingTermination)
        );
        assert_eq!(
            ContractEffect::Terminate.expected_status(),
            Some(ContractStatus::PendingTermination)
        );
        assert_eq!(
            ContractEffect::RevertToActive.target_status(),
            Some(ContractStatus::Active)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TerminationStatus::AccountantApproved.to_string(),
            "accountant_approved"
        );
        assert_eq!(
            ContractStatus::PendingTermination.to_string(),
            "pending_termination"
        );
    }
}
