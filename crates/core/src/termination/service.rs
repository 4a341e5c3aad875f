//! Termination workflow state machine.
//!
//! Validates transitions and produces the `TerminationAction` to persist.
//! Loading entities, access control, and writing the action are the
//! repository's job.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::auth::TerminationOperation;
use crate::termination::error::{BlockingState, TerminationError};
use crate::termination::types::{
    BankDetails, ContractEffect, ContractStatus, TerminationAction, TerminationStatus,
};

/// Input for opening a termination request.
#[derive(Debug, Clone)]
pub struct TerminationInput {
    /// Why the contract is being terminated.
    pub reason: String,
    /// Where to send the refund, if supplied.
    pub bank_details: Option<BankDetails>,
}

/// Stateless service for termination transitions.
pub struct TerminationWorkflow;

impl TerminationWorkflow {
    /// Opens a termination request for a contract.
    ///
    /// Checks run in this order: input validation, open-request conflict,
    /// contract status.
    ///
    /// # Errors
    ///
    /// * `Validation` if the reason is blank or the bank details are malformed
    /// * `Conflict` if the contract already has an open request
    /// * `InvalidState` if the contract is not active
    pub fn request(
        contract_status: ContractStatus,
        has_open_request: bool,
        input: &TerminationInput,
        requested_by: Uuid,
        refund_amount: Decimal,
    ) -> Result<TerminationAction, TerminationError> {
        let reason = required_text(&input.reason, "reason")?;
        let bank_details = input
            .bank_details
            .as_ref()
            .map(BankDetails::normalized)
            .transpose()?;

        if has_open_request {
            return Err(TerminationError::Conflict(
                "An open termination request already exists for this contract".to_string(),
            ));
        }

        if contract_status != ContractStatus::Active {
            return Err(TerminationError::InvalidState {
                operation: TerminationOperation::Create,
                state: BlockingState::Contract(contract_status),
            });
        }

        Ok(TerminationAction::Request {
            new_status: TerminationStatus::Pending,
            requested_by,
            reason,
            bank_details,
            refund_amount,
            contract_effect: ContractEffect::MarkPendingTermination,
        })
    }

    /// Accountant approval of a pending request.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the request is `Pending`.
    pub fn accountant_approve(
        current: TerminationStatus,
        approved_by: Uuid,
    ) -> Result<TerminationAction, TerminationError> {
        match current {
            TerminationStatus::Pending => Ok(TerminationAction::AccountantApprove {
                new_status: TerminationStatus::AccountantApproved,
                approved_by,
                approved_at: Utc::now(),
            }),
            _ => Err(invalid(TerminationOperation::AccountantApprove, current)),
        }
    }

    /// Owner approval of an accountant-approved request.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the request is `AccountantApproved`.
    pub fn owner_approve(
        current: TerminationStatus,
        approved_by: Uuid,
    ) -> Result<TerminationAction, TerminationError> {
        match current {
            TerminationStatus::AccountantApproved => Ok(TerminationAction::OwnerApprove {
                new_status: TerminationStatus::OwnerApproved,
                approved_by,
                approved_at: Utc::now(),
            }),
            _ => Err(invalid(TerminationOperation::OwnerApprove, current)),
        }
    }

    /// Completes an owner-approved request.
    ///
    /// # Errors
    ///
    /// * `Validation` if the receipt reference is blank
    /// * `InvalidState` unless the request is `OwnerApproved`
    pub fn complete(
        current: TerminationStatus,
        completed_by: Uuid,
        receipt_reference: &str,
    ) -> Result<TerminationAction, TerminationError> {
        let receipt_reference = required_text(receipt_reference, "receipt_reference")?;

        match current {
            TerminationStatus::OwnerApproved => Ok(TerminationAction::Complete {
                new_status: TerminationStatus::Completed,
                completed_by,
                completed_at: Utc::now(),
                receipt_reference,
                contract_effect: ContractEffect::Terminate,
            }),
            _ => Err(invalid(TerminationOperation::Complete, current)),
        }
    }

    /// Rejects an open request.
    ///
    /// The contract reverts to active only if it is pending termination.
    ///
    /// # Errors
    ///
    /// * `Validation` if the reason is blank
    /// * `InvalidState` if the request is already completed or rejected
    pub fn reject(
        current: TerminationStatus,
        contract_status: ContractStatus,
        rejected_by: Uuid,
        rejection_reason: &str,
    ) -> Result<TerminationAction, TerminationError> {
        let rejection_reason = required_text(rejection_reason, "reason")?;

        if current.is_terminal() {
            return Err(invalid(TerminationOperation::Reject, current));
        }

        let contract_effect = if contract_status == ContractStatus::PendingTermination {
            ContractEffect::RevertToActive
        } else {
            ContractEffect::Unchanged
        };

        Ok(TerminationAction::Reject {
            new_status: TerminationStatus::Rejected,
            rejected_by,
            rejected_at: Utc::now(),
            rejection_reason,
            contract_effect,
        })
    }

    /// Checks if a status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: TerminationStatus, to: TerminationStatus) -> bool {
        use TerminationStatus::{AccountantApproved, Completed, OwnerApproved, Pending, Rejected};

        matches!(
            (from, to),
            (Pending, AccountantApproved)
                | (AccountantApproved, OwnerApproved)
                | (OwnerApproved, Completed)
                | (Pending | AccountantApproved | OwnerApproved, Rejected)
        )
    }
}

fn invalid(operation: TerminationOperation, current: TerminationStatus) -> TerminationError {
    TerminationError::InvalidState {
        operation,
        state: BlockingState::Request(current),
    }
}

fn required_text(value: &str, field: &str) -> Result<String, TerminationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(TerminationError::Validation(format!("{field} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}
