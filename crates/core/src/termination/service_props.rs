//! Property-based tests for TerminationWorkflow.

use proptest::prelude::*;
use uuid::Uuid;

use crate::termination::error::TerminationError;
use crate::termination::service::TerminationWorkflow;
use crate::termination::types::{ContractEffect, ContractStatus, TerminationStatus};

fn arb_status() -> impl Strategy<Value = TerminationStatus> {
    prop_oneof![
        Just(TerminationStatus::Pending),
        Just(TerminationStatus::AccountantApproved),
        Just(TerminationStatus::OwnerApproved),
        Just(TerminationStatus::Completed),
        Just(TerminationStatus::Rejected),
    ]
}

fn arb_open_status() -> impl Strategy<Value = TerminationStatus> {
    prop::sample::select(TerminationStatus::OPEN.to_vec())
}

fn arb_contract_status() -> impl Strategy<Value = ContractStatus> {
    prop_oneof![
        Just(ContractStatus::Draft),
        Just(ContractStatus::UnderReview),
        Just(ContractStatus::Active),
        Just(ContractStatus::PendingTermination),
        Just(ContractStatus::Terminated),
        Just(ContractStatus::Expired),
    ]
}

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

fn arb_reason() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 ]{0,60}".prop_map(String::from)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Rejecting any open request yields Rejected, and the contract reverts
    /// to active exactly when it was pending termination.
    #[test]
    fn prop_reject_open_request(
        current in arb_open_status(),
        contract in arb_contract_status(),
        user in arb_uuid(),
        reason in arb_reason(),
    ) {
        let action = TerminationWorkflow::reject(current, contract, user, &reason).unwrap();
        prop_assert_eq!(action.new_status(), TerminationStatus::Rejected);

        let expected = if contract == ContractStatus::PendingTermination {
            ContractEffect::RevertToActive
        } else {
            ContractEffect::Unchanged
        };
        prop_assert_eq!(action.contract_effect(), expected);
    }

    /// Complete succeeds only from OwnerApproved.
    #[test]
    fn prop_complete_only_from_owner_approved(
        current in arb_status(),
        user in arb_uuid(),
        receipt in arb_reason(),
    ) {
        let result = TerminationWorkflow::complete(current, user, &receipt);
        if current == TerminationStatus::OwnerApproved {
            prop_assert!(result.is_ok());
        } else {
            let is_invalid_state = matches!(result, Err(TerminationError::InvalidState { .. }));
            prop_assert!(is_invalid_state);
        }
    }

    /// Every successful transition is one the transition table allows.
    #[test]
    fn prop_transitions_agree_with_table(current in arb_status(), user in arb_uuid()) {
        let attempts = [
            TerminationWorkflow::accountant_approve(current, user),
            TerminationWorkflow::owner_approve(current, user),
            TerminationWorkflow::complete(current, user, "R-1"),
            TerminationWorkflow::reject(current, ContractStatus::PendingTermination, user, "no"),
        ];

        for action in attempts.into_iter().flatten() {
            prop_assert!(TerminationWorkflow::is_valid_transition(current, action.new_status()));
        }
    }

    /// Terminal requests accept no transition at all.
    #[test]
    fn prop_terminal_is_immutable(
        current in prop_oneof![Just(TerminationStatus::Completed), Just(TerminationStatus::Rejected)],
        user in arb_uuid(),
    ) {
        prop_assert!(TerminationWorkflow::accountant_approve(current, user).is_err());
        prop_assert!(TerminationWorkflow::owner_approve(current, user).is_err());
        prop_assert!(TerminationWorkflow::complete(current, user, "R-1").is_err());
        prop_assert!(TerminationWorkflow::reject(current, ContractStatus::Terminated, user, "no").is_err());
    }
}
