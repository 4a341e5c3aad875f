//! Contract termination workflow.
//!
//! A termination request moves through
//! `pending → accountant_approved → owner_approved → completed`, and can be
//! rejected from any open status. Opening a request puts the contract in
//! `pending_termination`; completing it terminates the contract and frees
//! its units; rejecting it restores the contract.
//!
//! # Modules
//!
//! - `types` - Statuses, contract effects, and workflow actions
//! - `error` - Termination error taxonomy
//! - `service` - State transition logic
//! - `refund` - Remaining-advance computation
//! - `bank` - Refund bank-detail validation

pub mod bank;
pub mod error;
pub mod refund;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::{BlockingState, Entity, TerminationError};
pub use refund::RefundCalculator;
pub use service::{TerminationInput, TerminationWorkflow};
pub use types::{
    BankDetails, ContractEffect, ContractStatus, TerminationAction, TerminationStatus, UnitStatus,
};
