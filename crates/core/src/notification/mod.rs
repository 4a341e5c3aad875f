//! Tenant notifications about termination progress.
//!
//! Messages are built here; delivery goes through a [`Notifier`]
//! implementation supplied by the outer layers. Delivery is best effort and
//! never affects the outcome of a transition.

use async_trait::async_trait;
use thiserror::Error;

use crate::termination::TerminationStatus;

/// A text message to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsNotice {
    /// Recipient phone number.
    pub to: String,
    /// Message text.
    pub body: String,
}

impl SmsNotice {
    /// Builds the message sent when a request enters `status`.
    ///
    /// `contract_reference` is the code printed on the tenant's contract.
    #[must_use]
    pub fn for_status(
        to: impl Into<String>,
        contract_reference: &str,
        status: TerminationStatus,
        detail: Option<&str>,
    ) -> Self {
        let body = match status {
            TerminationStatus::Pending => format!(
                "Your termination request for contract {contract_reference} was received and is awaiting review."
            ),
            TerminationStatus::AccountantApproved => format!(
                "Your termination request for contract {contract_reference} passed accounting review."
            ),
            TerminationStatus::OwnerApproved => format!(
                "Your termination request for contract {contract_reference} was approved. Your refund is being processed."
            ),
            TerminationStatus::Completed => match detail {
                Some(receipt) => format!(
                    "Contract {contract_reference} is terminated. Refund receipt: {receipt}."
                ),
                None => format!("Contract {contract_reference} is terminated."),
            },
            TerminationStatus::Rejected => match detail {
                Some(reason) => format!(
                    "Your termination request for contract {contract_reference} was rejected: {reason}"
                ),
                None => format!(
                    "Your termination request for contract {contract_reference} was rejected."
                ),
            },
        };

        Self {
            to: to.into(),
            body,
        }
    }
}

/// Delivery failure.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The gateway could not be reached.
    #[error("sms gateway unreachable: {0}")]
    Transport(String),

    /// The gateway answered with a non-success status.
    #[error("sms gateway rejected message with status {0}")]
    Rejected(u16),
}

/// Sends notices to tenants.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one notice.
    async fn send(&self, notice: &SmsNotice) -> Result<(), NotifyError>;
}
