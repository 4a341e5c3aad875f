//! Termination workflow error types.

use std::fmt;
use thiserror::Error;

use crate::auth::{AccessError, Role, TerminationOperation};
use crate::termination::types::{ContractStatus, TerminationStatus};

/// Kind of entity a lookup failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// A termination request.
    TerminationRequest,
    /// A contract.
    Contract,
    /// A tenant.
    Tenant,
    /// A property.
    Property,
    /// A user.
    User,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TerminationRequest => "Termination request",
            Self::Contract => "Contract",
            Self::Tenant => "Tenant",
            Self::Property => "Property",
            Self::User => "User",
        })
    }
}

/// The state that blocked an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingState {
    /// The request is in this status.
    Request(TerminationStatus),
    /// The contract is in this status.
    Contract(ContractStatus),
}

impl fmt::Display for BlockingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(status) => write!(f, "request is {status}"),
            Self::Contract(status) => write!(f, "contract is {status}"),
        }
    }
}

/// Errors that can occur during termination operations.
#[derive(Debug, Error)]
pub enum TerminationError {
    /// No caller identity.
    #[error("Authentication required")]
    Unauthenticated,

    /// Caller's role is not allowed, or the resource is outside their scope.
    #[error("Role {role} is not authorized to {operation} this termination request")]
    Unauthorized {
        /// The caller's role.
        role: Role,
        /// The attempted operation.
        operation: TerminationOperation,
    },

    /// Entity does not exist or is not visible to the caller.
    #[error("{0} not found")]
    NotFound(Entity),

    /// Operation attempted outside its required current status.
    #[error("Cannot {operation}: {state}")]
    InvalidState {
        /// The attempted operation.
        operation: TerminationOperation,
        /// What blocked it.
        state: BlockingState,
    },

    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// An open request already exists for the contract.
    #[error("{0}")]
    Conflict(String),

    /// Unexpected collaborator failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TerminationError {
    /// Builds an `Unauthorized` error from an access-policy failure.
    #[must_use]
    pub fn from_access(role: Role, err: &AccessError) -> Self {
        let operation = match err {
            AccessError::RoleNotAllowed { operation, .. } | AccessError::OutOfScope { operation } => {
                *operation
            }
        };
        Self::Unauthorized { role, operation }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::Unauthorized { .. } => 403,
            Self::NotFound(_) => 404,
            Self::InvalidState { .. } | Self::Conflict(_) => 409,
            Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Unauthorized { .. } => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::InvalidState { .. } => "invalid_state",
            Self::Validation(_) => "validation_error",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Returns the message that is safe to show to a caller.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "An error occurred".to_string(),
            other => other.to_string(),
        }
    }
}
