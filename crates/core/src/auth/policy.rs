//! Role and scope checks for termination operations.

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::{CallerContext, Role};

/// An operation on termination requests that is subject to access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationOperation {
    /// Open a termination request for a contract.
    Create,
    /// First approval step.
    AccountantApprove,
    /// Second approval step.
    OwnerApprove,
    /// Record the refund receipt and terminate the contract.
    Complete,
    /// Reject an open request.
    Reject,
    /// Read a request or list requests.
    View,
}

impl TerminationOperation {
    /// Returns the string representation of the operation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::AccountantApprove => "accountant_approve",
            Self::OwnerApprove => "owner_approve",
            Self::Complete => "complete",
            Self::Reject => "reject",
            Self::View => "view",
        }
    }

    /// Roles that may attempt this operation at all.
    ///
    /// Scoped roles and tenants still have to pass the scope check in
    /// [`AccessPolicy::authorize`].
    #[must_use]
    pub const fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Self::Create => &[Role::SystemAdmin, Role::Owner, Role::PropertyAdmin, Role::Tenant],
            Self::AccountantApprove | Self::Complete => {
                &[Role::SystemAdmin, Role::Owner, Role::Accountant]
            }
            Self::OwnerApprove => &[Role::SystemAdmin, Role::Owner],
            Self::Reject => &[
                Role::SystemAdmin,
                Role::Owner,
                Role::PropertyAdmin,
                Role::Accountant,
            ],
            Self::View => &Role::ALL,
        }
    }
}

impl fmt::Display for TerminationOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The property and tenant a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceScope {
    /// Property of the contract.
    pub property_id: Uuid,
    /// Tenant holding the contract.
    pub tenant_id: Uuid,
}

/// Access check failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The role is not on the operation's allow-list.
    #[error("role {role} may not {operation}")]
    RoleNotAllowed {
        /// The caller's role.
        role: Role,
        /// The attempted operation.
        operation: TerminationOperation,
    },

    /// The role is allowed but the resource is outside the caller's scope.
    #[error("{operation} is outside the caller's assigned scope")]
    OutOfScope {
        /// The attempted operation.
        operation: TerminationOperation,
    },
}

/// Which termination requests a caller can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Every request.
    All,
    /// Requests on these properties.
    Properties(Vec<Uuid>),
    /// Requests on contracts held by this tenant.
    Tenant(Uuid),
    /// Nothing.
    None,
}

/// Stateless access policy.
pub struct AccessPolicy;

impl AccessPolicy {
    /// Checks that the caller may perform `operation` on a resource in `scope`.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::RoleNotAllowed` if the role is not on the
    /// allow-list, and `AccessError::OutOfScope` if a scoped role is not
    /// assigned to the property or a tenant does not hold the contract.
    pub fn authorize(
        caller: &CallerContext,
        operation: TerminationOperation,
        scope: &ResourceScope,
    ) -> Result<(), AccessError> {
        let role = caller.role();
        if !operation.allowed_roles().contains(&role) {
            return Err(AccessError::RoleNotAllowed { role, operation });
        }

        let in_scope = match role {
            Role::SystemAdmin | Role::Owner => true,
            Role::PropertyAdmin | Role::Accountant => caller.is_assigned_to(scope.property_id),
            Role::Tenant => caller.tenant_id() == Some(scope.tenant_id),
        };

        if in_scope {
            Ok(())
        } else {
            Err(AccessError::OutOfScope { operation })
        }
    }

    /// Returns the set of requests the caller may list.
    #[must_use]
    pub fn visibility(caller: &CallerContext) -> Visibility {
        match caller.role() {
            Role::SystemAdmin | Role::Owner => Visibility::All,
            Role::PropertyAdmin | Role::Accountant => {
                let properties = caller.assigned_properties();
                if properties.is_empty() {
                    Visibility::None
                } else {
                    Visibility::Properties(properties)
                }
            }
            Role::Tenant => caller.tenant_id().map_or(Visibility::None, Visibility::Tenant),
        }
    }
}
