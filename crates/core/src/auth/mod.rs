//! Authentication, roles, and access control.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Role definitions
//! - The per-request caller context
//! - The access policy applied to every termination operation

mod context;
mod password;
mod policy;

#[cfg(test)]
mod policy_props;

pub use context::CallerContext;
pub use password::{PasswordError, hash_password, verify_password};
pub use policy::{AccessError, AccessPolicy, ResourceScope, TerminationOperation, Visibility};

use serde::{Deserialize, Serialize};
use std::fmt;

/// User roles.
///
/// Elevated roles act on every property. Scoped roles only act on the
/// properties they are assigned to. Tenants only act on their own contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Operates the platform.
    SystemAdmin,
    /// Owns the portfolio.
    Owner,
    /// Manages day-to-day operations of assigned properties.
    PropertyAdmin,
    /// Handles money for assigned properties.
    Accountant,
    /// Holds one or more contracts.
    Tenant,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::SystemAdmin,
        Self::Owner,
        Self::PropertyAdmin,
        Self::Accountant,
        Self::Tenant,
    ];

    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "system_admin" => Some(Self::SystemAdmin),
            "owner" => Some(Self::Owner),
            "property_admin" => Some(Self::PropertyAdmin),
            "accountant" => Some(Self::Accountant),
            "tenant" => Some(Self::Tenant),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SystemAdmin => "system_admin",
            Self::Owner => "owner",
            Self::PropertyAdmin => "property_admin",
            Self::Accountant => "accountant",
            Self::Tenant => "tenant",
        }
    }

    /// Returns true for roles authorized across all properties.
    #[must_use]
    pub const fn is_elevated(&self) -> bool {
        matches!(self, Self::SystemAdmin | Self::Owner)
    }

    /// Returns true for roles restricted to assigned properties.
    #[must_use]
    pub const fn is_scoped(&self) -> bool {
        matches!(self, Self::PropertyAdmin | Self::Accountant)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_str() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("OWNER"), Some(Role::Owner));
        assert_eq!(Role::parse("landlord"), None);
    }

    #[test]
    fn test_role_classes() {
        assert!(Role::SystemAdmin.is_elevated());
        assert!(Role::Owner.is_elevated());
        assert!(!Role::Accountant.is_elevated());

        assert!(Role::Accountant.is_scoped());
        assert!(Role::PropertyAdmin.is_scoped());
        assert!(!Role::Tenant.is_scoped());
        assert!(!Role::Owner.is_scoped());
    }

    #[test]
    fn test_role_serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::PropertyAdmin).unwrap();
        assert_eq!(json, "\"property_admin\"");
    }
}
