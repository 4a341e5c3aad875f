//! Identity of the caller of an operation.

use std::collections::HashSet;
use uuid::Uuid;

use super::Role;

/// Everything the domain needs to know about who is calling.
///
/// Resolved once per request by the HTTP layer and passed explicitly to
/// every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    user_id: Uuid,
    role: Role,
    assigned_properties: HashSet<Uuid>,
    tenant_id: Option<Uuid>,
}

impl CallerContext {
    /// Creates a context with no assignments and no tenant link.
    #[must_use]
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self {
            user_id,
            role,
            assigned_properties: HashSet::new(),
            tenant_id: None,
        }
    }

    /// Sets the properties this caller is assigned to.
    #[must_use]
    pub fn with_assignments(mut self, properties: impl IntoIterator<Item = Uuid>) -> Self {
        self.assigned_properties = properties.into_iter().collect();
        self
    }

    /// Links the caller to a tenant record.
    #[must_use]
    pub fn with_tenant(mut self, tenant_id: Option<Uuid>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    /// The caller's user ID.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// The caller's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// The tenant record linked to the caller, if any.
    #[must_use]
    pub const fn tenant_id(&self) -> Option<Uuid> {
        self.tenant_id
    }

    /// Returns true if the caller is assigned to the property.
    #[must_use]
    pub fn is_assigned_to(&self, property_id: Uuid) -> bool {
        self.assigned_properties.contains(&property_id)
    }

    /// Assigned properties, sorted for stable output.
    #[must_use]
    pub fn assigned_properties(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self.assigned_properties.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}
