//! Builds the caller context for an authenticated user.

use sea_orm::{DatabaseConnection, DbErr};
use uuid::Uuid;

use estatedesk_core::auth::{CallerContext, Role};

use super::{AssignmentRepository, TenantRepository, UserRepository};
use crate::entities::users;

/// Resolves who is calling from the user ID in a verified token.
#[derive(Debug, Clone)]
pub struct CallerRepository {
    users: UserRepository,
    assignments: AssignmentRepository,
    tenants: TenantRepository,
}

impl CallerRepository {
    /// Creates a new caller repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            assignments: AssignmentRepository::new(db.clone()),
            tenants: TenantRepository::new(db),
        }
    }

    /// Loads the user with their role, assignments and tenant link.
    ///
    /// Returns `None` for unknown or deactivated users. The role comes from
    /// the stored user, not from the token.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn resolve(
        &self,
        user_id: Uuid,
    ) -> Result<Option<(users::Model, CallerContext)>, DbErr> {
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(None);
        };
        if !user.is_active {
            return Ok(None);
        }

        let role = Role::from(user.role);
        let mut caller = CallerContext::new(user.id, role);

        if role.is_scoped() {
            let properties = self.assignments.assigned_property_ids(user.id).await?;
            caller = caller.with_assignments(properties);
        }
        if role == Role::Tenant {
            let tenant = self.tenants.find_by_user(user.id).await?;
            caller = caller.with_tenant(tenant.map(|t| t.id));
        }

        Ok(Some((user, caller)))
    }
}
