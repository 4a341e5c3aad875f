//! Tenant records.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::tenants;

/// Fields for a new tenant.
#[derive(Debug, Clone)]
pub struct CreateTenantInput {
    /// Login account, if the tenant has one.
    pub user_id: Option<Uuid>,
    /// Full name.
    pub full_name: String,
    /// Phone number used for notices.
    pub phone: String,
    /// Email address.
    pub email: Option<String>,
}

/// Repository for tenants.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    db: DatabaseConnection,
}

impl TenantRepository {
    /// Creates a new tenant repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateTenantInput) -> Result<tenants::Model, DbErr> {
        let now = chrono::Utc::now().into();
        tenants::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            full_name: Set(input.full_name),
            phone: Set(input.phone),
            email: Set(input.email),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a tenant by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<tenants::Model>, DbErr> {
        tenants::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds the tenant record linked to a login account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<tenants::Model>, DbErr> {
        tenants::Entity::find()
            .filter(tenants::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }
}
