//! Property assignments of scoped staff.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::property_assignments;

/// Repository for the user ↔ property assignment set.
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    db: DatabaseConnection,
}

impl AssignmentRepository {
    /// Creates a new assignment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assigns a user to a property. Assigning twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn assign(&self, user_id: Uuid, property_id: Uuid) -> Result<(), DbErr> {
        let existing = property_assignments::Entity::find_by_id((user_id, property_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        property_assignments::ActiveModel {
            user_id: Set(user_id),
            property_id: Set(property_id),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        Ok(())
    }

    /// Removes an assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn unassign(&self, user_id: Uuid, property_id: Uuid) -> Result<bool, DbErr> {
        let result = property_assignments::Entity::delete_by_id((user_id, property_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Properties the user is assigned to.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn assigned_property_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        let rows = property_assignments::Entity::find()
            .filter(property_assignments::Column::UserId.eq(user_id))
            .order_by_asc(property_assignments::Column::PropertyId)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(|row| row.property_id).collect())
    }
}
