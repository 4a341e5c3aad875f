//! Properties and their units.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{properties, sea_orm_active_enums::UnitStatus, units};

/// Repository for properties and units.
#[derive(Debug, Clone)]
pub struct PropertyRepository {
    db: DatabaseConnection,
}

impl PropertyRepository {
    /// Creates a new property repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a property.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_property(
        &self,
        name: &str,
        address: &str,
    ) -> Result<properties::Model, DbErr> {
        let now = chrono::Utc::now().into();
        properties::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            address: Set(address.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a property by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_property(&self, id: Uuid) -> Result<Option<properties::Model>, DbErr> {
        properties::Entity::find_by_id(id).one(&self.db).await
    }

    /// Adds an available unit to a property.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails, including a duplicate
    /// unit number within the property.
    pub async fn create_unit(
        &self,
        property_id: Uuid,
        unit_number: &str,
    ) -> Result<units::Model, DbErr> {
        let now = chrono::Utc::now().into();
        units::ActiveModel {
            id: Set(Uuid::new_v4()),
            property_id: Set(property_id),
            unit_number: Set(unit_number.to_string()),
            status: Set(UnitStatus::Available),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a unit by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_unit(&self, id: Uuid) -> Result<Option<units::Model>, DbErr> {
        units::Entity::find_by_id(id).one(&self.db).await
    }

    /// Units of a property, by unit number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_units(&self, property_id: Uuid) -> Result<Vec<units::Model>, DbErr> {
        units::Entity::find()
            .filter(units::Column::PropertyId.eq(property_id))
            .order_by_asc(units::Column::UnitNumber)
            .all(&self.db)
            .await
    }
}
