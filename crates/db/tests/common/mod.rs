//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own in-memory SQLite database migrated with the real
//! `Migrator`. The pool holds a single connection so the database lives as
//! long as the pool does.

#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

use estatedesk_core::auth::{CallerContext, Role};
use estatedesk_core::termination::ContractStatus;
use estatedesk_db::migration::{Migrator, MigratorTrait};
use estatedesk_db::repositories::{CreateContractInput, CreateTenantInput, CreateUserInput};
use estatedesk_db::{
    AssignmentRepository, CallerRepository, ContractRepository, PropertyRepository,
    TenantRepository, UserRepository,
};

/// Fresh migrated database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// A property with staff, one tenant and one active contract.
pub struct Portfolio {
    pub db: DatabaseConnection,
    pub property_id: Uuid,
    pub unit_ids: Vec<Uuid>,
    pub tenant_id: Uuid,
    pub contract_id: Uuid,
    pub system_admin: CallerContext,
    pub owner: CallerContext,
    pub accountant: CallerContext,
    pub property_admin: CallerContext,
    pub tenant: CallerContext,
    /// Accountant assigned to a different property.
    pub outside_accountant: CallerContext,
    /// Property admin assigned to a different property.
    pub outside_admin: CallerContext,
}

impl Portfolio {
    /// Builds the portfolio with `units` units on the contract and an
    /// advance of 3,000.00.
    pub async fn new(units: usize) -> Self {
        let db = setup_db().await;
        let properties = PropertyRepository::new(db.clone());
        let assignments = AssignmentRepository::new(db.clone());

        let property = properties
            .create_property("Bole Heights", "Bole Road 12, Addis Ababa")
            .await
            .expect("Failed to create property");
        let other_property = properties
            .create_property("Kazanchis Plaza", "Kazanchis 4")
            .await
            .expect("Failed to create property");

        let mut unit_ids = Vec::new();
        for n in 0..units {
            let unit = properties
                .create_unit(property.id, &format!("A-{:02}", n + 1))
                .await
                .expect("Failed to create unit");
            unit_ids.push(unit.id);
        }

        let system_admin = create_user(&db, "admin@estatedesk.test", Role::SystemAdmin).await;
        let owner = create_user(&db, "owner@estatedesk.test", Role::Owner).await;
        let accountant = create_user(&db, "accountant@estatedesk.test", Role::Accountant).await;
        let property_admin =
            create_user(&db, "manager@estatedesk.test", Role::PropertyAdmin).await;
        let outside_accountant =
            create_user(&db, "accountant2@estatedesk.test", Role::Accountant).await;
        let outside_admin = create_user(&db, "manager2@estatedesk.test", Role::PropertyAdmin).await;
        let tenant_user = create_user(&db, "tenant@estatedesk.test", Role::Tenant).await;

        assignments.assign(accountant, property.id).await.expect("assign");
        assignments.assign(property_admin, property.id).await.expect("assign");
        assignments
            .assign(outside_accountant, other_property.id)
            .await
            .expect("assign");
        assignments
            .assign(outside_admin, other_property.id)
            .await
            .expect("assign");

        let tenant = create_tenant(&db, Some(tenant_user), "Selam Tesfaye").await;
        let contract_id = create_contract(
            &db,
            "CTR-0001",
            tenant,
            property.id,
            unit_ids.clone(),
            ContractStatus::Active,
            300_000,
        )
        .await;

        Self {
            property_id: property.id,
            unit_ids,
            tenant_id: tenant,
            contract_id,
            system_admin: resolve(&db, system_admin).await,
            owner: resolve(&db, owner).await,
            accountant: resolve(&db, accountant).await,
            property_admin: resolve(&db, property_admin).await,
            tenant: resolve(&db, tenant_user).await,
            outside_accountant: resolve(&db, outside_accountant).await,
            outside_admin: resolve(&db, outside_admin).await,
            db,
        }
    }

    /// Another active contract on the same property for a new tenant.
    pub async fn second_contract(&self, reference: &str) -> (Uuid, Uuid) {
        let properties = PropertyRepository::new(self.db.clone());
        let unit = properties
            .create_unit(self.property_id, &format!("B-{reference}"))
            .await
            .expect("Failed to create unit");
        let tenant = create_tenant(&self.db, None, "Dawit Bekele").await;
        let contract = create_contract(
            &self.db,
            reference,
            tenant,
            self.property_id,
            vec![unit.id],
            ContractStatus::Active,
            100_000,
        )
        .await;
        (contract, tenant)
    }
}

pub async fn create_user(db: &DatabaseConnection, email: &str, role: Role) -> Uuid {
    UserRepository::new(db.clone())
        .create(CreateUserInput {
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$fixture$fixture".to_string(),
            full_name: format!("{role} user"),
            phone: Some("+251911000000".to_string()),
            role,
        })
        .await
        .expect("Failed to create user")
        .id
}

pub async fn create_tenant(db: &DatabaseConnection, user_id: Option<Uuid>, name: &str) -> Uuid {
    TenantRepository::new(db.clone())
        .create(CreateTenantInput {
            user_id,
            full_name: name.to_string(),
            phone: "+251911223344".to_string(),
            email: None,
        })
        .await
        .expect("Failed to create tenant")
        .id
}

pub async fn create_contract(
    db: &DatabaseConnection,
    reference: &str,
    tenant_id: Uuid,
    property_id: Uuid,
    unit_ids: Vec<Uuid>,
    status: ContractStatus,
    advance_payment_cents: i64,
) -> Uuid {
    ContractRepository::new(db.clone())
        .create(CreateContractInput {
            reference: reference.to_string(),
            tenant_id,
            property_id,
            unit_ids,
            status,
            monthly_rent_cents: 100_000,
            advance_payment_cents,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).expect("valid date"),
        })
        .await
        .expect("Failed to create contract")
        .id
}

pub async fn resolve(db: &DatabaseConnection, user_id: Uuid) -> CallerContext {
    CallerRepository::new(db.clone())
        .resolve(user_id)
        .await
        .expect("Failed to resolve caller")
        .expect("User should exist")
        .1
}
