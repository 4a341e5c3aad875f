//! Database seeder for EstateDesk development and testing.
//!
//! Seeds one property with four units, one user per role, property
//! assignments for the scoped staff, and a tenant with an active contract
//! over two of the units. Every seeded user shares the password from
//! `SEED_PASSWORD` (default `estatedesk-dev`).
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use estatedesk_core::auth::{Role, hash_password};
use estatedesk_core::termination::ContractStatus;
use estatedesk_db::repositories::{CreateContractInput, CreateTenantInput, CreateUserInput};
use estatedesk_db::{
    AssignmentRepository, ContractRepository, PropertyRepository, TenantRepository,
    UserRepository,
};

const DEFAULT_PASSWORD: &str = "estatedesk-dev";

/// Seeded staff: email, full name, role.
const STAFF: [(&str, &str, Role); 4] = [
    ("admin@estatedesk.dev", "System Admin", Role::SystemAdmin),
    ("owner@estatedesk.dev", "Hana Girma", Role::Owner),
    ("accountant@estatedesk.dev", "Yonas Alemu", Role::Accountant),
    ("manager@estatedesk.dev", "Meron Kebede", Role::PropertyAdmin),
];

const TENANT_EMAIL: &str = "tenant@estatedesk.dev";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;
    let password = std::env::var("SEED_PASSWORD").unwrap_or_else(|_| DEFAULT_PASSWORD.to_string());

    println!("Connecting to database...");
    let db = estatedesk_db::connect(&database_url).await?;

    if UserRepository::new(db.clone())
        .email_exists(TENANT_EMAIL)
        .await?
    {
        println!("Demo data already present, skipping...");
        return Ok(());
    }

    let password_hash = hash_password(&password)?;

    println!("Seeding property and units...");
    let (property_id, unit_ids) = seed_property(&db).await?;

    println!("Seeding users...");
    let assignments = AssignmentRepository::new(db.clone());
    for (email, full_name, role) in STAFF {
        let user_id = seed_user(&db, email, full_name, role, &password_hash).await?;
        if role.is_scoped() {
            assignments.assign(user_id, property_id).await?;
        }
    }
    let tenant_user = seed_user(
        &db,
        TENANT_EMAIL,
        "Selam Tesfaye",
        Role::Tenant,
        &password_hash,
    )
    .await?;

    println!("Seeding tenant and contract...");
    let tenant = TenantRepository::new(db.clone())
        .create(CreateTenantInput {
            user_id: Some(tenant_user),
            full_name: "Selam Tesfaye".to_string(),
            phone: "+251911223344".to_string(),
            email: Some(TENANT_EMAIL.to_string()),
        })
        .await?;

    let contract = ContractRepository::new(db.clone())
        .create(CreateContractInput {
            reference: "CTR-0001".to_string(),
            tenant_id: tenant.id,
            property_id,
            unit_ids: unit_ids.into_iter().take(2).collect(),
            status: ContractStatus::Active,
            monthly_rent_cents: 2_500_000,
            advance_payment_cents: 7_500_000,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).context("invalid start date")?,
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).context("invalid end date")?,
        })
        .await?;
    println!("  Contract {} ({})", contract.reference, contract.id);

    println!("Seeding complete!");
    Ok(())
}

async fn seed_property(db: &DatabaseConnection) -> anyhow::Result<(Uuid, Vec<Uuid>)> {
    let properties = PropertyRepository::new(db.clone());
    let property = properties
        .create_property("Bole Heights", "Bole Road 12, Addis Ababa")
        .await?;

    let mut unit_ids = Vec::new();
    for number in ["A-01", "A-02", "A-03", "A-04"] {
        unit_ids.push(properties.create_unit(property.id, number).await?.id);
    }
    Ok((property.id, unit_ids))
}

async fn seed_user(
    db: &DatabaseConnection,
    email: &str,
    full_name: &str,
    role: Role,
    password_hash: &str,
) -> anyhow::Result<Uuid> {
    let user = UserRepository::new(db.clone())
        .create(CreateUserInput {
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            full_name: full_name.to_string(),
            phone: None,
            role,
        })
        .await?;
    println!("  {role}: {email}");
    Ok(user.id)
}
