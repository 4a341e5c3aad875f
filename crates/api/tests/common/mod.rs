//! Shared fixtures for HTTP integration tests.
//!
//! Each test app runs the real router against its own in-memory SQLite
//! database and records SMS notices instead of sending them.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::NaiveDate;
use fake::Fake;
use fake::faker::name::en::Name;
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use estatedesk_api::{AppState, create_router};
use estatedesk_core::auth::{Role, hash_password};
use estatedesk_core::notification::{Notifier, NotifyError, SmsNotice};
use estatedesk_core::termination::ContractStatus;
use estatedesk_db::migration::{Migrator, MigratorTrait};
use estatedesk_db::repositories::{CreateContractInput, CreateTenantInput, CreateUserInput};
use estatedesk_db::{
    AssignmentRepository, ContractRepository, PropertyRepository, TenantRepository,
    UserRepository,
};
use estatedesk_shared::{JwtConfig, JwtService};

pub const TENANT_EMAIL: &str = "tenant@estatedesk.test";
pub const TENANT_PASSWORD: &str = "correct horse battery";
pub const TENANT_PHONE: &str = "+251911223344";

/// Notifier that keeps every notice in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<SmsNotice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<SmsNotice> {
        self.notices.lock().expect("notifier lock").clone()
    }

    /// Waits for background deliveries to reach `count`.
    pub async fn wait_for(&self, count: usize) -> Vec<SmsNotice> {
        for _ in 0..100 {
            if self.notices().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.notices()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notice: &SmsNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notifier lock")
            .push(notice.clone());
        Ok(())
    }
}

/// The router plus handles to everything behind it.
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub jwt: Arc<JwtService>,
    pub notifier: Arc<RecordingNotifier>,
    pub contract_id: Uuid,
    pub system_admin: Uuid,
    pub owner: Uuid,
    pub accountant: Uuid,
    pub outside_accountant: Uuid,
    pub tenant: Uuid,
}

impl TestApp {
    /// One property with a two-unit active contract and its staff.
    pub async fn new() -> Self {
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

        let properties = PropertyRepository::new(db.clone());
        let property = properties
            .create_property("Bole Heights", "Bole Road 12, Addis Ababa")
            .await
            .expect("property");
        let other_property = properties
            .create_property("Kazanchis Plaza", "Kazanchis 4")
            .await
            .expect("property");
        let mut unit_ids = Vec::new();
        for number in ["A-01", "A-02"] {
            let unit = properties
                .create_unit(property.id, number)
                .await
                .expect("unit");
            unit_ids.push(unit.id);
        }

        let system_admin = create_user(&db, "admin@estatedesk.test", Role::SystemAdmin, None).await;
        let owner = create_user(&db, "owner@estatedesk.test", Role::Owner, None).await;
        let accountant = create_user(&db, "accountant@estatedesk.test", Role::Accountant, None).await;
        let outside_accountant =
            create_user(&db, "accountant2@estatedesk.test", Role::Accountant, None).await;
        let tenant = create_user(&db, TENANT_EMAIL, Role::Tenant, Some(TENANT_PASSWORD)).await;

        let assignments = AssignmentRepository::new(db.clone());
        assignments.assign(accountant, property.id).await.expect("assign");
        assignments
            .assign(outside_accountant, other_property.id)
            .await
            .expect("assign");

        let tenant_name: String = Name().fake();
        let tenant_record = TenantRepository::new(db.clone())
            .create(CreateTenantInput {
                user_id: Some(tenant),
                full_name: tenant_name,
                phone: TENANT_PHONE.to_string(),
                email: None,
            })
            .await
            .expect("tenant");

        let contract = ContractRepository::new(db.clone())
            .create(CreateContractInput {
                reference: "CTR-0100".to_string(),
                tenant_id: tenant_record.id,
                property_id: property.id,
                unit_ids,
                status: ContractStatus::Active,
                monthly_rent_cents: 100_000,
                advance_payment_cents: 300_000,
                start_date: NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
                end_date: NaiveDate::from_ymd_opt(2026, 12, 31).expect("valid date"),
            })
            .await
            .expect("contract");

        let jwt = Arc::new(JwtService::new(JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expires_secs: 900,
        }));
        let notifier = Arc::new(RecordingNotifier::default());
        let state = AppState {
            db: Arc::new(db.clone()),
            jwt_service: jwt.clone(),
            notifier: notifier.clone(),
        };

        Self {
            router: create_router(state),
            db,
            jwt,
            notifier,
            contract_id: contract.id,
            system_admin,
            owner,
            accountant,
            outside_accountant,
            tenant,
        }
    }

    /// A valid access token for the user.
    pub fn token(&self, user_id: Uuid, role: Role) -> String {
        self.jwt
            .generate_access_token(user_id, role.as_str())
            .expect("token")
    }

    /// Sends one request and returns the status and JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, json)
    }
}

async fn create_user(
    db: &DatabaseConnection,
    email: &str,
    role: Role,
    password: Option<&str>,
) -> Uuid {
    let password_hash = match password {
        Some(password) => hash_password(password).expect("hash"),
        None => "$argon2id$v=19$m=19456,t=2,p=1$fixture$fixture".to_string(),
    };
    let full_name: String = Name().fake();

    UserRepository::new(db.clone())
        .create(CreateUserInput {
            email: email.to_string(),
            password_hash,
            full_name,
            phone: None,
            role,
        })
        .await
        .expect("user")
        .id
}
