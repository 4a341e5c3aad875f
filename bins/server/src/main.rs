//! EstateDesk API Server
//!
//! Main entry point for the EstateDesk backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use estatedesk_api::sms::{HttpSmsNotifier, LogNotifier};
use estatedesk_api::{AppState, create_router};
use estatedesk_core::notification::Notifier;
use estatedesk_db::connect_with;
use estatedesk_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "estatedesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_secs: i64::try_from(config.jwt.access_token_expiry_secs)
            .context("access token expiry out of range")?,
    });

    let notifier: Arc<dyn Notifier> = if config.sms.enabled {
        info!(gateway = %config.sms.gateway_url, "SMS notifications enabled");
        Arc::new(HttpSmsNotifier::new(&config.sms)?)
    } else {
        warn!("SMS notifications disabled, notices will only be logged");
        Arc::new(LogNotifier)
    };

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        notifier,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
