//! General-ledger API server.
//!
//! Loads configuration, connects to Postgres and serves the ledger API.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gl_api::{AppState, create_router};
use gl_core::policy::PostingPolicy;
use gl_db::{JournalEntryRepository, LedgerAccountRepository, connect};
use gl_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gl=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Posting policy is fixed for the lifetime of the process
    let policy = PostingPolicy::from_config(&config.ledger.policy)?;
    info!(
        ledger_codes = ?policy.ledger_codes(),
        "Posting policy loaded"
    );

    // Connect to database
    let db = connect(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    // Create application state
    let state = AppState::new(
        Arc::new(LedgerAccountRepository::new(db.clone())),
        Arc::new(JournalEntryRepository::new(db)),
        Arc::new(policy),
    );

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
