use std::sync::Arc;

use anyhow::Context;
use staff_api::config::AppConfig;
use staff_api::database::{CredentialStore, DatabaseManager, EmployeeStore, MemoryStore, PgStore};
use staff_api::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("staff_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting Staff API in {:?} mode", config.environment);

    let (credentials, employees, manager): (Arc<dyn CredentialStore>, Arc<dyn EmployeeStore>, _) =
        if config.database.url.is_some() {
            let manager = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            let store = Arc::new(PgStore::new(manager.pool()));
            (store.clone(), store, Some(manager))
        } else {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on exit");
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store, None)
        };

    let bind_addr = config.bind_address();
    let state = AppState::new(config, credentials, employees)?;
    let app = staff_api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Staff API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(manager) = manager {
        manager.close().await;
    }
    tracing::info!("Staff API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
