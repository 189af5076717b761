use std::sync::Arc;

use anyhow::Context;
use darulabror_api::{
    app,
    config::AppConfig,
    database::Database,
    init_tracing,
    state::{AppState, Repositories},
    storage::GcsStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env();
    init_tracing(config.is_production());
    tracing::info!("Starting Darul Abror API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set: logins and admin routes will fail");
    }
    if config.storage.public_bucket.is_none() {
        tracing::warn!("PUBLIC_BUCKET is not set: article uploads are disabled");
    }

    let db = Database::connect(&config.database)
        .await
        .context("failed to connect to the database")?;

    let repos = Repositories::postgres(&db);
    let store = Arc::new(GcsStore::new(&config.storage));
    let port = config.server.port;

    let state = AppState::new(config, repos, store, Some(db.clone()));
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Darul Abror API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("shutdown signal received");
}
