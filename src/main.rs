use anyhow::Context;
use sqlx::Pool;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use courtvision::api;
use courtvision::ax_state::AppState;
use courtvision::infra::config::{BackendKind, Config, DEFAULT_LOG_FILTER};
use courtvision::infra::db::{self, Backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env()?;
    info!("CourtVision API v{} starting", env!("CARGO_PKG_VERSION"));

    match config.backend()? {
        BackendKind::MySql => {
            let pool = db::connect_mysql(&config.database_url, config.max_connections)
                .await
                .context("failed to connect to MySQL")?;
            serve(pool, config.bind_addr).await
        }
        BackendKind::Sqlite => {
            let pool = db::connect_sqlite(&config.database_url, config.max_connections)
                .await
                .context("failed to open SQLite database")?;
            serve(pool, config.bind_addr).await
        }
    }
}

async fn serve<DB: Backend>(db: Pool<DB>, addr: SocketAddr) -> anyhow::Result<()> {
    let state = Arc::new(AppState { db });
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("CourtVision API listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
