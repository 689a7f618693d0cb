use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use groups_api::{build_router, AppState};
use groups_core::repositories::GroupRepository;
use groups_infrastructure::{create_pool, run_migrations, MemoryGroupRepository, PgGroupRepository};
use groups_shared::config::{AppConfig, StorageBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = groups_shared::telemetry::init_telemetry(&config.log)?;

    info!(env = %config.app.env, "Groups server starting...");

    let repository = build_repository(&config).await?;
    let state = AppState::new(repository, config.clone());
    let app = build_router(state);

    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Groups server stopped");
    Ok(())
}

async fn build_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn GroupRepository>> {
    match config.database.backend {
        StorageBackend::Postgres => {
            let url = config
                .database
                .url
                .as_deref()
                .context("database.url is required for the postgres backend")?;

            info!("Connecting to database...");
            let pool = create_pool(url, &config.database).await?;
            info!("Database connection established.");

            if config.database.run_migrations {
                run_migrations(&pool).await?;
            }
            Ok(Arc::new(PgGroupRepository::new(pool)))
        }
        StorageBackend::Memory => {
            info!("Using in-memory group storage");
            let repository = MemoryGroupRepository::new();
            repository
                .seed(&config.database.seed_members)
                .await
                .context("Invalid database.seed_members entry")?;
            Ok(Arc::new(repository))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
