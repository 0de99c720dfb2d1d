use axum_helpers::create_app;
use bookswap_api::{AppState, Config, StorageBackend, build_router};
use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use migration::Migrator;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    observability::init_metrics().map_err(|e| eyre::eyre!("Metrics recorder failed: {}", e))?;

    let state = match (config.storage, config.database.clone()) {
        (StorageBackend::Postgres, Some(db_config)) => {
            let db = connect_from_config_with_retry(db_config, None)
                .await
                .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

            if config.run_migrations {
                run_migrations::<Migrator>(&db, config.app.name).await?;
            }

            AppState::postgres(config, db)?
        }
        (StorageBackend::Postgres, None) => {
            eyre::bail!("STORAGE_BACKEND=postgres requires DATABASE_URL")
        }
        (StorageBackend::Memory, _) => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            AppState::in_memory(config)?
        }
    };

    info!(
        storage = %state.config.storage,
        posting = state.config.posting.service_url.as_deref().unwrap_or("log"),
        "Starting BookSwap API"
    );

    let app = build_router(state.clone())?;
    let server = state.config.server.clone();

    create_app(app, &server, async move {
        if let Some(db) = state.db {
            info!("Shutting down: closing database connections");
            match db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("BookSwap API shutdown complete");
    Ok(())
}
