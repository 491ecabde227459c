use std::sync::Arc;

use anyhow::{Context, Result};
use persistence::seed::seed_demo_data;
use persistence::{EntityStore, FileStore, MemoryStore, PgStore};
use rate_desk_api::app::create_app;
use rate_desk_api::config::{Config, StoreBackend};
use rate_desk_api::middleware::{init_logging, init_metrics};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_logging(&config.logging)?;
    init_metrics()?;

    info!("Starting Rate Desk API v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config).await?;

    if config.store.seed_demo_data {
        if let Some(summary) = seed_demo_data(store.as_ref()).await? {
            info!(rates = summary.rates, "Demo catalogue loaded");
        }
    }

    let addr = config.socket_addr().context("invalid server address")?;
    let app = create_app(config, store);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn open_store(config: &Config) -> Result<Arc<dyn EntityStore>> {
    info!(backend = %config.store.backend, "Opening entity store");

    let store: Arc<dyn EntityStore> = match config.store.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::File => {
            let path = config
                .store
                .file_path
                .clone()
                .context("store.file_path is required for the file backend")?;
            Arc::new(FileStore::open(path).await?)
        }
        StoreBackend::Postgres => {
            let db_config = persistence::db::DatabaseConfig::from(&config.database);
            let pool = persistence::db::create_pool(&db_config).await?;
            persistence::db::run_migrations(&pool).await?;
            Arc::new(PgStore::init(pool).await?)
        }
    };

    Ok(store)
}
