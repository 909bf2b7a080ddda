use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use todo_api::{
    AppState,
    config::{Settings, StorageBackend},
    create_router,
    repositories::MIGRATOR,
};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting todo API service");

    let state = match settings.storage.backend {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            run_migrations(&pool, &MIGRATOR).await?;
            AppState::postgres(pool)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data will be lost on shutdown");
            AppState::in_memory()
        }
    };

    info!("Todo API service initialized successfully");

    let app = create_router(state);

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Todo API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
