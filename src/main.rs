use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hitch_server::config::{Config, StorageBackend};
use hitch_server::storage::{MemoryStorage, PgStorage, Storage};
use hitch_server::{constants, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hitch_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Hitch API server...");

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Environment: {}, Server: {}",
        config.environment,
        config.server_address()
    );

    // Select the storage backend
    let storage: Arc<dyn Storage> = match config.storage_backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage (state is lost on shutdown)");
            Arc::new(MemoryStorage::new())
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL not set"))?;
            let storage = PgStorage::connect(database_url).await?;

            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations").run(storage.pool()).await?;
            tracing::info!("Migrations complete");

            Arc::new(storage)
        }
    };

    // Seed the reward catalog on first startup
    storage.seed_rewards(constants::reward_catalog()).await?;

    // Configure CORS
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);

    // Create app state and build the router
    let state = AppState::new(storage, config.clone());
    let app = routes::router(state).layer(cors);

    // Start server
    let addr: SocketAddr = config.server_address().parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
