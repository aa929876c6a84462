use std::{error::Error, sync::Arc};

use board_api::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::{MemoryRepository, PostgresRepository, RepositoryState},
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, picks the store and serves the router.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // 1. Configuration (fail fast on a missing or weak secret)
    dotenv::dotenv().ok();
    let config = AppConfig::load()?;

    // 2. Logging: RUST_LOG wins, otherwise debug for this crate.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "board_api=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Store: Postgres when DATABASE_URL is set, in-memory otherwise (local only,
    // production config refuses to load without a database).
    let repo: RepositoryState = match &config.db_url {
        Some(db_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(db_url)
                .await?;
            let repo = PostgresRepository::new(pool);
            repo.migrate().await?;
            tracing::info!("Connected to Postgres, migrations applied");
            Arc::new(repo)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store; data is lost on exit");
            Arc::new(MemoryRepository::new())
        }
    };

    // 4. Router and server
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(repo, config));

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("OpenAPI document at http://{}/api-docs/openapi.json", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
