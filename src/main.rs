use api_rest::AppState;
use lab_core::{CoreConfig, Database};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the lab records service
///
/// Opens the database pool, applies pending migrations and serves the REST API (with
/// OpenAPI/Swagger UI) until interrupted.
///
/// # Environment Variables
/// - `DATABASE_URL`: SQLite database URL (default: "sqlite://lab.db", created if missing)
/// - `LAB_DB_MAX_CONNECTIONS`: Pool capacity (default: 10)
/// - `LAB_DB_ACQUIRE_TIMEOUT_SECS`: Seconds to wait for a pooled connection (default: 30)
/// - `LAB_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the database cannot be opened or migrated,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lab=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env_values(
        std::env::var("DATABASE_URL").ok(),
        std::env::var("LAB_DB_MAX_CONNECTIONS").ok(),
        std::env::var("LAB_DB_ACQUIRE_TIMEOUT_SECS").ok(),
    )?;
    let rest_addr = std::env::var("LAB_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let db = Database::connect(&cfg).await?;
    db.migrate().await?;
    tracing::info!("++ Database ready at {}", cfg.database_url());

    let app = api_rest::router(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    tracing::info!("++ Starting lab REST API on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for shutdown signal: {e}");
            }
        })
        .await?;

    tracing::info!("-- Lab REST API stopped");
    Ok(())
}
