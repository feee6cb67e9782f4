use users_api::{app, config::AppConfig, db, repositories::SqliteUserRepository, AppState};

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "users_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing DATABASE_URL is fatal
    let config = AppConfig::from_env()?;
    tracing::info!(environment = %config.environment, "Configuration loaded");

    // Database connection
    let pool = db::create_pool(&config.database).await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    let user_repository = Arc::new(SqliteUserRepository::new(pool));
    let app_state = AppState::new(user_repository);

    let app = app::build_app(app_state, &config);

    // Start server
    let addr = config.server.socket_addr()?;
    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
