//! Inventory API server: ensures the database and tables exist, then serves
//! the CRUD routes with CORS for the configured frontend origin.

use axum::extract::DefaultBodyLimit;
use inventory_api::{
    app_router, apply_migrations, catalog, ensure_database_exists, AppState, Settings,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::EnvFilter;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("inventory_api=info")),
        )
        .init();

    let settings = Settings::from_env();
    ensure_database_exists(&settings.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;

    let catalog = Arc::new(catalog());
    apply_migrations(&pool, &catalog).await?;

    let state = AppState {
        pool,
        catalog,
    };

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(settings.cors_origin.parse()?))
        .allow_methods(Any)
        .allow_headers(Any);

    let app = app_router(state)
        .layer(cors)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
