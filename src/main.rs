use std::sync::Arc;

use listing_recommender::{
    config::Config,
    db::{create_pool, InMemoryStore, ListingStore, PgListingStore},
    routes::{create_router, AppState},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn ListingStore> = if config.in_memory_store {
        tracing::warn!("Using in-memory store, data will not survive a restart");
        Arc::new(InMemoryStore::new())
    } else {
        let pool = create_pool(&config.database_url).await?;
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("Database migrations applied");
        Arc::new(PgListingStore::new(pool))
    };

    let app = create_router(AppState::new(store, &config));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(host = %config.host, port = config.port, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
