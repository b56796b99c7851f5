use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moviefinder::{
    config::Config,
    db::{create_pool, create_redis_client, Cache, CacheWriterHandle, TitleStore},
    routes::{create_router, AppState},
    services::{CatalogRepository, TmdbClient},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("moviefinder=debug,tower_http=info")
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = create_pool(&config.database_url)
        .await
        .context("Failed to open local store")?;
    tracing::info!(database_url = %config.database_url, "Local store ready");

    let mut client = TmdbClient::from_config(&config)?;
    let mut cache_handle: Option<CacheWriterHandle> = None;
    if let Some(redis_url) = &config.redis_url {
        let redis_client = create_redis_client(redis_url).context("Invalid REDIS_URL")?;
        let (cache, handle) = Cache::new(redis_client).await;
        client = client.with_cache(cache);
        cache_handle = Some(handle);
        tracing::info!("Detail cache enabled");
    } else {
        tracing::info!("REDIS_URL not set, detail cache disabled");
    }

    let catalog = CatalogRepository::new(
        Arc::new(client),
        config.tmdb_language.clone(),
        config.tmdb_fallback_language.clone(),
    );
    let state = AppState::new(catalog, TitleStore::new(pool), config.saved_page_size);
    let app = create_router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
