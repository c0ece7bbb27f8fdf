use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinematch_api::{
    config::Config,
    db::{create_pool, create_redis_client, Cache, CacheWriterHandle, InMemoryStore, PgStore},
    routes::{create_router, AppState},
    services::{ArtifactStore, DisabledProvider, MetadataProvider, TmdbProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinematch_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let artifacts = ArtifactStore::new(config.artifact_path.clone());
    if config.preload_artifact {
        artifacts.preload().await;
    }

    let (provider, cache_handle) = metadata_provider(&config).await?;

    let state = match config.database_url.as_deref() {
        Some(url) => {
            let pool = create_pool(url)
                .await
                .context("Failed to connect to PostgreSQL")?;
            let store = Arc::new(PgStore::new(pool));
            tracing::info!("Using PostgreSQL document store");
            AppState::new(&config, artifacts, provider, store.clone(), store)
        }
        None => {
            let store = Arc::new(InMemoryStore::new());
            tracing::warn!("DATABASE_URL not set, watchlist and reviews are kept in memory");
            AppState::new(&config, artifacts, provider, store.clone(), store)
        }
    };

    let app = create_router(Arc::new(state));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}

async fn metadata_provider(
    config: &Config,
) -> anyhow::Result<(Arc<dyn MetadataProvider>, Option<CacheWriterHandle>)> {
    let Some(api_key) = config.tmdb_api_key.clone() else {
        tracing::warn!("TMDB_API_KEY not set, movie metadata is disabled");
        let provider: Arc<dyn MetadataProvider> = Arc::new(DisabledProvider);
        return Ok((provider, None));
    };

    let redis_client =
        create_redis_client(&config.redis_url).context("Failed to create Redis client")?;
    let (cache, handle) = Cache::new(redis_client).await;
    let provider: Arc<dyn MetadataProvider> =
        Arc::new(TmdbProvider::new(cache, api_key, config.tmdb_api_url.clone()));

    Ok((provider, Some(handle)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
