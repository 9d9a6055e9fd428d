use std::sync::Arc;

use cinema_api::{
    cache::Cache,
    config::Config,
    routes::{create_router, AppState},
    services::{providers::TmdbProvider, CatalogService},
    store::WatchlistStore,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let provider = TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_language.clone(),
    );
    let catalog = CatalogService::new(Arc::new(provider), Cache::new());
    let watchlist = WatchlistStore::load(&config.watchlist_path);

    let state = AppState {
        catalog: Arc::new(catalog),
        watchlist: Arc::new(watchlist),
    };
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
