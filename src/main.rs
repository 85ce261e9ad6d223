//! Regional News Aggregator — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use noticia_aggregator::config::AppConfig;
use noticia_aggregator::metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("noticia_aggregator=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = AppConfig::load()?;
    tracing::info!(
        bind = %config.bind_addr,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        fetch_timeout_secs = config.fetch_timeout.as_secs(),
        keep_undated = config.keep_undated,
        "starting news aggregator"
    );

    let metrics_handle = metrics::install(config.cache_ttl.as_secs())?;
    let router = noticia_aggregator::app(&config)?.merge(metrics::router(metrics_handle));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
