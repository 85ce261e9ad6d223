// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregate;
pub mod api;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod sources;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{AggregateOptions, AggregationPipeline};
pub use crate::api::{create_router, AppState};
pub use crate::cache::SourceCache;
pub use crate::config::AppConfig;
pub use crate::model::{NormalizedItem, RawCandidate, SourceResult};
pub use crate::normalize::normalize_date;

use std::sync::Arc;

/// Build the full application router from a config: shared HTTP client,
/// cache, pipeline, state. Used by both `main` and the API tests.
pub fn app(config: &AppConfig) -> anyhow::Result<axum::Router> {
    let client = fetch::build_client(config.fetch_timeout)?;
    let cache = Arc::new(SourceCache::new(config.cache_ttl));
    let pipeline = Arc::new(AggregationPipeline::new(cache, client));
    let state = AppState::new(pipeline, config);
    Ok(api::create_router(state))
}
