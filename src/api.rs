//! HTTP surface.
//!
//! `GET /api/news` is the whole product: best-effort aggregation with
//! per-source errors reported inline, never a 500 for a failing site.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tower_http::cors::CorsLayer;

use crate::aggregate::{AggregateOptions, AggregationPipeline};
use crate::config::AppConfig;
use crate::model::{SourceInfo, SourceResult};
use crate::normalize::{target_offset, TARGET_TZ_NAME};
use crate::sources::registry;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<AggregationPipeline>,
    keep_undated: bool,
}

impl AppState {
    pub fn new(pipeline: Arc<AggregationPipeline>, config: &AppConfig) -> Self {
        Self {
            pipeline,
            keep_undated: config.keep_undated,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/news", get(news))
        .route("/api/sources", get(list_sources))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize, Default)]
struct NewsQuery {
    /// Comma-separated source keys; absent means all.
    sources: Option<String>,
    /// Any non-empty value bypasses the cache TTL.
    force: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct NewsResponse {
    tz: String,
    generated_at: String,
    sources: Vec<SourceResult>,
}

async fn news(State(state): State<AppState>, Query(q): Query<NewsQuery>) -> Json<NewsResponse> {
    let requested: Option<Vec<String>> = q.sources.as_deref().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    });
    let force = q.force.as_deref().is_some_and(|v| !v.is_empty());

    let descriptors = registry::resolve(requested.as_deref());
    let opts = AggregateOptions {
        force_refresh: force,
        keep_undated: state.keep_undated,
    };
    let results = state.pipeline.aggregate(&descriptors, &opts).await;

    Json(NewsResponse {
        tz: TARGET_TZ_NAME.to_string(),
        generated_at: Utc::now().with_timezone(&target_offset()).to_rfc3339(),
        sources: results,
    })
}

async fn list_sources() -> Json<Vec<SourceInfo>> {
    let out = registry::all()
        .iter()
        .map(|d| SourceInfo {
            key: d.key.to_string(),
            name: d.name.to_string(),
            color: d.color.to_string(),
        })
        .collect();
    Json(out)
}
