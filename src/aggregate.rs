//! Concurrent multi-source aggregation.
//!
//! One task per requested source, all driven through the cache,
//! awaited to completion regardless of individual outcome. A failing
//! source becomes its `SourceResult.error`; it never cancels or taints
//! the others.

use std::sync::Arc;

use chrono::{DateTime, Days, FixedOffset, NaiveTime, TimeZone, Utc};
use futures::future::join_all;
use metrics::{counter, histogram};
use tracing::{info, warn};

use crate::cache::SourceCache;
use crate::model::{NormalizedItem, SourceResult};
use crate::normalize::target_offset;
use crate::sources::SourceDescriptor;

#[derive(Debug, Clone)]
pub struct AggregateOptions {
    pub force_refresh: bool,
    /// Keep items whose date never resolved (sorted last). Policy flag:
    /// the alternative is dropping anything undated.
    pub keep_undated: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            force_refresh: false,
            keep_undated: true,
        }
    }
}

pub struct AggregationPipeline {
    cache: Arc<SourceCache>,
    client: reqwest::Client,
}

impl AggregationPipeline {
    pub fn new(cache: Arc<SourceCache>, client: reqwest::Client) -> Self {
        Self { cache, client }
    }

    /// Fetch, window and sort every source in `descriptors`. The result
    /// has exactly one `SourceResult` per descriptor, in input order.
    pub async fn aggregate(
        &self,
        descriptors: &[SourceDescriptor],
        opts: &AggregateOptions,
    ) -> Vec<SourceResult> {
        counter!("aggregate_runs_total").increment(1);
        let now = Utc::now().with_timezone(&target_offset());
        let window = retention_window(now);

        let tasks = descriptors.iter().map(|desc| {
            let cache = Arc::clone(&self.cache);
            let client = self.client.clone();
            let adapter = Arc::clone(&desc.adapter);
            let desc = desc.clone();
            let force = opts.force_refresh;
            let keep_undated = opts.keep_undated;
            async move {
                let started = std::time::Instant::now();
                let fetched = cache
                    .get(desc.key, force, || async move {
                        adapter.fetch_items(&client).await
                    })
                    .await;
                histogram!("source_fetch_ms").record(started.elapsed().as_millis() as f64);

                match fetched {
                    Ok(items) => {
                        let items = window_and_sort(items.as_ref(), window, keep_undated);
                        info!(
                            source = desc.key,
                            items = items.len(),
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "source aggregated"
                        );
                        SourceResult {
                            key: desc.key.to_string(),
                            name: desc.name.to_string(),
                            color: desc.color.to_string(),
                            items,
                            error: None,
                        }
                    }
                    Err(err) => {
                        counter!("source_fetch_errors_total").increment(1);
                        warn!(source = desc.key, error = %err, "source fetch failed");
                        SourceResult {
                            key: desc.key.to_string(),
                            name: desc.name.to_string(),
                            color: desc.color.to_string(),
                            items: Vec::new(),
                            error: Some(format!("{err:#}")),
                        }
                    }
                }
            }
        });

        join_all(tasks).await
    }
}

/// Inclusive calendar-day window `[start of yesterday, end of today]`
/// in the target timezone. Day boundaries, not a rolling 48 hours.
pub fn retention_window(
    now: DateTime<FixedOffset>,
) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let today = now.date_naive();
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    let tz = target_offset();
    let start = tz
        .from_local_datetime(&yesterday.and_time(NaiveTime::MIN))
        .single()
        .unwrap_or(now);
    let end = tz
        .from_local_datetime(
            &today.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)),
        )
        .single()
        .unwrap_or(now);
    (start, end)
}

/// Window filter plus stable descending sort; undated items keep their
/// relative listing order at the tail when retained.
fn window_and_sort(
    items: &[NormalizedItem],
    (start, end): (DateTime<FixedOffset>, DateTime<FixedOffset>),
    keep_undated: bool,
) -> Vec<NormalizedItem> {
    let mut kept: Vec<NormalizedItem> = items
        .iter()
        .filter(|it| match it.published_at {
            Some(ts) => ts >= start && ts <= end,
            None => keep_undated,
        })
        .cloned()
        .collect();
    kept.sort_by(|a, b| match (b.published_at, a.published_at) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    });
    kept
}
