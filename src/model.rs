//! Domain and wire types shared across the pipeline.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Raw extraction output of one listing-page entry, before date
/// normalization and fallback enrichment. Never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub title: String,
    pub url: String,
    pub image: Option<String>,
    pub raw_date_text: Option<String>,
}

/// One fully normalized item as exposed on the JSON surface.
///
/// `published_at` is either an instant the normalizer produced or `None`
/// when every date signal (listing text and fallback metadata) failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedItem {
    pub title: String,
    pub url: String,
    pub image: Option<String>,
    pub published_at: Option<DateTime<FixedOffset>>,
}

/// Per-source slice of an aggregation response. `error` is set and
/// `items` empty when the source's fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceResult {
    pub key: String,
    pub name: String,
    pub color: String,
    pub items: Vec<NormalizedItem>,
    pub error: Option<String>,
}

/// Registry listing entry for `GET /api/sources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub key: String,
    pub name: String,
    pub color: String,
}
