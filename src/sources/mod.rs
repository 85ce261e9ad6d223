//! Source adapters.
//!
//! One generic selector-driven engine (`ScrapeAdapter`) does the listing
//! extraction for every configured outlet; per-site differences live in
//! `ScrapeConfig` records plus an optional quirk hook. The registry in
//! [`registry`] is the process-wide list of configured sources.

pub mod fallback;
pub mod registry;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::fetch;
use crate::model::{NormalizedItem, RawCandidate};
use crate::normalize::normalize_date;

/// How many detail pages one adapter fetch may hit concurrently for
/// metadata fallback.
const FALLBACK_CONCURRENCY: usize = 4;

/// A source of news items. Implementations must treat "nothing matched"
/// as an empty list, never as an error, and must return items in the
/// listing page's original order.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch_items(&self, client: &reqwest::Client) -> Result<Vec<NormalizedItem>>;
}

/// Static registry entry: identity plus the adapter that feeds it.
#[derive(Clone)]
pub struct SourceDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub adapter: Arc<dyn SourceAdapter>,
}

/// Where the raw date text of a listing entry comes from.
#[derive(Debug, Clone, Copy)]
pub enum DateLocation {
    /// Inner text of the matched element.
    Text(&'static str),
    /// An attribute of the matched element, e.g. `time[datetime]`.
    Attr(&'static str, &'static str),
}

/// Declarative per-source extraction recipe for [`ScrapeAdapter`].
#[derive(Clone)]
pub struct ScrapeConfig {
    pub key: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub list_url: &'static str,
    /// One match per candidate item.
    pub item_selector: &'static str,
    /// Relative to the item element; `None` means the item's own text.
    pub title_selector: Option<&'static str>,
    /// Relative to the item element; `None` means the item itself is the `<a>`.
    pub link_selector: Option<&'static str>,
    pub image_selector: Option<&'static str>,
    /// Attribute holding the image URL (`src`, `data-src`, ...).
    pub image_attr: &'static str,
    pub date: Option<DateLocation>,
    /// Fetch the detail page for candidates still missing image or date.
    pub use_fallback: bool,
    /// Site-specific candidate touch-up, applied before normalization.
    pub quirk: Option<fn(&mut RawCandidate)>,
}

/// The generic listing-page adapter: fetch, select, normalize, enrich.
pub struct ScrapeAdapter {
    cfg: ScrapeConfig,
}

impl ScrapeAdapter {
    pub fn new(cfg: ScrapeConfig) -> Self {
        Self { cfg }
    }

    pub fn descriptor(cfg: ScrapeConfig) -> SourceDescriptor {
        let (key, name, color) = (cfg.key, cfg.name, cfg.color);
        SourceDescriptor {
            key,
            name,
            color,
            adapter: Arc::new(Self::new(cfg)),
        }
    }
}

#[async_trait]
impl SourceAdapter for ScrapeAdapter {
    async fn fetch_items(&self, client: &reqwest::Client) -> Result<Vec<NormalizedItem>> {
        let html = fetch::fetch_text(client, self.cfg.list_url)
            .await
            .with_context(|| format!("fetching listing for {}", self.cfg.key))?;

        // `Html` is not Send, so extraction stays fully synchronous and
        // the parsed document is gone before the first await below.
        let candidates = extract_candidates(&html, &self.cfg)?;
        debug!(
            source = self.cfg.key,
            candidates = candidates.len(),
            "extracted listing candidates"
        );

        let mut items: Vec<NormalizedItem> = candidates
            .into_iter()
            .map(|c| NormalizedItem {
                published_at: c.raw_date_text.as_deref().and_then(normalize_date),
                title: c.title,
                url: c.url,
                image: c.image,
            })
            .collect();

        if self.cfg.use_fallback {
            enrich_with_fallback(client, &mut items).await;
        }
        Ok(items)
    }
}

fn parse_selector(sel: &str) -> Result<Selector> {
    Selector::parse(sel).map_err(|e| anyhow!("invalid selector `{sel}`: {e}"))
}

fn collapse_text(texts: impl Iterator<Item = impl AsRef<str>>) -> String {
    texts
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the selector recipe over one listing page. Candidates without a
/// usable title and link are skipped, not errors; listing order is kept.
pub fn extract_candidates(html: &str, cfg: &ScrapeConfig) -> Result<Vec<RawCandidate>> {
    let doc = Html::parse_document(html);
    let base = Url::parse(cfg.list_url).with_context(|| format!("bad list_url for {}", cfg.key))?;

    let item_sel = parse_selector(cfg.item_selector)?;
    let title_sel = cfg.title_selector.map(parse_selector).transpose()?;
    let link_sel = cfg.link_selector.map(parse_selector).transpose()?;
    let image_sel = cfg.image_selector.map(parse_selector).transpose()?;
    let date_sel = match cfg.date {
        Some(DateLocation::Text(s)) | Some(DateLocation::Attr(s, _)) => Some(parse_selector(s)?),
        None => None,
    };

    let mut out = Vec::new();
    for el in doc.select(&item_sel) {
        let title = match &title_sel {
            Some(sel) => el
                .select(sel)
                .next()
                .map(|t| collapse_text(t.text()))
                .unwrap_or_default(),
            None => collapse_text(el.text()),
        };

        let href = match &link_sel {
            Some(sel) => el.select(sel).next().and_then(|a| a.value().attr("href")),
            None => el.value().attr("href"),
        };
        let url = href
            .and_then(|h| base.join(h).ok())
            .map(|u| u.to_string())
            .unwrap_or_default();

        if title.is_empty() || url.is_empty() {
            continue;
        }

        let image = image_sel.as_ref().and_then(|sel| {
            el.select(sel)
                .next()
                .and_then(|img| img.value().attr(cfg.image_attr))
                .and_then(|src| base.join(src).ok())
                .map(|u| u.to_string())
        });

        let raw_date_text = match (&cfg.date, &date_sel) {
            (Some(DateLocation::Text(_)), Some(sel)) => {
                el.select(sel).next().map(|d| collapse_text(d.text()))
            }
            (Some(DateLocation::Attr(_, attr)), Some(sel)) => el
                .select(sel)
                .next()
                .and_then(|d| d.value().attr(attr))
                .map(str::to_string),
            _ => None,
        }
        .filter(|s| !s.is_empty());

        let mut candidate = RawCandidate {
            title,
            url,
            image,
            raw_date_text,
        };
        if let Some(hook) = cfg.quirk {
            hook(&mut candidate);
        }
        out.push(candidate);
    }
    Ok(out)
}

/// Fill missing image/date from each item's own page, a few at a time.
/// Failures inside the fallback never surface; the item simply stays as
/// extracted from the listing.
async fn enrich_with_fallback(client: &reqwest::Client, items: &mut [NormalizedItem]) {
    let pending: Vec<(usize, String)> = items
        .iter()
        .enumerate()
        .filter(|(_, it)| it.image.is_none() || it.published_at.is_none())
        .map(|(i, it)| (i, it.url.clone()))
        .collect();
    if pending.is_empty() {
        return;
    }

    let fetched: Vec<(usize, fallback::FallbackMeta)> = stream::iter(pending)
        .map(|(i, url)| async move { (i, fallback::fetch_fallback(client, &url).await) })
        .buffer_unordered(FALLBACK_CONCURRENCY)
        .collect()
        .await;

    for (i, meta) in fetched {
        let item = &mut items[i];
        if item.image.is_none() {
            item.image = meta.image;
        }
        if item.published_at.is_none() {
            item.published_at = meta.published_at;
        }
    }
}

impl std::fmt::Debug for SourceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDescriptor")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cfg() -> ScrapeConfig {
        ScrapeConfig {
            key: "test",
            name: "Test",
            color: "#123456",
            list_url: "https://example.com/noticias",
            item_selector: "article.card",
            title_selector: Some("h2"),
            link_selector: Some("a"),
            image_selector: Some("img"),
            image_attr: "src",
            date: Some(DateLocation::Text("span.date")),
            use_fallback: false,
            quirk: None,
        }
    }

    const PAGE: &str = r#"<html><body>
        <article class="card">
          <h2>Primeira manchete</h2>
          <a href="/a/primeira">leia</a>
          <img src="/img/1.jpg">
          <span class="date">Publicado em: 04/11/2025 09h30</span>
        </article>
        <article class="card">
          <h2>Sem data</h2>
          <a href="https://other.example.com/b">leia</a>
        </article>
        <article class="card">
          <h2></h2>
          <a href="/droppped">sem titulo</a>
        </article>
    </body></html>"#;

    #[test]
    fn extracts_in_listing_order_and_resolves_urls() {
        let cands = extract_candidates(PAGE, &test_cfg()).unwrap();
        assert_eq!(cands.len(), 2);
        assert_eq!(cands[0].title, "Primeira manchete");
        assert_eq!(cands[0].url, "https://example.com/a/primeira");
        assert_eq!(cands[0].image.as_deref(), Some("https://example.com/img/1.jpg"));
        assert_eq!(
            cands[0].raw_date_text.as_deref(),
            Some("Publicado em: 04/11/2025 09h30")
        );
        assert_eq!(cands[1].url, "https://other.example.com/b");
        assert!(cands[1].raw_date_text.is_none());
    }

    #[test]
    fn empty_page_is_not_an_error() {
        let cands = extract_candidates("<html></html>", &test_cfg()).unwrap();
        assert!(cands.is_empty());
    }

    #[test]
    fn quirk_hook_runs_before_normalization() {
        let mut cfg = test_cfg();
        cfg.quirk = Some(|c: &mut RawCandidate| {
            c.title = c.title.to_uppercase();
        });
        let cands = extract_candidates(PAGE, &cfg).unwrap();
        assert_eq!(cands[0].title, "PRIMEIRA MANCHETE");
    }
}
