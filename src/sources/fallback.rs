//! Detail-page metadata fallback.
//!
//! When a listing entry carries no image or no usable date, the item's
//! own page usually does, in well-known meta tags. This is a total
//! best-effort step: any network or parse problem yields an empty
//! `FallbackMeta`, by contract — the caller never has to handle an error
//! from here.

use chrono::{DateTime, FixedOffset};
use scraper::{Html, Selector};
use tracing::debug;

use crate::fetch;
use crate::normalize::normalize_date;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackMeta {
    pub image: Option<String>,
    pub published_at: Option<DateTime<FixedOffset>>,
}

/// Meta attributes checked for an image, in priority order.
const IMAGE_SELECTORS: [&str; 4] = [
    r#"meta[property="og:image"]"#,
    r#"meta[name="twitter:image"]"#,
    r#"meta[itemprop="image"]"#,
    "article img[src]",
];

/// Meta/time attributes checked for a publish timestamp, in priority order.
const DATE_SELECTORS: [(&str, &str); 4] = [
    (r#"meta[property="article:published_time"]"#, "content"),
    (r#"meta[itemprop="datePublished"]"#, "content"),
    ("time[datetime]", "datetime"),
    (r#"meta[name="date"]"#, "content"),
];

/// Fetch `detail_url` and extract best-effort image and timestamp.
pub async fn fetch_fallback(client: &reqwest::Client, detail_url: &str) -> FallbackMeta {
    let html = match fetch::fetch_text(client, detail_url).await {
        Ok(body) => body,
        Err(err) => {
            debug!(url = detail_url, error = %err, "metadata fallback fetch failed");
            return FallbackMeta::default();
        }
    };
    extract_meta(&html)
}

/// Pure extraction half, separated so tests can feed HTML directly.
pub fn extract_meta(html: &str) -> FallbackMeta {
    let doc = Html::parse_document(html);

    let image = IMAGE_SELECTORS.iter().find_map(|sel| {
        let selector = Selector::parse(sel).ok()?;
        let el = doc.select(&selector).next()?;
        let attr = if sel.starts_with("meta") { "content" } else { "src" };
        el.value().attr(attr).map(str::to_string)
    });

    let published_at = DATE_SELECTORS.iter().find_map(|(sel, attr)| {
        let selector = Selector::parse(sel).ok()?;
        let el = doc.select(&selector).next()?;
        normalize_date(el.value().attr(attr)?)
    });

    FallbackMeta {
        image,
        published_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn og_image_wins_over_article_img() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://ex.com/og.jpg">
            </head><body><article><img src="/body.jpg"></article></body></html>"#;
        let meta = extract_meta(html);
        assert_eq!(meta.image.as_deref(), Some("https://ex.com/og.jpg"));
    }

    #[test]
    fn published_time_meta_is_normalized() {
        let html = r#"<html><head>
            <meta property="article:published_time" content="2025-11-04T18:45:00-03:00">
            </head></html>"#;
        let meta = extract_meta(html);
        let want = crate::normalize::target_offset()
            .with_ymd_and_hms(2025, 11, 4, 18, 45, 0)
            .unwrap();
        assert_eq!(meta.published_at, Some(want));
    }

    #[test]
    fn time_element_datetime_attribute() {
        let html = r#"<html><body><time datetime="2025-11-04">quarta</time></body></html>"#;
        let meta = extract_meta(html);
        assert!(meta.published_at.is_some());
        assert!(meta.image.is_none());
    }

    #[test]
    fn empty_page_yields_default() {
        assert_eq!(extract_meta("<html></html>"), FallbackMeta::default());
    }
}
