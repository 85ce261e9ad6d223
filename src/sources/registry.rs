//! The configured sources.
//!
//! Each outlet is one `ScrapeConfig` record; the extraction engine in
//! the parent module is shared. Selector recipes follow each site's
//! current listing markup. The registry is built once at process start
//! and never mutated.

use once_cell::sync::Lazy;

use super::{DateLocation, ScrapeAdapter, ScrapeConfig, SourceDescriptor};
use crate::model::RawCandidate;

/// g1 prefixes live-coverage headlines with a kicker we don't want in
/// the card title.
fn strip_video_kicker(c: &mut RawCandidate) {
    for prefix in ["VÍDEO: ", "AO VIVO: "] {
        if let Some(rest) = c.title.strip_prefix(prefix) {
            c.title = rest.to_string();
            break;
        }
    }
}

/// Metrópoles wraps its relative timestamps ("há 2 horas") in the same
/// element as the absolute date; keep only a parseable absolute part.
fn drop_relative_timestamp(c: &mut RawCandidate) {
    if let Some(text) = &c.raw_date_text {
        if text.trim_start().to_lowercase().starts_with("há ") {
            c.raw_date_text = None;
        }
    }
}

fn configs() -> Vec<ScrapeConfig> {
    vec![
        ScrapeConfig {
            key: "g1",
            name: "g1",
            color: "#C4170C",
            list_url: "https://g1.globo.com/ultimas-noticias/",
            item_selector: "div.feed-post-body",
            title_selector: Some("a.feed-post-link"),
            link_selector: Some("a.feed-post-link"),
            image_selector: Some("img.bstn-fd-picture-image"),
            image_attr: "src",
            date: Some(DateLocation::Text("span.feed-post-datetime")),
            use_fallback: true,
            quirk: Some(strip_video_kicker),
        },
        ScrapeConfig {
            key: "folha",
            name: "Folha de S.Paulo",
            color: "#0E56A5",
            list_url: "https://www1.folha.uol.com.br/ultimas-noticias/",
            item_selector: "div.c-headline--newslist",
            title_selector: Some("h2.c-headline__title"),
            link_selector: Some("a.c-headline__url"),
            image_selector: Some("img.c-headline__image"),
            image_attr: "data-src",
            date: Some(DateLocation::Attr("time.c-headline__dateline", "datetime")),
            use_fallback: false,
            quirk: None,
        },
        ScrapeConfig {
            key: "estadao",
            name: "Estadão",
            color: "#1B4073",
            list_url: "https://www.estadao.com.br/ultimas/",
            item_selector: "div.noticias-mais-recentes",
            title_selector: Some("h3"),
            link_selector: Some("a"),
            image_selector: Some("img"),
            image_attr: "src",
            date: Some(DateLocation::Text("span.data-posts")),
            use_fallback: true,
            quirk: None,
        },
        ScrapeConfig {
            key: "uol",
            name: "UOL Notícias",
            color: "#F7A100",
            list_url: "https://noticias.uol.com.br/ultimas/",
            item_selector: "div.thumbnails-item",
            title_selector: Some("h3.thumb-title"),
            link_selector: Some("a.thumb-link"),
            image_selector: Some("img.thumb-image"),
            image_attr: "data-src",
            date: Some(DateLocation::Text("time.thumb-date")),
            use_fallback: false,
            quirk: None,
        },
        ScrapeConfig {
            key: "r7",
            name: "R7",
            color: "#E30613",
            list_url: "https://noticias.r7.com/ultimas-noticias",
            item_selector: "article.b-ultimas__item",
            title_selector: Some("h3.b-ultimas__title"),
            link_selector: Some("a.b-ultimas__link"),
            image_selector: Some("img"),
            image_attr: "src",
            date: Some(DateLocation::Text("span.b-ultimas__date")),
            use_fallback: true,
            quirk: None,
        },
        ScrapeConfig {
            key: "terra",
            name: "Terra",
            color: "#FF6600",
            list_url: "https://www.terra.com.br/noticias/ultimas/",
            item_selector: "div.card-news",
            title_selector: Some("h2.card-news__text-title"),
            link_selector: Some("a.card-news__url"),
            image_selector: Some("img.card-news__img"),
            image_attr: "data-src",
            date: Some(DateLocation::Text("span.card-news__time")),
            use_fallback: true,
            quirk: None,
        },
        ScrapeConfig {
            key: "cnnbrasil",
            name: "CNN Brasil",
            color: "#CC0000",
            list_url: "https://www.cnnbrasil.com.br/ultimas-noticias/",
            item_selector: "li.home__list__item",
            title_selector: Some("h3.news-item-header__title"),
            link_selector: Some("a.home__list__tag"),
            image_selector: Some("img"),
            image_attr: "src",
            date: Some(DateLocation::Text("span.home__title__date")),
            use_fallback: true,
            quirk: None,
        },
        ScrapeConfig {
            key: "metropoles",
            name: "Metrópoles",
            color: "#7B2D8E",
            list_url: "https://www.metropoles.com/ultimas-noticias",
            item_selector: "div.m-grid-item",
            title_selector: Some("h2"),
            link_selector: Some("a"),
            image_selector: Some("img"),
            image_attr: "src",
            date: Some(DateLocation::Text("span.noticia-data")),
            use_fallback: true,
            quirk: Some(drop_relative_timestamp),
        },
        ScrapeConfig {
            key: "jovempan",
            name: "Jovem Pan",
            color: "#D4A017",
            list_url: "https://jovempan.com.br/ultimas-noticias",
            item_selector: "div.post-item",
            title_selector: Some("h2.post-title"),
            link_selector: Some("a"),
            image_selector: Some("img.wp-post-image"),
            image_attr: "src",
            date: Some(DateLocation::Text("span.post-date")),
            use_fallback: false,
            quirk: None,
        },
        ScrapeConfig {
            key: "gazetadopovo",
            name: "Gazeta do Povo",
            color: "#00529B",
            list_url: "https://www.gazetadopovo.com.br/ultimas-noticias/",
            item_selector: "article.c-chamada",
            title_selector: Some("h2.c-chamada__titulo"),
            link_selector: Some("a.c-chamada__link"),
            image_selector: Some("img"),
            image_attr: "data-src",
            date: Some(DateLocation::Attr("time", "datetime")),
            use_fallback: false,
            quirk: None,
        },
        ScrapeConfig {
            key: "correio",
            name: "Correio Braziliense",
            color: "#005DAA",
            list_url: "https://www.correiobraziliense.com.br/ultimas-noticias/",
            item_selector: "div.lista-ultimas__item",
            title_selector: Some("h3"),
            link_selector: Some("a"),
            image_selector: Some("img"),
            image_attr: "src",
            date: Some(DateLocation::Text("span.lista-ultimas__data")),
            use_fallback: true,
            quirk: None,
        },
    ]
}

static REGISTRY: Lazy<Vec<SourceDescriptor>> =
    Lazy::new(|| configs().into_iter().map(ScrapeAdapter::descriptor).collect());

/// All configured sources, listing order = client tab order.
pub fn all() -> &'static [SourceDescriptor] {
    &REGISTRY
}

/// Descriptors matching `requested`, or all of them when `requested` is
/// `None`. Unknown keys are ignored, not errors.
pub fn resolve(requested: Option<&[String]>) -> Vec<SourceDescriptor> {
    match requested {
        None => all().to_vec(),
        Some(keys) => all()
            .iter()
            .filter(|d| keys.iter().any(|k| k == d.key))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_unique_keys() {
        let mut keys: Vec<_> = all().iter().map(|d| d.key).collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
        assert_eq!(total, 11);
    }

    #[test]
    fn resolve_ignores_unknown_keys() {
        let keys: Vec<String> = vec!["g1".into(), "nope".into()];
        let got = resolve(Some(&keys));
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].key, "g1");
    }

    #[test]
    fn resolve_none_selects_everything() {
        assert_eq!(resolve(None).len(), all().len());
    }

    #[test]
    fn relative_timestamp_quirk_clears_unparseable_text() {
        let mut c = RawCandidate {
            title: "t".into(),
            url: "https://x".into(),
            image: None,
            raw_date_text: Some("há 2 horas".into()),
        };
        drop_relative_timestamp(&mut c);
        assert!(c.raw_date_text.is_none());
    }
}
