//! Free-text date/time normalization.
//!
//! The listing pages feed us everything from clean ISO timestamps to
//! `"Publicado em: 04/11/2025 às 9h"` to `"4 de novembro de 2025"`.
//! `normalize_date` reduces any of those to a single instant anchored to
//! the target timezone, or returns `None` — it never guesses outside the
//! cascade below and never panics.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

/// Target timezone for every ambiguous wall-clock input and for the
/// retention-window day boundaries. America/Sao_Paulo has not observed
/// DST since 2019, so a fixed UTC-03:00 offset is exact.
pub fn target_offset() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).expect("UTC-03:00 is in range")
}

/// IANA name reported on the wire; the offset above is its current rule.
pub const TARGET_TZ_NAME: &str = "America/Sao_Paulo";

/// Hour used when a source publishes a date with no time of day.
/// Noon keeps day-boundary arithmetic away from midnight edges.
const DEFAULT_HOUR: u32 = 12;

static RE_ISO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2})(?:[T ](\d{2}:\d{2}(?::\d{2})?)(Z|[+-]\d{2}:?\d{2})?)?")
        .expect("iso regex")
});
static RE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(publicado em|publicada em|atualizado em)\s*:?\s*").expect("prefix regex")
});
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("ws regex"));
static RE_AS_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b[aà]s\s+(\d)").expect("às regex"));
static RE_HOUR_SHORTHAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})h(\d{2})?\b").expect("Hh regex"));
static RE_NAMED_PT_ES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*(?:de\s+)?([\p{L}]+)\.?\s*(?:de\s+)?(\d{4})(?:\s+(\d{1,2}):(\d{2}))?")
        .expect("named month regex")
});
static RE_NAMED_EN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2}),\s*(\d{4})(?:\s+(\d{1,2}):(\d{2}))?")
        .expect("english month regex")
});
static RE_ANY_NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4})(?:\s+(\d{1,2}):(\d{2}))?")
        .expect("numeric scrape regex")
});

/// Strip boilerplate prefixes, fold whitespace, unify dashes, and turn
/// `às 18h45` / `9h` time shorthand into `18:45` / `9:00`.
pub fn pre_normalize(raw: &str) -> String {
    let mut s = RE_PREFIX.replace(raw, "").to_string();
    s = s.replace(['\u{2013}', '\u{2014}', '\u{2212}'], "-");
    s = RE_AS_MARKER.replace_all(&s, "$1").to_string();
    s = RE_HOUR_SHORTHAND
        .replace_all(&s, |c: &regex::Captures| {
            format!("{}:{}", &c[1], c.get(2).map_or("00", |m| m.as_str()))
        })
        .to_string();
    RE_WS.replace_all(&s, " ").trim().to_string()
}

/// Normalize a raw date string to an instant in the target timezone.
///
/// Cascade, first success wins: ISO substring, numeric `D/M/Y`-family
/// patterns, Portuguese/Spanish/English month names (noon default when
/// the time is missing), then a last-resort numeric scrape. Returns
/// `None` when nothing in the text resolves to a valid calendar date.
pub fn normalize_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(dt) = try_iso(raw) {
        return Some(dt);
    }

    let text = pre_normalize(raw);
    if text.is_empty() {
        return None;
    }

    try_numeric(&text)
        .or_else(|| try_named_month(&text))
        .or_else(|| try_numeric_scrape(&text))
}

fn anchor(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    target_offset().from_local_datetime(&naive).single()
}

fn at_noon(date: NaiveDate) -> Option<DateTime<FixedOffset>> {
    anchor(date.and_time(NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0)?))
}

/// Step 1: scan for an ISO-8601 substring anywhere in the raw text.
fn try_iso(raw: &str) -> Option<DateTime<FixedOffset>> {
    let caps = RE_ISO.captures(raw)?;
    let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;

    let time = match caps.get(2) {
        Some(t) => {
            let t = t.as_str();
            NaiveTime::parse_from_str(t, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
                .ok()?
        }
        None => NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0)?,
    };
    let naive = date.and_time(time);

    match caps.get(3).map(|m| m.as_str()) {
        Some("Z") | Some("z") => Some(chrono::Utc.from_utc_datetime(&naive).fixed_offset()),
        Some(off) => parse_offset(off)?.from_local_datetime(&naive).single(),
        None => anchor(naive),
    }
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = s.split_at(1);
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let mins: i32 = digits[2..].parse().ok()?;
    let secs = hours * 3600 + mins * 60;
    if sign == "-" {
        FixedOffset::west_opt(secs)
    } else {
        FixedOffset::east_opt(secs)
    }
}

/// Step 3: fixed day/month/year patterns, slash, hyphen and dot
/// separated, each with and without a trailing time of day.
fn try_numeric(text: &str) -> Option<DateTime<FixedOffset>> {
    const WITH_TIME: [&str; 3] = ["%d/%m/%Y %H:%M", "%d-%m-%Y %H:%M", "%d.%m.%Y %H:%M"];
    const DATE_ONLY: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%-d/%-m/%Y"];

    for fmt in WITH_TIME {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return anchor(naive);
        }
    }
    for fmt in DATE_ONLY {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return at_noon(date);
        }
    }
    None
}

/// Portuguese and Spanish month names plus their 3-letter abbreviations.
fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let n = match lower.as_str() {
        "janeiro" | "jan" | "enero" | "ene" => 1,
        "fevereiro" | "fev" | "febrero" | "feb" => 2,
        "março" | "marco" | "mar" | "marzo" => 3,
        "abril" | "abr" => 4,
        "maio" | "mai" | "mayo" | "may" => 5,
        "junho" | "jun" | "junio" => 6,
        "julho" | "jul" | "julio" => 7,
        "agosto" | "ago" => 8,
        "setembro" | "set" | "septiembre" | "setiembre" | "sep" => 9,
        "outubro" | "out" | "octubre" | "oct" => 10,
        "novembro" | "nov" | "noviembre" => 11,
        "dezembro" | "dez" | "diciembre" | "dic" => 12,
        _ => return None,
    };
    Some(n)
}

fn english_month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    const NAMES: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    NAMES
        .iter()
        .position(|m| *m == lower || m.starts_with(&lower) && lower.len() >= 3)
        .map(|i| i as u32 + 1)
}

fn build(
    day: u32,
    month: u32,
    year: i32,
    hm: Option<(u32, u32)>,
) -> Option<DateTime<FixedOffset>> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    match hm {
        Some((h, m)) => anchor(date.and_time(NaiveTime::from_hms_opt(h, m, 0)?)),
        None => at_noon(date),
    }
}

fn captured_hm(caps: &regex::Captures, h_idx: usize, m_idx: usize) -> Option<(u32, u32)> {
    let h = caps.get(h_idx)?.as_str().parse().ok()?;
    let m = caps.get(m_idx)?.as_str().parse().ok()?;
    Some((h, m))
}

/// Step 4: `4 de novembro de 2025 [18:45]` and the English
/// `November 4, 2025` variant.
fn try_named_month(text: &str) -> Option<DateTime<FixedOffset>> {
    if let Some(caps) = RE_NAMED_PT_ES.captures(text) {
        if let Some(month) = month_number(&caps[2]) {
            let day = caps[1].parse().ok()?;
            let year = caps[3].parse().ok()?;
            if let Some(dt) = build(day, month, year, captured_hm(&caps, 4, 5)) {
                return Some(dt);
            }
        }
    }
    if let Some(caps) = RE_NAMED_EN.captures(text) {
        if let Some(month) = english_month_number(&caps[1]) {
            let day = caps[2].parse().ok()?;
            let year = caps[3].parse().ok()?;
            if let Some(dt) = build(day, month, year, captured_hm(&caps, 4, 5)) {
                return Some(dt);
            }
        }
    }
    None
}

/// Step 5: last resort, pull a `D sep M sep YYYY` triplet out of
/// anywhere in the text, optional trailing `HH:MM`.
fn try_numeric_scrape(text: &str) -> Option<DateTime<FixedOffset>> {
    let caps = RE_ANY_NUMERIC.captures(text)?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    build(day, month, year, captured_hm(&caps, 4, 5))
}
