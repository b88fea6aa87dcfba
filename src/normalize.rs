use crate::results::{Field, FieldExtractionResult, FoaRecord};
use crate::router::{SourceFamily, route_by_url};
use chrono::NaiveDate;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use url::Url;

/// Normalized scalar fields of an opportunity, before tagging
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFields {
    pub foa_id: String,
    pub title: String,
    pub agency: String,
    pub open_date: Option<NaiveDate>,
    pub close_date: Option<NaiveDate>,
    pub description: String,
    pub source_url: String,
    pub award_ceiling: Option<f64>,
    pub award_floor: Option<f64>,
}

impl NormalizedFields {
    /// Completes the record with its merged tags
    pub fn into_record(self, tags: Vec<String>) -> FoaRecord {
        FoaRecord {
            foa_id: self.foa_id,
            title: self.title,
            agency: self.agency,
            open_date: self.open_date,
            close_date: self.close_date,
            description: self.description,
            tags,
            source_url: self.source_url,
            award_ceiling: self.award_ceiling,
            award_floor: self.award_floor,
        }
    }
}

/// Turns an adapter's raw field map into normalized values. Never fails:
/// anything unparseable becomes `None` (or an empty string for text fields).
pub fn normalize(raw: &FieldExtractionResult, source_url: &str) -> NormalizedFields {
    let foa_id = raw
        .value(Field::FoaId)
        .map(collapse_whitespace)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| derive_foa_id(source_url));

    let open_date = raw.value(Field::OpenDate).and_then(parse_date);
    let mut close_date = raw.value(Field::CloseDate).and_then(parse_date);

    if let (Some(open), Some(close)) = (open_date, close_date) {
        if open > close {
            ::log::warn!(
                "Close date {} precedes open date {} for {}; dropping close date",
                close,
                open,
                source_url
            );
            close_date = None;
        }
    }

    NormalizedFields {
        foa_id,
        title: normalize_text(raw.value(Field::Title)),
        agency: normalize_text(raw.value(Field::Agency)),
        open_date,
        close_date,
        description: normalize_text(raw.value(Field::Description)),
        source_url: source_url.to_string(),
        award_ceiling: raw.value(Field::AwardCeiling).and_then(parse_currency),
        award_floor: raw.value(Field::AwardFloor).and_then(parse_currency),
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Presentation text: collapsed whitespace, empty when absent
pub fn normalize_text(text: Option<&str>) -> String {
    text.map(collapse_whitespace).unwrap_or_default()
}

//
// Dates
//

static DATE_PATTERNS: LazyLock<Vec<(DateLayout, Regex)>> = LazyLock::new(|| {
    [
        (DateLayout::Iso, r"\b(\d{4})-(\d{1,2})-(\d{1,2})"),
        (DateLayout::MonthDayYear, r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b"),
        (DateLayout::MonthDayYear, r"\b(\d{1,2})-(\d{1,2})-(\d{4})\b"),
        (
            DateLayout::NamedMonthFirst,
            r"\b([A-Za-z]{3,9})\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b",
        ),
        (
            DateLayout::NamedMonthSecond,
            r"\b(\d{1,2})\s+([A-Za-z]{3,9})\.?,?\s+(\d{4})\b",
        ),
    ]
    .into_iter()
    .filter_map(|(layout, pattern)| match Regex::new(pattern) {
        Ok(re) => Some((layout, re)),
        Err(e) => {
            ::log::error!("Invalid date pattern {}: {}", pattern, e);
            None
        }
    })
    .collect()
});

#[derive(Debug, Clone, Copy)]
enum DateLayout {
    Iso,
    MonthDayYear,
    NamedMonthFirst,
    NamedMonthSecond,
}

impl DateLayout {
    fn build(&self, caps: &regex::Captures) -> Option<NaiveDate> {
        let (year, month, day): (i32, u32, u32) = match self {
            DateLayout::Iso => (
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
                caps[3].parse().ok()?,
            ),
            DateLayout::MonthDayYear => (
                caps[3].parse().ok()?,
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
            ),
            DateLayout::NamedMonthFirst => (
                caps[3].parse().ok()?,
                month_number(&caps[1])?,
                caps[2].parse().ok()?,
            ),
            DateLayout::NamedMonthSecond => (
                caps[3].parse().ok()?,
                month_number(&caps[2])?,
                caps[1].parse().ok()?,
            ),
        };
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

fn month_number(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
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
    let name = name.to_ascii_lowercase();
    if name == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|m| *m == name || (name.len() == 3 && m.starts_with(&name)))
        .map(|i| i as u32 + 1)
}

/// Parses the date layouts used by both portals into a calendar date.
///
/// A date at the start of the text wins; otherwise the earliest date found
/// anywhere in it is used, so trailing notes such as "Electronically submitted
/// applications must be submitted no later than 5:00 p.m." are tolerated.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let mut best: Option<(usize, NaiveDate)> = None;
    for (layout, re) in DATE_PATTERNS.iter() {
        let found = re
            .captures_iter(raw)
            .find_map(|caps| Some((caps.get(0)?.start(), layout.build(&caps)?)));
        if let Some((start, date)) = found {
            if best.is_none_or(|(best_start, _)| start < best_start) {
                best = Some((start, date));
            }
        }
    }

    best.map(|(_, date)| date)
}

//
// Currency
//

static CURRENCY: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:usd\s*)?\$?\s*(\d[\d,]*(?:\.\d+)?)\s*(?:usd)?$").ok()
});

/// Parses an award amount such as "$1,500,000.00" into a non-negative number
pub fn parse_currency(raw: &str) -> Option<f64> {
    let caps = CURRENCY.as_ref()?.captures(raw.trim())?;
    let amount: f64 = caps[1].replace(',', "").parse().ok()?;
    (amount.is_finite() && amount >= 0.0).then_some(amount)
}

//
// Identifiers
//

const ID_QUERY_KEYS: &[&str] = &["awd_id", "oppid", "id"];

/// Derives a stable opportunity id from the page URL.
///
/// The id is a host prefix joined to the URL's identifier: an id query
/// parameter, else the trailing numeric path segment, else the last path
/// segment. URLs without any usable identifier hash to `FOA-<hex>`.
pub fn derive_foa_id(source_url: &str) -> String {
    let identifier = Url::parse(source_url)
        .ok()
        .and_then(|url| url_identifier(&url).map(|id| (id_prefix(&url), id)));

    match identifier {
        Some((prefix, id)) => format!("{prefix}-{id}"),
        None => hashed_id(source_url),
    }
}

fn id_prefix(url: &Url) -> String {
    match route_by_url(url.as_str()) {
        Some(SourceFamily::GrantsGov) => "GRANTS".to_string(),
        Some(SourceFamily::Nsf) => "NSF".to_string(),
        None => url
            .host_str()
            .and_then(|host| host.split('.').find(|label| *label != "www"))
            .map(sanitize_identifier)
            .filter(|label| !label.is_empty())
            .map(|label| label.to_ascii_uppercase())
            .unwrap_or_else(|| "FOA".to_string()),
    }
}

fn url_identifier(url: &Url) -> Option<String> {
    let from_query = url.query_pairs().find_map(|(key, value)| {
        let key = key.to_ascii_lowercase();
        let value = sanitize_identifier(&value);
        (ID_QUERY_KEYS.contains(&key.as_str()) && !value.is_empty()).then_some(value)
    });
    if from_query.is_some() {
        return from_query;
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    segments
        .iter()
        .rev()
        .find(|seg| seg.chars().all(|c| c.is_ascii_digit()))
        .map(|seg| seg.to_string())
        .or_else(|| {
            segments
                .last()
                .map(|seg| sanitize_identifier(seg))
                .filter(|seg| !seg.is_empty())
        })
}

fn sanitize_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

fn hashed_id(source_url: &str) -> String {
    let digest = Sha256::digest(source_url.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("FOA-{}", &hex[..12])
}
