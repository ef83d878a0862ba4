//! Date and date-range recognition for English and Portuguese résumés.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const MONTH: &str = r"(?:jan(?:uary|eiro)?|feb(?:ruary)?|fev(?:ereiro)?|mar(?:ch|ço|co)?|apr(?:il)?|abr(?:il)?|may|mai(?:o)?|jun(?:e|ho)?|jul(?:y|ho)?|aug(?:ust)?|ago(?:sto)?|sep(?:t(?:ember)?)?|set(?:embro)?|oct(?:ober)?|out(?:ubro)?|nov(?:ember|embro)?|dec(?:ember)?|dez(?:embro)?)\.?";
const OPEN_END: &str =
    r"present|current|now|atualmente|atual|presente|hoje|o momento|the present";

static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    let point = format!(
        r"\b(?:{MONTH}\s*(?:de\s+)?(?:19|20)\d{{2}}|\d{{1,2}}/(?:19|20)\d{{2}}|(?:19|20)\d{{2}})\b"
    );
    Regex::new(&format!(
        r"(?i)(?P<start>{point})\s*(?:-|to|até|a)\s*(?P<end>{point}|{OPEN_END})"
    ))
    .expect("invalid date range regex")
});

static MONTH_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^(?P<month>{MONTH})\s*(?:de\s+)?(?P<year>\d{{4}})$"))
        .expect("invalid month-year regex")
});

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<month>\d{1,2})/(?P<year>\d{4})$").expect("invalid numeric date regex")
});

static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("invalid year regex"));

/// A date as precise as the résumé states it: a year, maybe a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDate {
    pub year: i32,
    pub month: Option<u32>,
}

impl PartialDate {
    /// First day of the stated month (January when only a year is known).
    pub fn to_naive_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.unwrap_or(1), 1)
    }
}

/// A range found on a line, with the byte span it occupied.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub start: PartialDate,
    pub end: Option<PartialDate>,
    pub is_current: bool,
    pub span: (usize, usize),
}

/// Finds the first date range on `line`.
pub fn find_date_range(line: &str) -> Option<DateRange> {
    let caps = RANGE_RE.captures(line)?;
    let whole = caps.get(0)?;
    let start = caps.name("start").and_then(|m| parse_point(m.as_str()))?;
    let end_raw = caps.name("end").map(|m| m.as_str()).unwrap_or_default();
    let is_current = is_open_end(end_raw);
    let end = if is_current { None } else { parse_point(end_raw) };

    // Two bare numbers around a dash that aren't ordered years are not a range.
    if end.is_some_and(|e| e.year < start.year) {
        return None;
    }

    Some(DateRange {
        start,
        end,
        is_current,
        span: (whole.start(), whole.end()),
    })
}

/// Every plausible four-digit year on the line, in order.
pub fn find_years(line: &str) -> Vec<i32> {
    YEAR_RE
        .find_iter(line)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

fn is_open_end(raw: &str) -> bool {
    let lower = raw.trim().to_lowercase();
    OPEN_END.split('|').any(|w| w == lower)
}

fn parse_point(raw: &str) -> Option<PartialDate> {
    let raw = raw.trim();
    if let Some(caps) = MONTH_YEAR_RE.captures(raw) {
        let year = caps.name("year")?.as_str().parse().ok()?;
        let month = month_number(caps.name("month")?.as_str())?;
        return Some(PartialDate {
            year,
            month: Some(month),
        });
    }
    if let Some(caps) = NUMERIC_RE.captures(raw) {
        let year = caps.name("year")?.as_str().parse().ok()?;
        let month: u32 = caps.name("month")?.as_str().parse().ok()?;
        return Some(PartialDate {
            year,
            month: (1..=12).contains(&month).then_some(month),
        });
    }
    let year: i32 = raw.parse().ok()?;
    (1900..=2100).contains(&year).then_some(PartialDate { year, month: None })
}

fn month_number(raw: &str) -> Option<u32> {
    let key: String = raw
        .trim_end_matches('.')
        .to_lowercase()
        .chars()
        .take(3)
        .collect();
    let month = match key.as_str() {
        "jan" => 1,
        "feb" | "fev" => 2,
        "mar" => 3,
        "apr" | "abr" => 4,
        "may" | "mai" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" | "ago" => 8,
        "sep" | "set" => 9,
        "oct" | "out" => 10,
        "nov" => 11,
        "dec" | "dez" => 12,
        _ => return None,
    };
    Some(month)
}
