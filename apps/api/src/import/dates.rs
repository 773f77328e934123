//! Resolves the free-form dates found in spreadsheet exports.
//!
//! Matchers run in a fixed order and the first one that yields a real calendar
//! date wins. Every result is rendered as `MM/DD/YYYY`, which the first matcher
//! reads back unchanged.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

pub const CANONICAL_DATE_FORMAT: &str = "%m/%d/%Y";

const MONTH_NAMES: [(&str, &str); 12] = [
    ("january", "jan"),
    ("february", "feb"),
    ("march", "mar"),
    ("april", "apr"),
    ("may", "may"),
    ("june", "jun"),
    ("july", "jul"),
    ("august", "aug"),
    ("september", "sep"),
    ("october", "oct"),
    ("november", "nov"),
    ("december", "dec"),
];

const GENERIC_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

type DateMatcher = fn(&str) -> Option<NaiveDate>;

/// Years that render as exactly four digits in the canonical form.
const CANONICAL_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

const DATE_MATCHERS: &[(&str, DateMatcher)] = &[
    ("month_first", month_first),
    ("iso", iso),
    ("day_first", day_first_when_unambiguous),
    ("dotted", dotted_day_first),
    ("month_name", month_name),
    ("generic", generic),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    /// Nothing matched and `today` was substituted.
    pub defaulted: bool,
}

impl ResolvedDate {
    pub fn canonical(&self) -> String {
        self.date.format(CANONICAL_DATE_FORMAT).to_string()
    }
}

pub fn resolve_date(raw: &str, today: NaiveDate) -> ResolvedDate {
    let raw = raw.trim();
    if !raw.is_empty() {
        for (name, matcher) in DATE_MATCHERS {
            if let Some(date) = matcher(raw).filter(|d| CANONICAL_YEARS.contains(&d.year())) {
                tracing::trace!("Date '{raw}' resolved by {name} matcher");
                return ResolvedDate {
                    date,
                    defaulted: false,
                };
            }
        }
    }
    ResolvedDate {
        date: today,
        defaulted: true,
    }
}

/// `MM/DD/YYYY` or `MM-DD-YYYY`.
fn month_first(raw: &str) -> Option<NaiveDate> {
    ['/', '-'].into_iter().find_map(|sep| {
        let [a, b, y] = split_three(raw, sep)?;
        NaiveDate::from_ymd_opt(year(y)?, small(a)?, small(b)?)
    })
}

/// `YYYY-MM-DD` or `YYYY/MM/DD`.
fn iso(raw: &str) -> Option<NaiveDate> {
    ['-', '/'].into_iter().find_map(|sep| {
        let [y, m, d] = split_three(raw, sep)?;
        NaiveDate::from_ymd_opt(year(y)?, small(m)?, small(d)?)
    })
}

/// `D/M/YYYY` when the first group cannot be a month.
fn day_first_when_unambiguous(raw: &str) -> Option<NaiveDate> {
    ['/', '-'].into_iter().find_map(|sep| {
        let [a, b, y] = split_three(raw, sep)?;
        let first = small(a)?;
        if first <= 12 {
            return None;
        }
        NaiveDate::from_ymd_opt(year(y)?, small(b)?, first)
    })
}

/// `DD.MM.YYYY`.
fn dotted_day_first(raw: &str) -> Option<NaiveDate> {
    let [d, m, y] = split_three(raw, '.')?;
    NaiveDate::from_ymd_opt(year(y)?, small(m)?, small(d)?)
}

/// `Month DD, YYYY` or `DD Month YYYY`.
fn month_name(raw: &str) -> Option<NaiveDate> {
    let tokens: Vec<&str> = raw
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '-' | '/' | '.'))
        .filter(|t| !t.is_empty())
        .collect();
    let [first, second, third] = tokens.as_slice() else {
        return None;
    };
    let y = year(third)?;

    if let Some(m) = month_from_name(first) {
        return NaiveDate::from_ymd_opt(y, m, day_with_ordinal(second)?);
    }
    let m = month_from_name(second)?;
    NaiveDate::from_ymd_opt(y, m, day_with_ordinal(first)?)
}

fn generic(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    GENERIC_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

fn split_three(raw: &str, sep: char) -> Option<[&str; 3]> {
    let mut parts = raw.split(sep);
    let out = [parts.next()?, parts.next()?, parts.next()?];
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

fn digits(s: &str, min_len: usize, max_len: usize) -> Option<u32> {
    if s.len() < min_len || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn small(s: &str) -> Option<u32> {
    digits(s, 1, 2)
}

fn year(s: &str) -> Option<i32> {
    digits(s, 4, 4).map(|y| y as i32)
}

fn day_with_ordinal(s: &str) -> Option<u32> {
    let lower = s.to_ascii_lowercase();
    let trimmed = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| lower.strip_suffix(suffix))
        .unwrap_or(&lower);
    small(trimmed)
}

fn month_from_name(token: &str) -> Option<u32> {
    let token = token.trim_end_matches('.').to_lowercase();
    if token == "sept" {
        return Some(9);
    }
    MONTH_NAMES
        .iter()
        .position(|(full, abbrev)| token == *full || token == *abbrev)
        .map(|idx| idx as u32 + 1)
}
