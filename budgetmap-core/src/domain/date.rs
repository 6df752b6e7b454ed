//! Date cell parsing

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

/// Formats tried in order; first successful parse wins.
///
/// Month-first is tried before day-first, so "01/02/2024" is January 2nd.
pub const DATE_FORMATS: [&str; 10] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%m/%d/%y",
    "%d/%m/%y",
    "%m-%d-%y",
    "%d-%m-%y",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn ordinal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)(st|nd|rd|th)").expect("valid ordinal regex"))
}

/// Shape guards, one per entry of DATE_FORMATS
///
/// chrono accepts "24" for `%Y` and three-digit days for `%d`; the guards
/// pin each field to the width a bank export actually uses.
fn shape_guards() -> &'static [Regex] {
    static GUARDS: OnceLock<Vec<Regex>> = OnceLock::new();
    GUARDS.get_or_init(|| {
        DATE_FORMATS
            .iter()
            .map(|fmt| {
                let pattern = fmt
                    .replace("%Y", r"\d{4}")
                    .replace("%m", r"\d{1,2}")
                    .replace("%d", r"\d{1,2}")
                    .replace("%y", r"\d{2}");
                Regex::new(&format!("^{}$", pattern)).expect("valid date shape regex")
            })
            .collect()
    })
}

/// Remove ordinal suffixes: "March 1st" -> "March 1"
pub fn strip_ordinals(s: &str) -> String {
    ordinal_re().replace_all(s, "$1").into_owned()
}

/// Parse a raw date cell
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = strip_ordinals(raw.trim());
    let s = cleaned.trim();
    if s.is_empty() {
        return None;
    }

    for (fmt, guard) in DATE_FORMATS.iter().zip(shape_guards()) {
        if !guard.is_match(s) {
            continue;
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    parse_iso(s)
}

/// General ISO-8601 fallback: timestamps with or without offset, basic form
fn parse_iso(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        return NaiveDate::parse_from_str(s, "%Y%m%d").ok();
    }
    None
}
