//! Token grammars shared by the parser strategies.
//!
//! Format A writes money as `1,234,567.89` and dates as `DD/MM`.
//! Format B writes money as `-1.234.567,89` and dates as `01 Jan 2025`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DAY_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0[1-9]|[12][0-9]|3[01])/(0[1-9]|1[0-2])$").unwrap());

static MONEY_A_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}(?:,\d{3})*\.\d{2}$").unwrap());

static MONEY_B_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d{1,3}(?:\.\d{3})*,\d{2}$").unwrap());

static LONG_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<day>\d{1,2})\s+(?P<mon>[A-Za-z]{3,4})\s+(?P<year>\d{4})(?:/\d{4})?$").unwrap()
});

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}(?::\d{2})?$").unwrap());

static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").unwrap());

static TRAILING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\d+$").unwrap());

/// `DD/MM` with day 01-31 and month 01-12.
pub fn is_day_month(s: &str) -> bool {
    DAY_MONTH_RE.is_match(s.trim())
}

/// Comma-grouped, period-decimal money (Format A). Never signed.
pub fn is_money_a(s: &str) -> bool {
    MONEY_A_RE.is_match(s.trim())
}

pub fn parse_money_a(s: &str) -> Option<f64> {
    let s = s.trim();
    if !is_money_a(s) {
        return None;
    }
    s.replace(',', "").parse().ok()
}

/// Period-grouped, comma-decimal money (Format B), optionally signed.
pub fn is_money_b(s: &str) -> bool {
    MONEY_B_RE.is_match(s.trim())
}

/// Parses a Format B amount keeping its sign.
pub fn parse_money_b(s: &str) -> Option<f64> {
    let s = s.trim();
    if !is_money_b(s) {
        return None;
    }
    s.replace('.', "").replace(',', ".").parse().ok()
}

/// True when the amount carries an explicit `+` or `-`.
pub fn is_signed(s: &str) -> bool {
    s.trim_start().starts_with(['+', '-'])
}

pub fn is_debit_sign(s: &str) -> bool {
    s.trim_start().starts_with('-')
}

pub fn is_timestamp(s: &str) -> bool {
    TIMESTAMP_RE.is_match(s.trim())
}

pub fn is_integer(s: &str) -> bool {
    INTEGER_RE.is_match(s.trim())
}

pub fn is_long_date(s: &str) -> bool {
    parse_long_date(s).is_some()
}

/// A date written as `DD Mon YYYY`, optionally followed by a duplicated
/// `/YYYY`. Returns the year and the `DD/MM` form.
pub fn parse_long_date(s: &str) -> Option<(i32, String)> {
    let caps = LONG_DATE_RE.captures(s.trim())?;
    let day: u32 = caps["day"].parse().ok()?;
    let month = month_number(&caps["mon"])?;
    let year: i32 = caps["year"].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?;
    Some((year, format!("{:02}/{:02}", day, month)))
}

/// Month abbreviations in English and Indonesian.
pub fn month_number(abbr: &str) -> Option<u32> {
    let month = match abbr.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" | "peb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" | "mei" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" | "agu" | "agt" | "ags" => 8,
        "sep" | "sept" => 9,
        "oct" | "okt" => 10,
        "nov" | "nop" => 11,
        "dec" | "des" => 12,
        _ => return None,
    };
    Some(month)
}

/// First 4-digit year fragment (19xx or 20xx) inside `s`.
pub fn find_year(s: &str) -> Option<i32> {
    YEAR_RE.captures(s).and_then(|c| c[1].parse().ok())
}

/// Drops a bare number left dangling at the end of a description.
pub fn strip_trailing_number(s: &str) -> String {
    TRAILING_NUMBER_RE.replace(s.trim(), "").into_owned()
}
