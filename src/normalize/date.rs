// src/normalize/date.rs

//! Draw-date normalization.
//!
//! Upstream sources disagree on date encoding: the JSON feed uses
//! `DD/MM/YYYY`, the POST API uses ISO-8601 timestamps, and scraped pages
//! bury a `D-M-YYYY` pattern inside a free-text heading. Everything here
//! converges on [`chrono::NaiveDate`], which serializes to the canonical
//! zero-padded `YYYY-MM-DD` and compares as a calendar date.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

/// A record-level failure: the text held no recognizable date.
///
/// Callers skip the offending record and keep going; this error never
/// surfaces past an adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no recognizable date in {0:?}")]
pub struct DateParseError(String);

impl DateParseError {
    fn new(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// `D(D)-M(M)-YYYY` somewhere inside an arbitrary heading. A pattern match
/// rather than a full-string parse: the surrounding text is unpredictable.
/// The non-digit guards keep the pattern from matching inside a longer
/// digit run (a typo'd year like `20245` must fail, not truncate).
static TITLE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)(\d{1,2})-(\d{1,2})-(\d{4})(?:\D|$)").expect("title date pattern")
});

/// Parse a slash-delimited `DD/MM/YYYY` date.
pub fn from_dmy_slash(text: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(text.trim(), "%d/%m/%Y").map_err(|_| DateParseError::new(text))
}

/// Parse the date portion of an ISO-8601 timestamp, i.e. everything before
/// the `T` (or space) time separator.
pub fn from_iso(text: &str) -> Result<NaiveDate, DateParseError> {
    let date_part = text
        .trim()
        .split(['T', ' '])
        .next()
        .ok_or_else(|| DateParseError::new(text))?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| DateParseError::new(text))
}

/// Find a dash-delimited `D-M-YYYY` date inside free heading text.
pub fn from_title(text: &str) -> Result<NaiveDate, DateParseError> {
    let caps = TITLE_DATE
        .captures(text)
        .ok_or_else(|| DateParseError::new(text))?;

    // Capture groups are all-digit by construction; range checking is left
    // to chrono so impossible calendar dates still fail.
    let day: u32 = caps[1].parse().map_err(|_| DateParseError::new(text))?;
    let month: u32 = caps[2].parse().map_err(|_| DateParseError::new(text))?;
    let year: i32 = caps[3].parse().map_err(|_| DateParseError::new(text))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DateParseError::new(text))
}

/// Normalize date text of any supported shape.
///
/// Tries slash-delimited, then ISO, then the title pattern; the shapes are
/// mutually exclusive in practice, so first hit wins.
pub fn normalize(text: &str) -> Result<NaiveDate, DateParseError> {
    from_dmy_slash(text)
        .or_else(|_| from_iso(text))
        .or_else(|_| from_title(text))
}
