// src/models/draw.rs

//! Canonical draw records shared by every source.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One draw of a lottery game on a specific date, in the canonical shape
/// downstream consumers receive. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    /// Calendar date of the draw, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,

    /// The winning numbers, shaped per game
    pub numbers: NumberPayload,
}

/// The winning numbers of a single draw.
///
/// Serializes untagged: a flat game renders as a bare array, the structured
/// game as `{ "main": [...], "special": n }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberPayload {
    /// Ordered list of numbers. Ascending for ball games; prize-tier order
    /// for the digit lottery.
    Flat(Vec<u32>),

    /// Six main numbers (ascending) plus one special number.
    Structured { main: Vec<u32>, special: u32 },
}

impl NumberPayload {
    /// Whether the payload satisfies the canonical-record invariant.
    ///
    /// An empty flat list, or a structured payload without exactly six main
    /// numbers, must never reach a caller.
    pub fn is_valid(&self) -> bool {
        match self {
            NumberPayload::Flat(numbers) => !numbers.is_empty(),
            NumberPayload::Structured { main, .. } => main.len() == 6,
        }
    }
}

/// The canonicalized output of one ingest run: draw records in
/// non-decreasing date order.
pub type ResultSet = Vec<DrawRecord>;

/// Intermediate draw produced by a source adapter before canonical shaping.
///
/// The date is already normalized: adapters skip records whose date cannot
/// be parsed, so an invalid date never crosses the adapter boundary. The
/// numbers are raw extraction output and not yet shaped or validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawDraw {
    pub date: NaiveDate,
    pub numbers: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn flat_record_serializes_as_bare_array() {
        let record = DrawRecord {
            date: date(2024, 1, 5),
            numbers: NumberPayload::Flat(vec![5, 12, 99]),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"date":"2024-01-05","numbers":[5,12,99]}"#);
    }

    #[test]
    fn structured_record_serializes_main_and_special() {
        let record = DrawRecord {
            date: date(2024, 1, 5),
            numbers: NumberPayload::Structured {
                main: vec![3, 7, 12, 24, 31, 52],
                special: 44,
            },
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"date":"2024-01-05","numbers":{"main":[3,7,12,24,31,52],"special":44}}"#
        );
    }

    #[test]
    fn date_serializes_zero_padded() {
        let record = DrawRecord {
            date: date(2024, 9, 3),
            numbers: NumberPayload::Flat(vec![1]),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"2024-09-03\""));
    }

    #[test]
    fn payload_validity_rules() {
        assert!(NumberPayload::Flat(vec![0]).is_valid());
        assert!(!NumberPayload::Flat(vec![]).is_valid());
        assert!(
            NumberPayload::Structured {
                main: vec![1, 2, 3, 4, 5, 6],
                special: 7,
            }
            .is_valid()
        );
        assert!(
            !NumberPayload::Structured {
                main: vec![1, 2, 3],
                special: 7,
            }
            .is_valid()
        );
    }
}
