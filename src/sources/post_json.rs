// src/sources/post_json.rs

//! Adapter for the Vietlott-style draw-history API.
//!
//! The upstream takes a POSTed JSON query naming the game and a page size,
//! and answers `{ "results": [...] }` where each entry carries an ISO-8601
//! timestamp and a flat array of already-integer draw numbers. No text
//! extraction is needed here, only integer validation.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{GameType, RawDraw, SourceEntry};
use crate::normalize::date;

use super::{Fetch, SourceAdapter, SourceBatch};

/// Query body the history endpoint expects.
#[derive(Debug, Serialize)]
struct HistoryQuery<'a> {
    game: &'a str,
    size: usize,
}

pub(crate) struct PostJsonSource {
    game: GameType,
    url: String,
    game_code: String,
    size: usize,
}

impl PostJsonSource {
    pub fn new(entry: &SourceEntry) -> Self {
        // Validation guarantees a code for this kind; the selector name is
        // the sensible stand-in if one ever slips through.
        let game_code = entry
            .game_code
            .clone()
            .unwrap_or_else(|| entry.game.as_str().to_string());
        Self {
            game: entry.game,
            url: entry.url.clone(),
            game_code,
            size: entry.size,
        }
    }

    fn query_body(&self) -> Result<Value> {
        let query = HistoryQuery {
            game: &self.game_code,
            size: self.size,
        };
        Ok(serde_json::to_value(query)?)
    }

    fn parse_body(&self, body: &str) -> Result<SourceBatch> {
        let payload: Value = serde_json::from_str(body)
            .map_err(|e| AppError::shape(self.game, format!("response is not JSON: {e}")))?;
        let results = payload
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| AppError::shape(self.game, "missing 'results' array"))?;

        let mut batch = SourceBatch::default();
        for entry in results {
            match Self::parse_entry(entry) {
                Some(draw) => batch.draws.push(draw),
                None => batch.skipped += 1,
            }
        }
        Ok(batch)
    }

    fn parse_entry(entry: &Value) -> Option<RawDraw> {
        let date_text = entry.get("date").and_then(Value::as_str)?;
        let draw_date = date::from_iso(date_text).ok()?;

        let numbers: Vec<u32> = entry
            .get("numbers")
            .and_then(Value::as_array)?
            .iter()
            .filter_map(Value::as_u64)
            .filter_map(|n| u32::try_from(n).ok())
            .collect();

        if numbers.is_empty() {
            return None;
        }
        Some(RawDraw {
            date: draw_date,
            numbers,
        })
    }
}

#[async_trait]
impl SourceAdapter for PostJsonSource {
    fn game(&self) -> GameType {
        self.game
    }

    async fn fetch_draws(&self, fetch: &dyn Fetch) -> Result<SourceBatch> {
        let body = self.query_body()?;
        let response = fetch
            .post_json(&self.url, &body)
            .await
            .map_err(|e| AppError::unavailable(self.game, e))?;
        self.parse_body(&response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::models::Config;
    use serde_json::json;

    fn source() -> PostJsonSource {
        let config = Config::default();
        PostJsonSource::new(config.source_for(GameType::Mega645).unwrap())
    }

    struct StubFetch {
        body: String,
        posted: Mutex<Option<(String, Value)>>,
    }

    impl StubFetch {
        fn with_body(body: impl Into<String>) -> Self {
            Self {
                body: body.into(),
                posted: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl Fetch for StubFetch {
        async fn get(&self, _url: &str) -> Result<String> {
            Ok(self.body.clone())
        }

        async fn post_json(&self, url: &str, body: &Value) -> Result<String> {
            *self.posted.lock().unwrap() = Some((url.to_string(), body.clone()));
            Ok(self.body.clone())
        }
    }

    struct DownFetch;

    #[async_trait]
    impl Fetch for DownFetch {
        async fn get(&self, _url: &str) -> Result<String> {
            Err(AppError::validation("connection refused"))
        }

        async fn post_json(&self, _url: &str, _body: &Value) -> Result<String> {
            Err(AppError::validation("connection refused"))
        }
    }

    #[tokio::test]
    async fn posts_the_configured_game_code() {
        let stub = StubFetch::with_body(json!({ "results": [] }).to_string());
        // Empty results canonicalize to an error later; the adapter itself
        // returns an empty batch.
        let batch = source().fetch_draws(&stub).await.unwrap();
        assert!(batch.draws.is_empty());

        let (url, body) = stub.posted.lock().unwrap().clone().unwrap();
        assert_eq!(url, Config::default().source_for(GameType::Mega645).unwrap().url);
        assert_eq!(body, json!({ "game": "mega645", "size": 200 }));
    }

    #[tokio::test]
    async fn transport_failure_maps_to_unavailable() {
        let err = source().fetch_draws(&DownFetch).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::UpstreamUnavailable {
                game: GameType::Mega645,
                ..
            }
        ));
    }

    #[test]
    fn parses_iso_dates_and_integer_numbers() {
        let body = json!({
            "results": [
                { "date": "2024-01-05T00:00:00Z", "numbers": [12, 3, 45, 8, 30, 21] },
                { "date": "2024-01-03T00:00:00Z", "numbers": [1, 2, 3, 4, 5, 6] }
            ]
        })
        .to_string();

        let batch = source().parse_body(&body).unwrap();
        assert_eq!(batch.skipped, 0);
        assert_eq!(batch.draws.len(), 2);
        assert_eq!(batch.draws[0].date.to_string(), "2024-01-05");
        assert_eq!(batch.draws[0].numbers, vec![12, 3, 45, 8, 30, 21]);
    }

    #[test]
    fn non_integer_numbers_are_dropped() {
        let body = json!({
            "results": [
                { "date": "2024-01-05T00:00:00Z", "numbers": [12, -3, 4.5, "x", 7] }
            ]
        })
        .to_string();

        let batch = source().parse_body(&body).unwrap();
        assert_eq!(batch.draws[0].numbers, vec![12, 7]);
    }

    #[test]
    fn entry_with_bad_date_is_skipped() {
        let body = json!({
            "results": [
                { "date": "yesterday", "numbers": [1, 2, 3] },
                { "date": "2024-01-05T00:00:00Z", "numbers": [1, 2, 3] }
            ]
        })
        .to_string();

        let batch = source().parse_body(&body).unwrap();
        assert_eq!(batch.draws.len(), 1);
        assert_eq!(batch.skipped, 1);
    }

    #[test]
    fn missing_results_field_is_a_shape_error() {
        let err = source().parse_body(r#"{"list": []}"#).unwrap_err();
        assert!(matches!(err, AppError::UpstreamShape { .. }));
    }
}
