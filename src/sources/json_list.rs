// src/sources/json_list.rs

//! Adapter for the XSMB-style list feed.
//!
//! The upstream is a GET endpoint answering `{ "list": [...] }` with one
//! object per draw day: the date in `ngay` as `DD/MM/YYYY` and a handful of
//! prize-tier fields, each a comma-joined string of winning numbers. Only
//! the last two digits of every number are meaningful for this game.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{GameType, RawDraw, SourceEntry};
use crate::normalize::date;
use crate::normalize::numbers::{extract, SplitRule, TWO_DIGIT_TAIL};

use super::{Fetch, SourceAdapter, SourceBatch};

pub(crate) struct JsonListSource {
    game: GameType,
    url: String,
    prize_tiers: Vec<String>,
}

impl JsonListSource {
    pub fn new(entry: &SourceEntry) -> Self {
        Self {
            game: entry.game,
            url: entry.url.clone(),
            prize_tiers: entry.prize_tiers.clone(),
        }
    }

    fn parse_body(&self, body: &str) -> Result<SourceBatch> {
        let payload: Value = serde_json::from_str(body)
            .map_err(|e| AppError::shape(self.game, format!("response is not JSON: {e}")))?;
        let list = payload
            .get("list")
            .and_then(Value::as_array)
            .ok_or_else(|| AppError::shape(self.game, "missing 'list' array"))?;

        let mut batch = SourceBatch::default();
        for item in list {
            match self.parse_item(item) {
                Some(draw) => batch.draws.push(draw),
                None => batch.skipped += 1,
            }
        }
        Ok(batch)
    }

    /// One list entry is one draw day. `None` means the entry is unusable
    /// (missing or malformed date, no surviving numbers) and gets counted.
    fn parse_item(&self, item: &Value) -> Option<RawDraw> {
        let date_text = item.get("ngay").and_then(Value::as_str)?;
        let draw_date = date::from_dmy_slash(date_text).ok()?;

        // Tier order carries significance (special prize first) and must
        // survive into the output untouched.
        let mut numbers = Vec::new();
        for tier in &self.prize_tiers {
            if let Some(cell) = item.get(tier.as_str()).and_then(Value::as_str) {
                numbers.extend(extract(cell, SplitRule::Comma, Some(TWO_DIGIT_TAIL)));
            }
        }

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
impl SourceAdapter for JsonListSource {
    fn game(&self) -> GameType {
        self.game
    }

    async fn fetch_draws(&self, fetch: &dyn Fetch) -> Result<SourceBatch> {
        let body = fetch
            .get(&self.url)
            .await
            .map_err(|e| AppError::unavailable(self.game, e))?;
        self.parse_body(&body)
    }
}
