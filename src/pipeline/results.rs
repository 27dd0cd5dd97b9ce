// src/pipeline/results.rs

//! Result pipeline: the crate's entry point for one ingest run.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Config, GameType, ResultSet};
use crate::pipeline::canonicalize::canonicalize;
use crate::sources::{build_adapters, Fetch, SourceAdapter};

/// Summary of one ingest run.
#[derive(Debug)]
pub struct IngestOutcome {
    /// Canonical records, date ascending.
    pub records: ResultSet,
    /// Upstream records observed, usable or not.
    pub fetched: usize,
    /// Records the adapter skipped during extraction.
    pub skipped: usize,
    /// Draws the canonicalizer dropped for failing the payload shape.
    pub dropped: usize,
}

/// Orchestrator holding one adapter per registered game.
///
/// Construction does all the config-sensitive work up front (selector
/// parsing, URL parsing), so a broken configuration fails here and not on
/// the first request. The pipeline itself is stateless across runs and safe
/// to share behind an `Arc`.
pub struct ResultPipeline {
    adapters: HashMap<GameType, Box<dyn SourceAdapter>>,
    fetch: Arc<dyn Fetch>,
}

impl ResultPipeline {
    /// Build every adapter from the configuration.
    pub fn new(config: &Config, fetch: Arc<dyn Fetch>) -> Result<Self> {
        config.validate()?;

        let mut adapters = HashMap::new();
        for adapter in build_adapters(config)? {
            adapters.insert(adapter.game(), adapter);
        }

        Ok(Self { adapters, fetch })
    }

    /// Game types with a registered source, in a deterministic order.
    pub fn registered_games(&self) -> Vec<GameType> {
        let mut games: Vec<GameType> = self.adapters.keys().copied().collect();
        games.sort_unstable();
        games
    }

    /// Run one ingest for the given game, with diagnostics.
    ///
    /// The adapter lookup happens before anything else: an unregistered
    /// game is a client error and must not cost an upstream fetch.
    pub async fn run(&self, game: GameType) -> Result<IngestOutcome> {
        let adapter = self
            .adapters
            .get(&game)
            .ok_or(AppError::UnregisteredGame(game))?;

        let batch = adapter.fetch_draws(self.fetch.as_ref()).await?;
        let fetched = batch.draws.len() + batch.skipped;
        if batch.skipped > 0 {
            log::warn!("{game}: skipped {} unusable upstream records", batch.skipped);
        }

        let canonical = canonicalize(game, batch.draws)?;
        if canonical.dropped > 0 {
            log::warn!(
                "{game}: dropped {} draws failing the payload shape",
                canonical.dropped
            );
        }
        log::debug!(
            "{game}: {} of {fetched} upstream records canonicalized",
            canonical.records.len()
        );

        Ok(IngestOutcome {
            records: canonical.records,
            fetched,
            skipped: batch.skipped,
            dropped: canonical.dropped,
        })
    }

    /// Canonical results for one game.
    pub async fn get_results(&self, game: GameType) -> Result<ResultSet> {
        Ok(self.run(game).await?.records)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;

    /// Answers every request with the same canned body and counts calls.
    struct CountingFetch {
        body: String,
        calls: AtomicUsize,
    }

    impl CountingFetch {
        fn new(body: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                body: body.into(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Fetch for CountingFetch {
        async fn get(&self, _url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.clone())
        }

        async fn post_json(&self, _url: &str, _body: &Value) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.clone())
        }
    }

    fn xsmb_body() -> String {
        json!({
            "list": [
                { "ngay": "06/01/2024", "giaidb": "12345", "giai1": "67890" },
                { "ngay": "05/01/2024", "giaidb": "54321" },
                { "ngay": "junk", "giaidb": "11111" }
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn unregistered_game_fails_before_any_fetch() {
        let fetch = CountingFetch::new("{}");
        let pipeline = ResultPipeline::new(&Config::default(), fetch.clone()).unwrap();

        // Keno has no default source entry.
        let err = pipeline.run(GameType::Keno).await.unwrap_err();
        assert!(matches!(err, AppError::UnregisteredGame(GameType::Keno)));
        assert!(err.is_client_error());
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn run_reports_counts_and_sorted_records() {
        let fetch = CountingFetch::new(xsmb_body());
        let pipeline = ResultPipeline::new(&Config::default(), fetch.clone()).unwrap();

        let outcome = pipeline.run(GameType::Xsmb).await.unwrap();
        assert_eq!(outcome.fetched, 3);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.dropped, 0);
        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.records[0].date < outcome.records[1].date);
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn identical_upstream_content_is_idempotent() {
        let fetch = CountingFetch::new(xsmb_body());
        let pipeline = ResultPipeline::new(&Config::default(), fetch).unwrap();

        let first = serde_json::to_string(&pipeline.get_results(GameType::Xsmb).await.unwrap());
        let second = serde_json::to_string(&pipeline.get_results(GameType::Xsmb).await.unwrap());
        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[tokio::test]
    async fn semantically_empty_payload_is_an_empty_result_error() {
        let fetch = CountingFetch::new(r#"{"list": []}"#);
        let pipeline = ResultPipeline::new(&Config::default(), fetch).unwrap();

        let err = pipeline.run(GameType::Xsmb).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::EmptyResult {
                game: GameType::Xsmb
            }
        ));
    }

    #[test]
    fn registered_games_are_deterministic() {
        let fetch = CountingFetch::new("{}");
        let pipeline = ResultPipeline::new(&Config::default(), fetch).unwrap();

        assert_eq!(
            pipeline.registered_games(),
            vec![
                GameType::Xsmb,
                GameType::Mega645,
                GameType::Power655,
                GameType::Bingo18,
            ]
        );
    }
}
