// src/sources/mod.rs

//! Source adapters, one per upstream wire format.
//!
//! An adapter owns the raw side of ingestion for its game: issuing the
//! request through the injected [`Fetch`] transport, checking the payload
//! envelope, and turning each upstream record into a dated number row.
//! Record-level problems (unparseable date, no surviving numbers) skip the
//! record and bump a counter; only an unreachable upstream or a payload of
//! the wrong overall shape fails the whole request.

mod html_table;
mod json_list;
mod post_json;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Config, GameType, RawDraw, SourceKind};

pub(crate) use html_table::HtmlTableSource;
pub(crate) use json_list::JsonListSource;
pub(crate) use post_json::PostJsonSource;

/// Transport capability the adapters fetch through.
///
/// The production implementation wraps a `reqwest` client
/// ([`crate::utils::http::HttpFetcher`]); tests substitute canned bodies to
/// exercise parsing without a network.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// GET a URL and return the response body as text.
    async fn get(&self, url: &str) -> Result<String>;

    /// POST a JSON body to a URL and return the response body as text.
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<String>;
}

/// What an adapter produced for one run.
#[derive(Debug, Default)]
pub(crate) struct SourceBatch {
    /// Dated draws, in upstream order.
    pub draws: Vec<RawDraw>,
    /// Records dropped during extraction.
    pub skipped: usize,
}

/// One upstream feed for one game.
#[async_trait]
pub(crate) trait SourceAdapter: Send + Sync {
    /// The game this adapter serves.
    fn game(&self) -> GameType;

    /// Fetch the upstream payload and extract every usable draw from it.
    async fn fetch_draws(&self, fetch: &dyn Fetch) -> Result<SourceBatch>;
}

/// Build one adapter per configured source entry.
///
/// Selector strings and base URLs are checked here, so a broken
/// configuration fails at startup instead of on the first request.
pub(crate) fn build_adapters(config: &Config) -> Result<Vec<Box<dyn SourceAdapter>>> {
    config
        .sources
        .iter()
        .map(|entry| {
            let adapter: Box<dyn SourceAdapter> = match entry.kind {
                SourceKind::JsonList => Box::new(JsonListSource::new(entry)),
                SourceKind::PostJson => Box::new(PostJsonSource::new(entry)),
                SourceKind::HtmlTable => Box::new(HtmlTableSource::new(entry)?),
            };
            Ok(adapter)
        })
        .collect()
}
