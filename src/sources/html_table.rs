// src/sources/html_table.rs

//! Adapter for scraped result pages.
//!
//! The upstream is an HTML document carrying one block per draw day: a
//! heading with a dash-delimited date buried in free text, and a table (or
//! span soup, markup varies by site) of winning numbers. Blocks are matched
//! structurally through configured CSS selectors rather than exact tag
//! names. An optional `follow_link` selector lets the adapter hop from a
//! landing page to the actual result page, which is the one extra fetch
//! this source kind is allowed.

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{GameType, PayloadShape, RawDraw, SourceEntry};
use crate::normalize::date;
use crate::normalize::numbers::{extract, SplitRule, TWO_DIGIT_TAIL};
use crate::utils::resolve_url;

use super::{Fetch, SourceAdapter, SourceBatch};

#[derive(Debug)]
pub(crate) struct HtmlTableSource {
    game: GameType,
    url: Url,
    tail: Option<usize>,
    follow_link: Option<Selector>,
    block: Selector,
    heading: Selector,
    cells: Selector,
}

impl HtmlTableSource {
    /// Selectors and the base URL are checked here so configuration errors
    /// surface at startup.
    pub fn new(entry: &SourceEntry) -> Result<Self> {
        let follow_link = entry
            .follow_link
            .as_ref()
            .map(|s| Self::parse_selector(s))
            .transpose()?;

        // Only the digit lottery draws from the last two digits of each
        // number; ball games keep whole tokens.
        let tail = match entry.game.payload_shape() {
            PayloadShape::PrizeTiers => Some(TWO_DIGIT_TAIL),
            _ => None,
        };

        Ok(Self {
            game: entry.game,
            url: Url::parse(&entry.url)?,
            tail,
            follow_link,
            block: Self::parse_selector(&entry.selectors.block)?,
            heading: Self::parse_selector(&entry.selectors.heading)?,
            cells: Self::parse_selector(&entry.selectors.cells)?,
        })
    }

    /// Locate the link to the actual result page and resolve it against the
    /// landing page URL.
    fn find_target(&self, page: &str, link_sel: &Selector) -> Result<String> {
        let document = Html::parse_document(page);
        let href = document
            .select(link_sel)
            .find_map(|el| el.value().attr("href"))
            .ok_or_else(|| AppError::shape(self.game, "result page link not found"))?;
        Ok(resolve_url(&self.url, href))
    }

    fn parse_page(&self, page: &str) -> SourceBatch {
        let document = Html::parse_document(page);
        let mut batch = SourceBatch::default();
        for block in document.select(&self.block) {
            match self.parse_block(&block) {
                Some(draw) => batch.draws.push(draw),
                None => batch.skipped += 1,
            }
        }
        batch
    }

    /// One block is one draw day. Blocks without a dated heading or with
    /// zero extractable numbers are unusable and get counted.
    fn parse_block(&self, block: &scraper::ElementRef<'_>) -> Option<RawDraw> {
        let heading = block.select(&self.heading).next()?;
        let heading_text: String = heading.text().collect();
        let draw_date = date::from_title(&heading_text).ok()?;

        let mut numbers = Vec::new();
        for cell in block.select(&self.cells) {
            let cell_text: String = cell.text().collect();
            numbers.extend(extract(&cell_text, SplitRule::Whitespace, self.tail));
        }

        if numbers.is_empty() {
            return None;
        }
        Some(RawDraw {
            date: draw_date,
            numbers,
        })
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

#[async_trait]
impl SourceAdapter for HtmlTableSource {
    fn game(&self) -> GameType {
        self.game
    }

    async fn fetch_draws(&self, fetch: &dyn Fetch) -> Result<SourceBatch> {
        let page = fetch
            .get(self.url.as_str())
            .await
            .map_err(|e| AppError::unavailable(self.game, e))?;

        let page = match &self.follow_link {
            Some(link_sel) => {
                let target = self.find_target(&page, link_sel)?;
                fetch
                    .get(&target)
                    .await
                    .map_err(|e| AppError::unavailable(self.game, e))?
            }
            None => page,
        };

        Ok(self.parse_page(&page))
    }
}
