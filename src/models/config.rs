//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::GameType;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client behavior settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Upstream source registry: which game is served from where
    #[serde(default = "defaults::default_sources")]
    pub sources: Vec<SourceEntry>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.sources.is_empty() {
            return Err(AppError::validation("no sources defined"));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.game) {
                return Err(AppError::validation(format!(
                    "duplicate source for game '{}'",
                    source.game
                )));
            }
            source.validate()?;
        }
        Ok(())
    }

    /// Look up the source registered for a game, if any.
    pub fn source_for(&self, game: GameType) -> Option<&SourceEntry> {
        self.sources.iter().find(|s| s.game == game)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            sources: defaults::default_sources(),
        }
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Which upstream wire format a source speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// GET returning a JSON object with a `list` of per-day records
    JsonList,
    /// POST history query returning a JSON object with a `results` array
    PostJson,
    /// GET returning an HTML page with one block per draw day
    HtmlTable,
}

/// One registered upstream source.
///
/// The entry is a flat record; which optional fields apply depends on
/// `kind`, and `validate` enforces the per-kind requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Game served by this source
    pub game: GameType,

    /// Upstream wire format
    pub kind: SourceKind,

    /// Endpoint or page URL
    pub url: String,

    /// Prize-tier fields read by the JSON-list source, in significance order
    #[serde(default = "defaults::prize_tiers")]
    pub prize_tiers: Vec<String>,

    /// Game code sent in the POST history query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_code: Option<String>,

    /// Number of draws requested from the POST history endpoint
    #[serde(default = "defaults::page_size")]
    pub size: usize,

    /// Selector for a link to follow from the fetched page to the actual
    /// results page (HTML source only; at most one extra fetch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_link: Option<String>,

    /// CSS selectors for the HTML source
    #[serde(default)]
    pub selectors: HtmlSelectors,
}

impl SourceEntry {
    fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(AppError::validation(format!(
                "source for '{}' has an empty url",
                self.game
            )));
        }
        match self.kind {
            SourceKind::JsonList => {
                if self.prize_tiers.is_empty() {
                    return Err(AppError::validation(format!(
                        "json_list source for '{}' has no prize_tiers",
                        self.game
                    )));
                }
            }
            SourceKind::PostJson => {
                if self.game_code.as_deref().is_none_or(|c| c.trim().is_empty()) {
                    return Err(AppError::validation(format!(
                        "post_json source for '{}' requires a game_code",
                        self.game
                    )));
                }
                if self.size == 0 {
                    return Err(AppError::validation(format!(
                        "post_json source for '{}' has size 0",
                        self.game
                    )));
                }
            }
            SourceKind::HtmlTable => self.selectors.validate(self.game)?,
        }
        Ok(())
    }
}

/// CSS selectors for carving draw data out of an HTML results page.
///
/// Upstream markup varies, so these match structurally (a heading is
/// whatever `heading` selects, not one fixed tag) and live in configuration
/// rather than code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlSelectors {
    /// Selector for one per-day result block
    pub block: String,

    /// Selector for the date-bearing heading within a block
    pub heading: String,

    /// Selector for the number-bearing cells within a block
    pub cells: String,
}

impl Default for HtmlSelectors {
    fn default() -> Self {
        Self {
            block: "div[class*=result]".to_string(),
            heading: "h2, h3, .title".to_string(),
            cells: "td, span[class*=num]".to_string(),
        }
    }
}

impl HtmlSelectors {
    fn validate(&self, game: GameType) -> Result<()> {
        for (name, selector) in [
            ("block", &self.block),
            ("heading", &self.heading),
            ("cells", &self.cells),
        ] {
            if selector.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "html_table source for '{game}' has an empty {name} selector"
                )));
            }
        }
        Ok(())
    }
}

mod defaults {
    use super::{GameType, HtmlSelectors, SourceEntry, SourceKind};

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; kqxs-ingest/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Source defaults
    pub fn prize_tiers() -> Vec<String> {
        // Significance order: special prize first, then prizes one to seven.
        [
            "giaidb", "giai1", "giai2", "giai3", "giai4", "giai5", "giai6", "giai7",
        ]
        .map(String::from)
        .to_vec()
    }
    pub fn page_size() -> usize {
        200
    }

    const VIETLOTT_HISTORY_URL: &str =
        "https://api.vietlott.vn/api/front/open/lottery/history/list";

    fn post_json(game: GameType, game_code: &str) -> SourceEntry {
        SourceEntry {
            game,
            kind: SourceKind::PostJson,
            url: VIETLOTT_HISTORY_URL.to_string(),
            prize_tiers: prize_tiers(),
            game_code: Some(game_code.to_string()),
            size: page_size(),
            follow_link: None,
            selectors: HtmlSelectors::default(),
        }
    }

    pub fn default_sources() -> Vec<SourceEntry> {
        vec![
            SourceEntry {
                game: GameType::Xsmb,
                kind: SourceKind::JsonList,
                url: "https://api.xoso.me/app/json-kq-mienbac?page=1&limit=200".to_string(),
                prize_tiers: prize_tiers(),
                game_code: None,
                size: page_size(),
                follow_link: None,
                selectors: HtmlSelectors::default(),
            },
            post_json(GameType::Mega645, "mega645"),
            post_json(GameType::Power655, "power655"),
            post_json(GameType::Bingo18, "bingo18"),
            // No keno entry: there is no reliable public feed for it today.
            // Registering one later is a pure configuration change.
        ]
    }
}
