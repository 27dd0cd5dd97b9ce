// src/normalize/numbers.rs

//! Numeric extraction from noisy upstream text fragments.
//!
//! Prize strings and table-cell text routinely carry formatting artifacts
//! (stray separators, doubled spaces, non-numeric labels). Extraction is
//! deliberately lenient: tokens that do not parse are dropped rather than
//! failing the batch, and the worst case is an empty result.

/// Tail width for two-digit lottery games: only the last two digits of each
/// prize number are drawn numbers.
pub const TWO_DIGIT_TAIL: usize = 2;

/// How a raw fragment is carved into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRule {
    /// Comma-joined prize strings from JSON feeds
    Comma,
    /// Whitespace-joined cell text from HTML pages
    Whitespace,
}

/// Extract every valid number from a text fragment.
///
/// With `tail = Some(k)`, only the last `k` characters of each token are
/// parsed and shorter tokens are dropped; with `tail = None` the whole
/// token must parse. Never fails: unparseable tokens are silently skipped.
pub fn extract(text: &str, split: SplitRule, tail: Option<usize>) -> Vec<u32> {
    let tokens: Vec<&str> = match split {
        SplitRule::Comma => text.split(',').collect(),
        SplitRule::Whitespace => text.split_whitespace().collect(),
    };

    tokens
        .into_iter()
        .filter_map(|token| parse_token(token.trim(), tail))
        .collect()
}

fn parse_token(token: &str, tail: Option<usize>) -> Option<u32> {
    if token.is_empty() {
        return None;
    }
    let digits = match tail {
        Some(k) => tail_chars(token, k)?,
        None => token,
    };
    digits.parse().ok()
}

/// The last `k` characters of a token, or `None` if it is shorter than `k`.
///
/// Indexes by character so multibyte junk around the digits cannot split a
/// UTF-8 sequence.
fn tail_chars(token: &str, k: usize) -> Option<&str> {
    let len = token.chars().count();
    if len < k {
        return None;
    }
    let (idx, _) = token.char_indices().nth(len - k)?;
    Some(&token[idx..])
}
