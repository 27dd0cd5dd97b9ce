// src/error.rs

//! Unified error handling for the ingest service.

use std::fmt;

use thiserror::Error;

use crate::models::GameType;

/// Result type alias for ingest operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Raw content could not be retrieved from the upstream source
    #[error("upstream for {game} unavailable: {message}")]
    UpstreamUnavailable { game: GameType, message: String },

    /// Retrieved content does not match the structure the adapter expects
    #[error("unexpected upstream shape for {game}: {message}")]
    UpstreamShape { game: GameType, message: String },

    /// A successfully parsed payload yielded zero valid draws
    #[error("upstream for {game} returned no usable draw results")]
    EmptyResult { game: GameType },

    /// Requested game type has no source registered in the configuration
    #[error("no source registered for game type '{0}'")]
    UnregisteredGame(GameType),

    /// CSS selector parsing failed
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl AppError {
    /// Create an upstream-unavailable error with game context.
    pub fn unavailable(game: GameType, cause: impl fmt::Display) -> Self {
        Self::UpstreamUnavailable {
            game,
            message: cause.to_string(),
        }
    }

    /// Create an upstream-shape error with game context.
    pub fn shape(game: GameType, message: impl Into<String>) -> Self {
        Self::UpstreamShape {
            game,
            message: message.into(),
        }
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the error is the caller's fault rather than the service's.
    ///
    /// The serverless boundary maps these to a client error status.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnregisteredGame(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_game_context() {
        let err = AppError::unavailable(GameType::Mega645, "status 503");
        assert_eq!(
            err.to_string(),
            "upstream for mega645 unavailable: status 503"
        );

        let err = AppError::shape(GameType::Xsmb, "missing 'list' field");
        assert!(err.to_string().contains("xsmb"));
        assert!(err.to_string().contains("missing 'list' field"));
    }

    #[test]
    fn unregistered_game_is_client_error() {
        assert!(AppError::UnregisteredGame(GameType::Keno).is_client_error());
        let empty = AppError::EmptyResult {
            game: GameType::Keno,
        };
        assert!(!empty.is_client_error());
    }
}
