// src/models/mod.rs

//! Domain models for the ingest service.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod draw;
mod game;

// Re-export all public types
pub use config::{Config, HtmlSelectors, HttpConfig, SourceEntry, SourceKind};
pub use draw::{DrawRecord, NumberPayload, ResultSet};
pub use game::{GameType, PayloadShape};

pub(crate) use draw::RawDraw;
