// src/lib.rs

//! kqxs-ingest Library
//!
//! Fetches Vietnamese lottery draw results from format-incompatible upstream
//! sources and normalizes them into one canonical, date-ordered schema.

pub mod error;
#[cfg(feature = "lambda")]
pub mod handler;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod sources;
pub mod utils;
