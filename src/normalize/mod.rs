// src/normalize/mod.rs

//! Text-to-value normalization shared by every source adapter.

pub mod date;
pub mod numbers;
