//! Pipeline entry points for ingest operations.
//!
//! - [`ResultPipeline::get_results`]: canonical results for one game
//! - [`ResultPipeline::run`]: the same, with skip/drop diagnostics

mod canonicalize;
mod results;

pub use results::{IngestOutcome, ResultPipeline};
