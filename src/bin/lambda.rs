//! AWS Lambda entry point for the kqxs ingest service.
//!
//! Deploy with `cargo lambda build --release --features lambda`.
//! The function answers API-Gateway-style requests carrying a `type`
//! query parameter.

use std::sync::Arc;

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kqxs_ingest::handler;
use kqxs_ingest::models::Config;
use kqxs_ingest::pipeline::ResultPipeline;
use kqxs_ingest::utils::http::HttpFetcher;

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load_or_default(&config_path);

    // Built once, before the runtime accepts invocations: a broken
    // configuration (bad selector, bad URL) fails the cold start instead of
    // the first request.
    let fetch = Arc::new(HttpFetcher::new(&config.http)?);
    let pipeline = Arc::new(ResultPipeline::new(&config, fetch)?);

    info!(games = ?pipeline.registered_games(), "kqxs ingest starting");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let pipeline = Arc::clone(&pipeline);
        async move { handler::handle(pipeline, event).await }
    }))
    .await
}
