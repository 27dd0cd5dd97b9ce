// src/handler.rs

//! Serverless boundary for the ingest pipeline.
//!
//! Speaks the API-Gateway proxy convention: JSON event in, a JSON value with
//! `statusCode`/`headers`/`body` out. The game selector arrives as the
//! `type` query parameter (top-level `type` works for direct invokes). This
//! is glue only; everything interesting happens in [`ResultPipeline`].

use std::sync::Arc;

use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde_json::{Value, json};
use tracing::{error, info, instrument};

use crate::models::GameType;
use crate::pipeline::ResultPipeline;

/// Results change once per draw day; an hour of shared cache is plenty.
const CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate";

/// Main Lambda handler function.
#[instrument(skip(pipeline, event))]
pub async fn handle(
    pipeline: Arc<ResultPipeline>,
    event: LambdaEvent<Value>,
) -> std::result::Result<Value, LambdaError> {
    Ok(respond_to(&pipeline, &event.payload).await)
}

/// Map one request payload to its response.
async fn respond_to(pipeline: &ResultPipeline, payload: &Value) -> Value {
    if method(payload).eq_ignore_ascii_case("OPTIONS") {
        return respond(200, String::new(), false);
    }

    let Some(selector) = game_selector(payload) else {
        return error_response(400, "missing 'type' query parameter");
    };

    // Selector mapping happens before the pipeline is touched: an unknown
    // name is the caller's mistake and must not cost a fetch.
    let game: GameType = match selector.parse() {
        Ok(game) => game,
        Err(_) => {
            return error_response(400, &format!("invalid lottery type '{selector}'"));
        }
    };

    match pipeline.get_results(game).await {
        Ok(records) => {
            info!(game = %game, records = records.len(), "request served");
            match serde_json::to_string(&records) {
                Ok(body) => respond(200, body, true),
                Err(e) => error_response(500, &format!("serialization failed: {e}")),
            }
        }
        Err(e) => {
            let status = if e.is_client_error() { 400 } else { 500 };
            error!(game = %game, status, "request failed: {e}");
            error_response(status, &e.to_string())
        }
    }
}

fn method(payload: &Value) -> &str {
    payload
        .pointer("/requestContext/http/method")
        .or_else(|| payload.get("httpMethod"))
        .and_then(Value::as_str)
        .unwrap_or("GET")
}

fn game_selector(payload: &Value) -> Option<&str> {
    payload
        .pointer("/queryStringParameters/type")
        .or_else(|| payload.get("type"))
        .and_then(Value::as_str)
}

fn respond(status: u16, body: String, cacheable: bool) -> Value {
    let mut headers = json!({
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Methods": "GET, OPTIONS",
        "Access-Control-Allow-Headers": "Content-Type",
        "Content-Type": "application/json",
    });
    if cacheable {
        headers["Cache-Control"] = json!(CACHE_CONTROL);
    }

    json!({
        "statusCode": status,
        "headers": headers,
        "body": body,
    })
}

fn error_response(status: u16, message: &str) -> Value {
    respond(status, json!({ "error": message }).to_string(), false)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::{AppError, Result};
    use crate::models::{Config, DrawRecord};
    use crate::sources::Fetch;

    /// Serves one canned body (or fails when given none) and counts calls.
    struct CannedFetch {
        body: Option<String>,
        calls: AtomicUsize,
    }

    impl CannedFetch {
        fn serving(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: Some(body.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn down() -> Arc<Self> {
            Arc::new(Self {
                body: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn answer(&self) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body
                .clone()
                .ok_or_else(|| AppError::validation("connection refused"))
        }
    }

    #[async_trait]
    impl Fetch for CannedFetch {
        async fn get(&self, _url: &str) -> Result<String> {
            self.answer()
        }

        async fn post_json(&self, _url: &str, _body: &Value) -> Result<String> {
            self.answer()
        }
    }

    fn pipeline(fetch: Arc<CannedFetch>) -> ResultPipeline {
        ResultPipeline::new(&Config::default(), fetch).unwrap()
    }

    fn xsmb_body() -> String {
        json!({ "list": [{ "ngay": "05/01/2024", "giaidb": "12345" }] }).to_string()
    }

    #[tokio::test]
    async fn options_preflight_gets_cors_and_no_cache() {
        let p = pipeline(CannedFetch::down());
        let payload = json!({ "requestContext": { "http": { "method": "OPTIONS" } } });

        let response = respond_to(&p, &payload).await;
        assert_eq!(response["statusCode"], 200);
        assert_eq!(response["headers"]["Access-Control-Allow-Origin"], "*");
        assert!(response["headers"]["Cache-Control"].is_null());
        assert_eq!(response["body"], "");
    }

    #[tokio::test]
    async fn missing_selector_is_a_client_error() {
        let p = pipeline(CannedFetch::down());
        let response = respond_to(&p, &json!({})).await;
        assert_eq!(response["statusCode"], 400);
    }

    #[tokio::test]
    async fn unknown_selector_never_reaches_upstream() {
        let fetch = CannedFetch::serving(&xsmb_body());
        let p = pipeline(fetch.clone());
        let payload = json!({ "queryStringParameters": { "type": "roulette" } });

        let response = respond_to(&p, &payload).await;
        assert_eq!(response["statusCode"], 400);
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unregistered_game_is_a_client_error_without_a_fetch() {
        let fetch = CannedFetch::serving(&xsmb_body());
        let p = pipeline(fetch.clone());
        let payload = json!({ "queryStringParameters": { "type": "keno" } });

        let response = respond_to(&p, &payload).await;
        assert_eq!(response["statusCode"], 400);
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn success_serves_cacheable_canonical_records() {
        let p = pipeline(CannedFetch::serving(&xsmb_body()));
        let payload = json!({ "queryStringParameters": { "type": "xsmb" } });

        let response = respond_to(&p, &payload).await;
        assert_eq!(response["statusCode"], 200);
        assert_eq!(response["headers"]["Cache-Control"], CACHE_CONTROL);

        let records: Vec<DrawRecord> =
            serde_json::from_str(response["body"].as_str().unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date.to_string(), "2024-01-05");
    }

    #[tokio::test]
    async fn top_level_type_works_for_direct_invokes() {
        let p = pipeline(CannedFetch::serving(&xsmb_body()));
        let response = respond_to(&p, &json!({ "type": "xsmb" })).await;
        assert_eq!(response["statusCode"], 200);
    }

    #[tokio::test]
    async fn upstream_failure_is_a_server_error() {
        let p = pipeline(CannedFetch::down());
        let payload = json!({ "queryStringParameters": { "type": "xsmb" } });

        let response = respond_to(&p, &payload).await;
        assert_eq!(response["statusCode"], 500);
        assert!(
            response["body"]
                .as_str()
                .unwrap()
                .contains("unavailable")
        );
    }
}
