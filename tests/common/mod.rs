//! In-process stand-in for the market-data API.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wickwatch::config::{Config, MarketApiConfig, RefreshConfig};
use wickwatch::services::{FeedRegistry, MarketDataClient};
use wickwatch::types::Asset;
use wickwatch::AppState;

/// Requests with this count are answered after `SLOW_DELAY`.
pub const SLOW_COUNT: u32 = 77;
pub const SLOW_DELAY: Duration = Duration::from_millis(500);

/// First candle time, on a 5-minute boundary.
pub const START_TIME: i64 = 1_700_000_100;

#[derive(Debug, Deserialize)]
struct CandleQuery {
    period: u32,
    count: u32,
}

/// Shared switches and counters of the fake API.
#[derive(Clone, Default)]
pub struct FakeMarket {
    hits: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl FakeMarket {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Make every pair answer `{"success": false}` from now on.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

/// Deterministic candle series. `eurcad` carries real volume, `etcusd` is
/// empty, `usdinr` reports a failure and `bchusd` answers 500.
pub fn candle_series(period: u32, count: u32, with_volume: bool) -> Vec<serde_json::Value> {
    (0..count as i64)
        .map(|i| {
            let open = 1.08 + (i % 7) as f64 * 0.001;
            let close = if i % 3 == 0 { open - 0.002 } else { open + 0.0015 };
            let mut candle = json!({
                "time": START_TIME + i * period as i64,
                "open": open,
                "high": open.max(close) + 0.0005,
                "low": open.min(close) - 0.0005,
                "close": close,
            });
            if with_volume {
                candle["volume"] = json!(1_000 + i * 10);
            }
            candle
        })
        .collect()
}

async fn candles(
    State(fake): State<FakeMarket>,
    Path(pair): Path<String>,
    Query(query): Query<CandleQuery>,
) -> Response {
    fake.hits.fetch_add(1, Ordering::SeqCst);

    if query.count == SLOW_COUNT {
        tokio::time::sleep(SLOW_DELAY).await;
    }

    if fake.fail.load(Ordering::SeqCst) || pair == "usdinr" {
        return Json(json!({ "success": false, "error": "Not connected" })).into_response();
    }

    match pair.as_str() {
        "bchusd" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        "etcusd" => Json(json!({ "success": true, "data": [], "period": query.period }))
            .into_response(),
        _ => {
            let data = candle_series(query.period, query.count, pair == "eurcad");
            Json(json!({
                "success": true,
                "data": data,
                "period": query.period,
                "actual_count": query.count,
                "requested_count": query.count,
                "api_status": "connected",
            }))
            .into_response()
        }
    }
}

/// Bind the fake API on an ephemeral port. Returns its base URL.
pub async fn spawn_market() -> (String, FakeMarket) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let fake = FakeMarket::default();

    let app = Router::new()
        .route("/api/:pair/candles", get(candles))
        .with_state(fake.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), fake)
}

pub fn test_config(base_url: &str, auto_refresh: bool, interval_ms: u64) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        market_api: MarketApiConfig {
            base_url: base_url.to_string(),
            timeout_ms: 2_000,
        },
        refresh: RefreshConfig {
            auto_refresh,
            interval_ms,
            ..RefreshConfig::default()
        },
        watch_assets: vec![Asset::EurUsd],
    }
}

pub fn client(base_url: &str) -> Arc<MarketDataClient> {
    let config = test_config(base_url, false, 5_000);
    Arc::new(MarketDataClient::new(&config.market_api).unwrap())
}

pub fn app_state(base_url: &str) -> AppState {
    let config = test_config(base_url, false, 5_000);
    let registry = FeedRegistry::new(client(base_url), config.refresh.clone());
    AppState {
        config: Arc::new(config),
        registry,
    }
}
