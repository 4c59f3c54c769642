//! Integration tests for API endpoints

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use common::spawn_market;
use serde_json::Value;
use tower::ServiceExt;
use wickwatch::api;

fn app(base_url: &str) -> Router {
    api::router().with_state(common::app_state(base_url))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (base_url, _fake) = spawn_market().await;
    let (status, json) = send(&app(&base_url), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["marketApi"], base_url.as_str());
}

#[tokio::test]
async fn test_chart_loads_once_then_serves_cache() {
    let (base_url, fake) = spawn_market().await;
    let app = app(&base_url);

    let (status, json) = send(&app, get("/api/chart/EURUSD_otc")).await;
    assert_eq!(status, StatusCode::OK);
    let overlay = &json["data"];
    assert_eq!(overlay["asset"], "EURUSD_otc");
    assert_eq!(overlay["period"], 60);
    assert_eq!(overlay["candles"].as_array().unwrap().len(), 100);
    assert_eq!(overlay["volume"].as_array().unwrap().len(), 100);
    assert!(overlay["updatedAt"].as_i64().unwrap() > 0);
    assert_eq!(fake.hits(), 1);

    let (status, _) = send(&app, get("/api/chart/eurusd")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fake.hits(), 1);

    let (_, json) = send(&app, get("/api/chart/EURUSD_otc/status")).await;
    assert_eq!(json["data"]["status"]["state"], "ready");
    assert_eq!(json["data"]["candles"], 100);
}

#[tokio::test]
async fn test_manual_refresh_fetches() {
    let (base_url, fake) = spawn_market().await;
    let app = app(&base_url);

    send(&app, get("/api/chart/USDCAD_otc")).await;
    let (status, _) = send(
        &app,
        Request::post("/api/chart/USDCAD_otc/refresh")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fake.hits(), 2);
}

#[tokio::test]
async fn test_timeframe_change_reloads() {
    let (base_url, _fake) = spawn_market().await;
    let app = app(&base_url);

    let (status, json) = send(
        &app,
        json_request(
            "PUT",
            "/api/chart/EURUSD_otc/timeframe",
            r#"{"period":240,"count":30}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["period"], 240);
    let candles = json["data"]["candles"].as_array().unwrap();
    assert_eq!(candles.len(), 30);
    assert_eq!(
        candles[1]["time"].as_i64().unwrap() - candles[0]["time"].as_i64().unwrap(),
        240
    );
}

#[tokio::test]
async fn test_count_only_change_keeps_period() {
    let (base_url, fake) = spawn_market().await;
    let app = app(&base_url);

    let (status, json) = send(
        &app,
        json_request("PUT", "/api/chart/USDCAD_otc/timeframe", r#"{"count":15}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["period"], 60);
    assert_eq!(json["data"]["count"], 15);
    assert_eq!(json["data"]["candles"].as_array().unwrap().len(), 15);
    assert_eq!(fake.hits(), 1);

    let (_, json) = send(&app, get("/api/chart/USDCAD_otc/status")).await;
    assert_eq!(json["data"]["count"], 15);
    assert_eq!(json["data"]["period"], 60);

    let (status, _) = send(
        &app,
        json_request("PUT", "/api/chart/USDCAD_otc/timeframe", "{}"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(fake.hits(), 1);
}

#[tokio::test]
async fn test_overlay_carries_draw_colors_and_labels() {
    let (base_url, _fake) = spawn_market().await;
    let app = app(&base_url);

    let (status, json) = send(&app, get("/api/chart/EURCAD_otc")).await;
    assert_eq!(status, StatusCode::OK);
    let volume = json["data"]["volume"].as_array().unwrap();
    assert_eq!(volume[0]["value"], 1_000);
    assert_eq!(volume[0]["label"], "1k");
    assert_eq!(volume[20]["label"], "1.2k");
    for bar in volume {
        let expected = match bar["tone"].as_str().unwrap() {
            "up" => "#26a69a33",
            "down" => "#ef535033",
            other => panic!("unexpected tone {}", other),
        };
        assert_eq!(bar["color"], expected);
    }

    send(
        &app,
        Request::post("/api/indicators/EURCAD_otc/by2bars/toggle")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let (_, json) = send(&app, get("/api/chart/EURCAD_otc")).await;
    let performance = json["data"]["performance"].as_array().unwrap();
    assert!(!performance.is_empty());
    for sample in performance {
        let expected = if sample["value"] == 1 { "#32CD32" } else { "#FF0000" };
        assert_eq!(sample["color"], expected);
    }
}

#[tokio::test]
async fn test_unavailable_timeframe_is_503() {
    let (base_url, _fake) = spawn_market().await;
    let app = app(&base_url);

    let (status, json) = send(&app, get("/api/chart/ETCUSD_otc")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        json["error"],
        "No candle data available for 1m timeframe. This timeframe may not be supported."
    );

    let (_, json) = send(&app, get("/api/chart/ETCUSD_otc/status")).await;
    assert_eq!(json["data"]["status"]["state"], "error");
    assert_eq!(json["data"]["status"]["retryable"], true);
}

#[tokio::test]
async fn test_upstream_http_error_is_502() {
    let (base_url, _fake) = spawn_market().await;
    let (status, json) = send(&app(&base_url), get("/api/chart/BCHUSD_otc")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["status"], 502);
}

#[tokio::test]
async fn test_unknown_asset_is_404() {
    let (base_url, fake) = spawn_market().await;
    let (status, json) = send(&app(&base_url), get("/api/chart/XAUUSD_otc")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Unknown asset: XAUUSD_otc");
    assert_eq!(fake.hits(), 0);
}

#[tokio::test]
async fn test_indicator_settings_flow() {
    let (base_url, fake) = spawn_market().await;
    let app = app(&base_url);

    let (_, json) = send(&app, get("/api/chart/EURUSD_otc")).await;
    assert!(json["data"]["revenue"].as_array().unwrap().is_empty());

    let (status, json) = send(
        &app,
        Request::post("/api/indicators/EURUSD_otc/by2bars/toggle")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["enabled"], true);

    let (_, json) = send(&app, get("/api/chart/EURUSD_otc")).await;
    assert!(!json["data"]["revenue"].as_array().unwrap().is_empty());

    let settings = r#"{
        "binaryOptions": { "enabled": false, "settings": { "showSignals": true } },
        "by2bars": { "enabled": true, "settings": {
            "showSignals": false, "showPerformance": true, "showRevenueLine": true
        } }
    }"#;
    let (status, json) = send(&app, json_request("PUT", "/api/indicators/EURUSD_otc", settings)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["binaryOptions"]["enabled"], false);

    let (_, json) = send(&app, get("/api/chart/EURUSD_otc")).await;
    assert!(json["data"]["markers"].as_array().unwrap().is_empty());
    assert!(!json["data"]["performance"].as_array().unwrap().is_empty());

    assert_eq!(fake.hits(), 1);
}
