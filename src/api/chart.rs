//! Chart API endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{parse_asset, ApiResponse};
use crate::error::{AppError, Result};
use crate::types::{Asset, AssetInfo, ChartOverlay, FeedStatus, Timeframe};
use crate::AppState;

/// Body of a timeframe change. Either field may be omitted, not both.
#[derive(Debug, Deserialize)]
pub struct TimeframeRequest {
    #[serde(default)]
    pub period: Option<u32>,
    #[serde(default)]
    pub count: Option<u32>,
}

/// Load state of one chart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartStatusResponse {
    pub asset: Asset,
    pub period: Timeframe,
    pub count: u32,
    pub candles: usize,
    pub watched: bool,
    pub status: FeedStatus,
    pub updated_at: Option<i64>,
}

/// Create the chart router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assets", get(list_assets))
        .route("/:asset", get(get_chart))
        .route("/:asset/status", get(get_status))
        .route("/:asset/refresh", post(refresh_chart))
        .route("/:asset/timeframe", put(set_timeframe))
}

/// List the selectable assets.
async fn list_assets(State(state): State<AppState>) -> Json<ApiResponse<Vec<AssetInfo>>> {
    let assets = Asset::ALL
        .iter()
        .map(|&asset| AssetInfo {
            id: asset,
            name: asset.display_name().to_string(),
            watched: state.registry.is_watched(asset),
        })
        .collect();

    Json(ApiResponse::new(assets))
}

/// Latest overlay. Fetches once when nothing has loaded yet.
async fn get_chart(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> Result<Json<ApiResponse<ChartOverlay>>> {
    let feed = state.registry.feed(parse_asset(&asset)?);

    let overlay = match feed.overlay().await {
        Some(overlay) => overlay,
        None => feed.refresh().await?,
    };

    Ok(Json(ApiResponse::new(overlay)))
}

async fn get_status(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> Result<Json<ApiResponse<ChartStatusResponse>>> {
    let asset = parse_asset(&asset)?;
    let feed = state.registry.feed(asset);
    let (period, count) = feed.timeframe().await;

    Ok(Json(ApiResponse::new(ChartStatusResponse {
        asset,
        period,
        count,
        candles: feed.candle_count().await,
        watched: state.registry.is_watched(asset),
        status: feed.status().await,
        updated_at: feed.overlay().await.map(|o| o.updated_at),
    })))
}

/// Fetch now instead of waiting for the next tick.
async fn refresh_chart(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> Result<Json<ApiResponse<ChartOverlay>>> {
    let feed = state.registry.feed(parse_asset(&asset)?);
    let overlay = feed.refresh().await?;
    Ok(Json(ApiResponse::new(overlay)))
}

/// Switch period and/or count, then reload.
async fn set_timeframe(
    State(state): State<AppState>,
    Path(asset): Path<String>,
    Json(body): Json<TimeframeRequest>,
) -> Result<Json<ApiResponse<ChartOverlay>>> {
    let asset = parse_asset(&asset)?;
    let period = body
        .period
        .map(|seconds| {
            Timeframe::from_seconds(seconds)
                .ok_or_else(|| AppError::BadRequest(format!("Unsupported timeframe: {}s", seconds)))
        })
        .transpose()?;
    if body.count == Some(0) {
        return Err(AppError::BadRequest("count must be positive".to_string()));
    }

    let feed = state.registry.feed(asset);
    match (period, body.count) {
        (Some(period), count) => feed.set_timeframe(period, count).await,
        (None, Some(count)) => feed.set_count(count).await,
        (None, None) => {
            return Err(AppError::BadRequest(
                "period or count is required".to_string(),
            ))
        }
    }
    let overlay = feed.refresh().await?;

    Ok(Json(ApiResponse::new(overlay)))
}
