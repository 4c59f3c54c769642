//! Indicator settings endpoints.
//!
//! Every change recomputes the chart from its cached candles; nothing is
//! refetched.

use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;

use super::{parse_asset, parse_indicator, ApiResponse};
use crate::error::Result;
use crate::types::{IndicatorSettings, MarkerSource, SettingsPatch};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub indicator: MarkerSource,
    pub enabled: bool,
}

/// Create the indicators router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:asset", get(get_settings).put(put_settings))
        .route("/:asset/:indicator", patch(patch_settings))
        .route("/:asset/:indicator/toggle", post(toggle_indicator))
}

async fn get_settings(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> Result<Json<ApiResponse<IndicatorSettings>>> {
    let feed = state.registry.feed(parse_asset(&asset)?);
    Ok(Json(ApiResponse::new(feed.settings().await)))
}

/// Replace the whole settings object.
async fn put_settings(
    State(state): State<AppState>,
    Path(asset): Path<String>,
    Json(settings): Json<IndicatorSettings>,
) -> Result<Json<ApiResponse<IndicatorSettings>>> {
    let feed = state.registry.feed(parse_asset(&asset)?);
    feed.set_settings(settings).await;
    Ok(Json(ApiResponse::new(feed.settings().await)))
}

/// Merge sub-settings of one indicator.
async fn patch_settings(
    State(state): State<AppState>,
    Path((asset, indicator)): Path<(String, String)>,
    Json(update): Json<SettingsPatch>,
) -> Result<Json<ApiResponse<IndicatorSettings>>> {
    let asset = parse_asset(&asset)?;
    let source = parse_indicator(&indicator)?;
    let feed = state.registry.feed(asset);
    feed.patch_settings(source, &update).await;
    Ok(Json(ApiResponse::new(feed.settings().await)))
}

async fn toggle_indicator(
    State(state): State<AppState>,
    Path((asset, indicator)): Path<(String, String)>,
) -> Result<Json<ApiResponse<ToggleResponse>>> {
    let asset = parse_asset(&asset)?;
    let source = parse_indicator(&indicator)?;
    let enabled = state.registry.feed(asset).toggle(source).await;
    Ok(Json(ApiResponse::new(ToggleResponse {
        indicator: source,
        enabled,
    })))
}
