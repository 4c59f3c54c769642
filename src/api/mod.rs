pub mod chart;
pub mod health;
pub mod indicators;

use crate::error::{AppError, Result};
use crate::types::{Asset, MarkerSource};
use crate::AppState;
use axum::Router;
use serde::Serialize;

/// API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Resolve an asset path segment or answer 404.
pub(crate) fn parse_asset(raw: &str) -> Result<Asset> {
    Asset::from_str(raw).ok_or_else(|| AppError::NotFound(format!("Unknown asset: {}", raw)))
}

/// Resolve an indicator path segment or answer 404.
pub(crate) fn parse_indicator(raw: &str) -> Result<MarkerSource> {
    MarkerSource::from_str(raw)
        .ok_or_else(|| AppError::NotFound(format!("Unknown indicator: {}", raw)))
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/chart", chart::router())
        .nest("/api/indicators", indicators::router())
}
