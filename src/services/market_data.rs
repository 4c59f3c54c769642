//! Market-data API client for OTC candle feeds.
//!
//! `GET <base>/<asset>/candles?period=<seconds>&count=<n>` answers with
//! `{ success, data, error? }` plus some bookkeeping fields.

use crate::config::MarketApiConfig;
use crate::error::{AppError, Result};
use crate::types::{Asset, FeedCandle, Timeframe};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Candle endpoint payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CandleResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<FeedCandle>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub period: Option<u32>,
    #[serde(default)]
    pub actual_count: Option<u32>,
    #[serde(default)]
    pub requested_count: Option<u32>,
    #[serde(default)]
    pub api_status: Option<String>,
}

impl CandleResponse {
    /// Unwrap the candle list, turning API-level failures into errors.
    pub fn into_candles(self, period: Timeframe) -> Result<Vec<FeedCandle>> {
        if !self.success {
            return Err(AppError::DataUnavailable(
                self.error
                    .unwrap_or_else(|| "Failed to fetch data".to_string()),
            ));
        }

        match self.data {
            Some(candles) if !candles.is_empty() => Ok(candles),
            Some(_) => Err(AppError::DataUnavailable(format!(
                "No candle data available for {} timeframe. This timeframe may not be supported.",
                period.label()
            ))),
            None => Err(AppError::DataUnavailable(
                self.error
                    .unwrap_or_else(|| "Failed to fetch data".to_string()),
            )),
        }
    }
}

/// Market-data REST client.
#[derive(Clone)]
pub struct MarketDataClient {
    client: Client,
    base_url: String,
}

impl MarketDataClient {
    /// Create a new client with the configured timeout.
    pub fn new(config: &MarketApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("wickwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full candle endpoint URL for an asset.
    pub fn candles_url(&self, asset: Asset) -> String {
        format!("{}{}", self.base_url, asset.candles_path())
    }

    /// Fetch the most recent `count` candles of `period` seconds.
    pub async fn fetch_candles(
        &self,
        asset: Asset,
        period: Timeframe,
        count: u32,
    ) -> Result<Vec<FeedCandle>> {
        let url = self.candles_url(asset);
        debug!("Fetching {} candles for {} ({}s)", count, asset, period.seconds());

        let response = self
            .client
            .get(&url)
            .query(&[("period", period.seconds()), ("count", count)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(format!("{} did not answer in time", url))
                } else {
                    AppError::Reqwest(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(200).collect();
            warn!("Market API error for {}: {} - {}", asset, status, snippet);
            return Err(AppError::ExternalApi(format!(
                "Market API returned {} for {}",
                status, asset
            )));
        }

        let body: CandleResponse = response.json().await?;
        debug!(
            "Market API answered for {}: success={} actual={:?} requested={:?} status={:?}",
            asset, body.success, body.actual_count, body.requested_count, body.api_status
        );

        body.into_candles(period)
    }
}
