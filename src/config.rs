use std::env;
use std::time::Duration;

use crate::types::{Asset, Timeframe};

/// Market-data API connection settings.
#[derive(Debug, Clone)]
pub struct MarketApiConfig {
    /// Base URL, candle paths are appended (e.g. `http://127.0.0.1:5000/api`).
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl MarketApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for MarketApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/api".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Chart refresh settings.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Poll the market-data API periodically.
    pub auto_refresh: bool,
    /// Refresh interval in milliseconds.
    pub interval_ms: u64,
    /// Candle period used for new feeds.
    pub default_period: Timeframe,
    /// Number of candles requested for new feeds.
    pub default_count: u32,
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            interval_ms: 5_000,
            default_period: Timeframe::default(),
            default_count: 100,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Market-data API.
    pub market_api: MarketApiConfig,
    /// Refresh behavior.
    pub refresh: RefreshConfig,
    /// Assets to start polling at startup.
    pub watch_assets: Vec<Asset>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        // Format: "EURUSD_otc,USDCAD_otc"
        let watch_assets = env::var("WATCH_ASSETS")
            .ok()
            .map(|s| parse_asset_list(&s))
            .unwrap_or_else(|| vec![Asset::EurUsd]);

        let default_period = env::var("DEFAULT_PERIOD")
            .ok()
            .and_then(|v| v.parse().ok())
            .and_then(Timeframe::from_seconds)
            .unwrap_or_default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            market_api: MarketApiConfig {
                base_url: env::var("MARKET_API_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|_| "http://127.0.0.1:5000/api".to_string()),
                timeout_ms: env::var("MARKET_API_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10_000),
            },
            refresh: RefreshConfig {
                auto_refresh: env::var("AUTO_REFRESH")
                    .ok()
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(true),
                interval_ms: env::var("REFRESH_INTERVAL_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|ms: &u64| *ms > 0)
                    .unwrap_or(5_000),
                default_period,
                default_count: env::var("DEFAULT_COUNT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|n: &u32| *n > 0)
                    .unwrap_or(100),
            },
            watch_assets,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Parse a comma-separated asset list, skipping unknown entries.
fn parse_asset_list(s: &str) -> Vec<Asset> {
    let mut assets = Vec::new();
    for asset in s.split(',').filter_map(Asset::from_str) {
        if !assets.contains(&asset) {
            assets.push(asset);
        }
    }
    assets
}
