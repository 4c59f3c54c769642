//! Per-asset chart state with last-request-wins refreshes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::services::market_data::MarketDataClient;
use crate::services::overlay::{build_overlay, OverlayRequest};
use crate::services::signals::MarkerBook;
use crate::types::{
    Asset, ChartOverlay, FeedCandle, FeedStatus, IndicatorSettings, MarkerSource, SettingsPatch,
    Timeframe,
};

struct FeedState {
    period: Timeframe,
    count: u32,
    settings: IndicatorSettings,
    candles: Vec<FeedCandle>,
    book: MarkerBook,
    overlay: Option<ChartOverlay>,
    status: FeedStatus,
}

impl FeedState {
    fn recompute(&mut self, asset: Asset) -> Option<ChartOverlay> {
        if self.candles.is_empty() {
            return None;
        }
        let request = OverlayRequest {
            asset,
            period: self.period,
            count: self.count,
            now_ms: Utc::now().timestamp_millis(),
        };
        let overlay = build_overlay(request, &self.candles, &self.settings, &mut self.book);
        self.overlay = Some(overlay.clone());
        Some(overlay)
    }
}

/// Chart feed for one asset.
///
/// Every `refresh` bumps a generation counter and aborts the fetch before it.
/// A fetch only commits if its generation is still current once it holds the
/// state lock, so an older answer can never overwrite a newer one.
pub struct ChartFeed {
    asset: Asset,
    client: Arc<MarketDataClient>,
    state: RwLock<FeedState>,
    generation: AtomicU64,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl ChartFeed {
    pub fn new(
        asset: Asset,
        client: Arc<MarketDataClient>,
        period: Timeframe,
        count: u32,
    ) -> Arc<Self> {
        Arc::new(Self {
            asset,
            client,
            state: RwLock::new(FeedState {
                period,
                count,
                settings: IndicatorSettings::default(),
                candles: Vec::new(),
                book: MarkerBook::new(),
                overlay: None,
                status: FeedStatus::Loading,
            }),
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        })
    }

    pub fn asset(&self) -> Asset {
        self.asset
    }

    /// Fetch fresh candles and rebuild the overlay.
    pub async fn refresh(&self) -> Result<ChartOverlay> {
        let asset = self.asset;

        // Generation bump, spawn and abort of the predecessor happen under one
        // lock so aborts always run in generation order.
        let (generation, task) = {
            let mut in_flight = self.in_flight.lock().await;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            let (period, count) = {
                let state = self.state.read().await;
                (state.period, state.count)
            };

            let client = self.client.clone();
            let task =
                tokio::spawn(async move { client.fetch_candles(asset, period, count).await });
            if let Some(previous) = in_flight.replace(task.abort_handle()) {
                previous.abort();
            }
            (generation, task)
        };

        let result = match task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                debug!("Refresh {} for {} was aborted", generation, asset);
                return Err(AppError::Superseded);
            }
            Err(e) => Err(AppError::Internal(format!("fetch task failed: {}", e))),
        };

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Dropping stale refresh {} for {}", generation, asset);
            return Err(AppError::Superseded);
        }

        match result {
            Ok(candles) => {
                debug!("Refreshed {} with {} candles", asset, candles.len());
                state.candles = candles;
                state.status = FeedStatus::Ready;
                state.recompute(asset).ok_or_else(|| {
                    AppError::Internal(format!("no overlay computed for {}", asset))
                })
            }
            Err(e) => {
                warn!("Refresh failed for {}: {}", asset, e);
                state.status = FeedStatus::Error {
                    message: e.to_string(),
                    retryable: e.is_retryable(),
                };
                Err(e)
            }
        }
    }

    /// Abort whatever fetch is running and invalidate its result.
    pub async fn cancel(&self) {
        let mut in_flight = self.in_flight.lock().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = in_flight.take() {
            handle.abort();
        }
    }

    /// Switch the candle period (and optionally the count). The feed goes
    /// back to `loading` until the next refresh lands.
    pub async fn set_timeframe(&self, period: Timeframe, count: Option<u32>) {
        self.cancel().await;
        let mut state = self.state.write().await;
        state.period = period;
        if let Some(count) = count {
            state.count = count;
        }
        state.status = FeedStatus::Loading;
        info!(
            "{} timeframe set to {} ({} candles)",
            self.asset,
            period.label(),
            state.count
        );
    }

    /// Change only the candle count, keeping the period.
    pub async fn set_count(&self, count: u32) {
        self.cancel().await;
        let mut state = self.state.write().await;
        state.count = count;
        state.status = FeedStatus::Loading;
        info!("{} candle count set to {}", self.asset, count);
    }

    pub async fn timeframe(&self) -> (Timeframe, u32) {
        let state = self.state.read().await;
        (state.period, state.count)
    }

    pub async fn overlay(&self) -> Option<ChartOverlay> {
        self.state.read().await.overlay.clone()
    }

    pub async fn status(&self) -> FeedStatus {
        self.state.read().await.status.clone()
    }

    /// Number of candles currently cached.
    pub async fn candle_count(&self) -> usize {
        self.state.read().await.candles.len()
    }

    pub async fn settings(&self) -> IndicatorSettings {
        self.state.read().await.settings
    }

    /// Replace the indicator settings and recompute from cached candles.
    pub async fn set_settings(&self, settings: IndicatorSettings) -> Option<ChartOverlay> {
        self.update_settings(|s| *s = settings).await
    }

    /// Merge a partial update into one indicator's sub-settings.
    pub async fn patch_settings(
        &self,
        source: MarkerSource,
        patch: &SettingsPatch,
    ) -> Option<ChartOverlay> {
        self.update_settings(|s| s.apply_patch(source, patch)).await
    }

    /// Flip one indicator on or off. Returns the new flag.
    pub async fn toggle(&self, source: MarkerSource) -> bool {
        let mut enabled = false;
        self.update_settings(|s| enabled = s.toggle(source)).await;
        debug!("{} {} for {}", source, if enabled { "enabled" } else { "disabled" }, self.asset);
        enabled
    }

    async fn update_settings<F>(&self, apply: F) -> Option<ChartOverlay>
    where
        F: FnOnce(&mut IndicatorSettings),
    {
        let mut state = self.state.write().await;
        apply(&mut state.settings);
        state.recompute(self.asset)
    }
}
