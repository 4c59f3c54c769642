//! Chart feeds by asset plus their background refresh tasks.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::RefreshConfig;
use crate::error::AppError;
use crate::services::chart_feed::ChartFeed;
use crate::services::market_data::MarketDataClient;
use crate::types::Asset;

/// Periodic refresh loop of one feed. Aborted when dropped.
pub struct RefreshTask {
    handle: JoinHandle<()>,
}

impl RefreshTask {
    /// Refresh right away, then once per `interval`. Ticks that fall behind
    /// a slow fetch are skipped rather than bunched up.
    pub fn spawn(feed: Arc<ChartFeed>, interval: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                match feed.refresh().await {
                    Ok(overlay) => debug!(
                        "Auto-refresh {}: {} candles, {} markers",
                        feed.asset(),
                        overlay.candles.len(),
                        overlay.markers.len()
                    ),
                    Err(AppError::Superseded) => {}
                    Err(e) => warn!("Auto-refresh failed for {}: {}", feed.asset(), e),
                }
            }
        });

        Self { handle }
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// All chart feeds, created on first use.
pub struct FeedRegistry {
    client: Arc<MarketDataClient>,
    refresh: RefreshConfig,
    feeds: DashMap<Asset, Arc<ChartFeed>>,
    tasks: DashMap<Asset, RefreshTask>,
}

impl FeedRegistry {
    pub fn new(client: Arc<MarketDataClient>, refresh: RefreshConfig) -> Arc<Self> {
        Arc::new(Self {
            client,
            refresh,
            feeds: DashMap::new(),
            tasks: DashMap::new(),
        })
    }

    pub fn get(&self, asset: Asset) -> Option<Arc<ChartFeed>> {
        self.feeds.get(&asset).map(|f| f.clone())
    }

    /// Feed for `asset`, created with the default timeframe if missing.
    pub fn feed(&self, asset: Asset) -> Arc<ChartFeed> {
        self.feeds
            .entry(asset)
            .or_insert_with(|| {
                debug!("Creating chart feed for {}", asset);
                ChartFeed::new(
                    asset,
                    self.client.clone(),
                    self.refresh.default_period,
                    self.refresh.default_count,
                )
            })
            .clone()
    }

    /// Start polling `asset` unless auto-refresh is off or it is already
    /// watched.
    pub fn watch(&self, asset: Asset) -> Arc<ChartFeed> {
        let feed = self.feed(asset);
        if !self.refresh.auto_refresh {
            return feed;
        }

        self.tasks.entry(asset).or_insert_with(|| {
            info!("Watching {} every {}ms", asset, self.refresh.interval_ms);
            RefreshTask::spawn(feed.clone(), self.refresh.interval())
        });
        feed
    }

    /// Stop polling `asset`. The feed and its last overlay stay available.
    pub async fn unwatch(&self, asset: Asset) -> bool {
        let removed = self.tasks.remove(&asset).is_some();
        if removed {
            info!("Stopped watching {}", asset);
            if let Some(feed) = self.get(asset) {
                feed.cancel().await;
            }
        }
        removed
    }

    pub fn is_watched(&self, asset: Asset) -> bool {
        self.tasks.contains_key(&asset)
    }

    /// Watched assets in declaration order.
    pub fn watched(&self) -> Vec<Asset> {
        let mut assets: Vec<Asset> = self.tasks.iter().map(|e| *e.key()).collect();
        assets.sort();
        assets
    }

    /// Abort every refresh task.
    pub fn shutdown(&self) {
        let count = self.tasks.len();
        self.tasks.clear();
        info!("Stopped {} refresh task(s)", count);
    }
}
