//! Assemble the chart overlay for one refresh.

use crate::services::signals::{all_indicators, MarkerBook};
use crate::services::volume::volume_bars;
use crate::types::{
    Asset, Candle, ChartOverlay, FeedCandle, IndicatorSettings, MarkerSource, Timeframe,
};

/// What the overlay is computed for.
#[derive(Debug, Clone, Copy)]
pub struct OverlayRequest {
    pub asset: Asset,
    pub period: Timeframe,
    pub count: u32,
    /// Wall clock (milliseconds) for the latest-candle volume jitter.
    pub now_ms: i64,
}

fn shows_markers(settings: &IndicatorSettings, source: MarkerSource) -> bool {
    match source {
        MarkerSource::BinaryOptions => settings.binary_options.settings.show_signals,
        MarkerSource::By2Bars => settings.by2bars.settings.show_signals,
    }
}

/// Recompute volume, markers and the two-bar series from scratch.
///
/// Marker sets go through `book` so that each indicator replaces only its own
/// markers; a disabled indicator (or one with signals hidden) clears its set.
pub fn build_overlay(
    request: OverlayRequest,
    feed: &[FeedCandle],
    settings: &IndicatorSettings,
    book: &mut MarkerBook,
) -> ChartOverlay {
    let candles: Vec<Candle> = feed.iter().map(FeedCandle::candle).collect();
    let volume = volume_bars(feed, request.now_ms);

    let mut performance = Vec::new();
    let mut revenue = Vec::new();

    for indicator in all_indicators(settings) {
        let source = indicator.source();
        if !settings.is_enabled(source) || candles.is_empty() {
            book.clear(source);
            continue;
        }

        let output = indicator.evaluate(&candles);
        if shows_markers(settings, source) {
            book.replace(source, output.markers);
        } else {
            book.clear(source);
        }

        if source == MarkerSource::By2Bars {
            performance = output.performance;
            revenue = output.revenue;
        }
    }

    ChartOverlay {
        asset: request.asset,
        period: request.period,
        count: request.count,
        candles,
        volume,
        markers: book.markers(),
        performance,
        revenue,
        updated_at: request.now_ms,
    }
}
