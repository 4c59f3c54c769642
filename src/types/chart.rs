use serde::{Deserialize, Serialize};

use super::{Asset, Marker, PerformanceSample, RevenueSample};

/// OHLC candle as consumed by the detectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Unix timestamp (seconds) of the candle open.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }

    /// Close strictly above open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Close strictly below open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }
}

/// Candle as delivered by the market-data API, volume optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedCandle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl FeedCandle {
    pub fn candle(&self) -> Candle {
        Candle::new(self.time, self.open, self.high, self.low, self.close)
    }

    /// Upstream volume when it is a real, positive figure.
    pub fn real_volume(&self) -> Option<f64> {
        self.volume.filter(|v| v.is_finite() && *v > 0.0)
    }
}

/// Up/down coloring of a volume bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeTone {
    Up,
    Down,
}

impl VolumeTone {
    pub fn for_candle(candle: &Candle) -> Self {
        if candle.close >= candle.open {
            VolumeTone::Up
        } else {
            VolumeTone::Down
        }
    }

    /// Translucent histogram color.
    pub fn color(&self) -> &'static str {
        match self {
            VolumeTone::Up => "#26a69a33",
            VolumeTone::Down => "#ef535033",
        }
    }
}

/// One histogram bar of the volume pane, ready to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeBar {
    pub time: i64,
    pub value: u64,
    pub tone: VolumeTone,
    /// Fill color matching `tone`.
    pub color: String,
    /// Compact axis label of `value`.
    pub label: String,
}

/// Candle period in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeframe(pub u32);

impl Timeframe {
    /// Periods offered by the chart timeframe selector.
    pub const SUPPORTED: [Timeframe; 3] = [Timeframe(60), Timeframe(120), Timeframe(240)];

    /// Accept only the selector's periods.
    pub fn from_seconds(seconds: u32) -> Option<Self> {
        Self::SUPPORTED.iter().copied().find(|t| t.0 == seconds)
    }

    pub fn seconds(&self) -> u32 {
        self.0
    }

    /// Short label, e.g. "30s" or "2m".
    pub fn label(&self) -> String {
        if self.0 < 60 {
            format!("{}s", self.0)
        } else if self.0 % 60 == 0 {
            format!("{}m", self.0 / 60)
        } else {
            format!("{}m", self.0 as f64 / 60.0)
        }
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe(60)
    }
}

/// Everything the chart surface draws for one refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOverlay {
    pub asset: Asset,
    pub period: Timeframe,
    pub count: u32,
    pub candles: Vec<Candle>,
    pub volume: Vec<VolumeBar>,
    pub markers: Vec<Marker>,
    pub performance: Vec<PerformanceSample>,
    pub revenue: Vec<RevenueSample>,
    /// Unix timestamp (milliseconds) of the refresh that produced this overlay.
    pub updated_at: i64,
}

/// Load state of a chart feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeedStatus {
    Loading,
    Ready,
    Error { message: String, retryable: bool },
}
