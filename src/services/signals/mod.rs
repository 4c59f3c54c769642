//! Candlestick pattern signals.
//!
//! Each indicator re-scans the whole candle sequence on every call and
//! returns its markers plus any auxiliary series. Nothing is carried between
//! calls.

pub mod binary_options;
pub mod by2bars;
pub mod markers;

pub use binary_options::BinaryOptions;
pub use by2bars::By2Bars;
pub use markers::MarkerBook;

use crate::types::{Candle, IndicatorOutput, IndicatorSettings, MarkerSource};

/// Trait for implementing pattern indicators.
pub trait Indicator: Send + Sync {
    /// Source tag for the markers this indicator emits.
    fn source(&self) -> MarkerSource;

    /// Human-readable name.
    fn name(&self) -> &str {
        self.source().name()
    }

    /// Minimum number of candles before anything can be emitted.
    fn min_candles(&self) -> usize;

    /// Evaluate over the full candle sequence.
    /// Shorter input than `min_candles` yields an empty output.
    fn evaluate(&self, candles: &[Candle]) -> IndicatorOutput;
}

/// Build every indicator, configured from the chart settings.
pub fn all_indicators(settings: &IndicatorSettings) -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(BinaryOptions::new(settings.binary_options.settings)),
        Box::new(By2Bars::new(settings.by2bars.settings)),
    ]
}
