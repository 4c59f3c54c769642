//! Composite reversal detector: engulfing candles, rejection wicks and a
//! 5-minute time anchor.

use crate::services::signals::Indicator;
use crate::types::{
    BinaryOptionsSettings, Candle, IndicatorOutput, Marker, MarkerPosition, MarkerShape,
    MarkerSource,
};

const ANCHOR_COLOR: &str = "#808080";
const CALL_COLOR: &str = "#26a69a";
const PUT_COLOR: &str = "#ef5350";
const LOWER_WICK_COLOR: &str = "#00ff80";
const UPPER_WICK_COLOR: &str = "#ff8c00";

/// Share of the candle range a wick must exceed to count as a rejection.
const WICK_RATIO: f64 = 0.6;

/// Composite engulfing / wick-rejection detector.
///
/// For every candle after the first, four independent rules may each add one
/// marker, so a single bar can carry several:
///
/// - anchor: minute-of-hour is a multiple of 5 (gray arrow above)
/// - bullish engulfing: "CALL" arrow below
/// - bearish engulfing: "PUT" arrow above
/// - rejection wicks: lime circle below / orange circle above
pub struct BinaryOptions {
    settings: BinaryOptionsSettings,
}

impl Default for BinaryOptions {
    fn default() -> Self {
        Self::new(BinaryOptionsSettings::default())
    }
}

impl BinaryOptions {
    pub fn new(settings: BinaryOptionsSettings) -> Self {
        Self { settings }
    }

    /// Candle opens on a 5-minute boundary.
    pub fn is_five_minute_anchor(time: i64) -> bool {
        time.div_euclid(60).rem_euclid(5) == 0
    }

    pub fn is_bullish_engulfing(current: &Candle, previous: &Candle) -> bool {
        current.is_bullish()
            && previous.is_bearish()
            && current.close > previous.open
            && current.open <= previous.close
    }

    pub fn is_bearish_engulfing(current: &Candle, previous: &Candle) -> bool {
        current.is_bearish()
            && previous.is_bullish()
            && current.close < previous.open
            && current.open >= previous.close
    }

    /// Lower wick longer than 60% of a non-zero range.
    pub fn has_lower_rejection(candle: &Candle) -> bool {
        let total = candle.range();
        total > 0.0 && candle.lower_wick() > total * WICK_RATIO
    }

    /// Upper wick longer than 60% of a non-zero range.
    pub fn has_upper_rejection(candle: &Candle) -> bool {
        let total = candle.range();
        total > 0.0 && candle.upper_wick() > total * WICK_RATIO
    }
}

impl Indicator for BinaryOptions {
    fn source(&self) -> MarkerSource {
        MarkerSource::BinaryOptions
    }

    fn min_candles(&self) -> usize {
        2
    }

    fn evaluate(&self, candles: &[Candle]) -> IndicatorOutput {
        let mut output = IndicatorOutput::default();
        if candles.len() < self.min_candles() || !self.settings.show_signals {
            return output;
        }

        for pair in candles.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            let time = current.time;

            if Self::is_five_minute_anchor(time) {
                output.markers.push(Marker::new(
                    time,
                    MarkerPosition::AboveBar,
                    ANCHOR_COLOR,
                    MarkerShape::ArrowDown,
                    "",
                ));
            }

            if Self::is_bullish_engulfing(current, previous) {
                output.markers.push(Marker::new(
                    time,
                    MarkerPosition::BelowBar,
                    CALL_COLOR,
                    MarkerShape::ArrowUp,
                    "CALL",
                ));
            }

            if Self::is_bearish_engulfing(current, previous) {
                output.markers.push(Marker::new(
                    time,
                    MarkerPosition::AboveBar,
                    PUT_COLOR,
                    MarkerShape::ArrowDown,
                    "PUT",
                ));
            }

            if Self::has_lower_rejection(current) {
                output.markers.push(Marker::new(
                    time,
                    MarkerPosition::BelowBar,
                    LOWER_WICK_COLOR,
                    MarkerShape::Circle,
                    "",
                ));
            }

            if Self::has_upper_rejection(current) {
                output.markers.push(Marker::new(
                    time,
                    MarkerPosition::AboveBar,
                    UPPER_WICK_COLOR,
                    MarkerShape::Circle,
                    "",
                ));
            }
        }

        output
    }
}
