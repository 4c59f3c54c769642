//! Two-bar direction detector with a running hit/miss score.

use crate::services::signals::Indicator;
use crate::types::{
    By2BarsSettings, Candle, IndicatorOutput, Marker, MarkerPosition, MarkerShape,
    MarkerSource, PerformanceSample, RevenueSample,
};

const BUY_COLOR: &str = "#32CD32";
const SELL_COLOR: &str = "#FF0000";

/// Evaluation of the two bars before `current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoBarRead {
    /// The two prior candles share polarity.
    pub same_direction: bool,
    /// `close[i-2] < close[i-1]`. The name is kept as-is even though the
    /// comparison reads as a rise; it selects the "Buy" arrow.
    pub predicted_down: bool,
    /// Current candle closed above its open.
    pub actual_bullish: bool,
}

impl TwoBarRead {
    pub fn new(two_back: &Candle, one_back: &Candle, current: &Candle) -> Self {
        Self {
            same_direction: two_back.is_bullish() == one_back.is_bullish(),
            predicted_down: two_back.close < one_back.close,
            actual_bullish: current.is_bullish(),
        }
    }

    /// Equality of the two flags, exactly as scored.
    pub fn correct(&self) -> bool {
        self.predicted_down == self.actual_bullish
    }
}

/// Success/failure counts of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub successes: u32,
    pub failures: u32,
}

impl Tally {
    pub fn revenue(&self) -> i64 {
        self.successes as i64 - self.failures as i64
    }
}

/// Two-bar direction detector.
///
/// Only candles whose two predecessors point the same way are evaluated.
/// Signals, performance and revenue come out of one loop; each output is
/// gated by its own flag while the counters always run.
pub struct By2Bars {
    settings: By2BarsSettings,
}

impl Default for By2Bars {
    fn default() -> Self {
        Self::new(By2BarsSettings::default())
    }
}

impl By2Bars {
    pub fn new(settings: By2BarsSettings) -> Self {
        Self { settings }
    }

    /// Final counts over the whole sequence, independent of display flags.
    pub fn tally(candles: &[Candle]) -> Tally {
        let mut tally = Tally::default();
        for window in candles.windows(3) {
            let read = TwoBarRead::new(&window[0], &window[1], &window[2]);
            if !read.same_direction {
                continue;
            }
            if read.correct() {
                tally.successes += 1;
            } else {
                tally.failures += 1;
            }
        }
        tally
    }
}

impl Indicator for By2Bars {
    fn source(&self) -> MarkerSource {
        MarkerSource::By2Bars
    }

    fn min_candles(&self) -> usize {
        3
    }

    fn evaluate(&self, candles: &[Candle]) -> IndicatorOutput {
        let mut output = IndicatorOutput::default();
        if candles.len() < self.min_candles() {
            return output;
        }

        let mut tally = Tally::default();

        for window in candles.windows(3) {
            let current = &window[2];
            let time = current.time;
            let read = TwoBarRead::new(&window[0], &window[1], current);

            if !read.same_direction {
                continue;
            }

            if self.settings.show_signals {
                let marker = if read.predicted_down {
                    Marker::new(
                        time,
                        MarkerPosition::AboveBar,
                        BUY_COLOR,
                        MarkerShape::ArrowUp,
                        "Buy",
                    )
                } else {
                    Marker::new(
                        time,
                        MarkerPosition::BelowBar,
                        SELL_COLOR,
                        MarkerShape::ArrowDown,
                        "Sell",
                    )
                };
                output.markers.push(marker);
            }

            let sample = if read.correct() {
                tally.successes += 1;
                PerformanceSample::success(time)
            } else {
                tally.failures += 1;
                PerformanceSample::failure(time)
            };

            if self.settings.show_performance {
                output.performance.push(sample);
            }

            if self.settings.show_revenue_line {
                output.revenue.push(RevenueSample {
                    time,
                    value: tally.revenue(),
                });
            }
        }

        output
    }
}
