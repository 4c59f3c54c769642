use serde::{Deserialize, Serialize};
use std::fmt;

/// Vertical placement of a marker relative to its bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerPosition {
    AboveBar,
    BelowBar,
}

/// Glyph drawn for a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerShape {
    ArrowUp,
    ArrowDown,
    Circle,
}

/// A timestamped annotation on the candlestick series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub time: i64,
    pub position: MarkerPosition,
    pub color: String,
    pub shape: MarkerShape,
    pub text: String,
}

impl Marker {
    pub fn new(
        time: i64,
        position: MarkerPosition,
        color: &str,
        shape: MarkerShape,
        text: &str,
    ) -> Self {
        Self {
            time,
            position,
            color: color.to_string(),
            shape,
            text: text.to_string(),
        }
    }
}

/// Detector that produced a set of markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarkerSource {
    #[serde(rename = "binaryOptions")]
    BinaryOptions,
    #[serde(rename = "by2bars")]
    By2Bars,
}

impl MarkerSource {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "binaryoptions" | "binary_options" | "binary-options" => Some(Self::BinaryOptions),
            "by2bars" | "by_2_bars" => Some(Self::By2Bars),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::BinaryOptions => "binaryOptions",
            Self::By2Bars => "by2bars",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::BinaryOptions => "Binary Options",
            Self::By2Bars => "By2Bars",
        }
    }
}

impl fmt::Display for MarkerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One evaluated two-bar occurrence: +1 correct, -1 incorrect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub time: i64,
    pub value: i8,
    /// Histogram color, green for a hit and red for a miss.
    pub color: String,
}

impl PerformanceSample {
    const SUCCESS_COLOR: &'static str = "#32CD32";
    const FAILURE_COLOR: &'static str = "#FF0000";

    pub fn success(time: i64) -> Self {
        Self {
            time,
            value: 1,
            color: Self::SUCCESS_COLOR.to_string(),
        }
    }

    pub fn failure(time: i64) -> Self {
        Self {
            time,
            value: -1,
            color: Self::FAILURE_COLOR.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.value > 0
    }
}

/// Running successes minus failures at an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueSample {
    pub time: i64,
    pub value: i64,
}

/// Result of one full detector pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorOutput {
    pub markers: Vec<Marker>,
    pub performance: Vec<PerformanceSample>,
    pub revenue: Vec<RevenueSample>,
}


/// Sub-options of the composite engulfing/wick detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryOptionsSettings {
    pub show_signals: bool,
}

impl Default for BinaryOptionsSettings {
    fn default() -> Self {
        Self { show_signals: true }
    }
}

/// Sub-options of the two-bar detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct By2BarsSettings {
    pub show_signals: bool,
    pub show_performance: bool,
    pub show_revenue_line: bool,
}

impl Default for By2BarsSettings {
    fn default() -> Self {
        Self {
            show_signals: true,
            show_performance: true,
            show_revenue_line: true,
        }
    }
}

/// An indicator's enabled flag plus its sub-options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorToggle<S> {
    pub enabled: bool,
    pub settings: S,
}

/// Indicator configuration of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSettings {
    pub binary_options: IndicatorToggle<BinaryOptionsSettings>,
    pub by2bars: IndicatorToggle<By2BarsSettings>,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            binary_options: IndicatorToggle {
                enabled: true,
                settings: BinaryOptionsSettings::default(),
            },
            by2bars: IndicatorToggle {
                enabled: false,
                settings: By2BarsSettings::default(),
            },
        }
    }
}

impl IndicatorSettings {
    pub fn is_enabled(&self, source: MarkerSource) -> bool {
        match source {
            MarkerSource::BinaryOptions => self.binary_options.enabled,
            MarkerSource::By2Bars => self.by2bars.enabled,
        }
    }

    /// Flip an indicator's enabled flag, returning the new value.
    pub fn toggle(&mut self, source: MarkerSource) -> bool {
        let enabled = match source {
            MarkerSource::BinaryOptions => &mut self.binary_options.enabled,
            MarkerSource::By2Bars => &mut self.by2bars.enabled,
        };
        *enabled = !*enabled;
        *enabled
    }

    /// Merge a partial sub-settings update into one indicator.
    pub fn apply_patch(&mut self, source: MarkerSource, patch: &SettingsPatch) {
        match source {
            MarkerSource::BinaryOptions => {
                let s = &mut self.binary_options.settings;
                if let Some(v) = patch.show_signals {
                    s.show_signals = v;
                }
            }
            MarkerSource::By2Bars => {
                let s = &mut self.by2bars.settings;
                if let Some(v) = patch.show_signals {
                    s.show_signals = v;
                }
                if let Some(v) = patch.show_performance {
                    s.show_performance = v;
                }
                if let Some(v) = patch.show_revenue_line {
                    s.show_revenue_line = v;
                }
            }
        }
    }
}

/// Partial sub-settings update. Fields an indicator doesn't have are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default)]
    pub show_signals: Option<bool>,
    #[serde(default)]
    pub show_performance: Option<bool>,
    #[serde(default)]
    pub show_revenue_line: Option<bool>,
}
