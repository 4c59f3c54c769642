//! Synthetic volume for feeds that carry no trade volume.
//!
//! Every value is a pure function of the candle content, so a candle keeps its
//! bar height across refreshes. Only the newest candle gets a small
//! time-driven wobble derived from the wall clock on each call.

use crate::types::{Candle, FeedCandle, VolumeBar, VolumeTone};

/// Smallest range used as a divisor.
const MIN_RANGE: f64 = 1e-6;
/// Median range assumed for an empty window.
const EMPTY_MEDIAN_RANGE: f64 = 1e-3;
/// Synthesized volume never drops below this.
pub const MIN_VOLUME: u64 = 50;
/// Amplitude of the latest-candle jitter.
const JITTER_AMPLITUDE: f64 = 20.0;
/// Phase window of the latest-candle jitter, in seconds.
const JITTER_CYCLE_SECS: f64 = 8.0;

/// Int32 bit pattern of a truncated float, as a u32.
fn int32_bits(value: f64) -> u32 {
    (value as i64) as u32
}

/// Derive a 32-bit seed from candle time and prices scaled by 1e5.
pub fn candle_seed(candle: &Candle) -> u32 {
    let t = candle.time as u32;
    let o = int32_bits((candle.open * 1e5).floor());
    let h = int32_bits((candle.high * 1e5).floor());
    let l = int32_bits((candle.low * 1e5).floor());
    let c = int32_bits((candle.close * 1e5).floor());

    let mut x = (t ^ o.wrapping_shl(7)) ^ h.wrapping_shl(13) ^ l.wrapping_shl(17) ^ c.wrapping_shl(23);
    x ^= x >> 15;
    x = x.wrapping_mul(0x85eb_ca6b);
    x ^= x >> 13;
    x = x.wrapping_mul(0xc2b2_ae35);
    x ^= x >> 16;
    x
}

/// mulberry32 generator with uniform `[0, 1)` output.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        (t ^ (t >> 14)) as f64 / 4_294_967_296.0
    }
}

/// Additive jitter for the newest candle at `now_ms`.
///
/// Note the sine argument is `phase * 2π` with `phase = (now_ms / 1000) mod 8`,
/// which repeats every second inside the 8 second phase window.
pub fn latest_jitter(now_ms: i64) -> f64 {
    let phase = (now_ms as f64 / 1000.0) % JITTER_CYCLE_SECS;
    (phase * std::f64::consts::PI * 2.0).sin() * JITTER_AMPLITUDE
}

/// Deterministic volume for a candle without upstream volume.
///
/// `median_range` is the median `high - low` of the visible window. The jitter
/// applies only when `is_latest` is set and `now_ms` is non-zero.
pub fn synthetic_volume(candle: &Candle, median_range: f64, is_latest: bool, now_ms: i64) -> u64 {
    let mut rng = Mulberry32::new(candle_seed(candle));
    let range = candle.range().max(MIN_RANGE);
    let median = median_range.max(MIN_RANGE);
    let rel_range = (range / median).min(3.0);
    let rel_body = (candle.body() / median).min(3.0);

    let base = 600.0 + (rng.next_f64() * 800.0).floor();
    let multiplier = 0.9 + 0.3 * rel_range + 0.2 * rel_body + rng.next_f64() * 0.2;
    let mut volume = (base * multiplier).floor().max(MIN_VOLUME as f64);

    if is_latest && now_ms != 0 {
        volume = (volume + latest_jitter(now_ms)).floor().max(MIN_VOLUME as f64);
    }

    volume as u64
}

/// Median of `max(1e-6, high - low)` over the window (upper median for even sizes).
pub fn median_range(candles: &[FeedCandle]) -> f64 {
    if candles.is_empty() {
        return EMPTY_MEDIAN_RANGE;
    }
    let mut ranges: Vec<f64> = candles
        .iter()
        .map(|c| (c.high - c.low).max(MIN_RANGE))
        .collect();
    ranges.sort_by(|a, b| a.total_cmp(b));
    ranges[ranges.len() / 2]
}

/// Build the volume pane: real upstream volume where present, synthesized otherwise.
pub fn volume_bars(candles: &[FeedCandle], now_ms: i64) -> Vec<VolumeBar> {
    let median = median_range(candles);
    let latest_time = candles.iter().map(|c| c.time).max().unwrap_or(0);

    candles
        .iter()
        .map(|raw| {
            let candle = raw.candle();
            let value = match raw.real_volume() {
                Some(volume) => volume.floor() as u64,
                None => synthetic_volume(&candle, median, raw.time == latest_time, now_ms),
            };
            let tone = VolumeTone::for_candle(&candle);
            VolumeBar {
                time: raw.time,
                value,
                tone,
                color: tone.color().to_string(),
                label: format_volume(value as f64),
            }
        })
        .collect()
}

/// Compact volume label: `1.5k`, `2M`, `3.2B`, or the integer itself.
pub fn format_volume(value: f64) -> String {
    let scaled = |divisor: f64, suffix: &str| {
        let text = format!("{:.1}", value / divisor);
        let text = text.strip_suffix(".0").unwrap_or(&text).to_string();
        format!("{}{}", text, suffix)
    };

    if value >= 1e9 {
        scaled(1e9, "B")
    } else if value >= 1e6 {
        scaled(1e6, "M")
    } else if value >= 1e3 {
        scaled(1e3, "k")
    } else {
        format!("{}", value.floor() as i64)
    }
}
