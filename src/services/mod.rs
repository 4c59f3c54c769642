pub mod chart_feed;
pub mod feed_registry;
pub mod market_data;
pub mod overlay;
pub mod signals;
pub mod volume;

pub use chart_feed::ChartFeed;
pub use feed_registry::{FeedRegistry, RefreshTask};
pub use market_data::{CandleResponse, MarketDataClient};
pub use overlay::{build_overlay, OverlayRequest};
pub use signals::{all_indicators, BinaryOptions, By2Bars, Indicator, MarkerBook};
pub use volume::{format_volume, median_range, synthetic_volume, volume_bars};
