//! wickwatch - OTC candle charts with synthetic volume and pattern signals

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;

use config::Config;
use services::FeedRegistry;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<FeedRegistry>,
}

// Re-export commonly used types
pub use types::*;
