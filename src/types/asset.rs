use serde::{Deserialize, Serialize};
use std::fmt;

/// OTC instruments served by the market-data API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Asset {
    #[serde(rename = "EURUSD_otc")]
    EurUsd,
    #[serde(rename = "USDCAD_otc")]
    UsdCad,
    #[serde(rename = "USDINR_otc")]
    UsdInr,
    #[serde(rename = "EURCAD_otc")]
    EurCad,
    #[serde(rename = "ETCUSD_otc")]
    EtcUsd,
    #[serde(rename = "BCHUSD_otc")]
    BchUsd,
}

impl Asset {
    pub const ALL: [Asset; 6] = [
        Asset::EurUsd,
        Asset::UsdCad,
        Asset::UsdInr,
        Asset::EurCad,
        Asset::EtcUsd,
        Asset::BchUsd,
    ];

    /// Parse an asset id. Case-insensitive, the `_otc` suffix is optional.
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        let base = lower.strip_suffix("_otc").unwrap_or(&lower);
        match base {
            "eurusd" | "eur/usd" => Some(Asset::EurUsd),
            "usdcad" | "usd/cad" => Some(Asset::UsdCad),
            "usdinr" | "usd/inr" => Some(Asset::UsdInr),
            "eurcad" | "eur/cad" => Some(Asset::EurCad),
            "etcusd" | "etc/usd" => Some(Asset::EtcUsd),
            "bchusd" | "bch/usd" => Some(Asset::BchUsd),
            _ => None,
        }
    }

    /// Feed identifier, e.g. `EURUSD_otc`.
    pub fn id(&self) -> &'static str {
        match self {
            Asset::EurUsd => "EURUSD_otc",
            Asset::UsdCad => "USDCAD_otc",
            Asset::UsdInr => "USDINR_otc",
            Asset::EurCad => "EURCAD_otc",
            Asset::EtcUsd => "ETCUSD_otc",
            Asset::BchUsd => "BCHUSD_otc",
        }
    }

    /// Pair name shown in the chart header.
    pub fn display_name(&self) -> &'static str {
        match self {
            Asset::EurUsd => "EUR/USD",
            Asset::UsdCad => "USD/CAD",
            Asset::UsdInr => "USD/INR",
            Asset::EurCad => "EUR/CAD",
            Asset::EtcUsd => "ETC/USD",
            Asset::BchUsd => "BCH/USD",
        }
    }

    /// Candle endpoint path relative to the market-data base URL.
    pub fn candles_path(&self) -> &'static str {
        match self {
            Asset::EurUsd => "/eurusd/candles",
            Asset::UsdCad => "/usdcad/candles",
            Asset::UsdInr => "/usdinr/candles",
            Asset::EurCad => "/eurcad/candles",
            Asset::EtcUsd => "/etcusd/candles",
            Asset::BchUsd => "/bchusd/candles",
        }
    }
}

impl Default for Asset {
    fn default() -> Self {
        Asset::EurUsd
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Asset entry for the asset listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    pub id: Asset,
    pub name: String,
    pub watched: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_from_str_variants() {
        assert_eq!(Asset::from_str("EURUSD_otc"), Some(Asset::EurUsd));
        assert_eq!(Asset::from_str("eurusd_otc"), Some(Asset::EurUsd));
        assert_eq!(Asset::from_str("usdinr"), Some(Asset::UsdInr));
        assert_eq!(Asset::from_str("BCH/USD"), Some(Asset::BchUsd));
        assert_eq!(Asset::from_str("btcusd"), None);
    }

    #[test]
    fn test_asset_paths_and_names() {
        assert_eq!(Asset::EurCad.candles_path(), "/eurcad/candles");
        assert_eq!(Asset::EtcUsd.display_name(), "ETC/USD");
        assert_eq!(Asset::UsdCad.to_string(), "USDCAD_otc");
    }

    #[test]
    fn test_asset_serde_uses_feed_id() {
        let json = serde_json::to_string(&Asset::EurUsd).unwrap();
        assert_eq!(json, "\"EURUSD_otc\"");
        let parsed: Asset = serde_json::from_str("\"USDCAD_otc\"").unwrap();
        assert_eq!(parsed, Asset::UsdCad);
    }

    #[test]
    fn test_every_asset_round_trips_through_id() {
        for asset in Asset::ALL {
            assert_eq!(Asset::from_str(asset.id()), Some(asset));
        }
    }
}
