//! Global market summary
//!
//! Market-wide totals shown in the summary panel above the table: total
//! capitalisation, 24h volume, bitcoin dominance and the number of active
//! currencies, assets and markets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Global totals as delivered by a data source.
///
/// Field names follow the CoinMarketCap `global` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGlobal {
    pub total_market_cap_usd: Option<f64>,
    pub total_24h_volume_usd: Option<f64>,
    pub bitcoin_percentage_of_market_cap: Option<f64>,
    pub active_currencies: Option<u64>,
    pub active_assets: Option<u64>,
    pub active_markets: Option<u64>,
}

/// Validated market-wide snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub total_market_cap: f64,
    pub total_volume_24h: f64,
    /// Bitcoin's share of total market cap, in percent.
    pub bitcoin_dominance: f64,
    pub active_currencies: u64,
    pub active_assets: u64,
    pub active_markets: u64,
    pub fetched_at: DateTime<Utc>,
}

impl MarketSummary {
    /// Validate a raw payload. Total market cap is required; missing or
    /// non-finite figures elsewhere read as zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when total market cap is absent or not
    /// finite.
    pub fn try_from_raw(raw: &RawGlobal, fetched_at: DateTime<Utc>) -> Result<Self> {
        let total_market_cap = raw
            .total_market_cap_usd
            .filter(|v| v.is_finite())
            .ok_or_else(|| Error::validation("total_market_cap_usd", "missing or not finite"))?;

        let finite = |value: Option<f64>| value.filter(|v| v.is_finite()).unwrap_or(0.0);

        Ok(Self {
            total_market_cap,
            total_volume_24h: finite(raw.total_24h_volume_usd),
            bitcoin_dominance: finite(raw.bitcoin_percentage_of_market_cap),
            active_currencies: raw.active_currencies.unwrap_or(0),
            active_assets: raw.active_assets.unwrap_or(0),
            active_markets: raw.active_markets.unwrap_or(0),
            fetched_at,
        })
    }
}
