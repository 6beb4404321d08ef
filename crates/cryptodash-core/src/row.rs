//! Row model
//!
//! A [`Row`] is an immutable snapshot of one ranked coin at fetch time. A
//! [`RowSet`] is everything one fetch produced. Neither is ever edited in
//! place: a refresh builds a new `RowSet` and the engine swaps it in whole.

use chrono::{DateTime, Utc};
use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// One loosely typed record as delivered by a data source.
///
/// Field names follow the CoinMarketCap ticker payload; every value arrives
/// as an optional string and is only trusted after [`Row::try_from_raw`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub rank: Option<String>,
    pub price_usd: Option<String>,
    pub market_cap_usd: Option<String>,
    #[serde(rename = "24h_volume_usd")]
    pub volume_24h_usd: Option<String>,
    pub percent_change_1h: Option<String>,
    pub percent_change_24h: Option<String>,
    pub percent_change_7d: Option<String>,
    pub available_supply: Option<String>,
    pub total_supply: Option<String>,
    pub last_updated: Option<String>,
}

/// Validated market snapshot of a single coin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Stable identity across fetches and resorts.
    pub id: String,
    pub rank: u32,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub change_1h: f64,
    pub change_24h: f64,
    pub change_7d: f64,
    pub total_supply: f64,
    pub available_supply: f64,
    /// Unix epoch seconds.
    pub last_updated: i64,
}

impl Row {
    /// Validate a raw record.
    ///
    /// `rank`, `price_usd` and `last_updated` are required; any other numeric
    /// field that is missing or unparseable reads as `0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first required field that is
    /// absent or malformed.
    pub fn try_from_raw(raw: &RawRecord) -> Result<Self> {
        let rank = required(raw.rank.as_deref(), "rank")?
            .parse::<u32>()
            .ok()
            .filter(|rank| *rank > 0)
            .ok_or_else(|| Error::validation("rank", "must be a positive integer"))?;

        let price = required(raw.price_usd.as_deref(), "price_usd")?
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite())
            .ok_or_else(|| Error::validation("price_usd", "must be a finite number"))?;

        let last_updated = required(raw.last_updated.as_deref(), "last_updated")?
            .parse::<i64>()
            .map_err(|e| Error::validation("last_updated", e.to_string()))?;

        let name = raw.name.clone().unwrap_or_default();
        let id = raw
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| slug(&name));

        Ok(Self {
            id,
            rank,
            symbol: raw.symbol.clone().unwrap_or_default(),
            price,
            market_cap: loose(raw.market_cap_usd.as_deref()),
            volume_24h: loose(raw.volume_24h_usd.as_deref()),
            change_1h: loose(raw.percent_change_1h.as_deref()),
            change_24h: loose(raw.percent_change_24h.as_deref()),
            change_7d: loose(raw.percent_change_7d.as_deref()),
            total_supply: loose(raw.total_supply.as_deref()),
            available_supply: loose(raw.available_supply.as_deref()),
            last_updated,
            name,
        })
    }

    /// Canonical web slug: lower-cased name with spaces replaced by hyphens.
    pub fn slug(&self) -> String {
        slug(&self.name)
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::validation(field, "missing"))
}

fn loose(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// All rows produced by one fetch cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    rows: Vector<Row>,
    generation: u64,
    fetched_at: Option<DateTime<Utc>>,
}

impl RowSet {
    /// Build a row set directly from validated rows.
    pub fn new(
        rows: impl IntoIterator<Item = Row>,
        generation: u64,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            generation,
            fetched_at: Some(fetched_at),
        }
    }

    /// Validate a batch of raw records, dropping the ones that fail.
    ///
    /// Returns the row set and the number of dropped records.
    pub fn from_raw(
        records: &[RawRecord],
        generation: u64,
        fetched_at: DateTime<Utc>,
    ) -> (Self, usize) {
        let mut dropped = 0;
        let rows = records
            .iter()
            .filter_map(|raw| match Row::try_from_raw(raw) {
                Ok(row) => Some(row),
                Err(e) => {
                    debug!(record = ?raw.id, error = %e, "Dropping malformed record");
                    dropped += 1;
                    None
                }
            })
            .collect::<Vector<_>>();

        (
            Self {
                rows,
                generation,
                fetched_at: Some(fetched_at),
            },
            dropped,
        )
    }

    /// Same generation and timestamp, different order.
    pub(crate) fn with_rows(&self, rows: Vector<Row>) -> Self {
        Self {
            rows,
            generation: self.generation,
            fetched_at: self.fetched_at,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub const fn rows(&self) -> &Vector<Row> {
        &self.rows
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub const fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Index of the row with the given id, if present.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }
}
