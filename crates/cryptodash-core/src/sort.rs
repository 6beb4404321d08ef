//! Sort engine
//!
//! Pure ordering of a [`RowSet`] by one [`SortKey`]. The sort is stable and
//! always breaks ties by rank ascending, so two coins with equal keys never
//! swap places between renders. `descending` reverses the key comparison
//! only; the rank tie-break keeps its direction.

use std::cmp::Ordering;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::row::{Row, RowSet};

/// Column a row set can be ordered by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Rank,
    Name,
    Symbol,
    Price,
    MarketCap,
    #[strum(to_string = "volume_24h")]
    #[serde(rename = "volume_24h")]
    Volume24h,
    #[strum(to_string = "change_1h")]
    #[serde(rename = "change_1h")]
    Change1h,
    #[strum(to_string = "change_24h")]
    #[serde(rename = "change_24h")]
    Change24h,
    #[strum(to_string = "change_7d")]
    #[serde(rename = "change_7d")]
    Change7d,
    TotalSupply,
    AvailableSupply,
    LastUpdated,
}

impl SortKey {
    /// Direction a key starts in when it is first selected.
    ///
    /// Identity columns read naturally ascending; market figures are most
    /// useful largest-first.
    pub const fn default_descending(self) -> bool {
        !matches!(self, Self::Rank | Self::Name | Self::Symbol)
    }

    /// Compare two rows on this key alone, ascending.
    pub fn compare(self, a: &Row, b: &Row) -> Ordering {
        match self {
            Self::Rank => a.rank.cmp(&b.rank),
            Self::Name => a.name.cmp(&b.name),
            Self::Symbol => a.symbol.cmp(&b.symbol),
            Self::Price => a.price.total_cmp(&b.price),
            Self::MarketCap => a.market_cap.total_cmp(&b.market_cap),
            Self::Volume24h => a.volume_24h.total_cmp(&b.volume_24h),
            Self::Change1h => a.change_1h.total_cmp(&b.change_1h),
            Self::Change24h => a.change_24h.total_cmp(&b.change_24h),
            Self::Change7d => a.change_7d.total_cmp(&b.change_7d),
            Self::TotalSupply => a.total_supply.total_cmp(&b.total_supply),
            Self::AvailableSupply => a.available_supply.total_cmp(&b.available_supply),
            Self::LastUpdated => a.last_updated.cmp(&b.last_updated),
        }
    }
}

/// The active sort key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::Rank,
            descending: false,
        }
    }
}

impl SortSpec {
    pub const fn new(key: SortKey, descending: bool) -> Self {
        Self { key, descending }
    }

    /// Next spec after the user picks `key`: the same key flips direction,
    /// a new key starts in its default direction.
    pub fn select(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                descending: !self.descending,
            }
        } else {
            Self {
                key,
                descending: key.default_descending(),
            }
        }
    }

    /// Full comparator: key (possibly reversed), then rank ascending.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let primary = self.key.compare(a, b);
        let primary = if self.descending {
            primary.reverse()
        } else {
            primary
        };
        primary.then_with(|| a.rank.cmp(&b.rank))
    }
}

/// Order `rows` by `spec`, returning a new row set of the same generation.
pub fn apply_sort(rows: &RowSet, spec: SortSpec) -> RowSet {
    let sorted = rows
        .iter()
        .cloned()
        .sorted_by(|a, b| spec.compare(a, b))
        .collect();
    rows.with_rows(sorted)
}
