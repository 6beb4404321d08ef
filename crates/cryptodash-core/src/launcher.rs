//! Open-URL seam used by row activation.

use crate::{row::Row, Result};

const COIN_PAGE_BASE: &str = "https://coinmarketcap.com/currencies/";

/// Opens a resource in the user's default handler.
///
/// Fire-and-forget: an implementation starts the handler and returns without
/// waiting on it.
pub trait Launcher: Send {
    /// # Errors
    ///
    /// Returns [`crate::Error::Launch`] if the handler could not be started.
    fn open(&mut self, target: &str) -> Result<()>;
}

/// Web page for a coin, keyed by its slug.
pub fn coin_url(row: &Row) -> String {
    format!("{COIN_PAGE_BASE}{}", row.slug())
}
