//! Colour themes
//!
//! The configured colour name picks one primary [`Theme`]. The renderer maps
//! it onto its own colour type; the core only knows the names.

use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

/// Primary colour of the dashboard.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    #[default]
    Green,
    #[strum(to_string = "cyan", serialize = "blue")]
    Cyan,
    #[strum(to_string = "magenta", serialize = "pink", serialize = "purple")]
    Magenta,
    White,
    Red,
    #[strum(to_string = "yellow", serialize = "orange")]
    Yellow,
}

impl Theme {
    /// Resolve a colour name; unknown names fall back to white.
    pub fn from_name(name: &str) -> Self {
        name.trim().parse().unwrap_or(Self::White)
    }
}
