//! Configuration type definitions
//!
//! Pure data holders; behaviour lives in the sibling modules.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings threaded into the dashboard at construction time.
///
/// Loaded from defaults → config file → env vars → CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Primary colour name.
    pub color: String,
    /// Maximum number of coins fetched.
    pub limit: u32,
    /// Background fetch period in seconds.
    pub refresh_interval_secs: u64,
    /// Ticker endpoint.
    pub api_url: String,
    /// Show the global market summary from startup.
    pub global: bool,
    /// Global totals endpoint.
    pub global_api_url: String,
    /// Where tracing output goes; discarded when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

/// One configuration layer. Unset fields leave the layer below untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub color: Option<String>,
    pub limit: Option<u32>,
    pub refresh_interval_secs: Option<u64>,
    pub api_url: Option<String>,
    pub global: Option<bool>,
    pub global_api_url: Option<String>,
    pub log_file: Option<PathBuf>,
}
