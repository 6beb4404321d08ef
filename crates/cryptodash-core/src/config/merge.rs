//! Configuration merging logic (Immutable functional pattern)
//!
//! Later layers override earlier ones (defaults → file → env → CLI). Every
//! merge returns a new value.

use super::types::{ConfigOverrides, DashboardConfig};

impl DashboardConfig {
    /// Apply one override layer on top of this config.
    pub fn merge(self, layer: ConfigOverrides) -> Self {
        Self {
            color: layer.color.unwrap_or(self.color),
            limit: layer.limit.unwrap_or(self.limit),
            refresh_interval_secs: layer
                .refresh_interval_secs
                .unwrap_or(self.refresh_interval_secs),
            api_url: layer.api_url.unwrap_or(self.api_url),
            global: layer.global.unwrap_or(self.global),
            global_api_url: layer.global_api_url.unwrap_or(self.global_api_url),
            log_file: layer.log_file.or(self.log_file),
        }
    }
}
