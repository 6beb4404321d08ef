//! Configuration validation (Immutable functional pattern)

use super::{defaults::DEFAULT_REFRESH_SECS, types::DashboardConfig};
use crate::{Error, Result};

const MAX_LIMIT: u32 = 2000;
const MAX_REFRESH_SECS: u64 = 86_400;

impl DashboardConfig {
    /// Replace sentinel values with their defaults.
    ///
    /// A refresh interval of zero means "use the default".
    pub fn normalized(mut self) -> Self {
        if self.refresh_interval_secs == 0 {
            self.refresh_interval_secs = DEFAULT_REFRESH_SECS;
        }
        self
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if any value is out of range.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_LIMIT).contains(&self.limit) {
            return Err(Error::invalid_config(format!(
                "limit must be 1-{MAX_LIMIT}, got {}",
                self.limit
            )));
        }

        if !(1..=MAX_REFRESH_SECS).contains(&self.refresh_interval_secs) {
            return Err(Error::invalid_config(format!(
                "refresh_interval_secs must be 1-{MAX_REFRESH_SECS}, got {}",
                self.refresh_interval_secs
            )));
        }

        check_url("api_url", &self.api_url)?;
        check_url("global_api_url", &self.global_api_url)
    }
}

fn check_url(name: &str, url: &str) -> Result<()> {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(())
    } else {
        Err(Error::invalid_config(format!(
            "{name} must start with http:// or https://, got '{url}'"
        )))
    }
}
