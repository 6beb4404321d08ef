//! Default configuration values

use super::types::DashboardConfig;

pub const DEFAULT_COLOR: &str = "green";
pub const DEFAULT_LIMIT: u32 = 100;
pub const DEFAULT_REFRESH_SECS: u64 = 60;
pub const DEFAULT_API_URL: &str = "https://api.coinmarketcap.com/v1/ticker/";
pub const DEFAULT_GLOBAL_API_URL: &str = "https://api.coinmarketcap.com/v1/global/";

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            limit: DEFAULT_LIMIT,
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            api_url: DEFAULT_API_URL.to_string(),
            global: false,
            global_api_url: DEFAULT_GLOBAL_API_URL.to_string(),
            log_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.color, "green");
        assert_eq!(config.limit, 100);
        assert_eq!(config.refresh_interval_secs, 60);
        assert!(config.api_url.starts_with("https://"));
        assert!(!config.global);
        assert!(config.global_api_url.ends_with("/global/"));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(DashboardConfig::default().validate().is_ok());
    }
}
