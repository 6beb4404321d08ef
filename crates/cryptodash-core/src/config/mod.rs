//! Configuration loading and management
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config: ~/.config/cryptodash/config.toml, or the file named by
//!    `--config`
//! 3. Environment variables: `CRYPTODASH_*`
//! 4. CLI flags
//!
//! # Example Config
//!
//! ```toml
//! color = "cyan"
//! limit = 50
//! refresh_interval_secs = 30
//! global = true
//! log_file = "/tmp/cryptodash.log"
//! ```
//!
//! # Module Structure
//!
//! - `types`: Configuration structure definitions
//! - `defaults`: Default values
//! - `load`: Loading from files and environment
//! - `merge`: Layering overrides onto a base config
//! - `validate`: Range checks and normalisation

mod defaults;
mod load;
mod merge;
mod types;
mod validate;

#[cfg(test)]
mod tests_loading;

pub use defaults::{
    DEFAULT_API_URL, DEFAULT_COLOR, DEFAULT_GLOBAL_API_URL, DEFAULT_LIMIT, DEFAULT_REFRESH_SECS,
};
pub use load::{global_config_path, load_config, load_toml_file};
pub use types::{ConfigOverrides, DashboardConfig};
