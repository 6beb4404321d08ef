//! Configuration loading from files and environment (Immutable functional pattern)
//!
//! This module handles loading configuration from:
//! 1. Built-in defaults
//! 2. Global config: ~/.config/cryptodash/config.toml (or an explicit path)
//! 3. Environment variables: `CRYPTODASH_*`
//! 4. CLI flags, passed in by the caller
//!
//! All operations return new instances rather than mutating in place.

use std::path::{Path, PathBuf};

use super::types::{ConfigOverrides, DashboardConfig};
use crate::{Error, Result};

const ENV_COLOR: &str = "CRYPTODASH_COLOR";
const ENV_LIMIT: &str = "CRYPTODASH_LIMIT";
const ENV_REFRESH: &str = "CRYPTODASH_REFRESH";
const ENV_API_URL: &str = "CRYPTODASH_API_URL";
const ENV_GLOBAL: &str = "CRYPTODASH_GLOBAL";
const ENV_GLOBAL_API_URL: &str = "CRYPTODASH_GLOBAL_API_URL";
const ENV_LOG_FILE: &str = "CRYPTODASH_LOG_FILE";

// ═══════════════════════════════════════════════════════════════════════════
// PUBLIC API
// ═══════════════════════════════════════════════════════════════════════════

/// Load configuration from all sources with hierarchy
///
/// `explicit` replaces the global config file and must exist. `cli` is the
/// topmost layer.
///
/// # Errors
///
/// Returns error if:
/// - An explicit config file is missing
/// - A config file is malformed TOML
/// - An environment variable holds an unparseable number
/// - The merged values fail validation
pub fn load_config(explicit: Option<&Path>, cli: ConfigOverrides) -> Result<DashboardConfig> {
    // 1. Start with built-in defaults
    let config = DashboardConfig::default();

    // 2. Config file
    let file = match explicit {
        Some(path) => load_toml_file(path)?,
        None => match global_config_path() {
            Some(path) if path.exists() => load_toml_file(&path)?,
            _ => ConfigOverrides::default(),
        },
    };

    // 3. Environment, 4. CLI
    let env = env_overrides(|key| std::env::var(key).ok())?;

    let config = config.merge(file).merge(env).merge(cli).normalized();
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
}

// ═══════════════════════════════════════════════════════════════════════════
// PATH HELPERS
// ═══════════════════════════════════════════════════════════════════════════

/// Get path to global config file
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "cryptodash")
        .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
}

/// Load a TOML file into an override layer
///
/// # Errors
///
/// Returns error if:
/// - File cannot be read
/// - Path is a directory instead of a file
/// - TOML is malformed or names an unknown key
pub fn load_toml_file(path: &Path) -> Result<ConfigOverrides> {
    if path.is_dir() {
        return Err(Error::io_error(format!(
            "Config path is a directory, not a file: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::io_error(format!(
            "Failed to read config file {}: {e}",
            path.display()
        ))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::parse_error(format!(
            "Failed to parse config file {}: {e}",
            path.display()
        ))
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// ENVIRONMENT VARIABLE OVERRIDES
// ═══════════════════════════════════════════════════════════════════════════

/// Read the `CRYPTODASH_*` layer through `lookup`. Empty values count as unset.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] if a numeric or boolean variable does not
/// parse.
pub(super) fn env_overrides(lookup: impl Fn(&str) -> Option<String>) -> Result<ConfigOverrides> {
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let limit = get(ENV_LIMIT)
        .map(|value| {
            value
                .trim()
                .parse::<u32>()
                .map_err(|e| Error::invalid_config(format!("Invalid {ENV_LIMIT} value: {e}")))
        })
        .transpose()?;

    let refresh_interval_secs = get(ENV_REFRESH)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|e| Error::invalid_config(format!("Invalid {ENV_REFRESH} value: {e}")))
        })
        .transpose()?;

    let global = get(ENV_GLOBAL)
        .map(|value| match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(Error::invalid_config(format!(
                "Invalid {ENV_GLOBAL} value: '{other}'"
            ))),
        })
        .transpose()?;

    Ok(ConfigOverrides {
        color: get(ENV_COLOR),
        limit,
        refresh_interval_secs,
        api_url: get(ENV_API_URL),
        global,
        global_api_url: get(ENV_GLOBAL_API_URL),
        log_file: get(ENV_LOG_FILE).map(PathBuf::from),
    })
}
