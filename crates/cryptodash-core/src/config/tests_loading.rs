//! Loading-focused tests for configuration
//!
//! File parsing, layering and environment overrides.

#[cfg(test)]
mod loading_tests {
    use std::{collections::HashMap, io::Write, path::PathBuf};

    use serial_test::serial;

    use super::super::{
        load::env_overrides, load_config, load_toml_file, ConfigOverrides, DashboardConfig,
    };
    use crate::{Error, Result};

    fn write_config(dir: &tempfile::TempDir, body: &str) -> Result<PathBuf> {
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path)
            .map_err(|e| Error::io_error(format!("Failed to create test file: {e}")))?;
        file.write_all(body.as_bytes())
            .map_err(|e| Error::io_error(format!("Failed to write test file: {e}")))?;
        Ok(path)
    }

    fn tempdir() -> Result<tempfile::TempDir> {
        tempfile::tempdir().map_err(|e| Error::io_error(format!("Failed to create temp dir: {e}")))
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_toml_file_parses_partial_layer() -> Result<()> {
        let dir = tempdir()?;
        let path = write_config(&dir, "color = \"cyan\"\nlimit = 25\n")?;

        let layer = load_toml_file(&path)?;
        assert_eq!(layer.color.as_deref(), Some("cyan"));
        assert_eq!(layer.limit, Some(25));
        assert_eq!(layer.refresh_interval_secs, None);
        Ok(())
    }

    #[test]
    fn test_malformed_toml_returns_parse_error() -> Result<()> {
        let dir = tempdir()?;
        let path = write_config(&dir, "limit = \n invalid toml [[[")?;

        let result = load_toml_file(&path);
        assert!(matches!(result, Err(Error::Parse(_))));
        Ok(())
    }

    #[test]
    fn test_unknown_key_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = write_config(&dir, "colour = \"red\"\n")?;
        assert!(load_toml_file(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_directory_path_rejected() -> Result<()> {
        let dir = tempdir()?;
        assert!(matches!(load_toml_file(dir.path()), Err(Error::Io(_))));
        Ok(())
    }

    #[test]
    fn test_env_layer_parses_values() -> Result<()> {
        let layer = env_overrides(lookup(&[
            ("CRYPTODASH_COLOR", "magenta"),
            ("CRYPTODASH_LIMIT", "42"),
            ("CRYPTODASH_REFRESH", "15"),
            ("CRYPTODASH_LOG_FILE", "/tmp/cd.log"),
        ]))?;
        assert_eq!(layer.color.as_deref(), Some("magenta"));
        assert_eq!(layer.limit, Some(42));
        assert_eq!(layer.refresh_interval_secs, Some(15));
        assert_eq!(layer.log_file, Some(PathBuf::from("/tmp/cd.log")));
        assert_eq!(layer.api_url, None);
        Ok(())
    }

    #[test]
    fn test_env_layer_global_flag() -> Result<()> {
        let on = env_overrides(lookup(&[
            ("CRYPTODASH_GLOBAL", "Yes"),
            ("CRYPTODASH_GLOBAL_API_URL", "http://localhost:9000/global/"),
        ]))?;
        assert_eq!(on.global, Some(true));
        assert_eq!(on.global_api_url.as_deref(), Some("http://localhost:9000/global/"));

        let off = env_overrides(lookup(&[("CRYPTODASH_GLOBAL", "0")]))?;
        assert_eq!(off.global, Some(false));

        let bad = env_overrides(lookup(&[("CRYPTODASH_GLOBAL", "maybe")]));
        assert!(matches!(bad, Err(Error::InvalidConfig(ref msg)) if msg.contains("maybe")));
        Ok(())
    }

    #[test]
    fn test_toml_file_enables_global() -> Result<()> {
        let dir = tempdir()?;
        let path = write_config(&dir, "global = true
")?;
        let config = DashboardConfig::default().merge(load_toml_file(&path)?);
        assert!(config.global);
        Ok(())
    }

    #[test]
    fn test_env_layer_rejects_bad_number() {
        let result = env_overrides(lookup(&[("CRYPTODASH_LIMIT", "lots")]));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_env_layer_ignores_empty_values() -> Result<()> {
        let layer = env_overrides(lookup(&[("CRYPTODASH_LIMIT", "  ")]))?;
        assert_eq!(layer, ConfigOverrides::default());
        Ok(())
    }

    #[test]
    #[serial]
    fn test_explicit_file_then_cli_override() -> Result<()> {
        let dir = tempdir()?;
        let path = write_config(&dir, "limit = 25\nrefresh_interval_secs = 0\n")?;

        let cli = ConfigOverrides {
            color: Some("yellow".to_string()),
            ..ConfigOverrides::default()
        };
        let config = load_config(Some(&path), cli)?;
        assert_eq!(config.limit, 25);
        assert_eq!(config.color, "yellow");
        assert_eq!(config.refresh_interval_secs, 60);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_is_error() {
        let result = load_config(
            Some(std::path::Path::new("/nonexistent/cryptodash.toml")),
            ConfigOverrides::default(),
        );
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    #[serial]
    fn test_env_var_overrides_file() -> Result<()> {
        let dir = tempdir()?;
        let path = write_config(&dir, "limit = 25\n")?;

        std::env::set_var("CRYPTODASH_LIMIT", "7");
        let result = load_config(Some(&path), ConfigOverrides::default());
        std::env::remove_var("CRYPTODASH_LIMIT");

        assert_eq!(result.map(|c| c.limit), Ok(7));
        Ok(())
    }

    #[test]
    #[serial]
    fn test_invalid_cli_value_fails_validation() -> Result<()> {
        let dir = tempdir()?;
        let path = write_config(&dir, "")?;
        let cli = ConfigOverrides {
            limit: Some(0),
            ..ConfigOverrides::default()
        };
        let result = load_config(Some(&path), cli);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
        Ok(())
    }

    #[test]
    fn test_serialized_config_reloads() -> Result<()> {
        let config = DashboardConfig {
            limit: 12,
            ..DashboardConfig::default()
        };
        let text = toml::to_string(&config).map_err(|e| Error::parse_error(e.to_string()))?;
        let dir = tempdir()?;
        let path = write_config(&dir, &text)?;
        assert_eq!(DashboardConfig::default().merge(load_toml_file(&path)?), config);
        Ok(())
    }
}
