use anyhow::{Context, Result};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::store::DEFAULT_STORAGE_KEY;
use crate::tvmaze::{CatalogLimits, TVMAZE_BASE};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub limits: CatalogLimits,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: TVMAZE_BASE.to_string(),
            data_dir: PathBuf::from("data"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            limits: CatalogLimits::default(),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let max_items: usize = parse_or(&get, "MOVIEVERSE_MAX_ITEMS", defaults.limits.max_items)?;
        let max_pages: u32 = parse_or(&get, "MOVIEVERSE_MAX_PAGES", defaults.limits.max_pages)?;
        let timeout_secs: u64 = parse_or(
            &get,
            "MOVIEVERSE_HTTP_TIMEOUT_SECS",
            defaults.http_timeout.as_secs(),
        )?;
        if max_items == 0 || max_pages == 0 {
            anyhow::bail!("MOVIEVERSE_MAX_ITEMS and MOVIEVERSE_MAX_PAGES must be at least 1");
        }

        let config = Config {
            api_base: get("MOVIEVERSE_API_BASE").unwrap_or(defaults.api_base),
            data_dir: get("MOVIEVERSE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            storage_key: get("MOVIEVERSE_STORAGE_KEY").unwrap_or(defaults.storage_key),
            limits: CatalogLimits {
                max_items,
                max_pages,
            },
            http_timeout: Duration::from_secs(timeout_secs),
        };
        info!(
            "Using catalog {} ({} items, {} pages), data dir {}",
            config.api_base,
            config.limits.max_items,
            config.limits.max_pages,
            config.data_dir.display()
        );
        Ok(config)
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: '{}'", key, raw)),
        None => {
            debug!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.limits.max_items, 15);
        assert_eq!(config.storage_key, "movieverse_favorites");
    }

    #[test]
    fn reads_overrides_and_ignores_blanks() {
        let config = Config::from_lookup(lookup(&[
            ("MOVIEVERSE_API_BASE", "http://localhost:8080"),
            ("MOVIEVERSE_MAX_ITEMS", "30"),
            ("MOVIEVERSE_DATA_DIR", "  "),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "http://localhost:8080");
        assert_eq!(config.limits.max_items, 30);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn rejects_invalid_numbers() {
        let err = Config::from_lookup(lookup(&[("MOVIEVERSE_MAX_PAGES", "two")])).unwrap_err();
        assert!(err.to_string().contains("MOVIEVERSE_MAX_PAGES"));
        assert!(Config::from_lookup(lookup(&[("MOVIEVERSE_MAX_ITEMS", "0")])).is_err());
    }
}
