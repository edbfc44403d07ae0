use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::core::storage::file::DEFAULT_CACHE_DIR;
use crate::core::subscription::DEFAULT_FEEDS_FILE;

pub const DEFAULT_CACHE_DB: &str = "data/cache.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Sqlite,
    Memory,
    File,
}

impl FromStr for CacheBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "sqlite" | "db" => Ok(Self::Sqlite),
            "memory" | "mem" => Ok(Self::Memory),
            "file" | "xml" => Ok(Self::File),
            _ => Err(ConfigError::InvalidValue {
                key: "EATME_CACHE_BACKEND",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub cache_backend: CacheBackend,
    pub cache_db: PathBuf,
    pub cache_dir: PathBuf,
    pub feeds_file: PathBuf,
    pub http_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_backend: CacheBackend::Sqlite,
            cache_db: PathBuf::from(DEFAULT_CACHE_DB),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            feeds_file: PathBuf::from(DEFAULT_FEEDS_FILE),
            http_timeout: None,
        }
    }
}

impl AppConfig {
    /// Loads `.env.local` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::from_filename(".env.local");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = read("EATME_CACHE_BACKEND") {
            config.cache_backend = value.parse()?;
        }
        if let Some(value) = read("EATME_CACHE_DB") {
            config.cache_db = PathBuf::from(value);
        }
        if let Some(value) = read("EATME_CACHE_DIR") {
            config.cache_dir = PathBuf::from(value);
        }
        if let Some(value) = read("EATME_FEEDS_FILE") {
            config.feeds_file = PathBuf::from(value);
        }
        if let Some(value) = read("EATME_HTTP_TIMEOUT_SECS") {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "EATME_HTTP_TIMEOUT_SECS",
                    value: value.clone(),
                })?;
            config.http_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn database_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.cache_db.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[])).expect("defaults");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.http_timeout, None);
        assert_eq!(config.database_url(), "sqlite://data/cache.db?mode=rwc");
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("EATME_CACHE_BACKEND", "File"),
            ("EATME_CACHE_DIR", "/tmp/eatme"),
            ("EATME_HTTP_TIMEOUT_SECS", "15"),
            ("EATME_FEEDS_FILE", " "),
        ]))
        .expect("overrides");

        assert_eq!(config.cache_backend, CacheBackend::File);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/eatme"));
        assert_eq!(config.http_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.feeds_file, PathBuf::from(DEFAULT_FEEDS_FILE));
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(AppConfig::from_lookup(lookup_from(&[("EATME_CACHE_BACKEND", "redis")])).is_err());
        let error = AppConfig::from_lookup(lookup_from(&[("EATME_HTTP_TIMEOUT_SECS", "soon")]))
            .expect_err("timeout must be numeric");
        assert_eq!(error.to_string(), "invalid value for EATME_HTTP_TIMEOUT_SECS: soon");
    }
}
