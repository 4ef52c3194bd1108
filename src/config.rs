//! Catalog configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_DATABASE_URL` - SQLite connection string (e.g. `sqlite://catalog.db`)
//!
//! ## Optional
//! - `CATALOG_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `CATALOG_ACQUIRE_TIMEOUT_SECS` - Seconds to wait for a pooled connection (default: 30)
//! - `CATALOG_BUSY_TIMEOUT_SECS` - Seconds a writer waits for the database lock (default: 5)
//! - `CATALOG_RECIPES_LIMIT` - Recipes shown per author in user views (default: 3)
//! - `CATALOG_PAGE_SIZE` - Recipes per listing page (default: 6)

use std::{str::FromStr, time::Duration};

use thiserror::Error;

use crate::{
    constants::{RECIPES_LIMIT_DEFAULT, RECIPE_COUNT_PER_PAGE},
    pagination::Page,
};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub busy_timeout: Duration,
    /// How many of an author's recipes a user-with-recipes view carries
    pub recipes_limit: i64,
    pub page_size: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::from("sqlite::memory:"),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            recipes_limit: RECIPES_LIMIT_DEFAULT,
            page_size: RECIPE_COUNT_PER_PAGE,
        }
    }
}

impl Config {
    /// Config for a private in-memory database. An in-memory SQLite database
    /// lives and dies with its connection, so the pool is pinned to one.
    pub fn in_memory() -> Self {
        Self {
            max_connections: 1,
            ..Self::default()
        }
    }

    /// Listing window for a 1-based page number.
    pub fn page(&self, number: i64) -> Page {
        Page::numbered(number, self.page_size)
    }

    /// The recipe count for user-with-recipes views: the caller's request,
    /// or `recipes_limit` when the request carries none.
    pub fn resolve_recipes_limit(&self, requested: Option<i64>) -> i64 {
        requested.unwrap_or(self.recipes_limit).max(0)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("CATALOG_DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("CATALOG_DATABASE_URL".to_owned()))?;

        let max_connections =
            parse_or(&lookup, "CATALOG_MAX_CONNECTIONS", defaults.max_connections)?;
        let acquire_timeout = parse_or(
            &lookup,
            "CATALOG_ACQUIRE_TIMEOUT_SECS",
            defaults.acquire_timeout.as_secs(),
        )
        .map(Duration::from_secs)?;
        let busy_timeout = parse_or(
            &lookup,
            "CATALOG_BUSY_TIMEOUT_SECS",
            defaults.busy_timeout.as_secs(),
        )
        .map(Duration::from_secs)?;
        let recipes_limit = parse_or(&lookup, "CATALOG_RECIPES_LIMIT", defaults.recipes_limit)?;
        let page_size = parse_or(&lookup, "CATALOG_PAGE_SIZE", defaults.page_size)?;

        if max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_MAX_CONNECTIONS".to_owned(),
                "must be at least 1".to_owned(),
            ));
        }
        if recipes_limit < 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_RECIPES_LIMIT".to_owned(),
                "must not be negative".to_owned(),
            ));
        }
        if page_size < 1 {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_PAGE_SIZE".to_owned(),
                "must be at least 1".to_owned(),
            ));
        }

        Ok(Self {
            database_url,
            max_connections,
            acquire_timeout,
            busy_timeout,
            recipes_limit,
            page_size,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn database_url_is_required() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "CATALOG_DATABASE_URL"));
    }

    #[test]
    fn optional_values_fall_back_to_defaults() {
        let config =
            Config::from_lookup(lookup_from(&[("CATALOG_DATABASE_URL", "sqlite://c.db")])).unwrap();
        assert_eq!(config.database_url, "sqlite://c.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.recipes_limit, RECIPES_LIMIT_DEFAULT);
        assert_eq!(config.page_size, RECIPE_COUNT_PER_PAGE);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
        assert_eq!(
            config.page(2),
            Page::new(RECIPE_COUNT_PER_PAGE, RECIPE_COUNT_PER_PAGE)
        );
        assert_eq!(config.resolve_recipes_limit(None), RECIPES_LIMIT_DEFAULT);
        assert_eq!(config.resolve_recipes_limit(Some(1)), 1);
        assert_eq!(config.resolve_recipes_limit(Some(-4)), 0);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("CATALOG_DATABASE_URL", "sqlite://c.db"),
            ("CATALOG_MAX_CONNECTIONS", "12"),
            ("CATALOG_ACQUIRE_TIMEOUT_SECS", "3"),
            ("CATALOG_BUSY_TIMEOUT_SECS", "1"),
            ("CATALOG_RECIPES_LIMIT", " 10 "),
        ]))
        .unwrap();
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.acquire_timeout, Duration::from_secs(3));
        assert_eq!(config.busy_timeout, Duration::from_secs(1));
        assert_eq!(config.recipes_limit, 10);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("CATALOG_DATABASE_URL", "sqlite://c.db"),
            ("CATALOG_PAGE_SIZE", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "CATALOG_PAGE_SIZE"));

        let err = Config::from_lookup(lookup_from(&[
            ("CATALOG_DATABASE_URL", "sqlite://c.db"),
            ("CATALOG_MAX_CONNECTIONS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));
    }
}
