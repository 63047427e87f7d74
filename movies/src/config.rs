//! Configuration management for the movie tracker.
//!
//! Loads configuration from environment variables with sensible defaults.
//! `main` calls `dotenvy::dotenv()` first, so a `.env` file works too.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed
    #[error("invalid value for {name}: {value:?}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },
}

/// Movie catalog (TMDb) configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// API root, always ending in `/`
    pub root: String,
    /// API key sent as the `api_key` query parameter
    pub api_key: String,
    /// Language sent as the `language` query parameter
    pub language: String,
}

/// Users/favorites backend configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Backend root, always ending in `/`
    pub root: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Movie catalog
    pub catalog: CatalogConfig,
    /// Users/favorites backend
    pub backend: BackendConfig,
    /// JSON file standing in for browser local storage
    pub session_file: PathBuf,
    /// How long to wait for in-flight effects before giving up
    pub settle_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `TMDB_API_KEY` is missing or a numeric
    /// variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("TMDB_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("TMDB_API_KEY"))?;

        let settle_timeout = match lookup("SETTLE_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    name: "SETTLE_TIMEOUT_SECS",
                    value,
                })?,
            None => Duration::from_secs(10),
        };

        Ok(Self {
            catalog: CatalogConfig {
                root: with_trailing_slash(
                    lookup("TMDB_API_ROOT")
                        .unwrap_or_else(|| "https://api.themoviedb.org/3/".to_string()),
                ),
                api_key,
                language: lookup("TMDB_LANGUAGE").unwrap_or_else(|| "en-US".to_string()),
            },
            backend: BackendConfig {
                root: with_trailing_slash(
                    lookup("BACKEND_URL").unwrap_or_else(|| "http://localhost:3000/".to_string()),
                ),
            },
            session_file: lookup("SESSION_FILE")
                .map_or_else(|| PathBuf::from(".movie-tracker-session.json"), PathBuf::from),
            settle_timeout,
        })
    }
}

fn with_trailing_slash(mut root: String) -> String {
    if !root.ends_with('/') {
        root.push('/');
    }
    root
}
