// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! The backend base URL is optional at startup: a missing value is logged and
//! every request fails with `AppError::NotConfigured` until it is provided.

use std::env;
use std::str::FromStr;

/// Default page size for device event queries.
pub const DEFAULT_EVENT_LIMIT: u32 = 50;

/// Default page size for camera snapshot queries.
pub const DEFAULT_SNAPSHOT_LIMIT: u32 = 50;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, e.g. `https://api.hanibi.example`
    pub api_base_url: Option<String>,
    /// `limit` for device event queries
    pub event_limit: u32,
    /// `limit` for camera snapshot queries
    pub snapshot_limit: u32,
    /// Per-request HTTP timeout
    pub http_timeout_secs: u64,
    /// Refresh a JWT access token this many seconds before it expires
    pub refresh_margin_secs: i64,
    /// Interval between session feed polls
    pub poll_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = env::var("HANIBI_API_URL")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty());

        if api_base_url.is_none() {
            tracing::warn!("HANIBI_API_URL is not set; API requests will fail until configured");
        }

        Ok(Self {
            api_base_url,
            event_limit: parse_var("HANIBI_EVENT_LIMIT", DEFAULT_EVENT_LIMIT)?,
            snapshot_limit: parse_var("HANIBI_SNAPSHOT_LIMIT", DEFAULT_SNAPSHOT_LIMIT)?,
            http_timeout_secs: parse_var("HANIBI_HTTP_TIMEOUT_SECS", 10)?,
            refresh_margin_secs: parse_var("HANIBI_REFRESH_MARGIN_SECS", 60)?,
            poll_interval_secs: parse_positive("HANIBI_POLL_INTERVAL_SECS", 30)?,
        })
    }

    /// Config pointing at a local backend, for tests.
    pub fn test_default() -> Self {
        Self {
            api_base_url: Some("http://127.0.0.1:3000".to_string()),
            event_limit: DEFAULT_EVENT_LIMIT,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
            http_timeout_secs: 5,
            refresh_margin_secs: 60,
            poll_interval_secs: 1,
        }
    }

    /// Same as `test_default()` but targeting the given base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: Some(base_url.into()),
            ..Self::test_default()
        }
    }
}

/// How the binary signs in.
#[derive(Clone)]
pub enum Credentials {
    /// Previously issued token pair
    Tokens { access: String, refresh: String },
    /// Email/password login
    Password { email: String, password: String },
}

impl Credentials {
    /// Read credentials from `HANIBI_ACCESS_TOKEN`/`HANIBI_REFRESH_TOKEN`,
    /// falling back to `HANIBI_EMAIL`/`HANIBI_PASSWORD`.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(access) = env::var("HANIBI_ACCESS_TOKEN") {
            let refresh = env::var("HANIBI_REFRESH_TOKEN")
                .map_err(|_| ConfigError::Missing("HANIBI_REFRESH_TOKEN"))?;
            return Ok(Self::Tokens {
                access: access.trim().to_string(),
                refresh: refresh.trim().to_string(),
            });
        }

        let email = env::var("HANIBI_EMAIL").map_err(|_| ConfigError::Missing("HANIBI_EMAIL"))?;
        let password =
            env::var("HANIBI_PASSWORD").map_err(|_| ConfigError::Missing("HANIBI_PASSWORD"))?;
        Ok(Self::Password { email, password })
    }
}

/// Read an optional numeric variable, falling back to `default` when unset.
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Like `parse_var`, but zero is rejected.
fn parse_positive(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match parse_var(name, default)? {
        0 => Err(ConfigError::Invalid {
            name,
            value: "0".to_string(),
        }),
        value => Ok(value),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
