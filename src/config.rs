use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

use crate::fetcher::{FetchConfig, BROWSER_USER_AGENT, DEFAULT_MAX_BODY_BYTES};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://giftlist.db?mode=rwc";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub fetch_timeout: Duration,
    pub user_agent: String,
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let fetch_timeout_secs: u64 = lookup("FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|| "8".to_string())
            .parse()
            .context("FETCH_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            user_agent: lookup("FETCH_USER_AGENT")
                .unwrap_or_else(|| BROWSER_USER_AGENT.to_string()),
            max_body_bytes: match lookup("FETCH_MAX_BODY_BYTES") {
                Some(value) => value
                    .parse()
                    .context("FETCH_MAX_BODY_BYTES must be a byte count")?,
                None => DEFAULT_MAX_BODY_BYTES,
            },
        })
    }

    /// Fetcher settings: browser headers with the configured overrides
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.clone(),
            timeout: self.fetch_timeout,
            max_body_bytes: self.max_body_bytes,
            ..FetchConfig::default()
        }
    }
}
