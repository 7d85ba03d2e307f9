use chrono::Duration;
use log::info;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::DEFAULT_POLL_LIFETIME_HOURS;

const DEFAULT_FEED_LIMIT: usize = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub poll_lifetime: Duration,
    pub feed_limit: usize,
    pub seed_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_lifetime: Duration::hours(DEFAULT_POLL_LIFETIME_HOURS),
            feed_limit: DEFAULT_FEED_LIMIT,
            seed_path: None,
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let lifetime_hours = match lookup("POLL_LIFETIME_HOURS") {
            Some(raw) => parse_positive("POLL_LIFETIME_HOURS", &raw)?,
            None => DEFAULT_POLL_LIFETIME_HOURS,
        };

        let feed_limit = match lookup("FEED_LIMIT") {
            Some(raw) => parse_positive("FEED_LIMIT", &raw)? as usize,
            None => defaults.feed_limit,
        };

        let seed_path = lookup("QUICKPOLL_SEED")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        info!(
            "Config loaded: poll lifetime {}h, feed limit {}, seed {:?}",
            lifetime_hours, feed_limit, seed_path
        );

        Ok(Self {
            poll_lifetime: Duration::hours(lifetime_hours),
            feed_limit,
            seed_path,
        })
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<i64, ConfigError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| ConfigError::Invalid {
            key,
            value: raw.to_string(),
        })
}
