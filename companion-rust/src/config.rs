use crate::{cache::CachePolicy, poller::DEFAULT_POLL_INTERVAL, ConfigError};
use std::{env, time::Duration};

const TTL_VAR: &str = "CLOVER_COMPANION_TTL_SECS";
const ERROR_TTL_VAR: &str = "CLOVER_COMPANION_ERROR_TTL_SECS";
const POLL_VAR: &str = "CLOVER_COMPANION_POLL_SECS";

/// Settings for a [`CompanionStore`](crate::CompanionStore).
/// # Default Values
/// - `ttl`: 60 seconds
/// - `error_ttl`: same as `ttl`
/// - `poll_interval`: 15 seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanionConfig {
    /// How long a successful response stays fresh.
    pub ttl: Duration,
    /// How long a failed response stays cached before a new attempt.
    pub error_ttl: Duration,
    /// Interval of polling watches.
    pub poll_interval: Duration,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        let ttl = Duration::from_secs(60);
        Self {
            ttl,
            error_ttl: ttl,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl CompanionConfig {
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_error_ttl(mut self, error_ttl: Duration) -> Self {
        self.error_ttl = error_ttl;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Read `CLOVER_COMPANION_TTL_SECS`, `CLOVER_COMPANION_ERROR_TTL_SECS` and
    /// `CLOVER_COMPANION_POLL_SECS`. Unset variables keep their defaults; an
    /// unset error TTL follows the TTL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let ttl = read_secs(&lookup, TTL_VAR)?.unwrap_or(defaults.ttl);
        let error_ttl = read_secs(&lookup, ERROR_TTL_VAR)?.unwrap_or(ttl);
        let poll_interval = read_secs(&lookup, POLL_VAR)?.unwrap_or(defaults.poll_interval);

        Ok(Self {
            ttl,
            error_ttl,
            poll_interval,
        })
    }

    #[must_use]
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            ttl: self.ttl,
            error_ttl: self.error_ttl,
        }
    }
}

fn read_secs<F>(lookup: &F, name: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidDuration {
            name,
            value: raw.clone(),
        })?;
    if secs == 0 {
        return Err(ConfigError::ZeroDuration { name });
    }
    Ok(Some(Duration::from_secs(secs)))
}
