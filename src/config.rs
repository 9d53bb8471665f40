//! Client configuration from the environment.
//!
//! Base URL: `CLOUD_DISK_API_BASE` > `VITE_API_BASE` > local backend default.
//! The web front end's `VITE_API_BASE` is honoured so one `.env` can serve
//! both.

use std::time::Duration;

/// Backend address used when nothing is configured.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8888";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Whole-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, treating empty values as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("CLOUD_DISK_API_BASE")
            .or_else(|| get("VITE_API_BASE"))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let timeout = get("CLOUD_DISK_TIMEOUT_SECS").and_then(|v| match v.trim().parse::<u64>() {
            Ok(0) => None,
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                log::warn!("Ignoring invalid CLOUD_DISK_TIMEOUT_SECS: {}", v);
                None
            }
        });

        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}
