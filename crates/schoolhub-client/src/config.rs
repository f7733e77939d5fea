//! Client configuration.
//!
//! This module provides the API location and cache lifetime loaded from
//! environment variables.

use std::env;
use std::time::Duration;

/// Client configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `SCHOOLHUB_API_URL`: base URL including the `/api` prefix (default: `http://127.0.0.1:3000/api`)
/// - `CLIENT_CACHE_TTL_SECONDS`: how long cached responses stay fresh (default: `300`)
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Base URL every request path is appended to.
    pub api_url: String,

    /// Time-to-live for cached responses.
    pub ttl: Duration,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("SCHOOLHUB_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            ttl: env::var("CLIENT_CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.ttl),
        }
    }

    /// Joins `path` onto the base URL.
    ///
    /// ```ignore
    /// config.url("/students") // "http://127.0.0.1:3000/api/students"
    /// ```
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:3000/api".into(),
            ttl: Duration::from_secs(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_single_slash() {
        let config = CacheConfig::default();
        assert_eq!(config.url("/students"), "http://127.0.0.1:3000/api/students");
        assert_eq!(config.url("students/1"), "http://127.0.0.1:3000/api/students/1");
    }
}
