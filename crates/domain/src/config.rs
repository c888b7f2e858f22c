//! Configuration structures for the Surveys API client

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_TOKEN_CACHE_CAPACITY, DEFAULT_TOKEN_CACHE_TTL_SECS,
    DEFAULT_TOKEN_REFRESH_THRESHOLD_SECS, DEFAULT_USER_AGENT, MAX_HTTP_TIMEOUT_SECS,
    MAX_TOKEN_REFRESH_THRESHOLD_SECS, SCOPE_DELIMITER,
};
use crate::errors::{Result, SurveysError};

/// Root application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend API location and scopes
    pub survey_api: SurveyApiConfig,
    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Token cache sizing and refresh policy
    #[serde(default)]
    pub token_cache: TokenCacheConfig,
}

/// Location and identity of the backend Surveys API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyApiConfig {
    /// Base address, e.g. `https://surveys-api.example.com`
    pub base_url: String,
    /// Logical service name, used in logs
    pub name: String,
    /// Semicolon-delimited scopes requested for delegated calls
    pub scopes: String,
}

impl SurveyApiConfig {
    /// Scope strings with surrounding whitespace and empty entries removed
    #[must_use]
    pub fn scope_list(&self) -> Vec<String> {
        split_scopes(&self.scopes).map(ToString::to_string).collect()
    }
}

/// Split a semicolon-delimited scope string
///
/// Whitespace around each scope is trimmed and empty entries are dropped.
pub fn split_scopes(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(SCOPE_DELIMITER).map(str::trim).filter(|s| !s.is_empty())
}

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs(), user_agent: default_user_agent() }
    }
}

/// Bounds for the per-user access token cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCacheConfig {
    /// Maximum number of cached tokens
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
    /// Time-to-live of a cache entry in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    /// Cached tokens this close to expiry are treated as missing
    #[serde(default = "default_refresh_threshold_secs")]
    pub refresh_threshold_secs: u64,
}

impl Default for TokenCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl_secs(),
            refresh_threshold_secs: default_refresh_threshold_secs(),
        }
    }
}

impl TokenCacheConfig {
    /// Check numeric bounds
    ///
    /// # Errors
    /// Returns `SurveysError::InvalidInput` if the TTL is zero or the refresh
    /// threshold exceeds [`MAX_TOKEN_REFRESH_THRESHOLD_SECS`].
    pub fn validate(&self) -> Result<()> {
        if self.ttl_secs == 0 {
            return Err(SurveysError::InvalidInput("token_cache.ttl_secs must be positive".into()));
        }
        if self.refresh_threshold_secs > MAX_TOKEN_REFRESH_THRESHOLD_SECS {
            return Err(SurveysError::InvalidInput(format!(
                "token_cache.refresh_threshold_secs must be at most {}, got {}",
                MAX_TOKEN_REFRESH_THRESHOLD_SECS, self.refresh_threshold_secs
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Check required fields and numeric bounds
    ///
    /// # Errors
    /// Returns `SurveysError::Config` naming the first missing or malformed
    /// field, or `SurveysError::InvalidInput` for an out-of-range number.
    pub fn validate(&self) -> Result<()> {
        let api = &self.survey_api;

        if api.base_url.trim().is_empty() {
            return Err(SurveysError::Config("survey_api.base_url must not be empty".into()));
        }
        if !(api.base_url.starts_with("http://") || api.base_url.starts_with("https://")) {
            return Err(SurveysError::Config(format!(
                "survey_api.base_url must be an http(s) address: {}",
                api.base_url
            )));
        }
        if api.name.trim().is_empty() {
            return Err(SurveysError::Config("survey_api.name must not be empty".into()));
        }
        if split_scopes(&api.scopes).next().is_none() {
            return Err(SurveysError::Config("survey_api.scopes must not be empty".into()));
        }
        if self.http.timeout_secs == 0 || self.http.timeout_secs > MAX_HTTP_TIMEOUT_SECS {
            return Err(SurveysError::InvalidInput(format!(
                "http.timeout_secs must be between 1 and {MAX_HTTP_TIMEOUT_SECS}, got {}",
                self.http.timeout_secs
            )));
        }

        self.token_cache.validate()
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

const fn default_cache_capacity() -> u64 {
    DEFAULT_TOKEN_CACHE_CAPACITY
}

const fn default_cache_ttl_secs() -> u64 {
    DEFAULT_TOKEN_CACHE_TTL_SECS
}

const fn default_refresh_threshold_secs() -> u64 {
    DEFAULT_TOKEN_REFRESH_THRESHOLD_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str, scopes: &str) -> Config {
        Config {
            survey_api: SurveyApiConfig {
                base_url: base_url.to_string(),
                name: "SurveyApi".to_string(),
                scopes: scopes.to_string(),
            },
            http: HttpConfig::default(),
            token_cache: TokenCacheConfig::default(),
        }
    }

    #[test]
    fn test_scope_list_splits_on_semicolons() {
        let cfg = config("https://api.test", "surveys.read; surveys.write;;");
        assert_eq!(cfg.survey_api.scope_list(), vec!["surveys.read", "surveys.write"]);
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(config("https://api.test", "user_impersonation").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_scopes() {
        let err = config("https://api.test", " ; ").validate().unwrap_err();
        assert!(matches!(err, SurveysError::Config(msg) if msg.contains("scopes")));
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let err = config("ftp://api.test", "a").validate().unwrap_err();
        assert!(matches!(err, SurveysError::Config(msg) if msg.contains("base_url")));
    }

    #[test]
    fn test_validate_rejects_oversized_refresh_threshold() {
        let mut cfg = config("https://api.test", "a");
        cfg.token_cache.refresh_threshold_secs = u64::MAX;

        match cfg.validate() {
            Err(SurveysError::InvalidInput(msg)) => assert!(msg.contains("refresh_threshold_secs")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_accepts_threshold_bounds() {
        let mut cfg = config("https://api.test", "a");
        cfg.token_cache.refresh_threshold_secs = 0;
        assert!(cfg.validate().is_ok());
        cfg.token_cache.refresh_threshold_secs = MAX_TOKEN_REFRESH_THRESHOLD_SECS;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut cfg = config("https://api.test", "a");
        cfg.http.timeout_secs = 0;
        assert!(matches!(cfg.validate(), Err(SurveysError::InvalidInput(_))));
    }

    #[test]
    fn test_negative_refresh_threshold_does_not_deserialize() {
        let result: std::result::Result<Config, _> = serde_json::from_str(
            r#"{
                "survey_api": {"base_url": "https://api.test", "name": "SurveyApi", "scopes": "a"},
                "token_cache": {"refresh_threshold_secs": -600}
            }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_sections_default_when_absent() {
        let cfg: Config = serde_json::from_str(
            r#"{"survey_api":{"base_url":"https://api.test","name":"SurveyApi","scopes":"a"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.http, HttpConfig::default());
        assert_eq!(cfg.token_cache.refresh_threshold_secs, DEFAULT_TOKEN_REFRESH_THRESHOLD_SECS);
    }
}
