//! Configuration loader
//!
//! Loads the Surveys API client configuration from environment variables or
//! files.
//!
//! ## Loading Strategy
//! 1. If any `TAILSPIN_SURVEY_API_*` variable is set, the environment is the
//!    only source and its errors are returned as-is
//! 2. Otherwise the first config file found is loaded
//! 3. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `TAILSPIN_SURVEY_API_BASE_URL`: Backend base address
//! - `TAILSPIN_SURVEY_API_NAME`: Logical service name
//! - `TAILSPIN_SURVEY_API_SCOPES`: Semicolon-delimited scopes
//! - `TAILSPIN_HTTP_TIMEOUT_SECS`: Request timeout in seconds (optional)
//! - `TAILSPIN_HTTP_USER_AGENT`: User-Agent header (optional)
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./config.{json,toml}` then `./tailspin.{json,toml}`
//! 2. `../config.{json,toml}` then `../tailspin.{json,toml}`
//! 3. `../../config.{json,toml}` then `../../tailspin.{json,toml}`
//! 4. The same locations relative to the executable

use std::path::{Path, PathBuf};

use tailspin_domain::{Config, HttpConfig, Result, SurveyApiConfig, SurveysError, TokenCacheConfig};
use url::Url;

const REQUIRED_ENV_VARS: [&str; 3] =
    ["TAILSPIN_SURVEY_API_BASE_URL", "TAILSPIN_SURVEY_API_NAME", "TAILSPIN_SURVEY_API_SCOPES"];

const FILE_NAMES: [&str; 4] = ["config.json", "config.toml", "tailspin.json", "tailspin.toml"];

/// Load configuration from the environment or a config file
///
/// The environment wins as soon as one of the required variables is set; a
/// partial or invalid environment is reported rather than silently replaced
/// by a file.
///
/// # Errors
/// Returns `SurveysError::Config` or `SurveysError::InvalidInput` if:
/// - The environment is incomplete or invalid
/// - No config file is found, or it cannot be parsed
/// - Required fields are missing or out of range
pub fn load() -> Result<Config> {
    if REQUIRED_ENV_VARS.iter().any(|key| std::env::var_os(key).is_some()) {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    tracing::debug!("No survey API environment variables set, trying file");
    load_from_file(None)
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `SurveysError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("TAILSPIN_SURVEY_API_BASE_URL")?;
    let name = env_var("TAILSPIN_SURVEY_API_NAME")?;
    let scopes = env_var("TAILSPIN_SURVEY_API_SCOPES")?;

    let mut http = HttpConfig::default();
    if let Ok(raw) = std::env::var("TAILSPIN_HTTP_TIMEOUT_SECS") {
        http.timeout_secs = raw
            .parse::<u64>()
            .map_err(|e| SurveysError::Config(format!("Invalid HTTP timeout: {e}")))?;
    }
    if let Ok(agent) = std::env::var("TAILSPIN_HTTP_USER_AGENT") {
        http.user_agent = agent;
    }

    let config = Config {
        survey_api: SurveyApiConfig { base_url, name, scopes },
        http,
        token_cache: TokenCacheConfig::default(),
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations for a config file.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `SurveysError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing or invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SurveysError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            SurveysError::Config("No config file found in any standard location".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SurveysError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SurveysError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SurveysError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SurveysError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Field checks plus a full URL parse of the base address
fn validate(config: &Config) -> Result<()> {
    config.validate()?;
    Url::parse(&config.survey_api.base_url)
        .map_err(|e| SurveysError::Config(format!("Invalid survey_api.base_url: {e}")))?;
    Ok(())
}

/// Search the standard locations for a configuration file
///
/// Looks in the current working directory and its parents (up to 2
/// levels), then the same locations relative to the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
#[must_use]
pub fn find_config_file() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    ["", "..", "../.."]
        .iter()
        .flat_map(|up| FILE_NAMES.iter().map(move |name| dir.join(up).join(name)))
        .collect()
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| SurveysError::Config(format!("Missing required environment variable: {key}")))
}
