//! Configuration loader
//!
//! Loads client settings from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If `CONDUIT_BASE_URL` is set, loads from environment variables; an
//!    invalid value is an error
//! 2. Otherwise falls back to a file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CONDUIT_BASE_URL`: Workflow server base URL (required)
//! - `CONDUIT_API_KEY`: API key sent as `Authorization: ApiKey <key>`
//! - `CONDUIT_TIMEOUT_SECS`: Per-attempt timeout in seconds
//! - `CONDUIT_USER_AGENT`: User agent override
//! - `CONDUIT_MAX_RETRIES`: Retries after the first attempt
//! - `CONDUIT_RETRY_BASE_DELAY_MS`: Backoff base; retry n waits base * 2^n
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./conduit.json` or `./conduit.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent directory
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use conduit_domain::constants::{
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_TIMEOUT_SECS,
};
use conduit_domain::{ClientError, ClientSettings, Result, RetrySettings};

pub const ENV_BASE_URL: &str = "CONDUIT_BASE_URL";
pub const ENV_API_KEY: &str = "CONDUIT_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "CONDUIT_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "CONDUIT_USER_AGENT";
pub const ENV_MAX_RETRIES: &str = "CONDUIT_MAX_RETRIES";
pub const ENV_RETRY_BASE_DELAY_MS: &str = "CONDUIT_RETRY_BASE_DELAY_MS";

const CONFIG_FILE_NAMES: [&str; 4] = ["conduit.json", "conduit.toml", "config.json", "config.toml"];

/// Load settings with automatic fallback strategy
///
/// Environment variables win when `CONDUIT_BASE_URL` is set. Only when it is
/// unset does the loader fall back to a config file.
///
/// # Errors
/// Returns `ClientError::Config` if:
/// - `CONDUIT_BASE_URL` is set and another variable cannot be parsed
/// - No config file is found
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<ClientSettings> {
    if env_opt(ENV_BASE_URL).is_none() {
        tracing::debug!("{ENV_BASE_URL} not set, trying file");
        return load_from_file(None);
    }

    let settings = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(settings)
}

/// Load settings from environment variables
///
/// Only `CONDUIT_BASE_URL` is required; the rest fall back to defaults.
///
/// # Errors
/// Returns `ClientError::Config` if the base URL is missing or a numeric
/// variable cannot be parsed.
pub fn load_from_env() -> Result<ClientSettings> {
    let base_url = env_var(ENV_BASE_URL)?;
    let api_key = env_opt(ENV_API_KEY);
    let timeout_secs = env_parse(ENV_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)?;
    let user_agent = env_opt(ENV_USER_AGENT);
    let max_retries = env_parse(ENV_MAX_RETRIES, DEFAULT_MAX_RETRIES)?;
    let base_delay_ms = env_parse(ENV_RETRY_BASE_DELAY_MS, DEFAULT_RETRY_BASE_DELAY_MS)?;

    Ok(ClientSettings {
        base_url,
        api_key,
        timeout_secs,
        user_agent,
        retry: RetrySettings { max_retries, base_delay_ms },
    })
}

/// Load settings from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ClientError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientSettings> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ClientError::config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ClientError::config("No config file found in any of the standard locations")
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ClientError::config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse settings from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientSettings> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ClientError::config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ClientError::config(format!("Invalid JSON format: {e}"))),
        _ => Err(ClientError::config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent, and the executable's
/// directory, trying `conduit.*` before `config.*` in each.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `ClientError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        ClientError::config(format!("Missing required environment variable: {key}"))
    })
}

/// Non-empty environment variable, if set
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional environment variable, using `default` when unset.
///
/// # Errors
/// Returns `ClientError::Config` if the variable is set but unparseable.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ClientError::config(format!("Invalid value for {key}: {e}"))),
        None => Ok(default),
    }
}
