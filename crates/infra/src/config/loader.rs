//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. An explicit path (`--config`) is loaded directly
//! 2. Otherwise, attempts to load from environment variables
//! 3. If a required variable is missing, falls back to loading from file
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `ROOMBOOK_SIS_BASE_URL`: SIS base URL (required)
//! - `ROOMBOOK_SIS_USERNAME`: Basic Auth user (required)
//! - `ROOMBOOK_REQUEST_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `ROOMBOOK_SECRET_SOURCE`: `env` or `keyring`
//! - `ROOMBOOK_SECRET_NAME`: Name of the password secret
//! - `ROOMBOOK_SECRET_SERVICE`: Keyring service name
//! - `ROOMBOOK_ORPHAN_POLICY`: `keep` or `delete`
//! - `ROOMBOOK_CACHE_LOOKUPS`: Whether lookups are cached per run (true/false)
//! - `ROOMBOOK_EMAIL_ADDRESS_TYPE`: Address type for staff lookups
//! - `ROOMBOOK_IMPORT_MODE`: `events` or `unavailability`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./roombook.toml`, `./roombook.json`, `./config.toml`, `./config.json`
//! 2. The same names in the parent and grandparent directories
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use roombook_domain::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use roombook_domain::{
    Config, ImportConfig, Result, RoombookError, SecretConfig, SisConfig,
};
use url::Url;

const REQUIRED_ENV_VARS: [&str; 2] = ["ROOMBOOK_SIS_BASE_URL", "ROOMBOOK_SIS_USERNAME"];

const CONFIG_FILE_NAMES: [&str; 4] =
    ["roombook.toml", "roombook.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// With an explicit `path`, only that file is read. Otherwise environment
/// variables are tried first and a probed config file is used if any
/// required variable is missing.
///
/// # Errors
/// Returns `RoombookError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or the base URL is unusable
pub fn load(path: Option<PathBuf>) -> Result<Config> {
    let config = if path.is_some() {
        load_from_file(path)?
    } else {
        let missing = missing_required_env();
        if missing.is_empty() {
            // Required values present: any remaining env error is reported as is
            let config = load_from_env()?;
            tracing::info!("Configuration loaded from environment variables");
            config
        } else {
            tracing::debug!(?missing, "Required environment variables missing, trying file");
            load_from_file(None)?
        }
    };

    validate(config)
}

/// Required variables that are unset or blank
fn missing_required_env() -> Vec<&'static str> {
    REQUIRED_ENV_VARS.into_iter().filter(|key| env_opt(key).is_none()).collect()
}

/// Load configuration from environment variables
///
/// The two required variables must be present; every other value falls
/// back to its default when unset.
///
/// # Errors
/// Returns `RoombookError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("ROOMBOOK_SIS_BASE_URL")?;
    let username = env_var("ROOMBOOK_SIS_USERNAME")?;
    let request_timeout_secs =
        env_parse("ROOMBOOK_REQUEST_TIMEOUT_SECS")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

    let secret_defaults = SecretConfig::default();
    let secret = SecretConfig {
        source: env_parse("ROOMBOOK_SECRET_SOURCE")?.unwrap_or(secret_defaults.source),
        name: env_opt("ROOMBOOK_SECRET_NAME").unwrap_or(secret_defaults.name),
        service: env_opt("ROOMBOOK_SECRET_SERVICE").unwrap_or(secret_defaults.service),
    };

    let import_defaults = ImportConfig::default();
    let import = ImportConfig {
        mode: env_parse("ROOMBOOK_IMPORT_MODE")?.unwrap_or(import_defaults.mode),
        orphan_policy: env_parse("ROOMBOOK_ORPHAN_POLICY")?
            .unwrap_or(import_defaults.orphan_policy),
        cache_lookups: env_bool("ROOMBOOK_CACHE_LOOKUPS", import_defaults.cache_lookups)?,
        email_address_type: env_opt("ROOMBOOK_EMAIL_ADDRESS_TYPE")
            .unwrap_or(import_defaults.email_address_type),
    };

    Ok(Config { sis: SisConfig { base_url, username, request_timeout_secs }, secret, import })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `RoombookError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RoombookError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            RoombookError::Config(
                "No config file found and ROOMBOOK_SIS_BASE_URL / ROOMBOOK_SIS_USERNAME not set"
                    .to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| RoombookError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Check required values and normalise the base URL.
///
/// # Errors
/// Returns `RoombookError::Config` for an empty username, a base URL that
/// does not parse or is not http(s), or a zero timeout.
pub fn validate(mut config: Config) -> Result<Config> {
    let base_url = config.sis.base_url.trim().trim_end_matches('/');
    let parsed = Url::parse(base_url)
        .map_err(|e| RoombookError::Config(format!("Invalid sis.base_url '{base_url}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(RoombookError::Config(format!(
            "sis.base_url must be http or https, got '{}'",
            parsed.scheme()
        )));
    }
    config.sis.base_url = base_url.to_string();

    if config.sis.username.trim().is_empty() {
        return Err(RoombookError::Config("sis.username must not be empty".into()));
    }
    if config.sis.request_timeout_secs == 0 {
        return Err(RoombookError::Config("sis.request_timeout_secs must be positive".into()));
    }

    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `RoombookError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| RoombookError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| RoombookError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(RoombookError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_under(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_under(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_under(dir: &Path) -> Vec<PathBuf> {
    ["", "..", "../.."]
        .iter()
        .flat_map(|up| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(up).join(name)))
        .collect()
}

/// Get required environment variable
///
/// # Errors
/// Returns `RoombookError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        RoombookError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

/// Parse an optional environment variable with `FromStr`
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|value| {
            value.parse::<T>().map_err(|e| RoombookError::Config(format!("Invalid {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
/// Unset or blank gives `default`.
///
/// # Errors
/// Returns `RoombookError::Config` for any other value.
fn env_bool(key: &str, default: bool) -> Result<bool> {
    let Some(value) = env_opt(key) else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(RoombookError::Config(format!(
            "Invalid {key}: expected true/false, got '{value}'"
        ))),
    }
}
