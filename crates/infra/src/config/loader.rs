//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `SLOTWISE_DB_PATH`: Database file path
//! - `SLOTWISE_DB_POOL_SIZE`: Connection pool size
//! - `SLOTWISE_GOOGLE_CLIENT_ID`, `SLOTWISE_GOOGLE_CLIENT_SECRET`,
//!   `SLOTWISE_GOOGLE_REDIRECT_URI`: OAuth client registration
//!
//! Optional:
//! - `SLOTWISE_GOOGLE_AUTH_URL`, `SLOTWISE_GOOGLE_TOKEN_URL`,
//!   `SLOTWISE_GOOGLE_CALENDAR_API_BASE`: endpoint overrides
//! - `SLOTWISE_TIMEZONE`: IANA zone for availability rules
//! - `SLOTWISE_REQUEST_TIMEOUT_SECS`, `SLOTWISE_PROVIDER_TIMEOUT_SECS`,
//!   `SLOTWISE_REFRESH_THRESHOLD_SECS`
//! - `SLOTWISE_LOG_LEVEL`
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` and `slotwise.{json,toml}` in the
//! current directory, its two parents, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use slotwise_domain::constants::{GOOGLE_AUTH_URL, GOOGLE_CALENDAR_API_BASE, GOOGLE_TOKEN_URL};
use slotwise_domain::{BookingConfig, Config, DatabaseConfig, GoogleConfig, Result, SlotwiseError};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `SlotwiseError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or values are out of range
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `SlotwiseError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("SLOTWISE_DB_PATH")?;
    let db_pool_size = env_var("SLOTWISE_DB_POOL_SIZE").and_then(|s| {
        s.parse::<u32>().map_err(|e| SlotwiseError::Config(format!("Invalid pool size: {e}")))
    })?;

    let google = GoogleConfig {
        client_id: env_var("SLOTWISE_GOOGLE_CLIENT_ID")?,
        client_secret: env_var("SLOTWISE_GOOGLE_CLIENT_SECRET")?,
        redirect_uri: env_var("SLOTWISE_GOOGLE_REDIRECT_URI")?,
        auth_url: env_or("SLOTWISE_GOOGLE_AUTH_URL", GOOGLE_AUTH_URL),
        token_url: env_or("SLOTWISE_GOOGLE_TOKEN_URL", GOOGLE_TOKEN_URL),
        calendar_api_base: env_or("SLOTWISE_GOOGLE_CALENDAR_API_BASE", GOOGLE_CALENDAR_API_BASE),
    };

    let booking_defaults = BookingConfig::default();
    let booking = BookingConfig {
        timezone: env_or("SLOTWISE_TIMEZONE", &booking_defaults.timezone),
        request_timeout_secs: env_parse(
            "SLOTWISE_REQUEST_TIMEOUT_SECS",
            booking_defaults.request_timeout_secs,
        )?,
        provider_timeout_secs: env_parse(
            "SLOTWISE_PROVIDER_TIMEOUT_SECS",
            booking_defaults.provider_timeout_secs,
        )?,
        refresh_threshold_secs: env_parse(
            "SLOTWISE_REFRESH_THRESHOLD_SECS",
            booking_defaults.refresh_threshold_secs,
        )?,
    };

    let config = Config {
        database: DatabaseConfig { path: db_path, pool_size: db_pool_size },
        google,
        booking,
        log_level: env_or("SLOTWISE_LOG_LEVEL", "info"),
    };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `SlotwiseError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing or values are out of range
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SlotwiseError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SlotwiseError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SlotwiseError::Config(format!("Failed to read config file: {e}")))?;

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
            .map_err(|e| SlotwiseError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SlotwiseError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SlotwiseError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Reject values the services cannot run with.
fn validate(config: &Config) -> Result<()> {
    if config.database.pool_size == 0 {
        return Err(SlotwiseError::Config("database.pool_size must be at least 1".into()));
    }
    if config.booking.request_timeout_secs == 0 || config.booking.provider_timeout_secs == 0 {
        return Err(SlotwiseError::Config("booking timeouts must be positive".into()));
    }
    if config.booking.refresh_threshold_secs < 0 {
        return Err(SlotwiseError::Config("booking.refresh_threshold_secs must not be negative".into()));
    }
    config.booking.time_zone()?;
    Ok(())
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .into_iter()
        .flat_map(|root| {
            [
                root.join("config.json"),
                root.join("config.toml"),
                root.join("slotwise.json"),
                root.join("slotwise.toml"),
                root.join("../config.json"),
                root.join("../config.toml"),
                root.join("../../config.json"),
                root.join("../../config.toml"),
            ]
        })
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| SlotwiseError::Config(format!("Missing required environment variable: {key}")))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, falling back to `default` when
/// unset. A set but unparsable value is an error.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| SlotwiseError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}
