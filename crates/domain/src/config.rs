//! Configuration structures shared by the loader and the composition root.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PROVIDER_TIMEOUT_SECS, DEFAULT_REFRESH_THRESHOLD_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TIMEZONE, GOOGLE_AUTH_URL, GOOGLE_CALENDAR_API_BASE, GOOGLE_TOKEN_URL,
};
use crate::errors::{Result, SlotwiseError};

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub google: GoogleConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// Google OAuth client registration plus overridable endpoints.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_calendar_api_base")]
    pub calendar_api_base: String,
}

impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("calendar_api_base", &self.calendar_api_base)
            .finish()
    }
}

/// Budgets and locale for booking operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfig {
    /// IANA zone in which weekly availability rules are interpreted.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
    #[serde(default = "default_refresh_threshold")]
    pub refresh_threshold_secs: i64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            provider_timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
            refresh_threshold_secs: DEFAULT_REFRESH_THRESHOLD_SECS,
        }
    }
}

impl BookingConfig {
    /// Resolve the configured zone name.
    ///
    /// # Errors
    /// Returns `SlotwiseError::Config` for names unknown to the tz database.
    pub fn time_zone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| SlotwiseError::Config(format!("Invalid timezone '{}': {e}", self.timezone)))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

const fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_provider_timeout() -> u64 {
    DEFAULT_PROVIDER_TIMEOUT_SECS
}

const fn default_refresh_threshold() -> i64 {
    DEFAULT_REFRESH_THRESHOLD_SECS
}

fn default_auth_url() -> String {
    GOOGLE_AUTH_URL.to_string()
}

fn default_token_url() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

fn default_calendar_api_base() -> String {
    GOOGLE_CALENDAR_API_BASE.to_string()
}
