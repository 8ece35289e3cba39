use std::time::Duration;

use slotwise_domain::{IntegrationError, Result, SlotwiseError};
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `default_filter` (normally `Config::log_level`).
/// Calling this again after a subscriber is installed is a no-op.
///
/// # Errors
/// `SlotwiseError::Config` when `default_filter` is not a valid directive.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter).map_err(|e| {
            SlotwiseError::Config(format!("invalid log filter '{default_filter}': {e}"))
        })?,
    };

    if tracing_subscriber::registry().with(filter).with(fmt::layer()).try_init().is_err() {
        debug!("tracing subscriber already installed");
    }
    Ok(())
}

/// Like [`init_tracing`], but a rejected filter still leaves an `info`
/// subscriber installed so the returned error can be logged.
///
/// # Errors
/// The error from the rejected `filter`.
pub fn init_tracing_or_fallback(filter: &str) -> Result<()> {
    init_tracing(filter).or_else(|err| {
        init_tracing("info")?;
        Err(err)
    })
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"booking::create_booking"`).
/// * `elapsed` - Duration the command execution took.
/// * `error_type` - [`error_label`] of the failure, `None` on success.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error_type: Option<&str>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error_type {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(error_type) => {
            warn!(command, duration_ms, error_type, "command_execution_failure");
        }
    }
}

/// Convert a `SlotwiseError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &SlotwiseError) -> &'static str {
    match error {
        SlotwiseError::Validation(_) => "validation",
        SlotwiseError::NotFound(_) => "not_found",
        SlotwiseError::Conflict(_) => "conflict",
        SlotwiseError::Integration(IntegrationError::NotConnected { .. }) => "integration_not_connected",
        SlotwiseError::Integration(IntegrationError::TokenRejected(_)) => "token_rejected",
        SlotwiseError::Integration(IntegrationError::Provider(_)) => "provider",
        SlotwiseError::Integration(IntegrationError::Unsupported(_)) => "unsupported",
        SlotwiseError::Database(_) => "database",
        SlotwiseError::Config(_) => "config",
        SlotwiseError::Network(_) => "network",
        SlotwiseError::Timeout(_) => "timeout",
        SlotwiseError::Internal(_) => "internal",
    }
}
