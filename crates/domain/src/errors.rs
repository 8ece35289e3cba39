//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::IntegrationAppType;

/// Main error type for Slotwise
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SlotwiseError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(ConflictError),

    #[error("Integration error: {0}")]
    Integration(IntegrationError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A write was rejected because of the current state of a meeting.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictError {
    /// The requested interval overlaps a scheduled meeting of the owner.
    #[error("the requested time slot is no longer available")]
    SlotUnavailable,

    #[error("meeting is already cancelled")]
    AlreadyCancelled,
}

/// Failures around third-party integrations (calendar / video providers).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationError {
    #[error("required integration '{app_type}' not found or disconnected for the event owner")]
    NotConnected { app_type: IntegrationAppType },

    /// The provider refused the refresh token. Never retried.
    #[error("provider rejected the stored credential: {0}")]
    TokenRejected(String),

    #[error("calendar provider call failed: {0}")]
    Provider(String),

    #[error("unsupported integration: {0}")]
    Unsupported(String),
}

impl From<ConflictError> for SlotwiseError {
    fn from(value: ConflictError) -> Self {
        Self::Conflict(value)
    }
}

impl From<IntegrationError> for SlotwiseError {
    fn from(value: IntegrationError) -> Self {
        Self::Integration(value)
    }
}

impl SlotwiseError {
    /// Short, stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Integration(_) => "integration",
            Self::Database(_) => "database",
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Slotwise operations
pub type Result<T> = std::result::Result<T, SlotwiseError>;
