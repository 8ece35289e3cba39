//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use slotwise_domain::{ConflictError, IntegrationError, SlotwiseError};

/// `SQLITE_CONSTRAINT_TRIGGER`: raised by `RAISE(ABORT, ...)` in a trigger.
const SQLITE_CONSTRAINT_TRIGGER: std::os::raw::c_int = 1811;
const SQLITE_CONSTRAINT_UNIQUE: std::os::raw::c_int = 2067;
const SQLITE_CONSTRAINT_FOREIGNKEY: std::os::raw::c_int = 787;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SlotwiseError);

impl From<InfraError> for SlotwiseError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SlotwiseError> for InfraError {
    fn from(value: SlotwiseError) -> Self {
        InfraError(value)
    }
}

trait IntoSlotwiseError {
    fn into_slotwise(self) -> SlotwiseError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → SlotwiseError */
/* -------------------------------------------------------------------------- */

impl IntoSlotwiseError for SqlError {
    fn into_slotwise(self) -> SlotwiseError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_TRIGGER) => {
                        SlotwiseError::Conflict(ConflictError::SlotUnavailable)
                    }
                    (ErrorCode::DatabaseBusy, _) => {
                        SlotwiseError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        SlotwiseError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_UNIQUE) => {
                        SlotwiseError::Database(format!("unique constraint violation: {message}"))
                    }
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_FOREIGNKEY) => {
                        SlotwiseError::Database("foreign key constraint violation".into())
                    }
                    _ => SlotwiseError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => SlotwiseError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                SlotwiseError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                SlotwiseError::Database(format!("invalid column type for '{name}': {ty}"))
            }
            RE::InvalidPath(path) => SlotwiseError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => SlotwiseError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_slotwise())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → SlotwiseError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(SlotwiseError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SlotwiseError */
/* -------------------------------------------------------------------------- */

impl IntoSlotwiseError for HttpError {
    fn into_slotwise(self) -> SlotwiseError {
        if self.is_timeout() {
            return SlotwiseError::Timeout("HTTP request timed out".into());
        }

        if self.is_connect() {
            return SlotwiseError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return status_error(status, None);
        }

        SlotwiseError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_slotwise())
    }
}

/// Map a non-success provider response to a domain error.
///
/// `body` is appended to the message when the provider returned one.
pub fn status_error(status: reqwest::StatusCode, body: Option<&str>) -> SlotwiseError {
    let code = status.as_u16();
    let mut message = format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));
    if let Some(body) = body.map(str::trim).filter(|b| !b.is_empty()) {
        message.push_str(": ");
        message.push_str(body);
    }

    match code {
        401 | 403 => IntegrationError::TokenRejected(message).into(),
        404 => SlotwiseError::NotFound(message),
        429 => SlotwiseError::Network(message),
        400..=499 => IntegrationError::Provider(message).into(),
        _ => SlotwiseError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
