//! Column codecs shared by the SQLite repositories.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use slotwise_domain::SlotwiseError;
use tokio::task;

/// Decode an epoch-seconds column.
pub(crate) fn timestamp(idx: usize, secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp out of range: {secs}").into(),
        )
    })
}

/// Decode a column stored with an enum's canonical string form.
pub(crate) fn parse_text<T>(idx: usize, raw: &str) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

pub(crate) fn map_join_error(err: task::JoinError) -> SlotwiseError {
    if err.is_cancelled() {
        SlotwiseError::Internal("database task cancelled".into())
    } else {
        SlotwiseError::Internal(format!("database task failed: {err}"))
    }
}
