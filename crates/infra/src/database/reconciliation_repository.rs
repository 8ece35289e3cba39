//! Durable reconciliation queue for local/remote calendar divergences.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use slotwise_core::ReconciliationSink;
use slotwise_domain::{ReconciliationEvent, Result as DomainResult};
use tokio::task;
use tracing::{instrument, warn};
use uuid::Uuid;

use super::manager::{map_sql_error, DbManager};
use super::rows::{map_join_error, parse_text, timestamp};

/// Unresolved entry of the reconciliation queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReconciliation {
    pub id: String,
    pub event: ReconciliationEvent,
}

/// Stores reconciliation events until an operator or job resolves them.
pub struct SqliteReconciliationSink {
    db: Arc<DbManager>,
}

impl SqliteReconciliationSink {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Unresolved entries, oldest first.
    #[instrument(skip(self))]
    pub async fn pending(&self) -> DomainResult<Vec<PendingReconciliation>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<PendingReconciliation>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, kind, owner_id, app_type, remote_event_id, meeting_id, reason, occurred_at
                     FROM remote_reconciliation
                     WHERE resolved_at IS NULL
                     ORDER BY occurred_at ASC, id ASC",
                )
                .map_err(map_sql_error)?;
            let pending = stmt
                .query_map([], map_pending_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(pending)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Mark an entry handled. Returns false when it was unknown or already
    /// resolved.
    #[instrument(skip(self))]
    pub async fn resolve(&self, id: &str, at: DateTime<Utc>) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE remote_reconciliation SET resolved_at = ?2
                     WHERE id = ?1 AND resolved_at IS NULL",
                    params![id, at.timestamp()],
                )
                .map_err(map_sql_error)?;
            Ok(changed == 1)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl ReconciliationSink for SqliteReconciliationSink {
    async fn record(&self, event: ReconciliationEvent) -> DomainResult<()> {
        warn!(
            kind = %event.kind,
            owner_id = %event.owner_id,
            app_type = %event.app_type,
            remote_event_id = %event.remote_event_id,
            meeting_id = ?event.meeting_id,
            reason = %event.reason,
            "queueing remote calendar reconciliation"
        );

        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO remote_reconciliation
                    (id, kind, owner_id, app_type, remote_event_id, meeting_id, reason, occurred_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    Uuid::now_v7().to_string(),
                    event.kind.as_str(),
                    event.owner_id,
                    event.app_type.as_str(),
                    event.remote_event_id,
                    event.meeting_id,
                    event.reason,
                    event.occurred_at.timestamp(),
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_pending_row(row: &Row) -> rusqlite::Result<PendingReconciliation> {
    let kind: String = row.get(1)?;
    let app_type: String = row.get(3)?;
    Ok(PendingReconciliation {
        id: row.get(0)?,
        event: ReconciliationEvent {
            kind: parse_text(1, &kind)?,
            owner_id: row.get(2)?,
            app_type: parse_text(3, &app_type)?,
            remote_event_id: row.get(4)?,
            meeting_id: row.get(5)?,
            reason: row.get(6)?,
            occurred_at: timestamp(7, row.get(7)?)?,
        },
    })
}
