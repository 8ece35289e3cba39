//! Bookable event storage

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use slotwise_core::EventRepository;
use slotwise_domain::{BookableEvent, Result as DomainResult};
use tokio::task;
use tracing::instrument;

use super::manager::{map_sql_error, DbManager};
use super::rows::{map_join_error, parse_text};

const EVENT_COLUMNS: &str =
    "id, owner_id, owner_email, title, description, duration_minutes, location_type, is_private";

/// SQLite-backed implementation of `EventRepository`
pub struct SqliteEventRepository {
    db: Arc<DbManager>,
}

impl SqliteEventRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert or update an event type. Event management lives outside the
    /// booking flow; this is the write path used when provisioning hosts.
    #[instrument(skip(self, event), fields(event_id = %event.id, owner_id = %event.owner_id))]
    pub async fn save_event(&self, event: &BookableEvent) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let event = event.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO events (id, owner_id, owner_email, title, description,
                                     duration_minutes, location_type, is_private, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(id) DO UPDATE SET
                    owner_email = excluded.owner_email,
                    title = excluded.title,
                    description = excluded.description,
                    duration_minutes = excluded.duration_minutes,
                    location_type = excluded.location_type,
                    is_private = excluded.is_private",
                params![
                    event.id,
                    event.owner_id,
                    event.owner_email,
                    event.title,
                    event.description,
                    event.duration_minutes,
                    event.location_type.as_str(),
                    event.is_private,
                    Utc::now().timestamp(),
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    #[instrument(skip(self))]
    async fn get_event(&self, event_id: &str) -> DomainResult<Option<BookableEvent>> {
        let db = Arc::clone(&self.db);
        let event_id = event_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<BookableEvent>> {
            let conn = db.get_connection()?;
            conn.query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
                params![event_id],
                map_event_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_event_row(row: &Row) -> rusqlite::Result<BookableEvent> {
    let location_type: String = row.get(6)?;
    Ok(BookableEvent {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        owner_email: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        duration_minutes: row.get(5)?,
        location_type: parse_text(6, &location_type)?,
        is_private: row.get(7)?,
    })
}
