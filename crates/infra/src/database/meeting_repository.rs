//! Meeting storage
//!
//! Overlap exclusion is enforced by the `meetings_no_overlap` trigger, so an
//! insert that races another booking for the same owner fails inside SQLite
//! and surfaces as `ConflictError::SlotUnavailable`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row, ToSql};
use slotwise_core::MeetingRepository;
use slotwise_domain::{
    Meeting, MeetingFilter, MeetingStatus, NewMeeting, Result as DomainResult, SlotwiseError,
};
use tokio::task;
use tracing::{debug, instrument};

use super::manager::{map_sql_error, DbManager, SqliteConnection};
use super::rows::{map_join_error, parse_text, timestamp};

const MEETING_COLUMNS: &str = "id, owner_id, event_id, guest_name, guest_email, additional_info,
     start_ts, end_ts, status, remote_event_id, remote_app_type, meet_link, created_at, updated_at";

/// SQLite-backed implementation of `MeetingRepository`
pub struct SqliteMeetingRepository {
    db: Arc<DbManager>,
}

impl SqliteMeetingRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MeetingRepository for SqliteMeetingRepository {
    #[instrument(skip(self))]
    async fn scheduled_meetings_between(
        &self,
        owner_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Meeting>> {
        let db = Arc::clone(&self.db);
        let owner_id = owner_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<Meeting>> {
            let conn = db.get_connection()?;
            query_meetings(
                &conn,
                "owner_id = ?1 AND status = 'SCHEDULED' AND start_ts < ?3 AND end_ts > ?2
                 ORDER BY start_ts ASC",
                &[&owner_id, &start.timestamp(), &end.timestamp()],
            )
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, meeting), fields(meeting_id = %meeting.id, owner_id = %meeting.owner_id))]
    async fn insert_meeting(&self, meeting: NewMeeting) -> DomainResult<Meeting> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Meeting> {
            let conn = db.get_connection()?;
            let now = Utc::now().timestamp();
            let remote_app_type = meeting.remote_app_type.map(|app| app.as_str());

            let params: [&dyn ToSql; 14] = [
                &meeting.id,
                &meeting.owner_id,
                &meeting.event_id,
                &meeting.guest_name,
                &meeting.guest_email,
                &meeting.additional_info,
                &meeting.start_time.timestamp(),
                &meeting.end_time.timestamp(),
                &MeetingStatus::Scheduled.as_str(),
                &meeting.remote_event_id,
                &remote_app_type,
                &meeting.meet_link,
                &now,
                &now,
            ];
            conn.execute(
                &format!(
                    "INSERT INTO meetings ({MEETING_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
                ),
                params.as_slice(),
            )
            .map_err(map_sql_error)?;

            debug!(meeting_id = %meeting.id, "meeting stored");
            fetch_meeting(&conn, &meeting.id)
                .map_err(map_sql_error)?
                .ok_or_else(|| SlotwiseError::Internal("inserted meeting not readable".into()))
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn get_meeting(&self, meeting_id: &str) -> DomainResult<Option<Meeting>> {
        let db = Arc::clone(&self.db);
        let meeting_id = meeting_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Meeting>> {
            let conn = db.get_connection()?;
            fetch_meeting(&conn, &meeting_id).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn cancel_meeting(&self, meeting_id: &str, at: DateTime<Utc>) -> DomainResult<usize> {
        let db = Arc::clone(&self.db);
        let meeting_id = meeting_id.to_string();

        task::spawn_blocking(move || -> DomainResult<usize> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE meetings SET status = 'CANCELLED', updated_at = ?2
                 WHERE id = ?1 AND status = 'SCHEDULED'",
                params![meeting_id, at.timestamp()],
            )
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn list_meetings(
        &self,
        owner_id: &str,
        filter: MeetingFilter,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<Meeting>> {
        let db = Arc::clone(&self.db);
        let owner_id = owner_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<Meeting>> {
            let conn = db.get_connection()?;
            let now = now.timestamp();
            let result = match filter {
                MeetingFilter::Upcoming => query_meetings(
                    &conn,
                    "owner_id = ?1 AND status = 'SCHEDULED' AND start_ts > ?2 ORDER BY start_ts ASC",
                    &[&owner_id, &now],
                ),
                MeetingFilter::Past => query_meetings(
                    &conn,
                    "owner_id = ?1 AND status = 'SCHEDULED' AND start_ts < ?2 ORDER BY start_ts ASC",
                    &[&owner_id, &now],
                ),
                MeetingFilter::Cancelled => query_meetings(
                    &conn,
                    "owner_id = ?1 AND status = 'CANCELLED' ORDER BY start_ts ASC",
                    &[&owner_id],
                ),
            };
            result.map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn fetch_meeting(conn: &SqliteConnection, meeting_id: &str) -> rusqlite::Result<Option<Meeting>> {
    conn.query_row(
        &format!("SELECT {MEETING_COLUMNS} FROM meetings WHERE id = ?1"),
        params![meeting_id],
        map_meeting_row,
    )
    .optional()
}

fn query_meetings(
    conn: &SqliteConnection,
    predicate: &str,
    params: &[&dyn ToSql],
) -> rusqlite::Result<Vec<Meeting>> {
    let mut stmt = conn.prepare(&format!("SELECT {MEETING_COLUMNS} FROM meetings WHERE {predicate}"))?;
    let meetings = stmt.query_map(params, map_meeting_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(meetings)
}

fn map_meeting_row(row: &Row) -> rusqlite::Result<Meeting> {
    let status: String = row.get(8)?;
    let remote_app_type: Option<String> = row.get(10)?;
    Ok(Meeting {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        event_id: row.get(2)?,
        guest_name: row.get(3)?,
        guest_email: row.get(4)?,
        additional_info: row.get(5)?,
        start_time: timestamp(6, row.get(6)?)?,
        end_time: timestamp(7, row.get(7)?)?,
        status: parse_text(8, &status)?,
        remote_event_id: row.get(9)?,
        remote_app_type: remote_app_type.as_deref().map(|raw| parse_text(10, raw)).transpose()?,
        meet_link: row.get(11)?,
        created_at: timestamp(12, row.get(12)?)?,
        updated_at: timestamp(13, row.get(13)?)?,
    })
}
