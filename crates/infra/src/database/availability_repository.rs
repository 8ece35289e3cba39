//! Weekly availability persistence
//!
//! One `availability` row per owner holds the gap between slots; the seven
//! day rules live in `day_availability` and are always replaced together.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, TransactionBehavior};
use slotwise_core::AvailabilityRepository;
use slotwise_domain::{Result as DomainResult, WeeklyAvailability, WeeklyAvailabilityRule};
use tokio::task;
use tracing::{debug, instrument};

use super::manager::{map_sql_error, DbManager, SqliteConnection};
use super::rows::{map_join_error, parse_text};

/// SQLite-backed implementation of `AvailabilityRepository`
pub struct SqliteAvailabilityRepository {
    db: Arc<DbManager>,
}

impl SqliteAvailabilityRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AvailabilityRepository for SqliteAvailabilityRepository {
    #[instrument(skip(self))]
    async fn get_weekly_availability(&self, owner_id: &str) -> DomainResult<Option<WeeklyAvailability>> {
        let db = Arc::clone(&self.db);
        let owner_id = owner_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<WeeklyAvailability>> {
            let conn = db.get_connection()?;
            load_availability(&conn, &owner_id).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, availability), fields(owner_id = %availability.owner_id, rules = availability.rules.len()))]
    async fn replace_weekly_availability(&self, availability: &WeeklyAvailability) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let availability = availability.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            replace_availability(&mut conn, &availability).map_err(map_sql_error)?;
            debug!(owner_id = %availability.owner_id, "weekly availability replaced");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn load_availability(
    conn: &SqliteConnection,
    owner_id: &str,
) -> rusqlite::Result<Option<WeeklyAvailability>> {
    let time_gap_minutes: Option<i64> = conn
        .query_row(
            "SELECT time_gap_minutes FROM availability WHERE owner_id = ?1",
            params![owner_id],
            |row| row.get(0),
        )
        .optional()?;

    let Some(time_gap_minutes) = time_gap_minutes else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT day, start_time, end_time, is_available
         FROM day_availability WHERE owner_id = ?1",
    )?;
    let mut rules = stmt
        .query_map(params![owner_id], |row| {
            let day: String = row.get(0)?;
            Ok(WeeklyAvailabilityRule {
                day: parse_text(0, &day)?,
                start_time: row.get(1)?,
                end_time: row.get(2)?,
                is_available: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rules.sort_by_key(|rule| rule.day);

    Ok(Some(WeeklyAvailability { owner_id: owner_id.to_string(), time_gap_minutes, rules }))
}

fn replace_availability(
    conn: &mut SqliteConnection,
    availability: &WeeklyAvailability,
) -> rusqlite::Result<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "INSERT INTO availability (owner_id, time_gap_minutes, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(owner_id) DO UPDATE SET
            time_gap_minutes = excluded.time_gap_minutes,
            updated_at = excluded.updated_at",
        params![availability.owner_id, availability.time_gap_minutes, Utc::now().timestamp()],
    )?;
    tx.execute("DELETE FROM day_availability WHERE owner_id = ?1", params![availability.owner_id])?;

    {
        let mut insert = tx.prepare(
            "INSERT INTO day_availability (owner_id, day, start_time, end_time, is_available)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for rule in &availability.rules {
            insert.execute(params![
                availability.owner_id,
                rule.day.as_str(),
                rule.start_time,
                rule.end_time,
                rule.is_available,
            ])?;
        }
    }

    tx.commit()
}
