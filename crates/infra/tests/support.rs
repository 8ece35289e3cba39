//! Shared harness for `slotwise-infra` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use slotwise_domain::{BookableEvent, EventLocationType, NewMeeting};
use slotwise_infra::database::{DbManager, SqliteEventRepository};
use tempfile::TempDir;

pub const OWNER: &str = "owner-1";
pub const EVENT: &str = "event-1";

/// Temporary database with the schema applied. The file lives as long as
/// the harness.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("slotwise-test.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("schema should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    /// Database with the default bookable event already stored.
    pub async fn with_event(location_type: EventLocationType) -> Self {
        let db = Self::new();
        SqliteEventRepository::new(Arc::clone(&db.manager))
            .save_event(&event(location_type))
            .await
            .expect("event should be stored");
        db
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

pub fn event(location_type: EventLocationType) -> BookableEvent {
    BookableEvent {
        id: EVENT.into(),
        owner_id: OWNER.into(),
        owner_email: "host@example.com".into(),
        title: "Intro call".into(),
        description: Some("Thirty minutes to get to know each other".into()),
        duration_minutes: 60,
        location_type,
        is_private: false,
    }
}

/// 2025-01-06 is a Monday.
pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, hour, minute, 0).unwrap()
}

pub fn new_meeting(id: &str, start: DateTime<Utc>, minutes: i64) -> NewMeeting {
    NewMeeting {
        id: id.into(),
        owner_id: OWNER.into(),
        event_id: EVENT.into(),
        guest_name: "Ada Lovelace".into(),
        guest_email: "ada@example.com".into(),
        additional_info: None,
        start_time: start,
        end_time: start + Duration::minutes(minutes),
        remote_event_id: None,
        remote_app_type: None,
        meet_link: None,
    }
}
