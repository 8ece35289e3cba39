//! In-memory repository implementations for testing
//!
//! Mirror the storage contracts of the SQLite repositories closely enough
//! for service tests, including the atomic overlap check on insert.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotwise_core::{AvailabilityRepository, CredentialRepository, EventRepository, MeetingRepository};
use slotwise_domain::{
    BookableEvent, ConflictError, IntegrationAppType, IntegrationCredential, Meeting, MeetingFilter,
    MeetingStatus, NewMeeting, Result as DomainResult, SlotwiseError, WeeklyAvailability,
};

/// In-memory mock for `EventRepository`.
#[derive(Default, Clone)]
pub struct MockEventRepository {
    events: Arc<Mutex<HashMap<String, BookableEvent>>>,
}

impl MockEventRepository {
    pub fn with_event(self, event: BookableEvent) -> Self {
        self.events.lock().unwrap().insert(event.id.clone(), event);
        self
    }
}

#[async_trait]
impl EventRepository for MockEventRepository {
    async fn get_event(&self, event_id: &str) -> DomainResult<Option<BookableEvent>> {
        Ok(self.events.lock().unwrap().get(event_id).cloned())
    }
}

/// In-memory mock for `AvailabilityRepository`.
#[derive(Default, Clone)]
pub struct MockAvailabilityRepository {
    schedules: Arc<Mutex<HashMap<String, WeeklyAvailability>>>,
}

impl MockAvailabilityRepository {
    pub fn with_availability(self, availability: WeeklyAvailability) -> Self {
        self.schedules.lock().unwrap().insert(availability.owner_id.clone(), availability);
        self
    }

    pub fn stored(&self, owner_id: &str) -> Option<WeeklyAvailability> {
        self.schedules.lock().unwrap().get(owner_id).cloned()
    }
}

#[async_trait]
impl AvailabilityRepository for MockAvailabilityRepository {
    async fn get_weekly_availability(&self, owner_id: &str) -> DomainResult<Option<WeeklyAvailability>> {
        Ok(self.stored(owner_id))
    }

    async fn replace_weekly_availability(&self, availability: &WeeklyAvailability) -> DomainResult<()> {
        self.schedules
            .lock()
            .unwrap()
            .insert(availability.owner_id.clone(), availability.clone());
        Ok(())
    }
}

/// In-memory mock for `MeetingRepository`.
///
/// `insert_meeting` checks for overlaps under the same lock as the write so
/// concurrent bookings behave like the SQLite trigger.
#[derive(Default, Clone)]
pub struct MockMeetingRepository {
    meetings: Arc<Mutex<Vec<Meeting>>>,
    range_queries: Arc<AtomicUsize>,
    skip_precheck: Arc<Mutex<bool>>,
}

impl MockMeetingRepository {
    pub fn with_meeting(self, meeting: Meeting) -> Self {
        self.meetings.lock().unwrap().push(meeting);
        self
    }

    /// Make range queries return nothing so only the insert-time check can
    /// catch a conflict.
    pub fn hide_from_range_queries(self) -> Self {
        *self.skip_precheck.lock().unwrap() = true;
        self
    }

    pub fn all(&self) -> Vec<Meeting> {
        self.meetings.lock().unwrap().clone()
    }

    pub fn range_query_count(&self) -> usize {
        self.range_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MeetingRepository for MockMeetingRepository {
    async fn scheduled_meetings_between(
        &self,
        owner_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Meeting>> {
        self.range_queries.fetch_add(1, Ordering::SeqCst);
        if *self.skip_precheck.lock().unwrap() {
            return Ok(Vec::new());
        }
        Ok(self
            .meetings
            .lock()
            .unwrap()
            .iter()
            .filter(|m| {
                m.owner_id == owner_id && m.status == MeetingStatus::Scheduled && m.overlaps(start, end)
            })
            .cloned()
            .collect())
    }

    async fn insert_meeting(&self, meeting: NewMeeting) -> DomainResult<Meeting> {
        let mut meetings = self.meetings.lock().unwrap();
        let clash = meetings.iter().any(|m| {
            m.owner_id == meeting.owner_id
                && m.status == MeetingStatus::Scheduled
                && m.overlaps(meeting.start_time, meeting.end_time)
        });
        if clash {
            return Err(ConflictError::SlotUnavailable.into());
        }

        let now = Utc::now();
        let stored = Meeting {
            id: meeting.id,
            owner_id: meeting.owner_id,
            event_id: meeting.event_id,
            guest_name: meeting.guest_name,
            guest_email: meeting.guest_email,
            additional_info: meeting.additional_info,
            start_time: meeting.start_time,
            end_time: meeting.end_time,
            status: MeetingStatus::Scheduled,
            remote_event_id: meeting.remote_event_id,
            remote_app_type: meeting.remote_app_type,
            meet_link: meeting.meet_link,
            created_at: now,
            updated_at: now,
        };
        meetings.push(stored.clone());
        Ok(stored)
    }

    async fn get_meeting(&self, meeting_id: &str) -> DomainResult<Option<Meeting>> {
        Ok(self.meetings.lock().unwrap().iter().find(|m| m.id == meeting_id).cloned())
    }

    async fn cancel_meeting(&self, meeting_id: &str, at: DateTime<Utc>) -> DomainResult<usize> {
        let mut meetings = self.meetings.lock().unwrap();
        let Some(meeting) = meetings
            .iter_mut()
            .find(|m| m.id == meeting_id && m.status == MeetingStatus::Scheduled)
        else {
            return Ok(0);
        };
        meeting.status = MeetingStatus::Cancelled;
        meeting.updated_at = at;
        Ok(1)
    }

    async fn list_meetings(
        &self,
        owner_id: &str,
        filter: MeetingFilter,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<Meeting>> {
        let mut matching: Vec<Meeting> = self
            .meetings
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.owner_id == owner_id)
            .filter(|m| match filter {
                MeetingFilter::Upcoming => m.status == MeetingStatus::Scheduled && m.start_time > now,
                MeetingFilter::Past => m.status == MeetingStatus::Scheduled && m.start_time < now,
                MeetingFilter::Cancelled => m.status == MeetingStatus::Cancelled,
            })
            .cloned()
            .collect();
        matching.sort_by_key(|m| m.start_time);
        Ok(matching)
    }
}

/// Meeting repository whose insert runs on a detached task after a delay,
/// like a blocking write that keeps going when the caller stops waiting.
#[derive(Clone)]
pub struct DetachedInsertMeetingRepository {
    inner: MockMeetingRepository,
    delay: Duration,
}

impl DetachedInsertMeetingRepository {
    pub fn new(inner: MockMeetingRepository, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl MeetingRepository for DetachedInsertMeetingRepository {
    async fn scheduled_meetings_between(
        &self,
        owner_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Meeting>> {
        self.inner.scheduled_meetings_between(owner_id, start, end).await
    }

    async fn insert_meeting(&self, meeting: NewMeeting) -> DomainResult<Meeting> {
        let inner = self.inner.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.insert_meeting(meeting).await
        })
        .await
        .map_err(|e| SlotwiseError::Internal(e.to_string()))?
    }

    async fn get_meeting(&self, meeting_id: &str) -> DomainResult<Option<Meeting>> {
        self.inner.get_meeting(meeting_id).await
    }

    async fn cancel_meeting(&self, meeting_id: &str, at: DateTime<Utc>) -> DomainResult<usize> {
        self.inner.cancel_meeting(meeting_id, at).await
    }

    async fn list_meetings(
        &self,
        owner_id: &str,
        filter: MeetingFilter,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<Meeting>> {
        self.inner.list_meetings(owner_id, filter, now).await
    }
}

/// In-memory mock for `CredentialRepository`.
#[derive(Default, Clone)]
pub struct MockCredentialRepository {
    credentials: Arc<Mutex<HashMap<(String, IntegrationAppType), IntegrationCredential>>>,
    fail_saves: Arc<Mutex<bool>>,
    saves: Arc<AtomicUsize>,
}

impl MockCredentialRepository {
    pub fn with_credential(self, credential: IntegrationCredential) -> Self {
        self.credentials
            .lock()
            .unwrap()
            .insert((credential.owner_id.clone(), credential.app_type), credential);
        self
    }

    pub fn failing_saves(self) -> Self {
        *self.fail_saves.lock().unwrap() = true;
        self
    }

    pub fn stored(&self, owner_id: &str, app_type: IntegrationAppType) -> Option<IntegrationCredential> {
        self.credentials.lock().unwrap().get(&(owner_id.to_string(), app_type)).cloned()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialRepository for MockCredentialRepository {
    async fn get_credential(
        &self,
        owner_id: &str,
        app_type: IntegrationAppType,
    ) -> DomainResult<Option<IntegrationCredential>> {
        Ok(self.stored(owner_id, app_type))
    }

    async fn save_credential(&self, credential: &IntegrationCredential) -> DomainResult<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if *self.fail_saves.lock().unwrap() {
            return Err(SlotwiseError::Database("database is locked".into()));
        }
        self.credentials
            .lock()
            .unwrap()
            .insert((credential.owner_id.clone(), credential.app_type), credential.clone());
        Ok(())
    }

    async fn list_credentials(&self, owner_id: &str) -> DomainResult<Vec<IntegrationCredential>> {
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect())
    }
}
