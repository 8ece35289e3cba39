//! Port interfaces for events, meetings and remote calendars
//!
//! These traits define the boundaries between the booking logic and the
//! storage / provider implementations in `slotwise-infra`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotwise_domain::{
    BookableEvent, IntegrationAppType, Meeting, MeetingFilter, NewMeeting, ReconciliationEvent,
    RemoteEvent, RemoteEventSpec, Result,
};
use tracing::warn;

/// Read access to bookable event types.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn get_event(&self, event_id: &str) -> Result<Option<BookableEvent>>;
}

/// Persistence for meetings.
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    /// Scheduled meetings of `owner_id` intersecting `[start, end)`.
    async fn scheduled_meetings_between(
        &self,
        owner_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Meeting>>;

    /// Insert a scheduled meeting.
    ///
    /// Implementations must reject an overlap with another scheduled meeting
    /// of the same owner atomically with the write, reporting
    /// `ConflictError::SlotUnavailable`.
    async fn insert_meeting(&self, meeting: NewMeeting) -> Result<Meeting>;

    async fn get_meeting(&self, meeting_id: &str) -> Result<Option<Meeting>>;

    /// Flip a scheduled meeting to cancelled. Returns the number of rows
    /// changed (0 when the meeting is missing or no longer scheduled).
    async fn cancel_meeting(&self, meeting_id: &str, at: DateTime<Utc>) -> Result<usize>;

    /// Meetings of `owner_id` matching `filter`, ordered by start time.
    async fn list_meetings(
        &self,
        owner_id: &str,
        filter: MeetingFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Meeting>>;
}

/// Remote calendar operations for one integration.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Integration this provider talks to.
    fn app_type(&self) -> IntegrationAppType;

    async fn create_event(&self, access_token: &str, spec: &RemoteEventSpec) -> Result<RemoteEvent>;

    async fn delete_event(&self, access_token: &str, remote_event_id: &str) -> Result<()>;
}

/// Destination for local/remote divergences that need a follow-up.
#[async_trait]
pub trait ReconciliationSink: Send + Sync {
    async fn record(&self, event: ReconciliationEvent) -> Result<()>;
}

/// Sink that only writes reconciliation events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReconciliationSink;

#[async_trait]
impl ReconciliationSink for TracingReconciliationSink {
    async fn record(&self, event: ReconciliationEvent) -> Result<()> {
        warn!(
            kind = %event.kind,
            owner_id = %event.owner_id,
            app_type = %event.app_type,
            remote_event_id = %event.remote_event_id,
            meeting_id = ?event.meeting_id,
            reason = %event.reason,
            "remote calendar needs reconciliation"
        );
        Ok(())
    }
}
