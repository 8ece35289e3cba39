//! Booking service - create and cancel meetings against remote calendars
//!
//! Create: validate, resolve the owner's integration, refresh its token,
//! create the remote event, then insert the meeting. The request deadline
//! bounds everything up to the remote create; the local insert always runs
//! to completion so its outcome is known. Storage rejects overlapping
//! scheduled meetings at insert time. A remote event left without a local
//! meeting is reported to the [`ReconciliationSink`].
//!
//! Cancel: remote deletion is best effort and bounded by the deadline; the
//! local status flip is authoritative.

use std::sync::Arc;
use std::time::Duration;

use slotwise_domain::{
    BookableEvent, BookingRequest, ConflictError, IntegrationAppType, IntegrationCredential,
    IntegrationError, Meeting, MeetingFilter, MeetingStatus, NewMeeting, ReconciliationEvent,
    ReconciliationKind, RemoteEventSpec, Result, SlotwiseError,
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::ports::{CalendarProvider, EventRepository, MeetingRepository, ReconciliationSink};
use crate::clock::Clock;
use crate::credentials::ports::CredentialRepository;
use crate::credentials::CredentialRefresher;

/// Remote event created during a booking attempt but not yet referenced by a
/// stored meeting.
#[derive(Debug, Clone)]
struct PendingRemoteEvent {
    owner_id: String,
    app_type: IntegrationAppType,
    remote_event_id: String,
    meeting_id: String,
}

pub struct BookingService {
    events: Arc<dyn EventRepository>,
    meetings: Arc<dyn MeetingRepository>,
    credentials: Arc<dyn CredentialRepository>,
    refresher: Arc<CredentialRefresher>,
    calendar: Arc<dyn CalendarProvider>,
    reconciliation: Arc<dyn ReconciliationSink>,
    clock: Arc<dyn Clock>,
    request_timeout: Duration,
}

impl BookingService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        events: Arc<dyn EventRepository>,
        meetings: Arc<dyn MeetingRepository>,
        credentials: Arc<dyn CredentialRepository>,
        refresher: Arc<CredentialRefresher>,
        calendar: Arc<dyn CalendarProvider>,
        reconciliation: Arc<dyn ReconciliationSink>,
        clock: Arc<dyn Clock>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            events,
            meetings,
            credentials,
            refresher,
            calendar,
            reconciliation,
            clock,
            request_timeout,
        }
    }

    /// Reserve a slot for a guest.
    ///
    /// # Errors
    /// - `Validation` for a malformed request
    /// - `NotFound` for a missing or private event
    /// - `Integration(NotConnected)` when the owner lacks the integration
    /// - `Integration(TokenRejected | Provider)` when the remote side fails;
    ///   nothing is stored
    /// - `Conflict(SlotUnavailable)` when the slot is taken
    /// - `Timeout` when the deadline elapses before the remote event exists;
    ///   nothing is stored
    #[instrument(skip(self, request), fields(event_id = %request.event_id))]
    pub async fn create_booking(&self, request: BookingRequest) -> Result<Meeting> {
        validate_request(&request, self.clock.now())?;

        let (new_meeting, pending) =
            match tokio::time::timeout(self.request_timeout, self.prepare(&request)).await {
                Ok(prepared) => prepared?,
                Err(_) => {
                    return Err(SlotwiseError::Timeout(format!(
                        "booking did not complete within {:?}",
                        self.request_timeout
                    )))
                }
            };

        match self.meetings.insert_meeting(new_meeting).await {
            Ok(meeting) => {
                info!(meeting_id = %meeting.id, owner_id = %meeting.owner_id, "meeting scheduled");
                Ok(meeting)
            }
            Err(err) => {
                if let Some(orphan) = pending {
                    self.report(ReconciliationEvent {
                        kind: ReconciliationKind::OrphanedRemoteEvent,
                        owner_id: orphan.owner_id,
                        app_type: orphan.app_type,
                        remote_event_id: orphan.remote_event_id,
                        meeting_id: Some(orphan.meeting_id),
                        reason: err.to_string(),
                        occurred_at: self.clock.now(),
                    })
                    .await;
                }
                Err(err)
            }
        }
    }

    /// Everything before the local insert: lookups, the overlap precheck and
    /// the remote event.
    async fn prepare(
        &self,
        request: &BookingRequest,
    ) -> Result<(NewMeeting, Option<PendingRemoteEvent>)> {
        let event = self.public_event(&request.event_id).await?;
        let app_type = event.location_type.required_app_type();
        let credential = self.connected_credential(&event.owner_id, app_type).await?;

        // The insert re-checks this atomically.
        let clashes = self
            .meetings
            .scheduled_meetings_between(&event.owner_id, request.start_time, request.end_time)
            .await?;
        if !clashes.is_empty() {
            return Err(ConflictError::SlotUnavailable.into());
        }

        let meeting_id = Uuid::now_v7().to_string();
        let mut new_meeting = NewMeeting {
            id: meeting_id.clone(),
            owner_id: event.owner_id.clone(),
            event_id: event.id.clone(),
            guest_name: request.guest_name.trim().to_string(),
            guest_email: request.guest_email.trim().to_string(),
            additional_info: request.additional_info.clone(),
            start_time: request.start_time,
            end_time: request.end_time,
            remote_event_id: None,
            remote_app_type: None,
            meet_link: None,
        };

        if !event.location_type.creates_remote_event() {
            return Ok((new_meeting, None));
        }

        if self.calendar.app_type() != app_type {
            return Err(IntegrationError::Unsupported(format!(
                "no calendar provider registered for {app_type}"
            ))
            .into());
        }

        let token = self.refresher.access_token_for(&credential).await?;
        let spec = remote_event_spec(&event, &new_meeting);
        let remote = self
            .calendar
            .create_event(&token, &spec)
            .await
            .map_err(into_provider_error)?;

        info!(remote_event_id = %remote.id, "remote calendar event created");
        let pending = PendingRemoteEvent {
            owner_id: event.owner_id.clone(),
            app_type,
            remote_event_id: remote.id.clone(),
            meeting_id,
        };

        new_meeting.remote_event_id = Some(remote.id);
        new_meeting.remote_app_type = Some(app_type);
        new_meeting.meet_link = remote.meet_link;
        Ok((new_meeting, Some(pending)))
    }

    /// Cancel a scheduled meeting.
    ///
    /// A remote deletion that fails or outlives the request deadline is
    /// reported for reconciliation and the meeting is still cancelled.
    ///
    /// # Errors
    /// - `NotFound` when the meeting is missing or was concurrently changed
    /// - `Conflict(AlreadyCancelled)` for a cancelled meeting
    #[instrument(skip(self))]
    pub async fn cancel_booking(&self, meeting_id: &str) -> Result<Meeting> {
        let meeting = self
            .meetings
            .get_meeting(meeting_id)
            .await?
            .ok_or_else(|| SlotwiseError::NotFound(format!("meeting {meeting_id}")))?;

        if meeting.status == MeetingStatus::Cancelled {
            return Err(ConflictError::AlreadyCancelled.into());
        }

        if let (Some(remote_event_id), Some(app_type)) =
            (meeting.remote_event_id.as_deref(), meeting.remote_app_type)
        {
            let deletion = tokio::time::timeout(
                self.request_timeout,
                self.delete_remote(&meeting.owner_id, app_type, remote_event_id),
            )
            .await
            .unwrap_or_else(|_| {
                Err(SlotwiseError::Timeout(format!(
                    "remote deletion did not complete within {:?}",
                    self.request_timeout
                )))
            });

            if let Err(err) = deletion {
                warn!(
                    meeting_id,
                    remote_event_id,
                    error = %err,
                    "remote event deletion failed; cancelling locally"
                );
                self.report(ReconciliationEvent {
                    kind: ReconciliationKind::RemoteDeleteFailed,
                    owner_id: meeting.owner_id.clone(),
                    app_type,
                    remote_event_id: remote_event_id.to_string(),
                    meeting_id: Some(meeting.id.clone()),
                    reason: err.to_string(),
                    occurred_at: self.clock.now(),
                })
                .await;
            }
        }

        let now = self.clock.now();
        let changed = self.meetings.cancel_meeting(meeting_id, now).await?;
        if changed == 0 {
            return Err(SlotwiseError::NotFound(format!("meeting {meeting_id} is no longer scheduled")));
        }

        info!(meeting_id, "meeting cancelled");
        Ok(Meeting { status: MeetingStatus::Cancelled, updated_at: now, ..meeting })
    }

    /// Meetings of an owner filtered by lifecycle and time.
    pub async fn list_meetings(&self, owner_id: &str, filter: MeetingFilter) -> Result<Vec<Meeting>> {
        let meetings = self.meetings.list_meetings(owner_id, filter, self.clock.now()).await?;
        debug!(owner_id, %filter, count = meetings.len(), "listed meetings");
        Ok(meetings)
    }

    async fn delete_remote(
        &self,
        owner_id: &str,
        app_type: IntegrationAppType,
        remote_event_id: &str,
    ) -> Result<()> {
        if self.calendar.app_type() != app_type {
            return Err(IntegrationError::Unsupported(format!(
                "no calendar provider registered for {app_type}"
            ))
            .into());
        }

        let credential = self.connected_credential(owner_id, app_type).await?;
        let token = self.refresher.access_token_for(&credential).await?;
        self.calendar.delete_event(&token, remote_event_id).await
    }

    async fn public_event(&self, event_id: &str) -> Result<BookableEvent> {
        self.events
            .get_event(event_id)
            .await?
            .filter(|event| !event.is_private)
            .ok_or_else(|| SlotwiseError::NotFound(format!("event {event_id}")))
    }

    async fn connected_credential(
        &self,
        owner_id: &str,
        app_type: IntegrationAppType,
    ) -> Result<IntegrationCredential> {
        self.credentials
            .get_credential(owner_id, app_type)
            .await?
            .filter(|credential| credential.is_connected)
            .ok_or_else(|| IntegrationError::NotConnected { app_type }.into())
    }

    async fn report(&self, event: ReconciliationEvent) {
        let remote_event_id = event.remote_event_id.clone();
        if let Err(err) = self.reconciliation.record(event).await {
            error!(%remote_event_id, error = %err, "failed to record reconciliation event");
        }
    }
}

fn validate_request(request: &BookingRequest, now: chrono::DateTime<chrono::Utc>) -> Result<()> {
    if request.start_time >= request.end_time {
        return Err(SlotwiseError::Validation("start time must be before end time".into()));
    }
    if request.start_time < now {
        return Err(SlotwiseError::Validation("start time is in the past".into()));
    }
    if request.guest_name.trim().is_empty() {
        return Err(SlotwiseError::Validation("guest name is required".into()));
    }
    let email = request.guest_email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(SlotwiseError::Validation(format!("invalid guest email '{email}'")));
    }
    Ok(())
}

fn remote_event_spec(event: &BookableEvent, meeting: &NewMeeting) -> RemoteEventSpec {
    RemoteEventSpec {
        summary: format!("{} - {}", meeting.guest_name, event.title),
        description: meeting.additional_info.clone(),
        attendees: vec![meeting.guest_email.clone(), event.owner_email.clone()],
        start: meeting.start_time,
        end: meeting.end_time,
        conference_request_id: format!("{}-{}", event.id, meeting.id),
    }
}

fn into_provider_error(err: SlotwiseError) -> SlotwiseError {
    match err {
        SlotwiseError::Integration(inner) => SlotwiseError::Integration(inner),
        other => IntegrationError::Provider(other.to_string()).into(),
    }
}
