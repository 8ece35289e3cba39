//! Shared test helpers for `slotwise-core` integration tests.
//!
//! Fixtures plus a [`Harness`] that wires the services to in-memory ports.

#![allow(dead_code)]

pub mod calendar;
pub mod repositories;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use slotwise_core::{
    AvailabilityService, BookingService, CredentialRefresher, MeetingRepository, MockClock,
};
use slotwise_domain::{
    BookableEvent, BookingRequest, EventLocationType, IntegrationAppType, IntegrationCredential,
    Meeting, MeetingStatus, TokenGrant,
};

pub use calendar::{
    MockCalendarProvider, MockTokenRefresher, RecordingReconciliationSink, RotatingTokenRefresher,
};
pub use repositories::{
    DetachedInsertMeetingRepository, MockAvailabilityRepository, MockCredentialRepository,
    MockEventRepository, MockMeetingRepository,
};

pub const OWNER: &str = "owner-1";
pub const EVENT: &str = "event-1";

/// Monday 2025-01-06 08:00 UTC.
pub fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap()
}

pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, hour, minute, 0).unwrap()
}

pub fn event(location_type: EventLocationType) -> BookableEvent {
    BookableEvent {
        id: EVENT.into(),
        owner_id: OWNER.into(),
        owner_email: "host@example.com".into(),
        title: "Intro call".into(),
        description: None,
        duration_minutes: 60,
        location_type,
        is_private: false,
    }
}

pub fn credential(expiry: Option<DateTime<Utc>>, refresh_token: Option<&str>) -> IntegrationCredential {
    IntegrationCredential::connected(
        OWNER,
        IntegrationAppType::GoogleMeetAndCalendar,
        TokenGrant {
            access_token: "stored-access".into(),
            refresh_token: refresh_token.map(str::to_string),
            expires_at: expiry,
        },
    )
}

pub fn grant(access_token: &str, expires_at: DateTime<Utc>) -> TokenGrant {
    TokenGrant { access_token: access_token.into(), refresh_token: None, expires_at: Some(expires_at) }
}

pub fn booking(start: DateTime<Utc>, minutes: i64) -> BookingRequest {
    BookingRequest {
        event_id: EVENT.into(),
        guest_name: "Ada Lovelace".into(),
        guest_email: "ada@example.com".into(),
        additional_info: Some("Let's talk engines".into()),
        start_time: start,
        end_time: start + Duration::minutes(minutes),
    }
}

pub fn scheduled(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Meeting {
    Meeting {
        id: id.into(),
        owner_id: OWNER.into(),
        event_id: EVENT.into(),
        guest_name: "Grace".into(),
        guest_email: "grace@example.com".into(),
        additional_info: None,
        start_time: start,
        end_time: end,
        status: MeetingStatus::Scheduled,
        remote_event_id: None,
        remote_app_type: None,
        meet_link: None,
        created_at: start,
        updated_at: start,
    }
}

/// Services wired to in-memory ports.
pub struct Harness {
    pub clock: MockClock,
    pub events: MockEventRepository,
    pub availability: MockAvailabilityRepository,
    pub meetings: MockMeetingRepository,
    pub credentials: MockCredentialRepository,
    pub refresher: MockTokenRefresher,
    pub calendar: MockCalendarProvider,
    pub reconciliation: RecordingReconciliationSink,
    pub time_zone: Tz,
    pub request_timeout: StdDuration,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            clock: MockClock::at(monday_morning()),
            events: MockEventRepository::default()
                .with_event(event(EventLocationType::GoogleMeetAndCalendar)),
            availability: MockAvailabilityRepository::default(),
            meetings: MockMeetingRepository::default(),
            credentials: MockCredentialRepository::default()
                .with_credential(credential(Some(monday_morning() + Duration::hours(1)), Some("refresh"))),
            refresher: MockTokenRefresher::granting(grant("refreshed-access", monday_morning() + Duration::hours(2))),
            calendar: MockCalendarProvider::default(),
            reconciliation: RecordingReconciliationSink::default(),
            time_zone: Tz::UTC,
            request_timeout: StdDuration::from_secs(5),
        }
    }

    pub fn credential_refresher(&self) -> CredentialRefresher {
        CredentialRefresher::new(
            Arc::new(self.refresher.clone()),
            Arc::new(self.credentials.clone()),
            Arc::new(self.clock.clone()),
            Duration::seconds(300),
        )
    }

    pub fn availability_service(&self) -> AvailabilityService {
        AvailabilityService::new(
            Arc::new(self.events.clone()),
            Arc::new(self.availability.clone()),
            Arc::new(self.meetings.clone()),
            Arc::new(self.clock.clone()),
            self.time_zone,
        )
    }

    pub fn booking_service(&self) -> BookingService {
        self.booking_service_with(Arc::new(self.meetings.clone()))
    }

    /// Booking service over a different meeting store.
    pub fn booking_service_with(&self, meetings: Arc<dyn MeetingRepository>) -> BookingService {
        BookingService::new(
            Arc::new(self.events.clone()),
            meetings,
            Arc::new(self.credentials.clone()),
            Arc::new(self.credential_refresher()),
            Arc::new(self.calendar.clone()),
            Arc::new(self.reconciliation.clone()),
            Arc::new(self.clock.clone()),
            self.request_timeout,
        )
    }
}
