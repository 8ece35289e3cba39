//! Meetings booked by guests against a host's event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use super::integration::IntegrationAppType;
use crate::impl_domain_status_conversions;

/// Lifecycle: `Scheduled -> Cancelled`. Cancelled is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub enum MeetingStatus {
    Scheduled,
    Cancelled,
}

impl_domain_status_conversions!(MeetingStatus {
    Scheduled => "SCHEDULED",
    Cancelled => "CANCELLED",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeetingFilter {
    Upcoming,
    Past,
    Cancelled,
}

impl_domain_status_conversions!(MeetingFilter {
    Upcoming => "UPCOMING",
    Past => "PAST",
    Cancelled => "CANCELLED",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Meeting {
    pub id: String,
    pub owner_id: String,
    pub event_id: String,
    pub guest_name: String,
    pub guest_email: String,
    pub additional_info: Option<String>,
    #[cfg_attr(feature = "ts-gen", ts(type = "string"))]
    pub start_time: DateTime<Utc>,
    #[cfg_attr(feature = "ts-gen", ts(type = "string"))]
    pub end_time: DateTime<Utc>,
    pub status: MeetingStatus,
    pub remote_event_id: Option<String>,
    #[cfg_attr(feature = "ts-gen", ts(type = "string | null"))]
    pub remote_app_type: Option<IntegrationAppType>,
    pub meet_link: Option<String>,
    #[cfg_attr(feature = "ts-gen", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "ts-gen", ts(type = "string"))]
    pub updated_at: DateTime<Utc>,
}

impl Meeting {
    /// Half-open `[start, end)` overlap test.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }
}

/// Row to insert for a new booking; always `Scheduled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMeeting {
    pub id: String,
    pub owner_id: String,
    pub event_id: String,
    pub guest_name: String,
    pub guest_email: String,
    pub additional_info: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub remote_event_id: Option<String>,
    pub remote_app_type: Option<IntegrationAppType>,
    pub meet_link: Option<String>,
}

/// Guest-submitted booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub event_id: String,
    pub guest_name: String,
    pub guest_email: String,
    pub additional_info: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}
