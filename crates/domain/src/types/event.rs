//! Bookable event types published by a host.

use serde::{Deserialize, Serialize};

use super::integration::IntegrationAppType;
use crate::impl_domain_status_conversions;

/// Where a booked meeting takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventLocationType {
    GoogleMeetAndCalendar,
    ZoomMeeting,
}

impl_domain_status_conversions!(EventLocationType {
    GoogleMeetAndCalendar => "GOOGLE_MEET_AND_CALENDAR",
    ZoomMeeting => "ZOOM_MEETING",
});

impl EventLocationType {
    /// Integration the owner must have connected to host this location.
    pub const fn required_app_type(self) -> IntegrationAppType {
        match self {
            Self::GoogleMeetAndCalendar => IntegrationAppType::GoogleMeetAndCalendar,
            Self::ZoomMeeting => IntegrationAppType::ZoomMeeting,
        }
    }

    /// Whether booking creates an event on the owner's remote calendar.
    pub const fn creates_remote_event(self) -> bool {
        matches!(self, Self::GoogleMeetAndCalendar)
    }
}

/// An event type a guest can book. Read-only to the booking flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookableEvent {
    pub id: String,
    pub owner_id: String,
    pub owner_email: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i64,
    pub location_type: EventLocationType,
    pub is_private: bool,
}
