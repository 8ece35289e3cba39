//! Third-party integrations and their stored OAuth credentials.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrationProvider {
    Google,
    Zoom,
    Microsoft,
}

impl_domain_status_conversions!(IntegrationProvider {
    Google => "GOOGLE",
    Zoom => "ZOOM",
    Microsoft => "MICROSOFT",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrationCategory {
    CalendarAndVideoConferencing,
    VideoConferencing,
    Calendar,
}

impl_domain_status_conversions!(IntegrationCategory {
    CalendarAndVideoConferencing => "CALENDAR_AND_VIDEO_CONFERENCING",
    VideoConferencing => "VIDEO_CONFERENCING",
    Calendar => "CALENDAR",
});

/// A connectable application. One credential per owner per app type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrationAppType {
    GoogleMeetAndCalendar,
    ZoomMeeting,
    OutlookCalendar,
}

impl_domain_status_conversions!(IntegrationAppType {
    GoogleMeetAndCalendar => "GOOGLE_MEET_AND_CALENDAR",
    ZoomMeeting => "ZOOM_MEETING",
    OutlookCalendar => "OUTLOOK_CALENDAR",
});

impl IntegrationAppType {
    pub const ALL: [Self; 3] = [Self::GoogleMeetAndCalendar, Self::ZoomMeeting, Self::OutlookCalendar];

    pub const fn provider(self) -> IntegrationProvider {
        match self {
            Self::GoogleMeetAndCalendar => IntegrationProvider::Google,
            Self::ZoomMeeting => IntegrationProvider::Zoom,
            Self::OutlookCalendar => IntegrationProvider::Microsoft,
        }
    }

    pub const fn category(self) -> IntegrationCategory {
        match self {
            Self::GoogleMeetAndCalendar => IntegrationCategory::CalendarAndVideoConferencing,
            Self::ZoomMeeting => IntegrationCategory::VideoConferencing,
            Self::OutlookCalendar => IntegrationCategory::Calendar,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::GoogleMeetAndCalendar => "Google Meet & Calendar",
            Self::ZoomMeeting => "Zoom",
            Self::OutlookCalendar => "Outlook Calendar",
        }
    }
}

/// Stored OAuth credential for one `(owner_id, app_type)` pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationCredential {
    pub owner_id: String,
    pub app_type: IntegrationAppType,
    pub provider: IntegrationProvider,
    pub category: IntegrationCategory,
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// `None` when the provider never reported an expiry.
    pub expiry: Option<DateTime<Utc>>,
    pub is_connected: bool,
}

impl IntegrationCredential {
    /// Build a connected credential from a freshly granted token.
    pub fn connected(owner_id: impl Into<String>, app_type: IntegrationAppType, grant: TokenGrant) -> Self {
        Self {
            owner_id: owner_id.into(),
            app_type,
            provider: app_type.provider(),
            category: app_type.category(),
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            expiry: grant.expires_at,
            is_connected: true,
        }
    }

    /// True when the token is expired or expires within `threshold`.
    /// An unknown expiry counts as expiring.
    pub fn expires_within(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        self.expiry.map_or(true, |expiry| expiry <= now + threshold)
    }
}

impl std::fmt::Debug for IntegrationCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationCredential")
            .field("owner_id", &self.owner_id)
            .field("app_type", &self.app_type)
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expiry", &self.expiry)
            .field("is_connected", &self.is_connected)
            .finish_non_exhaustive()
    }
}

/// Token material returned by a provider token endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Present only when the provider rotated the refresh token.
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Catalogue entry shown to an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationStatus {
    pub app_type: IntegrationAppType,
    pub provider: IntegrationProvider,
    pub category: IntegrationCategory,
    pub title: String,
    pub is_connected: bool,
}

/// Round-tripped through the provider's consent screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthState {
    pub user_id: String,
    pub app_type: IntegrationAppType,
}
