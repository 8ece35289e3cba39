//! Remote calendar payloads and reconciliation records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::integration::IntegrationAppType;
use crate::impl_domain_status_conversions;

/// Event to create on the owner's remote calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEventSpec {
    pub summary: String,
    pub description: Option<String>,
    pub attendees: Vec<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Idempotency key for the video conference attached to the event.
    pub conference_request_id: String,
}

/// Identifiers returned by the provider for a created event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub id: String,
    pub meet_link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconciliationKind {
    /// Remote event exists but no local meeting references it.
    OrphanedRemoteEvent,
    /// Local meeting is cancelled but the remote event could not be removed.
    RemoteDeleteFailed,
}

impl_domain_status_conversions!(ReconciliationKind {
    OrphanedRemoteEvent => "ORPHANED_REMOTE_EVENT",
    RemoteDeleteFailed => "REMOTE_DELETE_FAILED",
});

/// Divergence between local storage and a remote calendar that needs a
/// follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationEvent {
    pub kind: ReconciliationKind,
    pub owner_id: String,
    pub app_type: IntegrationAppType,
    pub remote_event_id: String,
    pub meeting_id: Option<String>,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}
