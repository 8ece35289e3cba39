//! Google Calendar provider implementation

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use slotwise_core::CalendarProvider;
use slotwise_domain::constants::{GOOGLE_MEET_SOLUTION, GOOGLE_PRIMARY_CALENDAR};
use slotwise_domain::{
    IntegrationAppType, IntegrationError, RemoteEvent, RemoteEventSpec, Result, SlotwiseError,
};
use tracing::{debug, instrument};
use url::Url;

use crate::errors::conversions::status_error;
use crate::http::HttpClient;

/// Creates and deletes events on the owner's primary Google calendar,
/// attaching a Meet conference to each created event.
pub struct GoogleCalendarProvider {
    http: HttpClient,
    api_base: String,
}

impl GoogleCalendarProvider {
    pub fn new(http: HttpClient, api_base: impl Into<String>) -> Self {
        Self { http, api_base: api_base.into() }
    }

    /// `{api_base}/calendars/primary/events[/{event_id}]`
    fn events_url(&self, event_id: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.api_base).map_err(|e| {
            SlotwiseError::Config(format!("invalid calendar API base '{}': {e}", self.api_base))
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                SlotwiseError::Config(format!("calendar API base cannot be a base: {}", self.api_base))
            })?;
            segments.pop_if_empty().extend(["calendars", GOOGLE_PRIMARY_CALENDAR, "events"]);
            if let Some(event_id) = event_id {
                segments.push(event_id);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarProvider {
    fn app_type(&self) -> IntegrationAppType {
        IntegrationAppType::GoogleMeetAndCalendar
    }

    #[instrument(skip(self, access_token, spec), fields(request_id = %spec.conference_request_id))]
    async fn create_event(&self, access_token: &str, spec: &RemoteEventSpec) -> Result<RemoteEvent> {
        let url = self.events_url(None)?;
        let body = GoogleEventRequest::from_spec(spec);

        let request = self
            .http
            .request(Method::POST, url)
            .bearer_auth(access_token)
            .query(&[("conferenceDataVersion", "1"), ("sendUpdates", "all")])
            .json(&body);
        let response = self.http.send_checked(request).await?;

        let created: GoogleEventResponse = response.json().await.map_err(|e| {
            IntegrationError::Provider(format!("failed to parse Google event response: {e}"))
        })?;

        let meet_link = created.meet_link();
        debug!(remote_event_id = %created.id, has_meet_link = meet_link.is_some(), "google event created");
        Ok(RemoteEvent { id: created.id, meet_link })
    }

    #[instrument(skip(self, access_token))]
    async fn delete_event(&self, access_token: &str, remote_event_id: &str) -> Result<()> {
        let url = self.events_url(Some(remote_event_id))?;

        let request = self
            .http
            .request(Method::DELETE, url)
            .bearer_auth(access_token)
            .query(&[("sendUpdates", "all")]);
        let response = self.http.send(request).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            debug!(%status, "google event already gone");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, Some(&body)))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEventRequest {
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    start: EventDateTime,
    end: EventDateTime,
    attendees: Vec<Attendee>,
    conference_data: ConferenceData,
}

impl GoogleEventRequest {
    fn from_spec(spec: &RemoteEventSpec) -> Self {
        Self {
            summary: spec.summary.clone(),
            description: spec.description.clone(),
            start: EventDateTime { date_time: spec.start.to_rfc3339() },
            end: EventDateTime { date_time: spec.end.to_rfc3339() },
            attendees: spec.attendees.iter().map(|email| Attendee { email: email.clone() }).collect(),
            conference_data: ConferenceData {
                create_request: CreateConferenceRequest {
                    request_id: spec.conference_request_id.clone(),
                    conference_solution_key: ConferenceSolutionKey {
                        kind: GOOGLE_MEET_SOLUTION.to_string(),
                    },
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct EventDateTime {
    #[serde(rename = "dateTime")]
    date_time: String,
}

#[derive(Debug, Serialize)]
struct Attendee {
    email: String,
}

#[derive(Debug, Serialize)]
struct ConferenceData {
    #[serde(rename = "createRequest")]
    create_request: CreateConferenceRequest,
}

#[derive(Debug, Serialize)]
struct CreateConferenceRequest {
    #[serde(rename = "requestId")]
    request_id: String,
    #[serde(rename = "conferenceSolutionKey")]
    conference_solution_key: ConferenceSolutionKey,
}

#[derive(Debug, Serialize)]
struct ConferenceSolutionKey {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct GoogleEventResponse {
    id: String,
    #[serde(rename = "hangoutLink")]
    hangout_link: Option<String>,
    #[serde(rename = "conferenceData")]
    conference_data: Option<ConferenceDataResponse>,
}

impl GoogleEventResponse {
    /// `hangoutLink`, else the first video entry point of the conference.
    fn meet_link(&self) -> Option<String> {
        self.hangout_link.clone().or_else(|| {
            self.conference_data.as_ref().and_then(|data| {
                data.entry_points
                    .iter()
                    .find(|entry| entry.entry_point_type == "video")
                    .map(|entry| entry.uri.clone())
            })
        })
    }
}

#[derive(Debug, Deserialize)]
struct ConferenceDataResponse {
    #[serde(rename = "entryPoints", default)]
    entry_points: Vec<EntryPoint>,
}

#[derive(Debug, Deserialize)]
struct EntryPoint {
    #[serde(rename = "entryPointType")]
    entry_point_type: String,
    uri: String,
}
