//! Test harness: a full `AppContext` on a temporary SQLite file, a mock
//! clock and a wiremock server standing in for Google.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use slotwise_core::MockClock;
use slotwise_domain::{
    BookableEvent, BookingConfig, BookingRequest, Config, DatabaseConfig, EventLocationType,
    GoogleConfig, IntegrationAppType, IntegrationCredential, TokenGrant,
};
use slotwise_lib::AppContext;
use tempfile::TempDir;
use wiremock::MockServer;

pub const OWNER: &str = "owner-1";
pub const EVENT: &str = "event-1";

/// Shared context for command tests.
pub struct TestApp {
    pub ctx: Arc<AppContext>,
    pub clock: MockClock,
    pub google: MockServer,
    /// Keep temporary directory alive for the lifetime of the app.
    _temp_dir: TempDir,
}

impl TestApp {
    /// Context at Monday 2025-01-06 08:00 UTC with no data stored.
    pub async fn start() -> Self {
        let google = MockServer::start().await;
        let temp_dir = TempDir::new().expect("failed to create temporary database directory");
        let db_path = temp_dir.path().join("slotwise.db");

        let config = Config {
            database: DatabaseConfig { path: db_path.to_string_lossy().into_owned(), pool_size: 4 },
            google: GoogleConfig {
                client_id: "client-id".into(),
                client_secret: "client-secret".into(),
                redirect_uri: "http://localhost:3000/api/integrations/callback".into(),
                auth_url: "https://accounts.example.com/o/oauth2/v2/auth".into(),
                token_url: format!("{}/token", google.uri()),
                calendar_api_base: format!("{}/calendar/v3", google.uri()),
            },
            booking: BookingConfig::default(),
            log_level: "debug".into(),
        };

        let clock = MockClock::at(monday(8, 0));
        let ctx = AppContext::with_clock(config, Arc::new(clock.clone()))
            .expect("failed to build application context");

        Self { ctx: Arc::new(ctx), clock, google, _temp_dir: temp_dir }
    }

    /// Context with default availability, a public Meet event and a fresh
    /// Google credential for the owner.
    pub async fn with_bookable_event() -> Self {
        let app = Self::start().await;
        slotwise_lib::provision_default_availability(&app.ctx, OWNER)
            .await
            .expect("failed to provision availability");
        app.ctx.events.save_event(&event()).await.expect("failed to store event");
        app.store_credential(Some(monday(9, 0)), Some("refresh-token")).await;
        app
    }

    pub async fn store_credential(&self, expires_at: Option<DateTime<Utc>>, refresh_token: Option<&str>) {
        let credential = IntegrationCredential::connected(
            OWNER,
            IntegrationAppType::GoogleMeetAndCalendar,
            TokenGrant {
                access_token: "access-token".into(),
                refresh_token: refresh_token.map(str::to_string),
                expires_at,
            },
        );
        self.ctx.credentials.save_credential(&credential).await.expect("failed to store credential");
    }
}

pub fn event() -> BookableEvent {
    BookableEvent {
        id: EVENT.into(),
        owner_id: OWNER.into(),
        owner_email: "host@example.com".into(),
        title: "Intro call".into(),
        description: None,
        duration_minutes: 60,
        location_type: EventLocationType::GoogleMeetAndCalendar,
        is_private: false,
    }
}

pub fn monday(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, hour, minute, 0).unwrap()
}

pub fn request(start: DateTime<Utc>) -> BookingRequest {
    BookingRequest {
        event_id: EVENT.into(),
        guest_name: "Ada Lovelace".into(),
        guest_email: "ada@example.com".into(),
        additional_info: Some("Analytical engine questions".into()),
        start_time: start,
        end_time: start + Duration::hours(1),
    }
}
