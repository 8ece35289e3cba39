//! Mock calendar provider, token refresher and reconciliation sink.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotwise_core::{CalendarProvider, ReconciliationSink, TokenRefresher};
use slotwise_domain::{
    IntegrationAppType, IntegrationError, ReconciliationEvent, RemoteEvent, RemoteEventSpec,
    Result as DomainResult, SlotwiseError, TokenGrant,
};

/// Records every call; failures and latency are configurable.
#[derive(Default, Clone)]
pub struct MockCalendarProvider {
    created: Arc<Mutex<Vec<(String, RemoteEventSpec)>>>,
    deleted: Arc<Mutex<Vec<(String, String)>>>,
    fail_create: Arc<Mutex<bool>>,
    fail_delete: Arc<Mutex<bool>>,
    create_delay: Arc<Mutex<Option<Duration>>>,
    delete_delay: Arc<Mutex<Option<Duration>>>,
}

impl MockCalendarProvider {
    pub fn failing_creates(self) -> Self {
        *self.fail_create.lock().unwrap() = true;
        self
    }

    pub fn failing_deletes(self) -> Self {
        *self.fail_delete.lock().unwrap() = true;
        self
    }

    pub fn slow_creates(self, delay: Duration) -> Self {
        *self.create_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn slow_deletes(self, delay: Duration) -> Self {
        *self.delete_delay.lock().unwrap() = Some(delay);
        self
    }

    /// `(access_token, spec)` pairs passed to `create_event`.
    pub fn created(&self) -> Vec<(String, RemoteEventSpec)> {
        self.created.lock().unwrap().clone()
    }

    /// `(access_token, remote_event_id)` pairs passed to `delete_event`.
    pub fn deleted(&self) -> Vec<(String, String)> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarProvider for MockCalendarProvider {
    fn app_type(&self) -> IntegrationAppType {
        IntegrationAppType::GoogleMeetAndCalendar
    }

    async fn create_event(&self, access_token: &str, spec: &RemoteEventSpec) -> DomainResult<RemoteEvent> {
        let delay = *self.create_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail_create.lock().unwrap() {
            return Err(SlotwiseError::Network("HTTP 503 Service Unavailable".into()));
        }

        let mut created = self.created.lock().unwrap();
        created.push((access_token.to_string(), spec.clone()));
        let id = format!("remote-{}", created.len());
        Ok(RemoteEvent { meet_link: Some(format!("https://meet.example.com/{id}")), id })
    }

    async fn delete_event(&self, access_token: &str, remote_event_id: &str) -> DomainResult<()> {
        let delay = *self.delete_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail_delete.lock().unwrap() {
            return Err(IntegrationError::Provider("HTTP 500 Internal Server Error".into()).into());
        }
        self.deleted
            .lock()
            .unwrap()
            .push((access_token.to_string(), remote_event_id.to_string()));
        Ok(())
    }
}

/// Token refresher returning a fixed outcome and counting calls.
#[derive(Clone)]
pub struct MockTokenRefresher {
    outcome: Arc<Mutex<DomainResult<TokenGrant>>>,
    calls: Arc<AtomicUsize>,
}

impl MockTokenRefresher {
    pub fn granting(grant: TokenGrant) -> Self {
        Self { outcome: Arc::new(Mutex::new(Ok(grant))), calls: Arc::default() }
    }

    pub fn rejecting() -> Self {
        Self {
            outcome: Arc::new(Mutex::new(Err(SlotwiseError::Network(
                "token endpoint answered 400 invalid_grant".into(),
            )))),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenRefresher for MockTokenRefresher {
    async fn refresh(&self, _app_type: IntegrationAppType, _refresh_token: &str) -> DomainResult<TokenGrant> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.lock().unwrap().clone()
    }
}

/// Token refresher that rotates the refresh token on every call.
///
/// Call `n` (1-based) sleeps for `delays[n - 1]`, then grants
/// `access-n` / `rotated-n`.
#[derive(Clone)]
pub struct RotatingTokenRefresher {
    delays: Arc<Vec<Duration>>,
    expires_at: DateTime<Utc>,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl RotatingTokenRefresher {
    pub fn new(delays: Vec<Duration>, expires_at: DateTime<Utc>) -> Self {
        Self { delays: Arc::new(delays), expires_at, calls: Arc::default(), seen: Arc::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Refresh tokens presented to the provider, in call order.
    pub fn presented(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenRefresher for RotatingTokenRefresher {
    async fn refresh(&self, _app_type: IntegrationAppType, refresh_token: &str) -> DomainResult<TokenGrant> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.seen.lock().unwrap().push(refresh_token.to_string());
        if let Some(delay) = self.delays.get(n - 1) {
            tokio::time::sleep(*delay).await;
        }
        Ok(TokenGrant {
            access_token: format!("access-{n}"),
            refresh_token: Some(format!("rotated-{n}")),
            expires_at: Some(self.expires_at),
        })
    }
}

#[derive(Default, Clone)]
pub struct RecordingReconciliationSink {
    events: Arc<Mutex<Vec<ReconciliationEvent>>>,
}

impl RecordingReconciliationSink {
    pub fn events(&self) -> Vec<ReconciliationEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReconciliationSink for RecordingReconciliationSink {
    async fn record(&self, event: ReconciliationEvent) -> DomainResult<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
