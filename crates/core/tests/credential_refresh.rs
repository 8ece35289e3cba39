mod support;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use slotwise_core::{CredentialRefresher, TokenCheck, TokenState};
use slotwise_domain::{IntegrationAppType, IntegrationError, SlotwiseError};
use support::{
    credential, grant, monday_morning, Harness, MockTokenRefresher, RotatingTokenRefresher, OWNER,
};

#[tokio::test]
async fn no_refresh_token_returns_stored_token_without_network() {
    let harness = Harness::new();
    let refresher = harness.credential_refresher();
    let expired = credential(Some(monday_morning() - Duration::hours(3)), None);

    let token = refresher.access_token_for(&expired).await.unwrap();

    assert_eq!(token, "stored-access");
    assert_eq!(harness.refresher.calls(), 0);
}

#[tokio::test]
async fn fresh_token_is_used_as_is() {
    let harness = Harness::new();
    let refresher = harness.credential_refresher();
    let fresh = credential(Some(monday_morning() + Duration::hours(1)), Some("refresh"));

    assert_eq!(refresher.token_state(&fresh), TokenState::Fresh);
    assert!(matches!(refresher.ensure_fresh_token(&fresh).await.unwrap(), TokenCheck::Unchanged(t) if t == "stored-access"));
    assert_eq!(harness.refresher.calls(), 0);
}

#[tokio::test]
async fn token_inside_threshold_is_refreshed_and_persisted() {
    let harness = Harness::new();
    let refresher = harness.credential_refresher();
    let expiring = credential(Some(monday_morning() + Duration::minutes(4)), Some("refresh"));
    assert_eq!(refresher.token_state(&expiring), TokenState::RefreshNeeded);

    let token = refresher.access_token_for(&expiring).await.unwrap();

    assert_eq!(token, "refreshed-access");
    assert_eq!(harness.refresher.calls(), 1);
    let stored = harness.credentials.stored(OWNER, IntegrationAppType::GoogleMeetAndCalendar).unwrap();
    assert_eq!(stored.access_token, "refreshed-access");
    assert_eq!(stored.refresh_token.as_deref(), Some("refresh"));
    assert_eq!(stored.expiry, Some(monday_morning() + Duration::hours(2)));
}

#[tokio::test]
async fn unknown_expiry_triggers_refresh() {
    let harness = Harness::new();
    let refresher = harness.credential_refresher();

    let check = refresher.ensure_fresh_token(&credential(None, Some("refresh"))).await.unwrap();
    let TokenCheck::Refreshed(refreshed) = check else {
        panic!("expected a refreshed credential");
    };
    assert_eq!(refreshed.expiry(), Some(monday_morning() + Duration::hours(2)));

    let token = refreshed.persist(&harness.credentials).await.unwrap();
    assert_eq!(token, "refreshed-access");
    assert_eq!(harness.credentials.save_count(), 1);
}

#[tokio::test]
async fn rotated_refresh_token_replaces_the_stored_one() {
    let mut harness = Harness::new();
    let mut rotated = grant("rotated-access", monday_morning() + Duration::hours(1));
    rotated.refresh_token = Some("rotated-refresh".into());
    harness.refresher = MockTokenRefresher::granting(rotated);

    let refresher = harness.credential_refresher();
    refresher.access_token_for(&credential(None, Some("refresh"))).await.unwrap();

    let stored = harness.credentials.stored(OWNER, IntegrationAppType::GoogleMeetAndCalendar).unwrap();
    assert_eq!(stored.refresh_token.as_deref(), Some("rotated-refresh"));
}

#[tokio::test]
async fn persistence_failure_still_serves_current_request() {
    let mut harness = Harness::new();
    harness.credentials = harness.credentials.failing_saves();
    let refresher = harness.credential_refresher();

    let token = refresher.access_token_for(&credential(None, Some("refresh"))).await.unwrap();

    assert_eq!(token, "refreshed-access");
    assert_eq!(harness.credentials.save_count(), 1);
    let stored = harness.credentials.stored(OWNER, IntegrationAppType::GoogleMeetAndCalendar).unwrap();
    assert_eq!(stored.access_token, "stored-access");
}

#[tokio::test]
async fn rejected_refresh_is_token_rejected_and_not_retried() {
    let harness = Harness::new();
    let rejecting = MockTokenRefresher::rejecting();
    let refresher = CredentialRefresher::new(
        Arc::new(rejecting.clone()),
        Arc::new(harness.credentials.clone()),
        Arc::new(harness.clock.clone()),
        Duration::seconds(300),
    );

    let err = refresher.access_token_for(&credential(None, Some("refresh"))).await.unwrap_err();

    assert!(matches!(err, SlotwiseError::Integration(IntegrationError::TokenRejected(_))));
    assert_eq!(rejecting.calls(), 1);
    assert_eq!(harness.credentials.save_count(), 0);
}

/// Refreshes for one owner are not coordinated. Two requests holding the same
/// expired credential both refresh; with a rotating provider the slower
/// request writes last and its older rotation overwrites the newer one.
#[tokio::test]
async fn concurrent_refreshes_are_uncoordinated_and_last_write_wins() {
    let harness = Harness::new();
    let rotating = RotatingTokenRefresher::new(
        vec![StdDuration::from_millis(50), StdDuration::ZERO],
        monday_morning() + Duration::hours(1),
    );
    let refresher = CredentialRefresher::new(
        Arc::new(rotating.clone()),
        Arc::new(harness.credentials.clone()),
        Arc::new(harness.clock.clone()),
        Duration::seconds(300),
    );
    let expired = credential(Some(monday_morning() - Duration::minutes(1)), Some("refresh"));

    let (first, second) =
        tokio::join!(refresher.access_token_for(&expired), refresher.access_token_for(&expired));

    assert_eq!(first.unwrap(), "access-1");
    assert_eq!(second.unwrap(), "access-2");
    assert_eq!(rotating.calls(), 2);
    assert_eq!(rotating.presented(), vec!["refresh", "refresh"]);
    assert_eq!(harness.credentials.save_count(), 2);

    // The newest rotation issued by the provider is lost.
    let stored = harness.credentials.stored(OWNER, IntegrationAppType::GoogleMeetAndCalendar).unwrap();
    assert_eq!(stored.access_token, "access-1");
    assert_eq!(stored.refresh_token.as_deref(), Some("rotated-1"));
}
