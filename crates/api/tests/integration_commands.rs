//! Integration catalogue and the Google connect flow.

mod support;

use serde_json::json;
use slotwise_domain::{IntegrationAppType, IntegrationError, SlotwiseError};
use slotwise_lib::{complete_oauth_callback, connect_integration_url, integration_statuses};
use support::{monday, TestApp, OWNER};
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

fn state_param(consent_url: &str) -> String {
    Url::parse(consent_url)
        .unwrap()
        .query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .expect("state parameter")
}

#[tokio::test(flavor = "multi_thread")]
async fn google_connect_flow_marks_integration_connected() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=consent-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "first-access",
            "refresh_token": "first-refresh",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&app.google)
        .await;

    let before = integration_statuses(&app.ctx, OWNER).await.unwrap();
    assert_eq!(before.len(), IntegrationAppType::ALL.len());
    assert!(before.iter().all(|status| !status.is_connected));

    let consent_url =
        connect_integration_url(&app.ctx, OWNER, IntegrationAppType::GoogleMeetAndCalendar)
            .await
            .unwrap();
    let status = complete_oauth_callback(&app.ctx, "consent-code", &state_param(&consent_url))
        .await
        .unwrap();

    assert!(status.is_connected);
    assert_eq!(status.title, "Google Meet & Calendar");

    let stored = app
        .ctx
        .credentials
        .get_credential(OWNER, IntegrationAppType::GoogleMeetAndCalendar)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.access_token, "first-access");
    assert_eq!(stored.refresh_token.as_deref(), Some("first-refresh"));
    assert_eq!(stored.expiry, Some(monday(9, 0)));

    let after = integration_statuses(&app.ctx, OWNER).await.unwrap();
    let connected: Vec<_> =
        after.iter().filter(|status| status.is_connected).map(|status| status.app_type).collect();
    assert_eq!(connected, vec![IntegrationAppType::GoogleMeetAndCalendar]);
}

#[tokio::test(flavor = "multi_thread")]
async fn non_google_apps_cannot_connect() {
    let app = TestApp::start().await;

    for app_type in [IntegrationAppType::ZoomMeeting, IntegrationAppType::OutlookCalendar] {
        let err = connect_integration_url(&app.ctx, OWNER, app_type).await.unwrap_err();
        assert!(matches!(err, SlotwiseError::Integration(IntegrationError::Unsupported(_))));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn tampered_state_is_rejected_before_any_exchange() {
    let app = TestApp::start().await;

    let err = complete_oauth_callback(&app.ctx, "consent-code", "not-base64!").await.unwrap_err();

    assert!(matches!(err, SlotwiseError::Validation(_)));
    assert!(app.google.received_requests().await.unwrap().is_empty());
}
