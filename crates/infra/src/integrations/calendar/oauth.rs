//! OAuth2 plumbing for the Google Meet & Calendar integration.
//!
//! Builds the consent URL, exchanges the authorization code returned to the
//! redirect URI, and refreshes access tokens. The `state` parameter carries
//! the connecting user and app type as URL-safe base64 JSON.

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Duration;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use slotwise_core::{Clock, TokenRefresher};
use slotwise_domain::constants::GOOGLE_CALENDAR_SCOPE;
use slotwise_domain::{
    GoogleConfig, IntegrationAppType, IntegrationError, IntegrationProvider, OAuthState, Result,
    SlotwiseError, TokenGrant,
};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::errors::conversions::status_error;
use crate::http::HttpClient;

/// Client registration and endpoints for Google OAuth.
#[derive(Clone)]
pub struct GoogleOAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub scopes: Vec<String>,
    pub extra_authorize_params: Vec<(String, String)>,
}

impl GoogleOAuthSettings {
    /// Offline access with forced consent so Google always returns a
    /// refresh token.
    pub fn from_config(config: &GoogleConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            authorization_endpoint: config.auth_url.clone(),
            token_endpoint: config.token_url.clone(),
            scopes: vec![GOOGLE_CALENDAR_SCOPE.to_string()],
            extra_authorize_params: vec![
                ("access_type".to_string(), "offline".to_string()),
                ("prompt".to_string(), "consent".to_string()),
            ],
        }
    }
}

impl std::fmt::Debug for GoogleOAuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleOAuthSettings")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("authorization_endpoint", &self.authorization_endpoint)
            .field("token_endpoint", &self.token_endpoint)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

/// Google token endpoint client.
pub struct GoogleOAuthClient {
    http: HttpClient,
    settings: GoogleOAuthSettings,
    clock: Arc<dyn Clock>,
}

impl GoogleOAuthClient {
    pub fn new(http: HttpClient, settings: GoogleOAuthSettings, clock: Arc<dyn Clock>) -> Self {
        Self { http, settings, clock }
    }

    /// Consent screen URL for `state`.
    pub fn authorization_url(&self, state: &OAuthState) -> Result<String> {
        ensure_google(state.app_type)?;

        let mut url = Url::parse(&self.settings.authorization_endpoint).map_err(|e| {
            SlotwiseError::Config(format!(
                "invalid authorization endpoint '{}': {e}",
                self.settings.authorization_endpoint
            ))
        })?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.settings.client_id)
                .append_pair("redirect_uri", &self.settings.redirect_uri)
                .append_pair("response_type", "code")
                .append_pair("scope", &self.settings.scopes.join(" "))
                .append_pair("state", &encode_state(state)?);
            for (key, value) in &self.settings.extra_authorize_params {
                query.append_pair(key, value);
            }
        }

        Ok(url.into())
    }

    /// Trade the authorization code from the redirect for tokens.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> Result<TokenGrant> {
        if code.trim().is_empty() {
            return Err(SlotwiseError::Validation("authorization code is required".into()));
        }

        let form = [
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let grant = self.post_token_form(&form).await?;
        if grant.refresh_token.is_none() {
            warn!("authorization code exchange returned no refresh token");
        }
        Ok(grant)
    }

    async fn post_token_form(&self, form: &[(&str, &str)]) -> Result<TokenGrant> {
        let request = self.http.request(Method::POST, &self.settings.token_endpoint).form(form);
        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(token_endpoint_error(status, &body));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            IntegrationError::Provider(format!("failed to parse token response: {e}"))
        })?;
        debug!(expires_in = ?token.expires_in, rotated = token.refresh_token.is_some(), "token endpoint answered");

        let now = self.clock.now();
        Ok(TokenGrant {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: token.expires_in.map(|secs| now + Duration::seconds(secs)),
        })
    }
}

#[async_trait]
impl TokenRefresher for GoogleOAuthClient {
    #[instrument(skip(self, refresh_token))]
    async fn refresh(&self, app_type: IntegrationAppType, refresh_token: &str) -> Result<TokenGrant> {
        ensure_google(app_type)?;

        let form = [
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        self.post_token_form(&form).await
    }
}

/// Serialize `state` for the `state` query parameter.
pub fn encode_state(state: &OAuthState) -> Result<String> {
    let json = serde_json::to_vec(state)
        .map_err(|e| SlotwiseError::Internal(format!("failed to encode OAuth state: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Parse the `state` query parameter echoed back by the provider.
pub fn decode_state(raw: &str) -> Result<OAuthState> {
    let bytes = URL_SAFE_NO_PAD
        .decode(raw.trim())
        .map_err(|e| SlotwiseError::Validation(format!("malformed OAuth state: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| SlotwiseError::Validation(format!("malformed OAuth state: {e}")))
}

fn ensure_google(app_type: IntegrationAppType) -> Result<()> {
    if app_type.provider() == IntegrationProvider::Google {
        Ok(())
    } else {
        Err(IntegrationError::Unsupported(format!("{app_type} is not a Google integration")).into())
    }
}

/// `invalid_grant` and friends come back as 400/401; those mean the stored
/// refresh token is dead.
fn token_endpoint_error(status: StatusCode, body: &str) -> SlotwiseError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
            let reason = serde_json::from_str::<TokenErrorResponse>(body)
                .map(|e| match e.error_description {
                    Some(description) => format!("{}: {description}", e.error),
                    None => e.error,
                })
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            IntegrationError::TokenRejected(reason).into()
        }
        _ => status_error(status, Some(body)),
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}
