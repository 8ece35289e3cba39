//! Silent access-token refresh for stored integration credentials.
//!
//! A credential is either *fresh* (expiry known and beyond the refresh
//! threshold) or needs a refresh. Refreshed tokens are handed back as a
//! [`RefreshedCredential`], whose access token is only reachable by
//! persisting it or by explicitly opting out of persistence.

use std::sync::Arc;

use chrono::Duration;
use slotwise_domain::{
    IntegrationCredential, IntegrationError, Result, SlotwiseError, TokenGrant,
};
use tracing::{debug, info, instrument, warn};

use super::ports::{CredentialRepository, TokenRefresher};
use crate::clock::Clock;

/// Freshness of a stored credential at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Fresh,
    RefreshNeeded,
}

/// Outcome of [`CredentialRefresher::ensure_fresh_token`].
#[must_use = "a refreshed credential must be persisted before the token is reused"]
#[derive(Debug)]
pub enum TokenCheck {
    /// Stored access token can be used as is.
    Unchanged(String),
    /// Provider issued new token material.
    Refreshed(RefreshedCredential),
}

/// New token material that has not been written back yet.
#[must_use = "call `persist` or `into_unpersisted_access_token`"]
#[derive(Debug)]
pub struct RefreshedCredential {
    credential: IntegrationCredential,
}

impl RefreshedCredential {
    fn new(previous: &IntegrationCredential, grant: TokenGrant) -> Self {
        let credential = IntegrationCredential {
            access_token: grant.access_token,
            // Keep the stored refresh token unless the provider rotated it.
            refresh_token: grant.refresh_token.or_else(|| previous.refresh_token.clone()),
            expiry: grant.expires_at,
            ..previous.clone()
        };
        Self { credential }
    }

    pub fn expiry(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.credential.expiry
    }

    /// Write the new token material, then release the access token.
    ///
    /// # Errors
    /// Propagates the repository error; the token is dropped in that case.
    pub async fn persist(self, repository: &dyn CredentialRepository) -> Result<String> {
        repository.save_credential(&self.credential).await?;
        Ok(self.credential.access_token)
    }

    /// Use the token for the current request only; the stored credential
    /// keeps the old material.
    pub fn into_unpersisted_access_token(self) -> String {
        self.credential.access_token
    }
}

/// Returns usable access tokens, refreshing through the provider when due.
pub struct CredentialRefresher {
    refresher: Arc<dyn TokenRefresher>,
    credentials: Arc<dyn CredentialRepository>,
    clock: Arc<dyn Clock>,
    threshold: Duration,
}

impl CredentialRefresher {
    pub fn new(
        refresher: Arc<dyn TokenRefresher>,
        credentials: Arc<dyn CredentialRepository>,
        clock: Arc<dyn Clock>,
        threshold: Duration,
    ) -> Self {
        Self { refresher, credentials, clock, threshold }
    }

    pub fn token_state(&self, credential: &IntegrationCredential) -> TokenState {
        if credential.expires_within(self.clock.now(), self.threshold) {
            TokenState::RefreshNeeded
        } else {
            TokenState::Fresh
        }
    }

    /// Check a credential and refresh it when needed.
    ///
    /// Without a refresh token the stored access token is returned unchanged
    /// and no provider call is made, even when it has expired.
    ///
    /// # Errors
    /// `IntegrationError::TokenRejected` when the provider refuses the
    /// refresh. Not retried.
    #[instrument(skip(self, credential), fields(owner_id = %credential.owner_id, app_type = %credential.app_type))]
    pub async fn ensure_fresh_token(&self, credential: &IntegrationCredential) -> Result<TokenCheck> {
        let Some(refresh_token) = credential.refresh_token.as_deref() else {
            debug!("no refresh token stored; using access token as is");
            return Ok(TokenCheck::Unchanged(credential.access_token.clone()));
        };

        if self.token_state(credential) == TokenState::Fresh {
            return Ok(TokenCheck::Unchanged(credential.access_token.clone()));
        }

        let grant = self
            .refresher
            .refresh(credential.app_type, refresh_token)
            .await
            .map_err(into_token_rejected)?;

        if grant.access_token == credential.access_token && grant.expires_at == credential.expiry {
            return Ok(TokenCheck::Unchanged(grant.access_token));
        }

        info!(expiry = ?grant.expires_at, "access token refreshed");
        Ok(TokenCheck::Refreshed(RefreshedCredential::new(credential, grant)))
    }

    /// Usable access token for `credential`, persisting any refresh.
    ///
    /// If the refreshed token cannot be stored the failure is logged and the
    /// token is still used for this request.
    pub async fn access_token_for(&self, credential: &IntegrationCredential) -> Result<String> {
        match self.ensure_fresh_token(credential).await? {
            TokenCheck::Unchanged(token) => Ok(token),
            TokenCheck::Refreshed(refreshed) => {
                match self.credentials.save_credential(&refreshed.credential).await {
                    Ok(()) => Ok(refreshed.credential.access_token),
                    Err(err) => {
                        warn!(
                            owner_id = %credential.owner_id,
                            app_type = %credential.app_type,
                            error = %err,
                            "failed to persist refreshed token; using it for this request only"
                        );
                        Ok(refreshed.into_unpersisted_access_token())
                    }
                }
            }
        }
    }
}

fn into_token_rejected(err: SlotwiseError) -> SlotwiseError {
    match err {
        SlotwiseError::Integration(inner) => SlotwiseError::Integration(inner),
        other => IntegrationError::TokenRejected(other.to_string()).into(),
    }
}
