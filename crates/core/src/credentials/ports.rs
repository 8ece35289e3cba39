//! Port interfaces for stored credentials and provider token endpoints

use async_trait::async_trait;
use slotwise_domain::{IntegrationAppType, IntegrationCredential, Result, TokenGrant};

#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn get_credential(
        &self,
        owner_id: &str,
        app_type: IntegrationAppType,
    ) -> Result<Option<IntegrationCredential>>;

    /// Insert or replace the credential for `(owner_id, app_type)`.
    async fn save_credential(&self, credential: &IntegrationCredential) -> Result<()>;

    async fn list_credentials(&self, owner_id: &str) -> Result<Vec<IntegrationCredential>>;
}

/// Exchanges a refresh token for a new access token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, app_type: IntegrationAppType, refresh_token: &str) -> Result<TokenGrant>;
}
