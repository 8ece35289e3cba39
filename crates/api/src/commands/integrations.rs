//! Integration catalogue and the Google OAuth connect flow

use std::collections::HashSet;

use slotwise_domain::{
    IntegrationAppType, IntegrationCredential, IntegrationError, IntegrationProvider,
    IntegrationStatus, OAuthState, Result,
};
use slotwise_infra::decode_state;
use tracing::info;

use crate::utils::command_helpers::execute_command;
use crate::AppContext;

/// Every known app type with whether the owner has it connected.
pub async fn integration_statuses(ctx: &AppContext, owner_id: &str) -> Result<Vec<IntegrationStatus>> {
    execute_command("integrations::integration_statuses", || async {
        let connected: HashSet<IntegrationAppType> = ctx
            .credentials
            .list_credentials(owner_id)
            .await?
            .into_iter()
            .filter(|credential| credential.is_connected)
            .map(|credential| credential.app_type)
            .collect();

        Ok(IntegrationAppType::ALL
            .into_iter()
            .map(|app_type| IntegrationStatus {
                app_type,
                provider: app_type.provider(),
                category: app_type.category(),
                title: app_type.title().to_string(),
                is_connected: connected.contains(&app_type),
            })
            .collect())
    })
    .await
}

/// Consent URL the owner is redirected to.
///
/// # Errors
/// `Integration(Unsupported)` for app types without a connect flow.
pub async fn connect_integration_url(
    ctx: &AppContext,
    owner_id: &str,
    app_type: IntegrationAppType,
) -> Result<String> {
    execute_command("integrations::connect_integration_url", || async {
        ensure_connectable(app_type)?;
        ctx.oauth.authorization_url(&OAuthState { user_id: owner_id.to_string(), app_type })
    })
    .await
}

/// Handle the provider redirect: decode `state`, trade `code` for tokens and
/// store them as a connected credential.
pub async fn complete_oauth_callback(
    ctx: &AppContext,
    code: &str,
    state: &str,
) -> Result<IntegrationStatus> {
    execute_command("integrations::complete_oauth_callback", || async {
        let state = decode_state(state)?;
        ensure_connectable(state.app_type)?;

        let grant = ctx.oauth.exchange_code(code).await?;
        let credential = IntegrationCredential::connected(&state.user_id, state.app_type, grant);
        ctx.credentials.save_credential(&credential).await?;

        info!(owner_id = %state.user_id, app_type = %state.app_type, "integration connected");
        Ok(IntegrationStatus {
            app_type: state.app_type,
            provider: credential.provider,
            category: credential.category,
            title: state.app_type.title().to_string(),
            is_connected: true,
        })
    })
    .await
}

fn ensure_connectable(app_type: IntegrationAppType) -> Result<()> {
    match app_type.provider() {
        IntegrationProvider::Google => Ok(()),
        _ => Err(IntegrationError::Unsupported(format!("{app_type} cannot be connected yet")).into()),
    }
}
