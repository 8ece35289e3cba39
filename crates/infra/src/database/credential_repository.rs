//! Integration credential storage, one row per `(owner_id, app_type)`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use slotwise_core::CredentialRepository;
use slotwise_domain::{IntegrationAppType, IntegrationCredential, Result as DomainResult};
use tokio::task;
use tracing::{debug, instrument};

use super::manager::{map_sql_error, DbManager};
use super::rows::{map_join_error, parse_text, timestamp};

const CREDENTIAL_COLUMNS: &str =
    "owner_id, app_type, provider, category, access_token, refresh_token, expiry_ts, is_connected";

/// SQLite-backed implementation of `CredentialRepository`
pub struct SqliteCredentialRepository {
    db: Arc<DbManager>,
}

impl SqliteCredentialRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialRepository for SqliteCredentialRepository {
    #[instrument(skip(self))]
    async fn get_credential(
        &self,
        owner_id: &str,
        app_type: IntegrationAppType,
    ) -> DomainResult<Option<IntegrationCredential>> {
        let db = Arc::clone(&self.db);
        let owner_id = owner_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<IntegrationCredential>> {
            let conn = db.get_connection()?;
            conn.query_row(
                &format!(
                    "SELECT {CREDENTIAL_COLUMNS} FROM integrations
                     WHERE owner_id = ?1 AND app_type = ?2"
                ),
                params![owner_id, app_type.as_str()],
                map_credential_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, credential), fields(owner_id = %credential.owner_id, app_type = %credential.app_type))]
    async fn save_credential(&self, credential: &IntegrationCredential) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let credential = credential.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let now = Utc::now().timestamp();
            conn.execute(
                "INSERT INTO integrations (owner_id, app_type, provider, category, access_token,
                                           refresh_token, expiry_ts, is_connected, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
                 ON CONFLICT(owner_id, app_type) DO UPDATE SET
                    provider = excluded.provider,
                    category = excluded.category,
                    access_token = excluded.access_token,
                    refresh_token = excluded.refresh_token,
                    expiry_ts = excluded.expiry_ts,
                    is_connected = excluded.is_connected,
                    updated_at = excluded.updated_at",
                params![
                    credential.owner_id,
                    credential.app_type.as_str(),
                    credential.provider.as_str(),
                    credential.category.as_str(),
                    credential.access_token,
                    credential.refresh_token,
                    credential.expiry.map(|expiry| expiry.timestamp()),
                    credential.is_connected,
                    now,
                ],
            )
            .map_err(map_sql_error)?;
            debug!(owner_id = %credential.owner_id, app_type = %credential.app_type, "credential saved");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn list_credentials(&self, owner_id: &str) -> DomainResult<Vec<IntegrationCredential>> {
        let db = Arc::clone(&self.db);
        let owner_id = owner_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<IntegrationCredential>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {CREDENTIAL_COLUMNS} FROM integrations
                     WHERE owner_id = ?1 ORDER BY app_type ASC"
                ))
                .map_err(map_sql_error)?;
            let credentials = stmt
                .query_map(params![owner_id], map_credential_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(credentials)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_credential_row(row: &Row) -> rusqlite::Result<IntegrationCredential> {
    let app_type: String = row.get(1)?;
    let provider: String = row.get(2)?;
    let category: String = row.get(3)?;
    let expiry: Option<i64> = row.get(6)?;
    Ok(IntegrationCredential {
        owner_id: row.get(0)?,
        app_type: parse_text(1, &app_type)?,
        provider: parse_text(2, &provider)?,
        category: parse_text(3, &category)?,
        access_token: row.get(4)?,
        refresh_token: row.get(5)?,
        expiry: expiry.map(|secs| timestamp(6, secs)).transpose()?,
        is_connected: row.get(7)?,
    })
}
