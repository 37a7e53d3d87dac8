//! Primary credential store: a singleton row in the SQLite database.
//!
//! This is one half of the dual store; see [`crate::auth::store`] for the
//! combination with the file fallback.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use leadforge_domain::{CredentialRecord, CredentialUpdate, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::task;

use super::manager::DbManager;
use crate::errors::{map_join_error, InfraError};

/// The `crm_credentials` table, always a single row with id 1.
pub struct CredentialTable {
    db: Arc<DbManager>,
}

impl CredentialTable {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Read the stored credential record, if any row exists.
    pub async fn read(&self) -> Result<Option<CredentialRecord>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<CredentialRecord>> {
            let conn = db.get_connection()?;
            Self::read_row(&conn)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Merge the update into the stored record and persist the result.
    pub async fn write(&self, update: CredentialUpdate) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let merged = Self::read_row(&conn)?.unwrap_or_default().merged(update);
            conn.execute(
                CREDENTIALS_UPSERT_SQL,
                params![
                    merged.access_token,
                    merged.refresh_token,
                    merged.access_token_expires_at.map(|t| t.timestamp_millis()),
                    Utc::now().timestamp_millis(),
                ],
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Null out every credential field. The row itself stays.
    pub async fn clear(&self) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(CREDENTIALS_CLEAR_SQL, params![Utc::now().timestamp_millis()])
                .map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    fn read_row(conn: &Connection) -> Result<Option<CredentialRecord>> {
        let record = conn
            .query_row(CREDENTIALS_READ_SQL, [], |row| {
                let expires_at_millis: Option<i64> = row.get(2)?;
                Ok(CredentialRecord {
                    access_token: row.get(0)?,
                    refresh_token: row.get(1)?,
                    access_token_expires_at: expires_at_millis.and_then(millis_to_datetime),
                })
            })
            .optional()
            .map_err(InfraError::from)?;

        // A fully nulled row reads the same as no row at all.
        Ok(record.filter(|r| !r.is_empty()))
    }
}

const CREDENTIALS_READ_SQL: &str =
    "SELECT access_token, refresh_token, access_token_expires_at FROM crm_credentials WHERE id = 1";

const CREDENTIALS_UPSERT_SQL: &str = "INSERT INTO crm_credentials (
        id, access_token, refresh_token, access_token_expires_at, updated_at
    ) VALUES (1, ?1, ?2, ?3, ?4)
    ON CONFLICT (id) DO UPDATE SET
        access_token = excluded.access_token,
        refresh_token = excluded.refresh_token,
        access_token_expires_at = excluded.access_token_expires_at,
        updated_at = excluded.updated_at";

const CREDENTIALS_CLEAR_SQL: &str = "UPDATE crm_credentials
    SET access_token = NULL,
        refresh_token = NULL,
        access_token_expires_at = NULL,
        updated_at = ?1
    WHERE id = 1";

fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}
