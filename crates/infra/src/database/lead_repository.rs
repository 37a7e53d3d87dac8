//! SQLite-backed implementation of the lead repository port.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use leadforge_core::LeadRepository;
use leadforge_domain::{Lead, LeadForgeError, LeadSource, LeadStats, Result};
use rusqlite::{params, Connection, Row};
use tokio::task;
use tracing::warn;
use uuid::Uuid;

use super::manager::DbManager;
use crate::errors::{map_join_error, InfraError};

/// Lead repository backed by the shared SQLite manager.
pub struct SqliteLeadRepository {
    db: Arc<DbManager>,
}

impl SqliteLeadRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    fn insert_lead(conn: &Connection, lead: &Lead) -> Result<()> {
        conn.execute(
            LEAD_INSERT_SQL,
            params![
                lead.id.to_string(),
                lead.name,
                lead.email,
                lead.phone,
                lead.company,
                lead.product_name,
                lead.message,
                lead.source.to_string(),
                lead.created_at.timestamp_millis(),
                lead.created_at.timestamp_millis(),
                lead.sent as i64,
                lead.external_lead_id,
                lead.external_contact_id,
            ],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    fn fetch_pending(conn: &Connection, limit: usize) -> Result<Vec<Lead>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = conn.prepare(LEAD_PENDING_SQL).map_err(InfraError::from)?;
        let rows = stmt
            .query_map(params![limit as i64], map_lead_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<Lead>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }
}

#[async_trait]
impl LeadRepository for SqliteLeadRepository {
    async fn insert(&self, lead: &Lead) -> Result<()> {
        let db = Arc::clone(&self.db);
        let to_insert = lead.clone();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            Self::insert_lead(&conn, &to_insert)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, id: Uuid) -> Result<Option<Lead>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<Lead>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(LEAD_GET_SQL).map_err(InfraError::from)?;
            let mut rows = stmt
                .query_map(params![id.to_string()], map_lead_row)
                .map_err(InfraError::from)?;
            match rows.next() {
                Some(row) => Ok(Some(row.map_err(InfraError::from)?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_pending(&self, limit: usize) -> Result<Vec<Lead>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<Lead>> {
            let conn = db.get_connection()?;
            Self::fetch_pending(&conn, limit)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn mark_sent(
        &self,
        id: Uuid,
        external_lead_id: Option<&str>,
        external_contact_id: Option<&str>,
    ) -> Result<()> {
        let db = Arc::clone(&self.db);
        let external_lead_id = external_lead_id.map(String::from);
        let external_contact_id = external_contact_id.map(String::from);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let updated = conn
                .execute(
                    LEAD_MARK_SENT_SQL,
                    params![
                        external_lead_id,
                        external_contact_id,
                        Utc::now().timestamp_millis(),
                        id.to_string(),
                    ],
                )
                .map_err(InfraError::from)?;

            if updated == 0 {
                return Err(LeadForgeError::NotFound(format!("lead {id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn stats(&self) -> Result<LeadStats> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<LeadStats> {
            let conn = db.get_connection()?;
            let (total, sent): (i64, i64) = conn
                .query_row(LEAD_STATS_SQL, [], |row| Ok((row.get(0)?, row.get(1)?)))
                .map_err(InfraError::from)?;

            let total = total.max(0) as u64;
            let sent = sent.max(0) as u64;
            Ok(LeadStats { total, pending: total - sent, sent })
        })
        .await
        .map_err(map_join_error)?
    }
}

const LEAD_INSERT_SQL: &str = "INSERT INTO leads (
        id, name, email, phone, company, product_name, message, lead_source,
        created_at, updated_at, sent, external_lead_id, external_contact_id
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";

const LEAD_GET_SQL: &str = "SELECT id, name, email, phone, company, product_name, message, lead_source,
        created_at, sent, external_lead_id, external_contact_id
    FROM leads WHERE id = ?1";

// rowid breaks ties between leads captured within the same millisecond.
const LEAD_PENDING_SQL: &str = "SELECT id, name, email, phone, company, product_name, message, lead_source,
        created_at, sent, external_lead_id, external_contact_id
    FROM leads
    WHERE sent = 0
    ORDER BY created_at ASC, rowid ASC
    LIMIT ?1";

// COALESCE keeps the first recorded CRM ids if a retry lands after a
// successful delivery.
const LEAD_MARK_SENT_SQL: &str = "UPDATE leads
    SET sent = 1,
        external_lead_id = COALESCE(external_lead_id, ?1),
        external_contact_id = COALESCE(external_contact_id, ?2),
        updated_at = ?3
    WHERE id = ?4";

const LEAD_STATS_SQL: &str =
    "SELECT COUNT(*), COALESCE(SUM(sent), 0) FROM leads";

fn map_lead_row(row: &Row<'_>) -> rusqlite::Result<Lead> {
    let id_raw: String = row.get(0)?;
    let id = Uuid::from_str(&id_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let source_raw: String = row.get(7)?;
    let source = parse_source(&id_raw, &source_raw);

    let created_at_millis: i64 = row.get(8)?;
    let sent: i64 = row.get(9)?;

    Ok(Lead {
        id,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        company: row.get(4)?,
        product_name: row.get(5)?,
        message: row.get(6)?,
        source,
        created_at: millis_to_datetime(created_at_millis),
        sent: sent != 0,
        external_lead_id: row.get(10)?,
        external_contact_id: row.get(11)?,
    })
}

fn parse_source(id: &str, raw: &str) -> LeadSource {
    LeadSource::from_str(raw).unwrap_or_else(|_| {
        warn!(lead_id = %id, source = %raw, "unknown lead source in database, defaulting to form");
        LeadSource::default()
    })
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).single().unwrap_or_else(Utc::now)
}
