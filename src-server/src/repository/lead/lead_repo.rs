//! Lead Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Lead CRUD and search.

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{
    DomainError, DomainResult, Lead, LeadDraft, LeadPatch, LeadValue, DEFAULT_LEAD_STATUS,
};
use super::super::db::{db_err, open_conn, SharedConnection};
use super::super::traits::{Repository, SearchableRepository};
use super::lead_positioning::{column_in_org, first_column_id};

const LEAD_FIELDS: &str = "id, name, company, email, whatsapp, campaign_source, notes, value_cents, status, column_id, position, organization_id, created_at";

/// SQLite implementation of Lead repository
pub struct LeadRepository {
    pub(super) conn: SharedConnection,
}

impl LeadRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Insert a lead at the top of the organization's first column.
    ///
    /// Fails with NotFound when the organization has no columns.
    pub async fn create(&self, organization_id: &str, draft: &LeadDraft) -> DomainResult<Lead> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        let column_id = first_column_id(conn, organization_id)?
            .ok_or_else(|| DomainError::NotFound("No columns found".to_string()))?;
        let created_at = chrono::Utc::now().timestamp_millis();

        conn.execute(
            "INSERT INTO leads (name, company, email, whatsapp, campaign_source, notes, value_cents, status, column_id, position, organization_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
            params![
                draft.name,
                draft.company,
                draft.email,
                draft.whatsapp,
                draft.campaign_source,
                draft.notes,
                draft.value.map(|v| v.cents()),
                DEFAULT_LEAD_STATUS,
                column_id,
                organization_id,
                created_at
            ],
        )
        .map_err(db_err)?;

        Ok(Lead {
            id: conn.last_insert_rowid() as u32,
            name: draft.name.clone(),
            company: draft.company.clone(),
            email: draft.email.clone(),
            whatsapp: Some(draft.whatsapp.clone()),
            campaign_source: draft.campaign_source.clone(),
            notes: draft.notes.clone(),
            value: draft.value,
            status: DEFAULT_LEAD_STATUS.to_string(),
            column_id: Some(column_id),
            position: 0,
            organization_id: organization_id.to_string(),
            created_at,
        })
    }

    /// Apply a partial update; fields absent from the patch keep their
    /// stored values.
    pub async fn update_with_patch(&self, organization_id: &str, id: u32, patch: &LeadPatch) -> DomainResult<Lead> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        let mut lead = find_lead(conn, organization_id, id)?
            .ok_or_else(|| DomainError::NotFound(format!("Lead {} not found", id)))?;
        patch.apply_to(&mut lead)?;

        if let Some(Some(column_id)) = patch.column_id {
            if !column_in_org(conn, organization_id, column_id)? {
                return Err(DomainError::NotFound(format!("Column {} not found", column_id)));
            }
        }

        write_lead(conn, &lead)?;
        Ok(lead)
    }
}

#[async_trait]
impl Repository<Lead> for LeadRepository {
    async fn find_by_id(&self, organization_id: &str, id: u32) -> DomainResult<Option<Lead>> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;
        find_lead(conn, organization_id, id)
    }

    async fn list(&self, organization_id: &str) -> DomainResult<Vec<Lead>> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM leads WHERE organization_id = ? ORDER BY position ASC, created_at DESC, id DESC",
                LEAD_FIELDS
            ))
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![organization_id], row_to_lead)
            .map_err(db_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    async fn delete(&self, organization_id: &str, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        conn.execute(
            "DELETE FROM leads WHERE id = ? AND organization_id = ?",
            params![id, organization_id],
        )
        .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl SearchableRepository<Lead> for LeadRepository {
    async fn search(&self, organization_id: &str, query: &str) -> DomainResult<Vec<Lead>> {
        // Filtered here rather than with LIKE, which only folds ASCII case.
        let leads = self.list(organization_id).await?;
        Ok(leads.into_iter().filter(|lead| lead.matches(query)).collect())
    }
}

/// Convert a database row to Lead
fn row_to_lead(row: &rusqlite::Row) -> rusqlite::Result<Lead> {
    let value = match row.get::<_, Option<i64>>(7)? {
        Some(cents) => Some(
            LeadValue::from_cents(cents)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Integer, Box::new(e)))?,
        ),
        None => None,
    };

    Ok(Lead {
        id: row.get(0)?,
        name: row.get(1)?,
        company: row.get(2)?,
        email: row.get(3)?,
        whatsapp: row.get(4)?,
        campaign_source: row.get(5)?,
        notes: row.get(6)?,
        value,
        status: row.get(8)?,
        column_id: row.get(9)?,
        position: row.get(10)?,
        organization_id: row.get(11)?,
        created_at: row.get(12)?,
    })
}

pub(super) fn find_lead(conn: &Connection, organization_id: &str, id: u32) -> DomainResult<Option<Lead>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM leads WHERE id = ? AND organization_id = ?",
            LEAD_FIELDS
        ),
        params![id, organization_id],
        row_to_lead,
    )
    .optional()
    .map_err(db_err)
}

fn write_lead(conn: &Connection, lead: &Lead) -> DomainResult<()> {
    conn.execute(
        "UPDATE leads SET name = ?, company = ?, email = ?, whatsapp = ?, campaign_source = ?, notes = ?, value_cents = ?, status = ?, column_id = ?, position = ?
         WHERE id = ? AND organization_id = ?",
        params![
            lead.name,
            lead.company,
            lead.email,
            lead.whatsapp,
            lead.campaign_source,
            lead.notes,
            lead.value.map(|v| v.cents()),
            lead.status,
            lead.column_id,
            lead.position,
            lead.id,
            lead.organization_id
        ],
    )
    .map_err(db_err)?;
    Ok(())
}
