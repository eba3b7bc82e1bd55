//! Lead Positioning Operations
//!
//! Moving leads between columns. Sibling positions are not renumbered:
//! two leads may share a position and the board sorts them stably.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{DomainError, DomainResult, Lead};
use super::super::db::{db_err, open_conn};
use super::lead_repo::find_lead;

/// Trait for lead positioning operations
#[async_trait]
pub trait LeadPositioningOperations {
    /// Put a lead into `column_id` at `position`
    async fn move_to(&self, organization_id: &str, id: u32, column_id: u32, position: i32) -> DomainResult<Lead>;
}

#[async_trait]
impl LeadPositioningOperations for super::lead_repo::LeadRepository {
    async fn move_to(&self, organization_id: &str, id: u32, column_id: u32, position: i32) -> DomainResult<Lead> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        if !column_in_org(conn, organization_id, column_id)? {
            return Err(DomainError::NotFound(format!("Column {} not found", column_id)));
        }

        let changed = conn
            .execute(
                "UPDATE leads SET column_id = ?, position = ? WHERE id = ? AND organization_id = ?",
                params![column_id, position, id, organization_id],
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Lead {} not found", id)));
        }

        find_lead(conn, organization_id, id)?
            .ok_or_else(|| DomainError::NotFound(format!("Lead {} not found", id)))
    }
}

/// Lowest-ordered column of the organization
pub(super) fn first_column_id(conn: &Connection, organization_id: &str) -> DomainResult<Option<u32>> {
    conn.query_row(
        "SELECT id FROM columns WHERE organization_id = ? ORDER BY \"order\" ASC, id ASC LIMIT 1",
        params![organization_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(db_err)
}

pub(super) fn column_in_org(conn: &Connection, organization_id: &str, column_id: u32) -> DomainResult<bool> {
    conn.query_row(
        "SELECT 1 FROM columns WHERE id = ? AND organization_id = ?",
        params![column_id, organization_id],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .map_err(db_err)
}
