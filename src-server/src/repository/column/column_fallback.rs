//! Column Deletion with Fallback
//!
//! Removing a column never leaves leads pointing at it: they move to a
//! neighbouring column, or are deleted when no other column exists.

use async_trait::async_trait;
use rusqlite::params;
use serde::Serialize;

use crate::domain::{choose_fallback, DomainResult};
use super::super::db::{db_err, not_initialized};
use super::column_repo::{delete_column_row, find_column, load_columns, reassign_leads};

/// What happened to a deleted column's leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ColumnDeletion {
    Reassigned { fallback_id: u32, moved: usize },
    LeadsDeleted { deleted: usize },
    /// Column did not exist for this organization
    Absent,
}

/// Trait for column deletion
#[async_trait]
pub trait ColumnDeletionOperations {
    /// Delete a column, relocating or dropping its leads first
    async fn delete_with_fallback(&self, organization_id: &str, id: u32) -> DomainResult<ColumnDeletion>;
}

#[async_trait]
impl ColumnDeletionOperations for super::column_repo::ColumnRepository {
    async fn delete_with_fallback(&self, organization_id: &str, id: u32) -> DomainResult<ColumnDeletion> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        let tx = conn.transaction().map_err(db_err)?;

        let Some(target) = find_column(&tx, organization_id, id)? else {
            return Ok(ColumnDeletion::Absent);
        };

        let others: Vec<_> = load_columns(&tx, organization_id)?
            .into_iter()
            .filter(|c| c.id != id)
            .collect();

        let outcome = match choose_fallback(&others, target.order) {
            Some(fallback) => ColumnDeletion::Reassigned {
                fallback_id: fallback.id,
                moved: reassign_leads(&tx, id, fallback.id)?,
            },
            None => {
                let deleted = tx
                    .execute("DELETE FROM leads WHERE column_id = ?", params![id])
                    .map_err(db_err)?;
                ColumnDeletion::LeadsDeleted { deleted }
            }
        };
        delete_column_row(&tx, id)?;
        tx.commit().map_err(db_err)?;

        Ok(outcome)
    }
}
