//! Column Repository - Core CRUD Operations
//!
//! SQLite-backed column storage. Reconciliation and fallback deletion are
//! in their own modules and share the row helpers below.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{Column, DomainError, DomainResult};
use super::super::db::{db_err, open_conn, SharedConnection};
use super::super::traits::Repository;
use super::column_fallback::ColumnDeletionOperations;

const COLUMN_FIELDS: &str = "id, title, \"order\", organization_id, color";

/// SQLite implementation of Column repository
pub struct ColumnRepository {
    pub(super) conn: SharedConnection,
}

impl ColumnRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Insert a column at the given order
    pub async fn create(
        &self,
        organization_id: &str,
        title: &str,
        color: Option<&str>,
        order: i32,
    ) -> DomainResult<Column> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;
        insert_column(conn, organization_id, title, order, color)
    }

    /// Persist title, color and order of an existing column
    pub async fn update(&self, column: &Column) -> DomainResult<Column> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        let changed = conn
            .execute(
                "UPDATE columns SET title = ?, color = ?, \"order\" = ? WHERE id = ? AND organization_id = ?",
                params![column.title, column.color, column.order, column.id, column.organization_id],
            )
            .map_err(db_err)?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Column {} not found", column.id)));
        }
        Ok(column.clone())
    }
}

#[async_trait]
impl Repository<Column> for ColumnRepository {
    async fn find_by_id(&self, organization_id: &str, id: u32) -> DomainResult<Option<Column>> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;
        find_column(conn, organization_id, id)
    }

    async fn list(&self, organization_id: &str) -> DomainResult<Vec<Column>> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;
        load_columns(conn, organization_id)
    }

    async fn delete(&self, organization_id: &str, id: u32) -> DomainResult<()> {
        self.delete_with_fallback(organization_id, id).await.map(|_| ())
    }
}

/// Convert a database row to Column
fn row_to_column(row: &rusqlite::Row) -> rusqlite::Result<Column> {
    Ok(Column {
        id: row.get(0)?,
        title: row.get(1)?,
        order: row.get(2)?,
        organization_id: row.get(3)?,
        color: row.get(4)?,
    })
}

/// All columns of an organization ordered by `order`, then id
pub(super) fn load_columns(conn: &Connection, organization_id: &str) -> DomainResult<Vec<Column>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM columns WHERE organization_id = ? ORDER BY \"order\" ASC, id ASC",
            COLUMN_FIELDS
        ))
        .map_err(db_err)?;
    let rows = stmt
        .query_map(params![organization_id], row_to_column)
        .map_err(db_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
}

pub(super) fn find_column(conn: &Connection, organization_id: &str, id: u32) -> DomainResult<Option<Column>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM columns WHERE id = ? AND organization_id = ?",
            COLUMN_FIELDS
        ),
        params![id, organization_id],
        row_to_column,
    )
    .optional()
    .map_err(db_err)
}

pub(super) fn insert_column(
    conn: &Connection,
    organization_id: &str,
    title: &str,
    order: i32,
    color: Option<&str>,
) -> DomainResult<Column> {
    conn.execute(
        "INSERT INTO columns (title, \"order\", organization_id, color) VALUES (?, ?, ?, ?)",
        params![title, order, organization_id, color],
    )
    .map_err(db_err)?;

    let id = conn.last_insert_rowid() as u32;
    Ok(Column {
        id,
        title: title.to_string(),
        order,
        organization_id: organization_id.to_string(),
        color: color.map(str::to_string),
    })
}

pub(super) fn set_title(conn: &Connection, id: u32, title: &str) -> DomainResult<()> {
    conn.execute("UPDATE columns SET title = ? WHERE id = ?", params![title, id])
        .map_err(db_err)?;
    Ok(())
}

pub(super) fn set_order(conn: &Connection, id: u32, order: i32) -> DomainResult<()> {
    conn.execute("UPDATE columns SET \"order\" = ? WHERE id = ?", params![order, id])
        .map_err(db_err)?;
    Ok(())
}

/// Point every lead of `from` at `to`; returns how many moved.
pub(super) fn reassign_leads(conn: &Connection, from: u32, to: u32) -> DomainResult<usize> {
    conn.execute(
        "UPDATE leads SET column_id = ? WHERE column_id = ?",
        params![to, from],
    )
    .map_err(db_err)
}

pub(super) fn delete_column_row(conn: &Connection, id: u32) -> DomainResult<()> {
    conn.execute("DELETE FROM columns WHERE id = ?", params![id])
        .map_err(db_err)?;
    Ok(())
}
