//! Column Reconciliation
//!
//! Brings an organization's stored columns back to the pipeline template
//! and returns the board in display order. The whole pass runs in one
//! transaction, so a failure leaves storage as it was.

use async_trait::async_trait;
use rusqlite::Connection;

use crate::domain::{
    plan_reconciliation, CanonicalSlot, Column, DomainError, DomainResult, ReconcilePlan,
    PIPELINE_TEMPLATE,
};
use super::super::db::{db_err, not_initialized};
use super::column_repo::{
    delete_column_row, insert_column, load_columns, reassign_leads, set_order, set_title,
};

/// Trait for board reconciliation
#[async_trait]
pub trait ColumnReconcileOperations {
    /// Canonical board for the organization: template stages first, then any
    /// custom columns, with `order` dense from 0.
    async fn reconcile(&self, organization_id: &str) -> DomainResult<Vec<Column>>;
}

#[async_trait]
impl ColumnReconcileOperations for super::column_repo::ColumnRepository {
    async fn reconcile(&self, organization_id: &str) -> DomainResult<Vec<Column>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction().map_err(db_err)?;
        let columns = reconcile_in(&tx, organization_id)?;
        tx.commit().map_err(db_err)?;

        Ok(columns)
    }
}

fn reconcile_in(conn: &Connection, organization_id: &str) -> DomainResult<Vec<Column>> {
    let existing = load_columns(conn, organization_id)?;
    if existing.is_empty() {
        return seed_template(conn, organization_id);
    }

    let plan = plan_reconciliation(&existing);
    apply_plan(conn, organization_id, plan)
}

fn seed_template(conn: &Connection, organization_id: &str) -> DomainResult<Vec<Column>> {
    let mut columns = Vec::with_capacity(PIPELINE_TEMPLATE.len());
    for (order, title) in PIPELINE_TEMPLATE.iter().enumerate() {
        columns.push(insert_column(conn, organization_id, title, order as i32, None)?);
    }
    log::info!("Seeded pipeline columns for {}", organization_id);
    Ok(columns)
}

fn apply_plan(conn: &Connection, organization_id: &str, plan: ReconcilePlan) -> DomainResult<Vec<Column>> {
    let mut board = Vec::with_capacity(plan.slots.len() + plan.extras.len());

    for slot in plan.slots {
        match slot {
            CanonicalSlot::Existing { column, renamed_from } => {
                if let Some(old) = renamed_from {
                    set_title(conn, column.id, &column.title)?;
                    log::info!("Renamed column {} from {:?} to {:?}", column.id, old, column.title);
                }
                board.push(column);
            }
            CanonicalSlot::Missing { title } => {
                // Placeholder order, fixed by the renumbering below.
                let column = insert_column(conn, organization_id, title, -1, None)?;
                log::info!("Recreated missing column {:?} for {}", title, organization_id);
                board.push(column);
            }
        }
    }

    if !plan.deletions.is_empty() {
        let fallback_id = board
            .first()
            .map(|c| c.id)
            .ok_or_else(|| DomainError::Internal("Empty pipeline template".to_string()))?;
        for column in &plan.deletions {
            let moved = reassign_leads(conn, column.id, fallback_id)?;
            delete_column_row(conn, column.id)?;
            log::warn!(
                "Removed duplicate column {} {:?}, moved {} leads to column {}",
                column.id,
                column.title,
                moved,
                fallback_id
            );
        }
    }

    board.extend(plan.extras);
    for (index, column) in board.iter_mut().enumerate() {
        let order = index as i32;
        if column.order != order {
            set_order(conn, column.id, order)?;
            column.order = order;
        }
    }

    Ok(board)
}
