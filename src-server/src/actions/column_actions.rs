//! Column Actions
//!
//! Board listing and column management.

use serde::Deserialize;

use crate::context::OrgContext;
use crate::domain::{non_blank, Column, DomainError, DomainResult};
use crate::invalidation::CRM_ROUTE;
use crate::repository::column::{ColumnDeletion, ColumnDeletionOperations, ColumnReconcileOperations};
use crate::repository::Repository;
use crate::AppState;

/// Fields a user may change on a column
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnUpdate {
    #[serde(default)]
    pub title: Option<String>,
    /// Empty string clears the color
    #[serde(default)]
    pub color: Option<String>,
}

/// Reconciled board of the caller's organization
pub async fn list_columns(state: &AppState, ctx: &OrgContext) -> DomainResult<Vec<Column>> {
    state.columns.reconcile(ctx.org()).await
}

/// Append a new column after the existing ones
pub async fn create_column(
    state: &AppState,
    ctx: &OrgContext,
    title: &str,
    color: Option<String>,
) -> DomainResult<Column> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::InvalidInput("Column title is required".to_string()));
    }

    let board = state.columns.reconcile(ctx.org()).await?;
    ensure_title_free(&board, title, None)?;
    let color = non_blank(color);
    let column = state
        .columns
        .create(ctx.org(), title, color.as_deref(), board.len() as i32)
        .await?;

    log::info!("Created column {} {:?} for {}", column.id, column.title, ctx.org());
    state.invalidation.invalidate(ctx.org(), CRM_ROUTE);
    Ok(column)
}

/// Rename and/or recolor a column
pub async fn update_column(
    state: &AppState,
    ctx: &OrgContext,
    id: u32,
    update: ColumnUpdate,
) -> DomainResult<Column> {
    let board = state.columns.reconcile(ctx.org()).await?;
    let mut column = board
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .ok_or_else(|| DomainError::NotFound(format!("Column {} not found", id)))?;

    if let Some(title) = update.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::InvalidInput("Column title is required".to_string()));
        }
        ensure_title_free(&board, title, Some(id))?;
        column.title = title.to_string();
    }
    if update.color.is_some() {
        column.color = non_blank(update.color);
    }

    let column = state.columns.update(&column).await?;
    state.invalidation.invalidate(ctx.org(), CRM_ROUTE);
    Ok(column)
}

/// Delete a column, relocating its leads.
///
/// The default column is refused; a column that does not exist is a no-op.
pub async fn delete_column(state: &AppState, ctx: &OrgContext, id: u32) -> DomainResult<ColumnDeletion> {
    let Some(column) = state.columns.find_by_id(ctx.org(), id).await? else {
        return Ok(ColumnDeletion::Absent);
    };
    if column.is_default() {
        return Err(DomainError::InvalidInput(format!(
            "The {:?} column cannot be deleted",
            column.title
        )));
    }

    let outcome = state.columns.delete_with_fallback(ctx.org(), id).await?;
    match outcome {
        ColumnDeletion::Reassigned { fallback_id, moved } => {
            log::info!("Deleted column {}, moved {} leads to column {}", id, moved, fallback_id)
        }
        ColumnDeletion::LeadsDeleted { deleted } => {
            log::warn!("Deleted last column {} together with {} leads", id, deleted)
        }
        // Removed concurrently since the lookup above.
        ColumnDeletion::Absent => return Ok(ColumnDeletion::Absent),
    }

    state.invalidation.invalidate(ctx.org(), CRM_ROUTE);
    Ok(outcome)
}

/// Titles are unique per board; a second column under a pipeline title would
/// be merged away by the next reconciliation.
fn ensure_title_free(board: &[Column], title: &str, except: Option<u32>) -> DomainResult<()> {
    let wanted = title.to_lowercase();
    let taken = board
        .iter()
        .any(|c| Some(c.id) != except && c.title.to_lowercase() == wanted);
    if taken {
        return Err(DomainError::Conflict(format!("A column named {:?} already exists", title)));
    }
    Ok(())
}
