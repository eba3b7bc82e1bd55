//! Lead Actions
//!
//! Lead CRUD, board moves and pipeline totals.

use crate::context::OrgContext;
use crate::domain::{DomainError, DomainResult, Lead, LeadPatch, NewLead, PipelineSummary};
use crate::invalidation::CRM_ROUTE;
use crate::repository::column::ColumnReconcileOperations;
use crate::repository::lead::LeadPositioningOperations;
use crate::repository::{Repository, SearchableRepository};
use crate::AppState;

/// Leads of the organization, optionally filtered by a search text
pub async fn list_leads(state: &AppState, ctx: &OrgContext, query: Option<&str>) -> DomainResult<Vec<Lead>> {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => state.leads.search(ctx.org(), q).await,
        None => state.leads.list(ctx.org()).await,
    }
}

/// Create a lead at the top of the first column
pub async fn create_lead(state: &AppState, ctx: &OrgContext, form: NewLead) -> DomainResult<Lead> {
    let draft = form.validate()?;
    let lead = state.leads.create(ctx.org(), &draft).await?;

    log::info!("Created lead {} in column {:?} for {}", lead.id, lead.column_id, ctx.org());
    state.invalidation.invalidate(ctx.org(), CRM_ROUTE);
    Ok(lead)
}

/// Update lead content; fields missing from the patch are kept
pub async fn update_lead(state: &AppState, ctx: &OrgContext, id: u32, patch: LeadPatch) -> DomainResult<Lead> {
    if patch.is_empty() {
        return state
            .leads
            .find_by_id(ctx.org(), id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Lead {} not found", id)));
    }

    let lead = state.leads.update_with_patch(ctx.org(), id, &patch).await?;
    state.invalidation.invalidate(ctx.org(), CRM_ROUTE);
    Ok(lead)
}

/// Drag-and-drop move of a lead to a column and position
pub async fn update_lead_status(
    state: &AppState,
    ctx: &OrgContext,
    id: u32,
    column_id: u32,
    position: i32,
) -> DomainResult<Lead> {
    let lead = state.leads.move_to(ctx.org(), id, column_id, position).await?;
    log::debug!("Moved lead {} to column {} at {}", id, column_id, position);
    state.invalidation.invalidate(ctx.org(), CRM_ROUTE);
    Ok(lead)
}

/// Remove a lead; deleting a missing lead succeeds
pub async fn delete_lead(state: &AppState, ctx: &OrgContext, id: u32) -> DomainResult<()> {
    state.leads.delete(ctx.org(), id).await?;
    log::info!("Deleted lead {} for {}", id, ctx.org());
    state.invalidation.invalidate(ctx.org(), CRM_ROUTE);
    Ok(())
}

/// Counts and value totals per column
pub async fn pipeline_summary(state: &AppState, ctx: &OrgContext) -> DomainResult<PipelineSummary> {
    let columns = state.columns.reconcile(ctx.org()).await?;
    let leads = state.leads.list(ctx.org()).await?;
    Ok(PipelineSummary::compute(&columns, &leads))
}
