//! API Request Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::ApiError;
use crate::actions::{self, ColumnUpdate};
use crate::context::OrgContext;
use crate::domain::{Column, Lead, LeadPatch, NewLead, PipelineSummary, Settings, SettingsPatch};
use crate::repository::column::ColumnDeletion;
use crate::AppState;

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct CreateColumnRequest {
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeadQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MoveLeadRequest {
    pub column_id: u32,
    pub position: i32,
}

pub async fn list_columns(
    State(state): State<Arc<AppState>>,
    ctx: OrgContext,
) -> ApiResult<Json<Vec<Column>>> {
    Ok(Json(actions::list_columns(&state, &ctx).await?))
}

pub async fn create_column(
    State(state): State<Arc<AppState>>,
    ctx: OrgContext,
    Json(req): Json<CreateColumnRequest>,
) -> ApiResult<(StatusCode, Json<Column>)> {
    let column = actions::create_column(&state, &ctx, &req.title, req.color).await?;
    Ok((StatusCode::CREATED, Json(column)))
}

pub async fn update_column(
    State(state): State<Arc<AppState>>,
    ctx: OrgContext,
    Path(id): Path<u32>,
    Json(update): Json<ColumnUpdate>,
) -> ApiResult<Json<Column>> {
    Ok(Json(actions::update_column(&state, &ctx, id, update).await?))
}

pub async fn delete_column(
    State(state): State<Arc<AppState>>,
    ctx: OrgContext,
    Path(id): Path<u32>,
) -> ApiResult<Json<ColumnDeletion>> {
    Ok(Json(actions::delete_column(&state, &ctx, id).await?))
}

pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    ctx: OrgContext,
    Query(query): Query<LeadQuery>,
) -> ApiResult<Json<Vec<Lead>>> {
    Ok(Json(actions::list_leads(&state, &ctx, query.q.as_deref()).await?))
}

pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    ctx: OrgContext,
    Json(form): Json<NewLead>,
) -> ApiResult<(StatusCode, Json<Lead>)> {
    let lead = actions::create_lead(&state, &ctx, form).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

pub async fn update_lead(
    State(state): State<Arc<AppState>>,
    ctx: OrgContext,
    Path(id): Path<u32>,
    Json(patch): Json<LeadPatch>,
) -> ApiResult<Json<Lead>> {
    Ok(Json(actions::update_lead(&state, &ctx, id, patch).await?))
}

pub async fn update_lead_status(
    State(state): State<Arc<AppState>>,
    ctx: OrgContext,
    Path(id): Path<u32>,
    Json(req): Json<MoveLeadRequest>,
) -> ApiResult<Json<Lead>> {
    let lead = actions::update_lead_status(&state, &ctx, id, req.column_id, req.position).await?;
    Ok(Json(lead))
}

pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    ctx: OrgContext,
    Path(id): Path<u32>,
) -> ApiResult<StatusCode> {
    actions::delete_lead(&state, &ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn pipeline_summary(
    State(state): State<Arc<AppState>>,
    ctx: OrgContext,
) -> ApiResult<Json<PipelineSummary>> {
    Ok(Json(actions::pipeline_summary(&state, &ctx).await?))
}

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    ctx: OrgContext,
) -> ApiResult<Json<Settings>> {
    Ok(Json(actions::get_settings(&state, &ctx).await?))
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    ctx: OrgContext,
    Json(patch): Json<SettingsPatch>,
) -> ApiResult<Json<Settings>> {
    Ok(Json(actions::update_settings(&state, &ctx, patch).await?))
}
