//! Request extractor for the caller's organization

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

use super::error::ApiError;
use crate::context::OrgContext;
use crate::AppState;

#[async_trait]
impl FromRequestParts<Arc<AppState>> for OrgContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        state
            .org_resolver
            .resolve(&parts.headers)
            .await
            .map_err(ApiError::from)
    }
}
