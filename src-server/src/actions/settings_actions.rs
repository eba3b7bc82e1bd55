//! Settings Actions

use crate::context::OrgContext;
use crate::domain::{DomainResult, Settings, SettingsPatch};
use crate::invalidation::CRM_ROUTE;
use crate::AppState;

/// Stored settings, or defaults when the organization has none yet
pub async fn get_settings(state: &AppState, ctx: &OrgContext) -> DomainResult<Settings> {
    Ok(state
        .settings
        .load(ctx.org())
        .await?
        .unwrap_or_else(|| Settings::defaults_for(ctx.org())))
}

pub async fn update_settings(state: &AppState, ctx: &OrgContext, patch: SettingsPatch) -> DomainResult<Settings> {
    let mut settings = get_settings(state, ctx).await?;
    patch.apply_to(&mut settings);

    let saved = state.settings.save(&settings).await?;
    state.invalidation.invalidate(ctx.org(), CRM_ROUTE);
    Ok(saved)
}
