//! Organization Context
//!
//! Every action runs on behalf of one organization. The caller comes from
//! the identity provider; the organization is the caller's selected team,
//! else the caller's own id, else the configured placeholder.

use async_trait::async_trait;
use axum::http::HeaderMap;
use std::sync::Arc;

use crate::config::IdentityConfig;
use crate::domain::{DomainError, DomainResult};

/// Authenticated user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub selected_team_id: Option<String>,
}

/// Source of the current caller
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_caller(&self, headers: &HeaderMap) -> Option<Caller>;
}

/// Reads the caller from headers set by an authenticating proxy
pub struct HeaderIdentity {
    user_header: String,
    team_header: String,
}

impl HeaderIdentity {
    pub fn new(user_header: &str, team_header: &str) -> Self {
        Self {
            user_header: user_header.to_string(),
            team_header: team_header.to_string(),
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl IdentityProvider for HeaderIdentity {
    async fn current_caller(&self, headers: &HeaderMap) -> Option<Caller> {
        let user_id = header_value(headers, &self.user_header)?;
        Some(Caller {
            user_id,
            selected_team_id: header_value(headers, &self.team_header),
        })
    }
}

/// Resolved tenant for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgContext {
    pub organization_id: String,
    pub caller: Option<Caller>,
}

impl OrgContext {
    pub fn new(organization_id: &str) -> Self {
        Self {
            organization_id: organization_id.to_string(),
            caller: None,
        }
    }

    pub fn org(&self) -> &str {
        &self.organization_id
    }
}

/// Turns request metadata into an [`OrgContext`]
pub struct OrgResolver {
    provider: Arc<dyn IdentityProvider>,
    require_caller: bool,
    fallback_org: String,
}

impl OrgResolver {
    pub fn new(provider: Arc<dyn IdentityProvider>, require_caller: bool, fallback_org: &str) -> Self {
        Self {
            provider,
            require_caller,
            fallback_org: fallback_org.to_string(),
        }
    }

    pub fn from_config(config: &IdentityConfig) -> Self {
        Self::new(
            Arc::new(HeaderIdentity::new(&config.user_header, &config.team_header)),
            config.enabled,
            &config.fallback_org,
        )
    }

    pub async fn resolve(&self, headers: &HeaderMap) -> DomainResult<OrgContext> {
        let caller = self.provider.current_caller(headers).await;
        if caller.is_none() && self.require_caller {
            return Err(DomainError::Unauthorized("Sign in required".to_string()));
        }

        let organization_id = match &caller {
            Some(Caller {
                selected_team_id: Some(team),
                ..
            }) => team.clone(),
            Some(caller) => caller.user_id.clone(),
            None => self.fallback_org.clone(),
        };
        Ok(OrgContext {
            organization_id,
            caller,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn resolver(required: bool) -> OrgResolver {
        OrgResolver::from_config(&IdentityConfig {
            enabled: required,
            ..IdentityConfig::default()
        })
    }

    #[tokio::test]
    async fn test_team_wins_over_user() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("user_1"));
        headers.insert("x-team-id", HeaderValue::from_static("team_9"));

        let ctx = resolver(false).resolve(&headers).await.unwrap();
        assert_eq!(ctx.org(), "team_9");
        assert_eq!(ctx.caller.unwrap().user_id, "user_1");
    }

    #[tokio::test]
    async fn test_user_id_without_team() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("user_1"));
        headers.insert("x-team-id", HeaderValue::from_static("  "));

        let ctx = resolver(true).resolve(&headers).await.unwrap();
        assert_eq!(ctx.org(), "user_1");
    }

    #[tokio::test]
    async fn test_placeholder_without_caller() {
        let ctx = resolver(false).resolve(&HeaderMap::new()).await.unwrap();
        assert_eq!(ctx.org(), "org_demo_123");
        assert!(ctx.caller.is_none());
    }

    #[tokio::test]
    async fn test_required_caller_missing() {
        let result = resolver(true).resolve(&HeaderMap::new()).await;
        assert!(matches!(result, Err(DomainError::Unauthorized(_))));
    }
}
