//! Repository Layer - Core Traits
//!
//! Abstract interfaces for data access. Every call is scoped to one
//! organization; rows of other tenants are never visible.

use async_trait::async_trait;
use crate::domain::{Entity, DomainResult};

/// Core repository trait for tenant-scoped reads and deletes
///
/// Creation and updates take entity-specific inputs and live on the
/// concrete repositories.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Find entity by ID within the organization
    async fn find_by_id(&self, organization_id: &str, id: T::Id) -> DomainResult<Option<T>>;

    /// List the organization's entities in display order
    async fn list(&self, organization_id: &str) -> DomainResult<Vec<T>>;

    /// Delete entity by ID; absent rows are not an error
    async fn delete(&self, organization_id: &str, id: T::Id) -> DomainResult<()>;
}

/// Extension for repositories that support text search
#[async_trait]
pub trait SearchableRepository<T: Entity>: Repository<T> {
    /// Search entities by text query
    async fn search(&self, organization_id: &str, query: &str) -> DomainResult<Vec<T>>;
}
