//! Column Repository Module
//!
//! - column_repo: Core CRUD operations
//! - column_reconcile: Template reconciliation of an organization's board
//! - column_fallback: Deletion with lead reassignment

mod column_repo;
mod column_reconcile;
mod column_fallback;

pub use column_repo::ColumnRepository;

pub use column_reconcile::ColumnReconcileOperations;
pub use column_fallback::{ColumnDeletion, ColumnDeletionOperations};
