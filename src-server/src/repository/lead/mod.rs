//! Lead Repository Module
//!
//! - lead_repo: Core CRUD operations and search
//! - lead_positioning: Placing leads into columns

mod lead_repo;
mod lead_positioning;

pub use lead_repo::LeadRepository;

pub use lead_positioning::LeadPositioningOperations;
