//! Repository Layer
//!
//! Data access abstractions and their SQLite implementations.

mod traits;
mod db;
pub mod column;
pub mod lead;
mod settings_repo;


pub use traits::{Repository, SearchableRepository};
pub use db::{init_db, DbState, SharedConnection};
pub use column::ColumnRepository;
pub use lead::LeadRepository;
pub use settings_repo::SettingsRepository;
