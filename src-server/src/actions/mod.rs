//! Actions Layer
//!
//! Server actions the dashboard triggers. Each one runs for a resolved
//! organization, reads or writes through the repositories and, when it
//! changed something, marks the CRM view stale.

mod column_actions;
mod lead_actions;
mod settings_actions;

#[cfg(test)]
mod tests;

pub use column_actions::*;
pub use lead_actions::*;
pub use settings_actions::*;
