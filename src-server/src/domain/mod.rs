//! Domain Layer
//!
//! Entities, validation and the pure pipeline rules.
//! No storage or transport concerns live here.

mod entity;
mod column;
mod lead;
mod value;
mod settings;
mod reconcile;
mod pipeline;

pub use entity::{non_blank, DomainError, DomainResult, Entity};
pub use column::{
    choose_fallback, Column, CLOSED_COLUMN_TITLE, DEFAULT_COLUMN_TITLE, LEGACY_CLOSED_TITLE,
    NO_REPLY_COLUMN_TITLE, PIPELINE_TEMPLATE,
};
pub use lead::{Lead, LeadDraft, LeadPatch, NewLead, DEFAULT_LEAD_STATUS};
pub use value::{LeadValue, ValueInput};
pub use settings::{Settings, SettingsPatch, ViewMode};
pub use reconcile::{plan_reconciliation, CanonicalSlot, ReconcilePlan};
pub use pipeline::{ColumnSummary, PipelineSummary};
