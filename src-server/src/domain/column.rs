//! Column Entity
//!
//! A pipeline stage. Columns are ordered per organization by `order`.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// Stage titles every organization's board is reconciled against, in
/// display order.
pub const PIPELINE_TEMPLATE: [&str; 6] = [
    "Novos Leads",
    "Em Contato",
    "Não Retornou",
    "Proposta Enviada",
    "Fechado",
    "Perdido",
];

/// Seed column new leads land in; cannot be deleted.
pub const DEFAULT_COLUMN_TITLE: &str = "Novos Leads";

pub const CLOSED_COLUMN_TITLE: &str = "Fechado";

/// Former title of the closed stage.
pub const LEGACY_CLOSED_TITLE: &str = "Ganho";

/// Stage that accumulated duplicates under the old board.
pub const NO_REPLY_COLUMN_TITLE: &str = "Não Retornou";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: u32,
    pub title: String,
    /// Display sequence, not unique
    pub order: i32,
    pub organization_id: String,
    /// Optional UI color (hex)
    pub color: Option<String>,
}

impl Column {
    pub fn new(id: u32, title: String, order: i32, organization_id: String) -> Self {
        Self {
            id,
            title,
            order,
            organization_id,
            color: None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.title == DEFAULT_COLUMN_TITLE
    }
}

impl Entity for Column {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn organization_id(&self) -> &str {
        &self.organization_id
    }
}

/// Pick where the leads of a deleted column go.
///
/// `others` are the organization's remaining columns. Preference: closest
/// predecessor by order, then closest successor, then the lowest-ordered
/// column left. `None` means there is no other column.
pub fn choose_fallback(others: &[Column], deleted_order: i32) -> Option<&Column> {
    let predecessor = others
        .iter()
        .filter(|c| c.order < deleted_order)
        .max_by(|a, b| a.order.cmp(&b.order).then(b.id.cmp(&a.id)));
    if predecessor.is_some() {
        return predecessor;
    }

    let successor = others
        .iter()
        .filter(|c| c.order > deleted_order)
        .min_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));
    if successor.is_some() {
        return successor;
    }

    others
        .iter()
        .min_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)))
}
