//! Column Reconciliation Planning
//!
//! Decides, from an organization's stored columns, which ones form the
//! canonical board, which are renamed, created or deleted, and which are
//! left as custom columns. Pure: the repository applies the plan.

use std::collections::HashSet;

use super::column::{
    Column, CLOSED_COLUMN_TITLE, LEGACY_CLOSED_TITLE, NO_REPLY_COLUMN_TITLE, PIPELINE_TEMPLATE,
};

/// One template stage in the reconciled board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalSlot {
    /// Stored column kept for this stage; `column.title` already holds the
    /// template title, `renamed_from` the stored one when they differ.
    Existing {
        column: Column,
        renamed_from: Option<String>,
    },
    /// No stored column matched; one must be inserted.
    Missing { title: &'static str },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// One slot per template title, in template order
    pub slots: Vec<CanonicalSlot>,
    /// Columns to remove after moving their leads to the first slot
    pub deletions: Vec<Column>,
    /// Columns outside the template, kept after the canonical set
    pub extras: Vec<Column>,
}

impl ReconcilePlan {
    pub fn renames(&self) -> impl Iterator<Item = (&Column, &str)> {
        self.slots.iter().filter_map(|slot| match slot {
            CanonicalSlot::Existing {
                column,
                renamed_from: Some(old),
            } => Some((column, old.as_str())),
            _ => None,
        })
    }
}

/// Build the reconciliation plan for a non-empty set of stored columns.
pub fn plan_reconciliation(existing: &[Column]) -> ReconcilePlan {
    let mut sorted = existing.to_vec();
    sorted.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));

    let mut plan = ReconcilePlan::default();
    let mut claimed: HashSet<u32> = HashSet::new();

    for title in PIPELINE_TEMPLATE {
        let mut matches: Vec<&Column> = sorted.iter().filter(|c| c.title == title).collect();
        if title == CLOSED_COLUMN_TITLE && matches.is_empty() {
            matches = sorted
                .iter()
                .filter(|c| c.title == LEGACY_CLOSED_TITLE)
                .collect();
        }

        match matches.split_first() {
            Some((keep, rest)) => {
                claimed.insert(keep.id);
                for dup in rest {
                    claimed.insert(dup.id);
                    plan.deletions.push((*dup).clone());
                }
                let mut column = (*keep).clone();
                let renamed_from = if column.title != title {
                    Some(std::mem::replace(&mut column.title, title.to_string()))
                } else {
                    None
                };
                plan.slots.push(CanonicalSlot::Existing {
                    column,
                    renamed_from,
                });
            }
            None => plan.slots.push(CanonicalSlot::Missing { title }),
        }
    }

    // Leftover "Não Retornou" columns are purged; other unknown columns stay.
    for column in sorted.into_iter().filter(|c| !claimed.contains(&c.id)) {
        if column.title == NO_REPLY_COLUMN_TITLE {
            plan.deletions.push(column);
        } else {
            plan.extras.push(column);
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(plan: &ReconcilePlan) -> usize {
        plan.slots
            .iter()
            .filter(|s| matches!(s, CanonicalSlot::Missing { .. }))
            .count()
    }

    fn col(id: u32, title: &str, order: i32) -> Column {
        Column::new(id, title.to_string(), order, "org".to_string())
    }

    fn template_board() -> Vec<Column> {
        PIPELINE_TEMPLATE
            .iter()
            .enumerate()
            .map(|(i, t)| col(i as u32 + 1, t, i as i32))
            .collect()
    }

    #[test]
    fn test_complete_board_is_untouched() {
        let plan = plan_reconciliation(&template_board());
        assert_eq!(missing(&plan), 0);
        assert_eq!(plan.renames().count(), 0);
        assert!(plan.deletions.is_empty());
        assert!(plan.extras.is_empty());
    }

    #[test]
    fn test_ganho_renamed_to_fechado() {
        let existing = vec![
            col(1, "Novos Leads", 0),
            col(2, "Ganho", 1),
            col(3, "Perdido", 2),
        ];
        let plan = plan_reconciliation(&existing);

        let renames: Vec<_> = plan.renames().map(|(c, old)| (c.id, c.title.clone(), old.to_string())).collect();
        assert_eq!(renames, vec![(2, "Fechado".to_string(), "Ganho".to_string())]);
        assert_eq!(missing(&plan), 3);
        assert!(plan.extras.is_empty());
    }

    #[test]
    fn test_ganho_is_extra_when_fechado_exists() {
        let mut existing = template_board();
        existing.push(col(10, "Ganho", 6));
        let plan = plan_reconciliation(&existing);

        assert_eq!(plan.renames().count(), 0);
        assert_eq!(plan.extras.iter().map(|c| c.id).collect::<Vec<_>>(), vec![10]);
    }

    #[test]
    fn test_duplicates_keep_lowest_order() {
        let mut existing = template_board();
        existing.push(col(20, "Não Retornou", 9));
        existing.push(col(21, "Em Contato", -3));
        let plan = plan_reconciliation(&existing);

        let kept_contact = plan.slots.iter().find_map(|s| match s {
            CanonicalSlot::Existing { column, .. } if column.title == "Em Contato" => Some(column.id),
            _ => None,
        });
        assert_eq!(kept_contact, Some(21));
        let mut deleted: Vec<u32> = plan.deletions.iter().map(|c| c.id).collect();
        deleted.sort();
        assert_eq!(deleted, vec![2, 20]);
    }

    #[test]
    fn test_custom_columns_are_extras() {
        let mut existing = template_board();
        existing.push(col(30, "Follow-up", 2));
        let plan = plan_reconciliation(&existing);

        assert_eq!(plan.extras.len(), 1);
        assert_eq!(plan.extras[0].title, "Follow-up");
        assert!(plan.deletions.is_empty());
    }
}
