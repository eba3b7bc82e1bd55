//! Pipeline Summary
//!
//! Lead counts and value totals per column, as shown in the board headers
//! and the table footer.

use serde::Serialize;

use super::column::Column;
use super::lead::Lead;
use super::value::LeadValue;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column_id: u32,
    pub title: String,
    pub lead_count: usize,
    pub total_value: LeadValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSummary {
    pub columns: Vec<ColumnSummary>,
    pub total_leads: usize,
    pub total_value: LeadValue,
    /// Leads whose column is not on the board
    pub unplaced_leads: usize,
}

impl PipelineSummary {
    pub fn compute(columns: &[Column], leads: &[Lead]) -> Self {
        let mut summaries: Vec<ColumnSummary> = columns
            .iter()
            .map(|c| ColumnSummary {
                column_id: c.id,
                title: c.title.clone(),
                lead_count: 0,
                total_value: LeadValue::ZERO,
            })
            .collect();

        let mut total_value = LeadValue::ZERO;
        let mut unplaced_leads = 0;
        for lead in leads {
            let value = lead.value.unwrap_or(LeadValue::ZERO);
            total_value = total_value.saturating_add(value);

            let slot = lead
                .column_id
                .and_then(|id| summaries.iter_mut().find(|s| s.column_id == id));
            match slot {
                Some(summary) => {
                    summary.lead_count += 1;
                    summary.total_value = summary.total_value.saturating_add(value);
                }
                None => unplaced_leads += 1,
            }
        }

        Self {
            columns: summaries,
            total_leads: leads.len(),
            total_value,
            unplaced_leads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_LEAD_STATUS;

    fn lead(id: u32, column_id: Option<u32>, cents: Option<i64>) -> Lead {
        Lead {
            id,
            name: format!("Lead {}", id),
            company: None,
            email: None,
            whatsapp: None,
            campaign_source: None,
            notes: None,
            value: cents.map(|c| LeadValue::from_cents(c).unwrap()),
            status: DEFAULT_LEAD_STATUS.to_string(),
            column_id,
            position: 0,
            organization_id: "org".to_string(),
            created_at: 0,
        }
    }

    #[test]
    fn test_totals_per_column() {
        let columns = vec![
            Column::new(1, "Novos Leads".to_string(), 0, "org".to_string()),
            Column::new(2, "Fechado".to_string(), 1, "org".to_string()),
        ];
        let leads = vec![
            lead(1, Some(1), Some(1000)),
            lead(2, Some(2), Some(2550)),
            lead(3, Some(2), None),
            lead(4, Some(99), Some(5)),
        ];

        let summary = PipelineSummary::compute(&columns, &leads);
        assert_eq!(summary.total_leads, 4);
        assert_eq!(summary.total_value.to_string(), "35.55");
        assert_eq!(summary.columns[0].lead_count, 1);
        assert_eq!(summary.columns[1].lead_count, 2);
        assert_eq!(summary.columns[1].total_value.to_string(), "25.50");
        assert_eq!(summary.unplaced_leads, 1);
    }
}
