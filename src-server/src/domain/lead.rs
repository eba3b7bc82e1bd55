//! Lead Entity
//!
//! A prospective customer tracked through the pipeline columns.

use serde::{Deserialize, Deserializer, Serialize};

use super::entity::{non_blank, DomainError, DomainResult, Entity};
use super::value::{LeadValue, ValueInput};

/// Status assigned to newly created leads
pub const DEFAULT_LEAD_STATUS: &str = "active";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: u32,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub campaign_source: Option<String>,
    pub notes: Option<String>,
    pub value: Option<LeadValue>,
    pub status: String,
    /// Owning column; `None` only for leads written before columns existed
    pub column_id: Option<u32>,
    /// Ordering within the column, lower first
    pub position: i32,
    pub organization_id: String,
    /// Unix milliseconds
    pub created_at: i64,
}

impl Entity for Lead {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn organization_id(&self) -> &str {
        &self.organization_id
    }
}

impl Lead {
    /// Case-insensitive match against the searchable text fields.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        std::iter::once(Some(&self.name))
            .chain([
                self.company.as_ref(),
                self.email.as_ref(),
                self.whatsapp.as_ref(),
                self.notes.as_ref(),
            ])
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// New-lead form as submitted by the board dialog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewLead {
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub campaign_source: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub value: Option<ValueInput>,
}

/// Validated new lead, ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct LeadDraft {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub whatsapp: String,
    pub campaign_source: Option<String>,
    pub notes: Option<String>,
    pub value: Option<LeadValue>,
}

impl NewLead {
    /// Check required fields and clean optional ones.
    pub fn validate(self) -> DomainResult<LeadDraft> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("Lead name is required".to_string()));
        }
        let whatsapp = non_blank(self.whatsapp)
            .ok_or_else(|| DomainError::InvalidInput("WhatsApp contact is required".to_string()))?;
        let raw_value = self.value.map(|v| v.as_text());

        Ok(LeadDraft {
            name,
            company: non_blank(self.company),
            email: non_blank(self.email),
            whatsapp,
            campaign_source: non_blank(self.campaign_source),
            notes: non_blank(self.notes),
            value: LeadValue::normalize(raw_value.as_deref())?,
        })
    }
}

/// Partial lead update.
///
/// Outer `None` means the field was absent and is left untouched; for
/// nullable fields `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub company: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub whatsapp: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub campaign_source: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub value: Option<Option<ValueInput>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub column_id: Option<Option<u32>>,
    #[serde(default)]
    pub position: Option<i32>,
}

/// Distinguish an explicit `null` from an absent key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl LeadPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.company.is_none()
            && self.email.is_none()
            && self.whatsapp.is_none()
            && self.campaign_source.is_none()
            && self.notes.is_none()
            && self.value.is_none()
            && self.status.is_none()
            && self.column_id.is_none()
            && self.position.is_none()
    }

    /// Overwrite only the fields present in the patch.
    pub fn apply_to(&self, lead: &mut Lead) -> DomainResult<()> {
        if let Some(name) = &self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::InvalidInput("Lead name is required".to_string()));
            }
            lead.name = name.to_string();
        }
        if let Some(company) = &self.company {
            lead.company = non_blank(company.clone());
        }
        if let Some(email) = &self.email {
            lead.email = non_blank(email.clone());
        }
        if let Some(whatsapp) = &self.whatsapp {
            lead.whatsapp = non_blank(whatsapp.clone());
        }
        if let Some(source) = &self.campaign_source {
            lead.campaign_source = non_blank(source.clone());
        }
        if let Some(notes) = &self.notes {
            lead.notes = non_blank(notes.clone());
        }
        if let Some(value) = &self.value {
            let raw = value.as_ref().map(ValueInput::as_text);
            lead.value = LeadValue::normalize(raw.as_deref())?;
        }
        if let Some(status) = &self.status {
            lead.status = status.clone();
        }
        if let Some(column_id) = self.column_id {
            lead.column_id = column_id;
        }
        if let Some(position) = self.position {
            lead.position = position;
        }
        Ok(())
    }
}
