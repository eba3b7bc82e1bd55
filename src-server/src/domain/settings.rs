//! Settings Entity
//!
//! One record per organization holding display preferences and archive
//! metadata.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::entity::{non_blank, DomainError, Entity};

/// How the dashboard presents leads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Kanban,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Kanban => "kanban",
            ViewMode::List => "list",
        }
    }
}

impl FromStr for ViewMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kanban" => Ok(ViewMode::Kanban),
            "list" => Ok(ViewMode::List),
            other => Err(DomainError::InvalidInput(format!("Unknown view mode: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// 0 until persisted
    pub id: u32,
    pub organization_id: String,
    pub company_name: Option<String>,
    /// Archive contact email
    pub email: Option<String>,
    pub view_mode: ViewMode,
}

impl Settings {
    pub fn defaults_for(organization_id: &str) -> Self {
        Self {
            id: 0,
            organization_id: organization_id.to_string(),
            company_name: None,
            email: None,
            view_mode: ViewMode::default(),
        }
    }
}

impl Entity for Settings {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn organization_id(&self) -> &str {
        &self.organization_id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub view_mode: Option<ViewMode>,
}

impl SettingsPatch {
    pub fn apply_to(self, settings: &mut Settings) {
        if self.company_name.is_some() {
            settings.company_name = non_blank(self.company_name);
        }
        if self.email.is_some() {
            settings.email = non_blank(self.email);
        }
        if let Some(mode) = self.view_mode {
            settings.view_mode = mode;
        }
    }
}
