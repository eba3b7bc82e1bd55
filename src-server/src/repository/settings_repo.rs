//! Settings Repository
//!
//! One settings row per organization.

use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainResult, Settings, ViewMode};
use super::db::{db_err, open_conn, SharedConnection};

pub struct SettingsRepository {
    conn: SharedConnection,
}

impl SettingsRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    pub async fn load(&self, organization_id: &str) -> DomainResult<Option<Settings>> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        conn.query_row(
            "SELECT id, organization_id, company_name, email, view_mode FROM settings WHERE organization_id = ?",
            params![organization_id],
            |row| {
                Ok(Settings {
                    id: row.get(0)?,
                    organization_id: row.get(1)?,
                    company_name: row.get(2)?,
                    email: row.get(3)?,
                    // Unrecognised stored values fall back to the board view.
                    view_mode: row
                        .get::<_, Option<String>>(4)?
                        .and_then(|mode| mode.parse::<ViewMode>().ok())
                        .unwrap_or_default(),
                })
            },
        )
        .optional()
        .map_err(db_err)
    }

    /// Insert or replace the organization's settings
    pub async fn save(&self, settings: &Settings) -> DomainResult<Settings> {
        let guard = self.conn.lock().await;
        let conn = open_conn(&guard)?;

        conn.execute(
            "INSERT INTO settings (organization_id, company_name, email, view_mode) VALUES (?, ?, ?, ?)
             ON CONFLICT(organization_id) DO UPDATE SET
                company_name = excluded.company_name,
                email = excluded.email,
                view_mode = excluded.view_mode",
            params![
                settings.organization_id,
                settings.company_name,
                settings.email,
                settings.view_mode.as_str()
            ],
        )
        .map_err(db_err)?;

        let id: u32 = conn
            .query_row(
                "SELECT id FROM settings WHERE organization_id = ?",
                params![settings.organization_id],
                |row| row.get(0),
            )
            .map_err(db_err)?;

        Ok(Settings {
            id,
            ..settings.clone()
        })
    }
}
