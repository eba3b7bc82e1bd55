//! Database Connection and Setup
//!
//! Manages the SQLite connection and schema migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{DomainError, DomainResult};

/// Shared handle to the single SQLite connection
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConnection,
}

impl DbState {
    pub fn new() -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Shared connection handle for repositories
    pub fn shared(&self) -> SharedConnection {
        self.conn.clone()
    }
}

impl Default for DbState {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a SQLite failure into the domain error space.
pub(crate) fn db_err(e: rusqlite::Error) -> DomainError {
    DomainError::Internal(e.to_string())
}

pub(crate) fn not_initialized() -> DomainError {
    DomainError::Internal("Database not initialized".to_string())
}

/// Borrow the open connection out of a lock guard.
pub(crate) fn open_conn<'a>(guard: &'a MutexGuard<'_, Option<Connection>>) -> DomainResult<&'a Connection> {
    guard.as_ref().ok_or_else(not_initialized)
}

/// Initialize database at `db_path` (`:memory:` for an in-memory store)
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = if db_path == Path::new(":memory:") {
        Connection::open_in_memory()
    } else {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| DomainError::Internal(format!("Failed to create db dir: {}", e)))?;
        }
        Connection::open(db_path)
    }
    .map_err(|e| DomainError::Internal(format!("Failed to open db: {}", e)))?;

    conn.execute_batch("PRAGMA foreign_keys = ON;").map_err(db_err)?;
    run_migrations(&conn)?;
    log::info!("Database ready at {}", db_path.display());

    let state = DbState::new();
    *state.conn.lock().await = Some(conn);
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", table))
        .map_err(db_err)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(db_err)?;
    for name in names {
        if name.map_err(db_err)? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS columns (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            \"order\" INTEGER NOT NULL DEFAULT 0,
            organization_id TEXT NOT NULL,
            color TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_columns_org ON columns(organization_id);

        CREATE TABLE IF NOT EXISTS leads (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            company TEXT,
            email TEXT,
            whatsapp TEXT,
            status TEXT NOT NULL,
            column_id INTEGER REFERENCES columns(id),
            position INTEGER NOT NULL DEFAULT 0,
            organization_id TEXT NOT NULL,
            notes TEXT,
            value_cents INTEGER,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_leads_org ON leads(organization_id);
        CREATE INDEX IF NOT EXISTS idx_leads_column ON leads(column_id);

        CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id TEXT NOT NULL UNIQUE,
            company_name TEXT,
            email TEXT,
            view_mode TEXT DEFAULT 'kanban'
        );",
    )
    .map_err(db_err)?;

    // Campaign attribution arrived after the first release.
    if !column_exists(conn, "leads", "campaign_source")? {
        conn.execute("ALTER TABLE leads ADD COLUMN campaign_source TEXT", [])
            .map_err(|e| DomainError::Internal(format!("Failed to add campaign_source: {}", e)))?;
    }

    Ok(())
}
