use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Result, RosterError, StorageContext};

/// Create the `students` table if it is missing. Safe to run on every start:
/// existing rows are never touched. The layout matches files written by
/// earlier versions of the roster, so nullable text columns stay nullable.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            address TEXT,
            phone TEXT,
            attendance INTEGER DEFAULT 0,
            homework_score INTEGER DEFAULT 0
        )",
        [],
    )
    .storage("failed to create students table")?;
    debug!("students table ready");
    Ok(())
}

/// Owner of the single SQLite connection used for the whole session.
///
/// The connection is acquired once by [`RecordStore::open`] and released by
/// [`RecordStore::close`]. Every mutating statement runs in autocommit mode,
/// so a successful return means the change is already on disk.
pub struct RecordStore {
    pub(crate) conn: Connection,
}

impl RecordStore {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| RosterError::Io {
                    context: "failed to create data directory",
                    source,
                })?;
            }
        }

        let conn = Connection::open(path).storage("failed to open SQLite database")?;
        init_schema(&conn)?;
        info!(path = %path.display(), "opened student database");
        Ok(Self { conn })
    }

    /// Fresh private database, used by tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().storage("failed to open in-memory database")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn init_schema(&self) -> Result<()> {
        init_schema(&self.conn)
    }

    /// Release the connection. A failed close is reported rather than
    /// swallowed; the handle is dropped either way.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .storage("failed to close SQLite database")?;
        info!("closed student database");
        Ok(())
    }
}
