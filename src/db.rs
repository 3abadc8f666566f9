mod migration;
mod schema;

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub use migration::{MIGRATIONS, Migration, current_version};
pub use schema::{NOTE_COLUMNS, NOTES_TABLE, select_list};

/// Database wrapper providing connection management and schema initialization.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens an in-memory SQLite database.
    ///
    /// Automatically applies migrations on connection open.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn)
    }

    /// Opens a file-based SQLite database at the given path.
    ///
    /// Creates the database file if it does not exist.
    /// Automatically applies migrations on connection open.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Self::initialize(conn)
    }

    /// Applies pending migrations, then checks the column mapping.
    fn initialize(mut conn: Connection) -> Result<Self> {
        migration::apply_pending_migrations(&mut conn)?;
        schema::verify_note_columns(&conn).context("Schema does not match note mapping")?;
        Ok(Self { conn })
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests;
