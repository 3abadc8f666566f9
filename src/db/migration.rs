use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::utils::{now_millis, to_epoch_millis};

/// Individual migration with version metadata.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub up: &'static str,
}

impl Migration {
    /// Creates a new migration.
    pub const fn new(version: u32, description: &'static str, up: &'static str) -> Self {
        Self {
            version,
            description,
            up,
        }
    }

    /// Checks if this migration has been applied to the database.
    pub fn is_applied(&self, conn: &Connection) -> Result<bool> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = ?1)",
            [self.version],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Applies this migration and records it in `schema_migrations`,
    /// both inside one transaction.
    pub fn apply(&self, conn: &mut Connection) -> Result<()> {
        let tx = conn.transaction()?;

        tx.execute_batch(self.up)
            .with_context(|| format!("migration {} failed", self.version))?;

        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at, description) VALUES (?1, ?2, ?3)",
            rusqlite::params![self.version, to_epoch_millis(now_millis()), self.description],
        )?;

        tx.commit()?;
        Ok(())
    }
}

/// Registry of all migrations in version order.
pub const MIGRATIONS: &[Migration] = &[
    Migration::new(
        1,
        "Initial schema: create tasting_notes table",
        include_str!("migrations/001_initial_schema.sql"),
    ),
    Migration::new(
        2,
        "Add indexes for recency listing and unsynced lookup",
        include_str!("migrations/002_listing_indexes.sql"),
    ),
];

/// Applies all pending migrations in version order.
///
/// Returns the number of migrations applied by this call.
pub fn apply_pending_migrations(conn: &mut Connection) -> Result<usize> {
    ensure_migration_table_exists(conn)?;

    let mut applied = 0;
    for migration in MIGRATIONS {
        if !migration.is_applied(conn)? {
            migration.apply(conn)?;
            tracing::info!(
                version = migration.version,
                description = migration.description,
                "applied migration"
            );
            applied += 1;
        }
    }

    Ok(applied)
}

/// Highest applied migration version, or 0 on a fresh database.
pub fn current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> =
        conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })?;
    Ok(version.unwrap_or(0))
}

/// Creates the schema_migrations table if it doesn't exist.
fn ensure_migration_table_exists(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL,
            description TEXT
        );
        "#,
    )?;
    Ok(())
}
