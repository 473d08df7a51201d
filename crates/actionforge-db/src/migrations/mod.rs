//! Embedded schema migrations.
//!
//! Each entry of [`MIGRATIONS`] is applied at most once, in version order,
//! inside its own transaction. Applied versions are recorded in
//! `schema_migrations`.

use rusqlite::{params, Connection};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration {version} ({name}) failed: {source}")]
    Failed {
        version: usize,
        name: &'static str,
        source: rusqlite::Error,
    },
}

/// `(version, name, sql)`, strictly increasing by version.
const MIGRATIONS: &[(usize, &str, &str)] = &[(1, "initial", include_str!("001_initial.sql"))];

const LEDGER: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
)";

/// Apply every migration newer than the recorded version.
///
/// Returns how many were applied; `0` when the schema is already current.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    conn.execute_batch("PRAGMA foreign_keys = ON")?;
    let from = current_version(conn)?;

    let mut applied = 0;
    for &(version, name, sql) in MIGRATIONS.iter().filter(|(v, _, _)| *v > from) {
        let failed = |source| MigrationError::Failed {
            version,
            name,
            source,
        };

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql).map_err(failed)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            params![version, name],
        )
        .map_err(failed)?;
        tx.commit().map_err(failed)?;

        tracing::info!(version, name, "Applied migration");
        applied += 1;
    }

    if applied == 0 {
        tracing::debug!(version = from, "Schema is up to date");
    }
    Ok(applied)
}

/// Highest applied version, `0` for a fresh database.
pub fn current_version(conn: &Connection) -> Result<usize, MigrationError> {
    conn.execute_batch(LEDGER)?;
    let version: Option<usize> =
        conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| row.get(0))?;
    Ok(version.unwrap_or(0))
}

pub fn latest_version() -> usize {
    MIGRATIONS.last().map_or(0, |&(version, _, _)| version)
}
