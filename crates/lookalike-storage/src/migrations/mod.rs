//! Numbered schema migrations, tracked in `schema_version`.

mod v001_catalog_tables;
mod v002_vector_tables;

use rusqlite::{params, Connection};
use tracing::info;

use lookalike_core::errors::{LookalikeResult, StorageError};

use crate::to_storage_err;

type Migration = fn(&Connection) -> LookalikeResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[
    (1, v001_catalog_tables::migrate),
    (2, v002_vector_tables::migrate),
];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 2;

/// Apply every migration newer than the recorded schema version.
pub fn run_migrations(conn: &Connection) -> LookalikeResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current = current_version(conn)?;
    for (version, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("migration v{version:03} begin: {e}")))?;
        migrate(&tx).map_err(|e| StorageError::MigrationFailed {
            version: *version,
            reason: e.to_string(),
        })?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![version],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        tx.commit()
            .map_err(|e| to_storage_err(format!("migration v{version:03} commit: {e}")))?;
        info!(version, "applied schema migration");
    }
    Ok(LATEST_VERSION.max(current))
}

/// Highest applied schema version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> LookalikeResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
