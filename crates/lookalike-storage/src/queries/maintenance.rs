//! Integrity check and vacuum.

use rusqlite::Connection;

use lookalike_core::errors::LookalikeResult;

use crate::to_storage_err;

/// Run `PRAGMA integrity_check`. Returns true if the database is healthy.
pub fn integrity_check(conn: &Connection) -> LookalikeResult<bool> {
    let result: String = conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(result == "ok")
}

/// Rebuild the database file, reclaiming pages freed by deletions.
pub fn full_vacuum(conn: &Connection) -> LookalikeResult<()> {
    conn.execute_batch("VACUUM")
        .map_err(|e| to_storage_err(e.to_string()))
}
