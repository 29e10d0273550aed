//! Per-connection PRAGMAs.

use rusqlite::Connection;

use lookalike_core::errors::LookalikeResult;

use crate::to_storage_err;

const WRITER_PRAGMAS: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
    PRAGMA busy_timeout = 5000;
    PRAGMA foreign_keys = ON;
";

// journal_mode is a property of the file; readers only observe it.
const READER_PRAGMAS: &str = "
    PRAGMA query_only = ON;
    PRAGMA busy_timeout = 5000;
";

pub fn apply_pragmas(conn: &Connection) -> LookalikeResult<()> {
    conn.execute_batch(WRITER_PRAGMAS)
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn apply_read_pragmas(conn: &Connection) -> LookalikeResult<()> {
    conn.execute_batch(READER_PRAGMAS)
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Current journal mode, lowercased (`"wal"`, `"memory"`, ...).
pub fn journal_mode(conn: &Connection) -> LookalikeResult<String> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.to_ascii_lowercase())
}
