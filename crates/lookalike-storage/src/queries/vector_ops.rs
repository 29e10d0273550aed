//! Vector record persistence, keyed by image reference.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use lookalike_core::errors::{LookalikeResult, StorageError};
use lookalike_core::ids::{PersistentId, ProductId};
use lookalike_core::models::{NewVectorRecord, UpsertOutcome, VectorRecord};

use crate::to_storage_err;

const RECORD_COLUMNS: &str =
    "v.id, v.product_id, v.vector, v.image_path, v.original_path, v.remote_path, v.created_at";

/// Columns as they come off the wire, before blob and timestamp decoding.
struct RawRecord {
    id: i64,
    product_id: i64,
    blob: Vec<u8>,
    image_path: String,
    original_path: Option<String>,
    remote_path: Option<String>,
    created_at: String,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            product_id: row.get(1)?,
            blob: row.get(2)?,
            image_path: row.get(3)?,
            original_path: row.get(4)?,
            remote_path: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn decode(self) -> LookalikeResult<VectorRecord> {
        let vector = bytes_to_f32_vec(&self.blob).ok_or(StorageError::CorruptVector {
            id: self.id,
            len: self.blob.len(),
        })?;
        Ok(VectorRecord {
            persistent_id: PersistentId(self.id),
            product_id: ProductId(self.product_id),
            vector,
            image_reference: self.image_path,
            original_path: self.original_path,
            remote_reference: self.remote_path,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

/// Insert a record, or replace the one holding the same image reference.
/// A replaced record keeps its persistent id, and keeps its original and
/// remote paths unless the new record supplies them.
pub fn upsert_record(
    conn: &Connection,
    record: &NewVectorRecord,
) -> LookalikeResult<UpsertOutcome> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM product_images WHERE image_path = ?1",
            params![record.image_reference],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO product_images
            (product_id, image_path, vector, dimensions, original_path, remote_path)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(image_path) DO UPDATE SET
            product_id = excluded.product_id,
            vector = excluded.vector,
            dimensions = excluded.dimensions,
            original_path = COALESCE(excluded.original_path, product_images.original_path),
            remote_path = COALESCE(excluded.remote_path, product_images.remote_path)",
        params![
            record.product_id.0,
            record.image_reference,
            f32_vec_to_bytes(&record.vector),
            record.vector.len() as i64,
            record.original_path,
            record.remote_reference,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(match existing {
        Some(id) => UpsertOutcome {
            persistent_id: PersistentId(id),
            replaced: true,
        },
        None => UpsertOutcome {
            persistent_id: PersistentId(conn.last_insert_rowid()),
            replaced: false,
        },
    })
}

/// Every record ascending by persistent id.
pub fn scan_ordered(conn: &Connection) -> LookalikeResult<Vec<VectorRecord>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM product_images v ORDER BY v.id ASC");
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], RawRecord::from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut records = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        records.push(raw.decode()?);
    }
    Ok(records)
}

pub fn get_record(conn: &Connection, id: PersistentId) -> LookalikeResult<Option<VectorRecord>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM product_images v WHERE v.id = ?1");
    let raw = conn
        .query_row(&sql, params![id.0], RawRecord::from_row)
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    raw.map(RawRecord::decode).transpose()
}

/// Records for `ids` whose product row still exists, in input order.
/// Unknown ids are absent from the result.
pub fn get_live_records(
    conn: &Connection,
    ids: &[PersistentId],
) -> LookalikeResult<Vec<VectorRecord>> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM product_images v
         JOIN products p ON p.id = v.product_id
         WHERE v.id = ?1"
    );
    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut records = Vec::with_capacity(ids.len());
    for id in ids {
        let raw = stmt
            .query_row(params![id.0], RawRecord::from_row)
            .optional()
            .map_err(|e| to_storage_err(e.to_string()))?;
        if let Some(raw) = raw {
            records.push(raw.decode()?);
        }
    }
    Ok(records)
}

pub fn count_records(conn: &Connection) -> LookalikeResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM product_images", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

/// Run `f` inside `BEGIN IMMEDIATE … COMMIT`, rolling back on error.
pub fn in_write_unit<F, T>(conn: &Connection, f: F) -> LookalikeResult<T>
where
    F: FnOnce(&Connection) -> LookalikeResult<T>,
{
    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| to_storage_err(format!("begin write unit: {e}")))?;
    match f(conn) {
        Ok(value) => {
            conn.execute_batch("COMMIT")
                .map_err(|e| to_storage_err(format!("commit write unit: {e}")))?;
            Ok(value)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

/// Convert f32 slice to bytes (little-endian).
pub fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert little-endian bytes back to f32s. `None` if the length is not
/// a multiple of 4.
pub fn bytes_to_f32_vec(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    )
}

fn parse_timestamp(raw: &str) -> LookalikeResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad timestamp {raw:?}: {e}")))
}
