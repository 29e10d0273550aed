//! v002: product_images (durable vector records).
//!
//! AUTOINCREMENT keeps persistent ids monotonic: an id is never reused
//! after its row is deleted.

use rusqlite::Connection;

use lookalike_core::errors::LookalikeResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> LookalikeResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS product_images (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id    INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            image_path    TEXT NOT NULL UNIQUE,
            vector        BLOB NOT NULL,
            dimensions    INTEGER NOT NULL,
            original_path TEXT,
            remote_path   TEXT,
            created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_product_images_product ON product_images(product_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
