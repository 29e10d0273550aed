//! v001: products, product_image_refs.

use rusqlite::Connection;

use lookalike_core::errors::LookalikeResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> LookalikeResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS products (
            id          INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS product_image_refs (
            product_id  INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            position    INTEGER NOT NULL,
            reference   TEXT NOT NULL,
            PRIMARY KEY (product_id, reference)
        );

        CREATE INDEX IF NOT EXISTS idx_image_refs_product ON product_image_refs(product_id, position);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
