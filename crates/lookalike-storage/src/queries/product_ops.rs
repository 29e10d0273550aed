//! Product catalog rows and their ordered image reference lists.

use rusqlite::{params, Connection, OptionalExtension};

use lookalike_core::errors::LookalikeResult;
use lookalike_core::ids::ProductId;
use lookalike_core::models::Product;

use crate::to_storage_err;

/// Insert or rename a product. Does not touch its image references.
pub fn upsert_product_row(conn: &Connection, product: &Product) -> LookalikeResult<()> {
    conn.execute(
        "INSERT INTO products (id, name) VALUES (?1, ?2)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        params![product.id.0, product.name],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Replace the product's image reference list with `references`, keeping
/// their order. Duplicates after the first occurrence are dropped.
pub fn replace_image_refs(
    conn: &Connection,
    product_id: ProductId,
    references: &[String],
) -> LookalikeResult<()> {
    conn.execute(
        "DELETE FROM product_image_refs WHERE product_id = ?1",
        params![product_id.0],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let mut stmt = conn
        .prepare_cached(
            "INSERT OR IGNORE INTO product_image_refs (product_id, position, reference)
             VALUES (?1, ?2, ?3)",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    for (position, reference) in references.iter().enumerate() {
        stmt.execute(params![product_id.0, position as i64, reference])
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

/// Append `reference` to the end of the product's list unless already present.
pub fn attach_image_ref(
    conn: &Connection,
    product_id: ProductId,
    reference: &str,
) -> LookalikeResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO product_image_refs (product_id, position, reference)
         VALUES (
            ?1,
            (SELECT COALESCE(MAX(position) + 1, 0) FROM product_image_refs WHERE product_id = ?1),
            ?2
         )",
        params![product_id.0, reference],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn image_refs(conn: &Connection, product_id: ProductId) -> LookalikeResult<Vec<String>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT reference FROM product_image_refs
             WHERE product_id = ?1 ORDER BY position, reference",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![product_id.0], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn get_product(conn: &Connection, id: ProductId) -> LookalikeResult<Option<Product>> {
    let name: Option<String> = conn
        .query_row(
            "SELECT name FROM products WHERE id = ?1",
            params![id.0],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match name {
        Some(name) => Ok(Some(Product {
            id,
            name,
            image_references: image_refs(conn, id)?,
        })),
        None => Ok(None),
    }
}

/// Delete a product. Its image references and vector records go with it
/// through `ON DELETE CASCADE`.
pub fn delete_product(conn: &Connection, id: ProductId) -> LookalikeResult<bool> {
    let affected = conn
        .execute("DELETE FROM products WHERE id = ?1", params![id.0])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(affected > 0)
}

/// Products with at least one image reference and no vector record,
/// ascending by id.
pub fn pending_index(conn: &Connection) -> LookalikeResult<Vec<Product>> {
    let mut stmt = conn
        .prepare(
            "SELECT p.id, p.name FROM products p
             WHERE EXISTS (SELECT 1 FROM product_image_refs r WHERE r.product_id = p.id)
               AND NOT EXISTS (SELECT 1 FROM product_images v WHERE v.product_id = p.id)
             ORDER BY p.id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((ProductId(row.get::<_, i64>(0)?), row.get::<_, String>(1)?))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut products = Vec::new();
    for row in rows {
        let (id, name) = row.map_err(|e| to_storage_err(e.to_string()))?;
        products.push(Product {
            id,
            name,
            image_references: image_refs(conn, id)?,
        });
    }
    Ok(products)
}
