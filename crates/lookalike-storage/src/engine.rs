//! StorageEngine: owns the ConnectionPool and implements both the vector
//! record store and the product catalog.

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info, warn};

use lookalike_core::config::StorageConfig;
use lookalike_core::errors::LookalikeResult;
use lookalike_core::ids::{PersistentId, ProductId};
use lookalike_core::models::{NewVectorRecord, Product, UpsertOutcome, VectorRecord};
use lookalike_core::traits::{ICatalog, IVectorStorage};

use crate::migrations;
use crate::pool::{pragmas, ConnectionPool};
use crate::queries::{maintenance, product_ops, vector_ops};

pub struct StorageEngine {
    pool: ConnectionPool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path, read_pool_size: usize) -> LookalikeResult<Self> {
        let engine = Self {
            pool: ConnectionPool::open(path, read_pool_size)?,
        };
        engine.initialize()?;
        let mode = engine.pool.writer.with_conn_sync(pragmas::journal_mode)?;
        if mode != "wal" {
            warn!(
                path = %path.display(),
                journal_mode = %mode,
                "WAL unavailable, readers may block on writes"
            );
        }
        info!(path = %path.display(), "storage opened");
        Ok(engine)
    }

    /// Open according to `[storage]` config. `":memory:"` selects an
    /// in-memory database.
    pub fn from_config(config: &StorageConfig) -> LookalikeResult<Self> {
        if config.db_path == ":memory:" {
            Self::open_in_memory()
        } else {
            Self::open(Path::new(&config.db_path), config.read_pool_size)
        }
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> LookalikeResult<Self> {
        let engine = Self {
            pool: ConnectionPool::open_in_memory()?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> LookalikeResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            let version = migrations::run_migrations(conn)?;
            debug!(schema_version = version, "migrations complete");
            Ok(())
        })
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    fn with_reader<F, T>(&self, f: F) -> LookalikeResult<T>
    where
        F: FnOnce(&Connection) -> LookalikeResult<T>,
    {
        self.pool.read(f)
    }

    pub fn integrity_check(&self) -> LookalikeResult<bool> {
        self.pool.writer.with_conn_sync(maintenance::integrity_check)
    }

    pub fn vacuum(&self) -> LookalikeResult<()> {
        self.pool.writer.with_conn_sync(maintenance::full_vacuum)
    }

    pub fn schema_version(&self) -> LookalikeResult<u32> {
        self.with_reader(migrations::current_version)
    }
}

impl IVectorStorage for StorageEngine {
    fn upsert_with_product(
        &self,
        product: &Product,
        record: &NewVectorRecord,
    ) -> LookalikeResult<UpsertOutcome> {
        self.pool.writer.with_conn_sync(|conn| {
            vector_ops::in_write_unit(conn, |conn| {
                product_ops::upsert_product_row(conn, product)?;
                for reference in &product.image_references {
                    product_ops::attach_image_ref(conn, product.id, reference)?;
                }
                product_ops::attach_image_ref(conn, product.id, &record.image_reference)?;
                vector_ops::upsert_record(conn, record)
            })
        })
    }

    fn upsert_batch(&self, records: &[NewVectorRecord]) -> LookalikeResult<Vec<UpsertOutcome>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        self.pool.writer.with_conn_sync(|conn| {
            vector_ops::in_write_unit(conn, |conn| {
                records
                    .iter()
                    .map(|record| vector_ops::upsert_record(conn, record))
                    .collect()
            })
        })
    }

    fn scan_ordered(&self) -> LookalikeResult<Vec<VectorRecord>> {
        self.with_reader(vector_ops::scan_ordered)
    }

    fn get_record(&self, id: PersistentId) -> LookalikeResult<Option<VectorRecord>> {
        self.with_reader(|conn| vector_ops::get_record(conn, id))
    }

    fn get_live_records(&self, ids: &[PersistentId]) -> LookalikeResult<Vec<VectorRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.with_reader(|conn| vector_ops::get_live_records(conn, ids))
    }

    fn count_records(&self) -> LookalikeResult<usize> {
        self.with_reader(vector_ops::count_records)
    }
}

impl ICatalog for StorageEngine {
    fn upsert_product(&self, product: &Product) -> LookalikeResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            vector_ops::in_write_unit(conn, |conn| {
                product_ops::upsert_product_row(conn, product)?;
                product_ops::replace_image_refs(conn, product.id, &product.image_references)
            })
        })
    }

    fn get_product(&self, id: ProductId) -> LookalikeResult<Option<Product>> {
        self.with_reader(|conn| product_ops::get_product(conn, id))
    }

    fn delete_product(&self, id: ProductId) -> LookalikeResult<bool> {
        let deleted = self
            .pool
            .writer
            .with_conn_sync(|conn| product_ops::delete_product(conn, id))?;
        if deleted {
            info!(product_id = %id, "product deleted with its vector records");
        }
        Ok(deleted)
    }

    fn image_references(&self, id: ProductId) -> LookalikeResult<Vec<String>> {
        self.with_reader(|conn| product_ops::image_refs(conn, id))
    }

    fn products_pending_index(&self) -> LookalikeResult<Vec<Product>> {
        self.with_reader(product_ops::pending_index)
    }
}
