//! # lookalike-storage
//!
//! SQLite persistence layer: the product catalog collaborator and the
//! durable vector record store, behind one connection pool.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use lookalike_core::errors::{LookalikeError, StorageError};

/// Convert a rusqlite failure message into the workspace error type.
pub(crate) fn to_storage_err(message: String) -> LookalikeError {
    StorageError::SqliteError { message }.into()
}
