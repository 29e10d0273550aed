//! Connections: one serialized writer plus, for file-backed databases, a
//! round-robin pool of read-only connections.

pub mod pragmas;
mod read_pool;
mod write_connection;

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use lookalike_core::errors::LookalikeResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

pub struct ConnectionPool {
    pub writer: WriteConnection,
    /// `None` for in-memory databases, where a second connection would be
    /// a separate empty database.
    pub readers: Option<ReadPool>,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    /// The writer opens first so the file exists and is in WAL mode before
    /// readers attach.
    pub fn open(path: &Path, read_pool_size: usize) -> LookalikeResult<Self> {
        let writer = WriteConnection::open(path)?;
        let readers = ReadPool::open(path, read_pool_size)?;
        Ok(Self {
            writer,
            readers: Some(readers),
            db_path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> LookalikeResult<Self> {
        Ok(Self {
            writer: WriteConnection::open_in_memory()?,
            readers: None,
            db_path: None,
        })
    }

    /// Run a read-only closure on a pooled reader, or on the writer when
    /// there is no pool.
    pub fn read<F, T>(&self, f: F) -> LookalikeResult<T>
    where
        F: FnOnce(&Connection) -> LookalikeResult<T>,
    {
        match &self.readers {
            Some(readers) => readers.with_conn(f),
            None => self.writer.with_conn_sync(f),
        }
    }
}
