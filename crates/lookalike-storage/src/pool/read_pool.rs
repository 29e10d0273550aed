//! Read-only connections handed out round-robin. Under WAL they never
//! block on the writer.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use lookalike_core::errors::LookalikeResult;

use super::pragmas::apply_read_pragmas;
use crate::to_storage_err;

const MAX_READERS: usize = 8;

pub struct ReadPool {
    slots: Box<[Mutex<Connection>]>,
    cursor: AtomicUsize,
}

impl ReadPool {
    /// Open `size` readers, clamped to `1..=8`.
    pub fn open(path: &Path, size: usize) -> LookalikeResult<Self> {
        let slots = (0..size.clamp(1, MAX_READERS))
            .map(|_| open_reader(path).map(Mutex::new))
            .collect::<LookalikeResult<Vec<_>>>()?
            .into_boxed_slice();
        debug!(readers = slots.len(), path = %path.display(), "read pool opened");
        Ok(Self {
            slots,
            cursor: AtomicUsize::new(0),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> LookalikeResult<T>
    where
        F: FnOnce(&Connection) -> LookalikeResult<T>,
    {
        let slot = &self.slots[self.cursor.fetch_add(1, Ordering::Relaxed) % self.slots.len()];
        let conn = slot
            .lock()
            .map_err(|e| to_storage_err(format!("reader lock poisoned: {e}")))?;
        f(&conn)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

fn open_reader(path: &Path) -> LookalikeResult<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags).map_err(|e| to_storage_err(e.to_string()))?;
    apply_read_pragmas(&conn)?;
    Ok(conn)
}
