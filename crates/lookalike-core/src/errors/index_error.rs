/// In-memory index errors.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("vector dimension mismatch: index holds {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("index lock poisoned: {details}")]
    LockPoisoned { details: String },
}
