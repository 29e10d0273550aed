mod embedding_error;
mod index_error;
mod lookalike_error;
mod storage_error;

pub use embedding_error::EmbeddingError;
pub use index_error::IndexError;
pub use lookalike_error::{LookalikeError, LookalikeResult};
pub use storage_error::StorageError;
