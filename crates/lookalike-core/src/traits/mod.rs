mod catalog;
mod embedding;
mod image_store;
mod vector_storage;

pub use catalog::ICatalog;
pub use embedding::IEmbeddingProvider;
pub use image_store::IImageStore;
pub use vector_storage::IVectorStorage;
