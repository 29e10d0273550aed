mod image_payload;
mod product;
mod progress;
mod search_hit;
mod vector_record;

pub use image_payload::{ImagePayload, ResolvedImage};
pub use product::Product;
pub use progress::{ProductStatus, RebuildProgressEvent};
pub use search_hit::SearchHit;
pub use vector_record::{NewVectorRecord, UpsertOutcome, VectorRecord};
