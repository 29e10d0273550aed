mod l1_memory;

pub use l1_memory::{content_key, VectorCache};
