//! SQL operations, each taking a borrowed connection.

pub mod maintenance;
pub mod product_ops;
pub mod vector_ops;
