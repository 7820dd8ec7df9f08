//! Catalog types: categories and products.

mod category;
mod product;
mod service;

pub use category::*;
pub use product::*;
pub use service::{CategoryService, ProductService};
