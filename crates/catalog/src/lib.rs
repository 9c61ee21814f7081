//! Product catalog.
//!
//! The catalog is built once at startup (from the built-in sample or a JSON
//! file) and is read-only afterwards. Carts and wishlists refer to its
//! products by `ProductId` only.

pub mod catalog;
pub mod product;

pub use catalog::{Catalog, CatalogLoadError};
pub use product::{Product, ProductId, ProductKind};
