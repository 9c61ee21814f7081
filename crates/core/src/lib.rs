//! `bazaar-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the catalog, cart
//! and wishlist crates (no IO, no console concerns).

pub mod aggregate;
pub mod error;
pub mod id;
pub mod money;
pub mod quantity;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use error::{DomainError, DomainResult};
pub use id::SessionId;
pub use money::Money;
pub use quantity::Quantity;
pub use value_object::ValueObject;
