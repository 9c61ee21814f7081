//! Wishlist domain module (event-sourced).
//!
//! A set of products the shopper is interested in. Wishlisted products are
//! never priced into cart totals.

pub mod wishlist;

pub use wishlist::{
    AddItem, ItemAdded, ItemRemoved, RemoveItem, Wishlist, WishlistCommand, WishlistEvent,
};
