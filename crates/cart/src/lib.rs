//! Shopping cart domain module (event-sourced).
//!
//! Business rules for the session cart, implemented purely as deterministic
//! domain logic (no IO). Prices are always read from the catalog at the time
//! a total is computed; entries only hold a product id and a quantity.

pub mod cart;

pub use cart::{
    AddItem, Cart, CartCheckedOut, CartCommand, CartEntry, CartEvent, CartLine, Checkout,
    EditQuantity, ItemAdded, ItemRemoved, QuantityChanged, RemoveItem,
};
