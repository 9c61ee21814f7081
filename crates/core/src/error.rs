//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (unknown ids,
/// bad quantities, stock limits). Console and file concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An unknown product id, or a missing cart/wishlist entry.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A quantity was zero, negative, not an integer, or out of range.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// The requested quantity exceeds what the catalog has available.
    #[error("insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: u64,
        available: u32,
    },

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A conflict occurred (duplicate id, stale version).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl core::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn insufficient_stock(product: impl Into<String>, requested: u64, available: u32) -> Self {
        Self::InsufficientStock {
            product: product.into(),
            requested,
            available,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_invalid_quantity(&self) -> bool {
        matches!(self, Self::InvalidQuantity(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = DomainError::not_found("product", "001A");
        assert_eq!(err.to_string(), "product not found: 001A");
        assert!(err.is_not_found());
    }

    #[test]
    fn insufficient_stock_message_includes_counts() {
        let err = DomainError::insufficient_stock("Pen", 12, 10);
        assert_eq!(
            err.to_string(),
            "insufficient stock for Pen: requested 12, available 10"
        );
    }
}
