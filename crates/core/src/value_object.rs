//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values; two
/// `Money` amounts of `2.50` are the same value wherever they came from. To
/// "change" one, build a new one (`Money::times`, `Quantity::checked_add`).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
