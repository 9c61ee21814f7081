use chrono::{DateTime, Utc};

/// A fact recorded by a cart or wishlist.
///
/// Once emitted an event is never edited; the journal only appends.
pub trait Event: Clone + core::fmt::Debug + 'static {
    /// Dotted name such as `"cart.item.added"`; stable across releases.
    fn event_type(&self) -> &'static str;

    /// Payload schema version.
    fn version(&self) -> u32;

    /// Wall-clock time at which the command that produced it was issued.
    fn occurred_at(&self) -> DateTime<Utc>;
}
