use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_core::SessionId;

/// Envelope for an event, containing session + stream metadata.
///
/// This is the unit appended to the session journal.
///
/// Notes:
/// - A session owns one stream per aggregate type (`"cart"`, `"wishlist"`).
/// - **Append-only**: `sequence_number` is monotonically increasing per stream,
///   starting at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    session_id: SessionId,
    aggregate_type: String,

    /// Position in the aggregate stream.
    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        session_id: SessionId,
        aggregate_type: impl Into<String>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            session_id,
            aggregate_type: aggregate_type.into(),
            sequence_number,
            payload,
        }
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }
}
