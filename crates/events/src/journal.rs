//! Append-only in-memory journal of a session's events.

use uuid::Uuid;

use bazaar_core::{DomainResult, ExpectedVersion, SessionId};

use crate::envelope::EventEnvelope;
use crate::event::Event;

/// In-memory append-only event journal for one session.
///
/// Holds every stream of the session in a single, globally ordered list; the
/// per-stream sequence numbers are derived from it. Nothing is persisted.
#[derive(Debug, Clone)]
pub struct EventJournal<E> {
    session_id: SessionId,
    entries: Vec<EventEnvelope<E>>,
}

impl<E: Event> EventJournal<E> {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            entries: Vec::new(),
        }
    }

    /// Current version (last sequence number, 0 when empty) of a stream.
    pub fn stream_version(&self, aggregate_type: &str) -> u64 {
        self.stream(aggregate_type)
            .last()
            .map(EventEnvelope::sequence_number)
            .unwrap_or(0)
    }

    /// Append a batch of events to one stream.
    ///
    /// Fails with `Conflict` when the stream is not at `expected_version`;
    /// nothing is appended in that case. Returns the committed envelopes.
    pub fn append(
        &mut self,
        aggregate_type: &str,
        expected_version: ExpectedVersion,
        events: Vec<E>,
    ) -> DomainResult<&[EventEnvelope<E>]> {
        let current = self.stream_version(aggregate_type);
        expected_version.check(current)?;

        let start = self.entries.len();
        let mut next = current + 1;
        for event in events {
            tracing::info!(
                session = %self.session_id,
                aggregate = aggregate_type,
                sequence = next,
                event_type = event.event_type(),
                "event recorded"
            );
            self.entries.push(EventEnvelope::new(
                Uuid::now_v7(),
                self.session_id,
                aggregate_type,
                next,
                event,
            ));
            next += 1;
        }

        Ok(&self.entries[start..])
    }

    /// Events of one stream, in sequence order.
    pub fn stream<'a>(
        &'a self,
        aggregate_type: &'a str,
    ) -> impl Iterator<Item = &'a EventEnvelope<E>> + Clone + 'a {
        self.entries
            .iter()
            .filter(move |e| e.aggregate_type() == aggregate_type)
    }

    /// All events of the session, in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &EventEnvelope<E>> + Clone {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
