//! Domain events emitted by the model and the floorplan

use uuid::Uuid;

/// Lifecycle events fired by [`crate::Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    /// A single item was placed. The payload may be absent, in which case
    /// consumers ignore the event.
    NewItem(Option<Uuid>),
    /// The whole item collection was replaced.
    Loaded,
}

/// Topology events fired by [`crate::Floorplan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorplanEvent {
    /// Rooms or walls were added, removed or replaced.
    NewRoomsAdded,
}

/// FIFO queue of pending events, drained by the consumer once per frame.
#[derive(Debug, Clone)]
pub struct EventQueue<E> {
    pending: Vec<E>,
}

impl<E: PartialEq> EventQueue<E> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Append an event
    pub fn push(&mut self, event: E) {
        self.pending.push(event);
    }

    /// Append an event unless the last pending event is identical.
    ///
    /// Used for topology events where consecutive duplicates would only
    /// trigger redundant rebuilds.
    pub fn push_coalesced(&mut self, event: E) {
        if self.pending.last() != Some(&event) {
            self.pending.push(event);
        }
    }

    /// Take all pending events in emission order
    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.pending)
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if there are no pending events
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<E: PartialEq> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let mut queue = EventQueue::new();
        let id = Uuid::new_v4();
        queue.push(ModelEvent::Loaded);
        queue.push(ModelEvent::NewItem(Some(id)));

        assert_eq!(
            queue.drain(),
            vec![ModelEvent::Loaded, ModelEvent::NewItem(Some(id))]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_coalesced_skips_repeats() {
        let mut queue = EventQueue::new();
        queue.push_coalesced(FloorplanEvent::NewRoomsAdded);
        queue.push_coalesced(FloorplanEvent::NewRoomsAdded);
        assert_eq!(queue.len(), 1);
    }
}
