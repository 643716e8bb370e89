//! Owned listener and observer handles.

use input_dropdown_core::{Document, ListenerId, ObserverId};

/// Every registration a widget made on its document, released together.
#[derive(Debug, Default)]
pub struct Subscriptions {
    listeners: Vec<ListenerId>,
    observers: Vec<ObserverId>,
}

impl Subscriptions {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an event listener.
    pub fn listen(&mut self, id: ListenerId) {
        self.listeners.push(id);
    }

    /// Track a mutation observer.
    pub fn observe(&mut self, id: ObserverId) {
        self.observers.push(id);
    }

    /// Number of tracked handles.
    pub fn len(&self) -> usize {
        self.listeners.len() + self.observers.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unregister everything. Returns how many handles were still live.
    pub fn release(&mut self, document: &Document) -> usize {
        let listeners = self
            .listeners
            .drain(..)
            .filter(|&id| document.remove_event_listener(id))
            .count();
        let observers = self
            .observers
            .drain(..)
            .filter(|&id| document.disconnect_observer(id))
            .count();
        tracing::debug!(target: "input_dropdown::widget", listeners, observers, "released subscriptions");
        listeners + observers
    }
}
