//! Event Listener Registry
//!
//! Tracks which listeners are attached to which node for which event type.
//! Listeners are opaque ids; whoever registered one decides what to run
//! when the document reports it fired.

use std::collections::HashMap;

use crate::{EventType, NodeId};

/// Handle returned by `add_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Event listener storage
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    /// node -> event type -> listeners in registration order
    listeners: HashMap<NodeId, HashMap<EventType, Vec<ListenerId>>>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event listener
    pub fn add_listener(&mut self, node: NodeId, event_type: EventType) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        self.listeners
            .entry(node)
            .or_default()
            .entry(event_type)
            .or_default()
            .push(id);

        id
    }

    /// Remove an event listener, returning whether it was registered
    pub fn remove_listener(&mut self, node: NodeId, event_type: EventType, listener: ListenerId) -> bool {
        let Some(by_type) = self.listeners.get_mut(&node) else {
            return false;
        };
        let Some(ids) = by_type.get_mut(&event_type) else {
            return false;
        };
        let Some(pos) = ids.iter().position(|&id| id == listener) else {
            return false;
        };
        ids.remove(pos);
        if ids.is_empty() {
            by_type.remove(&event_type);
        }
        if by_type.is_empty() {
            self.listeners.remove(&node);
        }
        true
    }

    /// Listeners for a node and event type
    pub fn listeners(&self, node: NodeId, event_type: EventType) -> &[ListenerId] {
        self.listeners
            .get(&node)
            .and_then(|by_type| by_type.get(&event_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
