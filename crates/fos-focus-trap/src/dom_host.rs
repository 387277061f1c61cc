//! fOS Document Host
//!
//! Runs focus scopes against a `fos_dom::Document`: the `FocusHost`
//! implementation, routing of fired listeners to the scope that owns
//! them, and the event pump.

use fos_dom::{Document, DomEvent, ElementQuery, EventType, ListenerId, NodeId};
use tracing::{trace, warn};

use crate::host::{FocusHost, ObserverKind};
use crate::scope::FocusScope;
use crate::TrapError;

/// Upper bound on events drained by one [`pump`] call
pub const MAX_EVENTS_PER_PUMP: usize = 1024;

impl From<ObserverKind> for EventType {
    fn from(kind: ObserverKind) -> Self {
        match kind {
            ObserverKind::KeyDown => EventType::KeyDown,
            ObserverKind::FocusIn => EventType::FocusIn,
        }
    }
}

impl FocusHost for Document {
    type Element = NodeId;
    type Listener = ListenerId;

    fn query_all(&self, root: NodeId, selectors: &str) -> Result<Vec<NodeId>, TrapError> {
        Ok(self.query_selector_all(root, selectors)?)
    }

    fn is_visible(&self, element: NodeId) -> bool {
        Document::is_visible(self, element)
    }

    fn focus(&mut self, element: NodeId) -> bool {
        Document::focus(self, element)
    }

    fn blur_active(&mut self) {
        self.blur();
    }

    fn active_element(&self) -> Option<NodeId> {
        Document::active_element(self)
    }

    fn add_listener(&mut self, target: NodeId, kind: ObserverKind) -> ListenerId {
        self.add_event_listener(target, kind.into())
    }

    fn remove_listener(&mut self, target: NodeId, kind: ObserverKind, listener: ListenerId) -> bool {
        self.remove_event_listener(target, kind.into(), listener)
    }
}

impl FocusScope<Document> {
    /// Run the observer behind `listener` if this scope owns it
    ///
    /// Returns false for listeners registered by someone else.
    pub fn handle_event(
        &mut self,
        doc: &mut Document,
        listener: ListenerId,
        event: &mut DomEvent,
    ) -> Result<bool, TrapError> {
        if self.key_down_listener() == Some(listener) {
            if let DomEvent::Key(key) = event {
                self.handle_key_down(doc, key)?;
            }
            return Ok(true);
        }
        if self.focus_in_listener() == Some(listener) {
            if let DomEvent::Focus(focus) = event {
                self.handle_focus_in(doc, focus.target)?;
            }
            return Ok(true);
        }
        Ok(false)
    }
}

/// Drain the document's event queue
///
/// Each event runs every fired listener to completion, in propagation
/// order, before the document applies its default action and the next
/// event is taken. Focus moves made by handlers queue new events that are
/// drained in the same call. Returns the number of events processed.
pub fn pump(doc: &mut Document, scopes: &mut [FocusScope<Document>]) -> Result<usize, TrapError> {
    let mut processed = 0;
    while let Some((mut event, fired)) = doc.next_event() {
        processed += 1;
        if processed > MAX_EVENTS_PER_PUMP {
            warn!("event pump gave up after {} events", MAX_EVENTS_PER_PUMP);
            return Err(TrapError::EventStorm(MAX_EVENTS_PER_PUMP));
        }
        trace!("dispatch {} on {:?} to {} listeners", event.event_type().as_str(), event.target(), fired.len());

        for listener in fired {
            let mut claimed = false;
            for scope in scopes.iter_mut() {
                if scope.handle_event(doc, listener, &mut event)? {
                    claimed = true;
                    break;
                }
            }
            if !claimed {
                trace!("listener {:?} has no scope", listener);
            }
        }
        doc.finish_event(&event);
    }
    Ok(processed)
}
