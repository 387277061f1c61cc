//! Document - High-level document API
//!
//! Owns the tree plus the state a focus-aware host needs: element boxes,
//! the active element, registered listeners, and a queue of pending
//! events. Events are not delivered by callbacks; the owner drains the
//! queue with [`Document::next_event`], runs whatever it associated with
//! the fired listeners, then calls [`Document::finish_event`] so the
//! document can run its default action.

use std::collections::{HashMap, VecDeque};

use crate::focusable::effective_tab_index;
use crate::geometry::inline_style_value;
use crate::selector::MatchContext;
use crate::{
    DOMRect, DomError, DomEvent, DomTree, ElementGeometry, EventType, FocusEvent, Key,
    KeyModifiers, KeyboardEvent, ListenerId, ListenerRegistry, NodeId,
};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    /// Border boxes assigned by the owner (there is no layout pass)
    boxes: HashMap<NodeId, DOMRect>,
    /// Currently focused element
    active_element: Option<NodeId>,
    listeners: ListenerRegistry,
    queue: VecDeque<DomEvent>,
}

impl Document {
    /// Create a new document with `<html>`, `<head>` and `<body>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes always link cleanly
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            boxes: HashMap::new(),
            active_element: None,
            listeners: ListenerRegistry::new(),
            queue: VecDeque::new(),
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.tree.create_element(tag_name)
    }

    /// Append `child` to `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.tree.append_child(parent, child)
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.element(node).and_then(|e| e.id()) == Some(id))
    }

    /// Read an attribute
    pub fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.tree.element(element)?.get_attr(name)
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.tree
            .element_mut(element)
            .ok_or(DomError::NotAnElement(element))?
            .set_attr(name, value);
        Ok(())
    }

    /// Assign the element's border box
    pub fn set_layout(&mut self, element: NodeId, rect: DOMRect) {
        self.boxes.insert(element, rect);
    }

    /// The element's border box (empty until assigned)
    pub fn layout_box(&self, element: NodeId) -> DOMRect {
        self.boxes.get(&element).copied().unwrap_or_default()
    }

    /// Whether the element or an ancestor is `display: none`, or it is detached
    pub fn is_display_none(&self, element: NodeId) -> bool {
        if !self.tree.is_connected(element) {
            return true;
        }
        std::iter::once(element)
            .chain(self.tree.ancestors(element))
            .any(|node| self.style_value(node, "display") == Some("none"))
    }

    fn style_value(&self, element: NodeId, property: &str) -> Option<&str> {
        let style = self.get_attribute(element, "style")?;
        inline_style_value(style, property)
    }

    /// Offset geometry (`offsetWidth`, `offsetHeight`, `offsetParent`)
    pub fn geometry(&self, element: NodeId) -> ElementGeometry {
        if self.tree.element(element).is_none() || self.is_display_none(element) {
            return ElementGeometry::default();
        }
        let rect = self.layout_box(element);
        ElementGeometry {
            offset_top: rect.y,
            offset_left: rect.x,
            offset_width: rect.width,
            offset_height: rect.height,
            offset_parent: self.offset_parent(element),
        }
    }

    fn offset_parent(&self, element: NodeId) -> Option<NodeId> {
        if element == self.html_element || element == self.body_element {
            return None;
        }
        if self.style_value(element, "position") == Some("fixed") {
            return None;
        }
        let mut topmost = None;
        for ancestor in self.tree.ancestors(element) {
            if self.tree.element(ancestor).is_none() {
                break;
            }
            let positioned = self
                .style_value(ancestor, "position")
                .is_some_and(|p| p != "static");
            if positioned || ancestor == self.body_element {
                return Some(ancestor);
            }
            topmost = Some(ancestor);
        }
        topmost
    }

    /// Rendered and non-empty: no `hidden` attribute, non-zero offset size,
    /// and an offset parent
    pub fn is_visible(&self, element: NodeId) -> bool {
        let Some(data) = self.tree.element(element) else {
            return false;
        };
        if data.has_attr("hidden") {
            return false;
        }
        let geometry = self.geometry(element);
        geometry.offset_width > 0.0 && geometry.offset_height > 0.0 && geometry.offset_parent.is_some()
    }

    /// Whether `focus()` on the element would succeed
    pub fn is_focusable(&self, element: NodeId) -> bool {
        let Some(data) = self.tree.element(element) else {
            return false;
        };
        effective_tab_index(data).is_some() && !data.has_attr("hidden") && !self.is_display_none(element)
    }

    /// Selector matching context for this document
    pub fn match_context(&self) -> MatchContext<'_> {
        MatchContext {
            tree: &self.tree,
            focused: self.active_element,
        }
    }

    /// Currently focused element
    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element
    }

    /// Focus an element, queueing `focusout`/`focusin` notifications
    ///
    /// Returns false when the element cannot take focus or already has it.
    pub fn focus(&mut self, element: NodeId) -> bool {
        if self.active_element == Some(element) || !self.is_focusable(element) {
            return false;
        }
        let previous = self.active_element.replace(element);
        if let Some(previous) = previous {
            self.queue.push_back(DomEvent::Focus(FocusEvent::new(
                EventType::FocusOut,
                previous,
                Some(element),
            )));
        }
        self.queue.push_back(DomEvent::Focus(FocusEvent::new(
            EventType::FocusIn,
            element,
            previous,
        )));
        tracing::trace!("focus {:?} -> {:?}", previous, element);
        true
    }

    /// Remove focus from the active element
    pub fn blur(&mut self) -> Option<NodeId> {
        let previous = self.active_element.take()?;
        self.queue.push_back(DomEvent::Focus(FocusEvent::new(
            EventType::FocusOut,
            previous,
            None,
        )));
        tracing::trace!("blur {:?}", previous);
        Some(previous)
    }

    /// Register a listener on `node`
    pub fn add_event_listener(&mut self, node: NodeId, event_type: EventType) -> ListenerId {
        self.listeners.add_listener(node, event_type)
    }

    /// Unregister a listener
    pub fn remove_event_listener(&mut self, node: NodeId, event_type: EventType, listener: ListenerId) -> bool {
        self.listeners.remove_listener(node, event_type, listener)
    }

    /// Registered listeners for `node` and `event_type`
    pub fn event_listeners(&self, node: NodeId, event_type: EventType) -> &[ListenerId] {
        self.listeners.listeners(node, event_type)
    }

    /// Total registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Queue a `keydown` on the focused element (or `<body>`)
    pub fn press_key(&mut self, key: Key, modifiers: KeyModifiers) {
        let target = self.active_element.unwrap_or(self.body_element);
        self.dispatch_event(DomEvent::Key(KeyboardEvent::key_down(target, key).with_modifiers(modifiers)));
    }

    /// Queue an arbitrary event
    pub fn dispatch_event(&mut self, event: DomEvent) {
        self.queue.push_back(event);
    }

    /// Number of events waiting
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Pop the next event with the listeners it fires, target first then
    /// each ancestor
    pub fn next_event(&mut self) -> Option<(DomEvent, Vec<ListenerId>)> {
        let event = self.queue.pop_front()?;
        let event_type = event.event_type();
        let target = event.target();

        let fired = std::iter::once(target)
            .chain(self.tree.ancestors(target))
            .flat_map(|node| self.listeners.listeners(node, event_type).iter().copied())
            .collect();

        Some((event, fired))
    }

    /// Run the default action of a dispatched event unless it was prevented
    pub fn finish_event(&mut self, event: &DomEvent) {
        if event.is_default_prevented() {
            return;
        }
        if let DomEvent::Key(key) = event {
            if key.event_type == EventType::KeyDown && key.is_tab() {
                self.sequential_focus(!key.modifiers.shift);
            }
        }
    }

    /// Elements reachable with Tab, in navigation order
    pub fn sequential_focus_order(&self) -> Vec<NodeId> {
        let mut order: Vec<(u32, NodeId)> = self
            .tree
            .descendants(self.tree.root())
            .filter(|&node| self.is_visible(node) && self.is_focusable(node))
            .filter_map(|node| {
                let key = effective_tab_index(self.tree.element(node)?)?.sequence_key()?;
                Some((key, node))
            })
            .collect();
        // Stable: equal keys keep tree order
        order.sort_by_key(|(key, _)| *key);
        order.into_iter().map(|(_, node)| node).collect()
    }

    /// Native Tab handling: move to the next/previous sequentially
    /// focusable element, wrapping around the document
    pub fn sequential_focus(&mut self, forward: bool) -> Option<NodeId> {
        let order = self.sequential_focus_order();
        let last = order.len().checked_sub(1)?;
        let current = self
            .active_element
            .and_then(|active| order.iter().position(|&node| node == active));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => last,
            (Some(i), true) if i < last => i + 1,
            (Some(_), true) => 0,
            (Some(0), false) => last,
            (Some(i), false) => i - 1,
        };
        let target = order[next];
        self.focus(target);
        Some(target)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(doc: &mut Document, parent: NodeId) -> NodeId {
        let el = doc.create_element("button");
        doc.append_child(parent, el).unwrap();
        doc.set_layout(el, DOMRect::from_xywh(0.0, 0.0, 80.0, 24.0));
        el
    }

    #[test]
    fn test_document_structure() {
        let doc = Document::default();
        assert_eq!(doc.url(), "about:blank");
        assert_eq!(doc.tree().parent(doc.body()), doc.document_element());
        assert_eq!(doc.tree().parent(doc.head()), doc.document_element());
    }

    #[test]
    fn test_visibility_rules() {
        let mut doc = Document::default();
        let body = doc.body();
        let shown = button(&mut doc, body);
        assert!(doc.is_visible(shown));
        assert_eq!(doc.geometry(shown).offset_parent, Some(body));

        let zero = doc.create_element("button");
        doc.append_child(body, zero).unwrap();
        assert!(!doc.is_visible(zero));

        let hidden = button(&mut doc, body);
        doc.set_attribute(hidden, "hidden", "").unwrap();
        assert!(!doc.is_visible(hidden));

        let wrapper = doc.create_element("div");
        doc.append_child(body, wrapper).unwrap();
        doc.set_attribute(wrapper, "style", "display: none").unwrap();
        let inside = button(&mut doc, wrapper);
        assert!(!doc.is_visible(inside));
        assert_eq!(doc.geometry(inside).offset_width, 0.0);

        let fixed = button(&mut doc, body);
        doc.set_attribute(fixed, "style", "position: fixed").unwrap();
        assert!(!doc.is_visible(fixed));

        let detached = doc.create_element("button");
        doc.set_layout(detached, DOMRect::from_xywh(0.0, 0.0, 10.0, 10.0));
        assert!(!doc.is_visible(detached));
    }

    #[test]
    fn test_offset_parent_prefers_positioned_ancestor() {
        let mut doc = Document::default();
        let body = doc.body();
        let panel = doc.create_element("div");
        doc.append_child(body, panel).unwrap();
        doc.set_attribute(panel, "style", "position: relative").unwrap();
        let el = button(&mut doc, panel);
        assert_eq!(doc.geometry(el).offset_parent, Some(panel));
    }

    #[test]
    fn test_focus_queues_events() {
        let mut doc = Document::default();
        let body = doc.body();
        let first = button(&mut doc, body);
        let second = button(&mut doc, body);
        let plain = doc.create_element("div");
        doc.append_child(body, plain).unwrap();

        assert!(doc.focus(first));
        assert!(!doc.focus(first));
        assert!(!doc.focus(plain));
        assert!(doc.focus(second));
        assert_eq!(doc.active_element(), Some(second));
        assert_eq!(doc.pending_events(), 3);

        let (event, _) = doc.next_event().unwrap();
        assert_eq!(event.event_type(), EventType::FocusIn);
        assert_eq!(event.target(), first);
        let (event, _) = doc.next_event().unwrap();
        assert_eq!(event.event_type(), EventType::FocusOut);
        let (event, _) = doc.next_event().unwrap();
        assert_eq!(event.target(), second);

        assert_eq!(doc.blur(), Some(second));
        assert_eq!(doc.active_element(), None);
        assert_eq!(doc.blur(), None);
    }

    #[test]
    fn test_listeners_fire_along_bubble_path() {
        let mut doc = Document::default();
        let body = doc.body();
        let el = button(&mut doc, body);
        let on_body = doc.add_event_listener(body, EventType::FocusIn);
        let on_el = doc.add_event_listener(el, EventType::FocusIn);
        let unrelated = doc.add_event_listener(body, EventType::KeyDown);

        doc.focus(el);
        let (_, fired) = doc.next_event().unwrap();
        assert_eq!(fired, vec![on_el, on_body]);

        assert!(doc.remove_event_listener(body, EventType::KeyDown, unrelated));
        assert_eq!(doc.listener_count(), 2);
    }

    #[test]
    fn test_native_tab_navigation() {
        let mut doc = Document::default();
        let body = doc.body();
        let a = button(&mut doc, body);
        let b = button(&mut doc, body);
        let c = button(&mut doc, body);
        doc.set_attribute(c, "tabindex", "1").unwrap();
        let skipped = button(&mut doc, body);
        doc.set_attribute(skipped, "tabindex", "-1").unwrap();

        assert_eq!(doc.sequential_focus_order(), vec![c, a, b]);

        doc.press_key(Key::Tab, KeyModifiers::default());
        while let Some((event, _)) = doc.next_event() {
            doc.finish_event(&event);
        }
        assert_eq!(doc.active_element(), Some(c));

        doc.press_key(Key::Tab, KeyModifiers::SHIFT);
        while let Some((event, _)) = doc.next_event() {
            doc.finish_event(&event);
        }
        assert_eq!(doc.active_element(), Some(b));
    }

    #[test]
    fn test_legacy_tab_key_code_navigates() {
        let mut doc = Document::default();
        let body = doc.body();
        let a = button(&mut doc, body);
        let b = button(&mut doc, body);
        doc.focus(a);
        let _ = doc.next_event();

        let event = KeyboardEvent::key_down(a, Key::Unidentified(String::new())).with_key_code(9);
        doc.dispatch_event(DomEvent::Key(event));
        while let Some((event, _)) = doc.next_event() {
            doc.finish_event(&event);
        }
        assert_eq!(doc.active_element(), Some(b));
    }

    #[test]
    fn test_prevented_tab_has_no_default_action() {
        let mut doc = Document::default();
        let body = doc.body();
        let a = button(&mut doc, body);
        button(&mut doc, body);
        doc.focus(a);
        let _ = doc.next_event();

        doc.press_key(Key::Tab, KeyModifiers::default());
        let (mut event, _) = doc.next_event().unwrap();
        event.prevent_default();
        doc.finish_event(&event);
        assert_eq!(doc.active_element(), Some(a));
    }

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::default();
        let body = doc.body();
        let el = button(&mut doc, body);
        doc.set_attribute(el, "id", "save").unwrap();
        assert_eq!(doc.get_element_by_id("save"), Some(el));
        assert_eq!(doc.get_element_by_id("missing"), None);
        assert!(doc.set_attribute(doc.tree().root(), "id", "x").is_err());
    }
}
