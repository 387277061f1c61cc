//! Host Environment
//!
//! The capabilities a focus scope consumes from whatever owns the visual
//! tree. `fos_dom::Document` implements this in `dom_host.rs`.

use std::fmt::Debug;

use crate::TrapError;

/// Notifications a scope subscribes to on its root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObserverKind {
    /// Key presses bubbling up from inside the root
    KeyDown,
    /// Focus arriving on the root or a descendant
    FocusIn,
}

/// Host environment trait
pub trait FocusHost {
    /// Element handle, compared by identity
    type Element: Copy + Eq + Debug;
    /// Listener registration handle
    type Listener: Copy + Eq + Debug;

    /// Descendants of `root` matching a comma-separated selector list, in
    /// tree order
    fn query_all(&self, root: Self::Element, selectors: &str) -> Result<Vec<Self::Element>, TrapError>;

    /// Whether the element is rendered with a non-empty box and not hidden
    fn is_visible(&self, element: Self::Element) -> bool;

    /// Move input focus, returning whether it moved
    fn focus(&mut self, element: Self::Element) -> bool;

    /// Remove focus from whatever element holds it
    fn blur_active(&mut self);

    /// The element currently holding focus
    fn active_element(&self) -> Option<Self::Element>;

    /// Subscribe to `kind` notifications on `target`
    fn add_listener(&mut self, target: Self::Element, kind: ObserverKind) -> Self::Listener;

    /// Unsubscribe, returning whether the listener was registered
    fn remove_listener(&mut self, target: Self::Element, kind: ObserverKind, listener: Self::Listener) -> bool;
}
