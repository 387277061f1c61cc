//! fOS DOM - Document Object Model
//!
//! Memory-efficient DOM tree plus the host services focus management
//! builds on: selector queries, element geometry and visibility, and
//! keyboard/focus event delivery.

mod node;
mod tree;
mod document;
mod element;
mod geometry;
mod selector;
mod dom_events;
mod event_target;
mod focusable;

pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::{Ancestors, Children, Descendants, DomTree};
pub use document::Document;
pub use element::ElementQuery;
pub use geometry::{DOMRect, ElementGeometry};
pub use selector::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    MatchContext, PseudoClass, SelectorComponent, SelectorError, SelectorList,
};
pub use dom_events::{DomEvent, EventType, FocusEvent, Key, KeyModifiers, KeyboardEvent};
pub use event_target::{ListenerId, ListenerRegistry};
pub use focusable::{effective_tab_index, TabIndex};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The document node
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this is not the NONE sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// DOM mutation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("Cannot insert {child:?} under {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
