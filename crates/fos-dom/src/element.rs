//! Element Query and Methods
//!
//! querySelector, querySelectorAll, matches.

use crate::{Document, NodeId, SelectorError, SelectorList};

/// Element query trait
pub trait ElementQuery {
    /// Query single element by CSS selector
    fn query_selector(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError>;

    /// Query all descendants of `root` matching a CSS selector list, in
    /// tree order, each element at most once
    fn query_selector_all(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError>;

    /// Check if element matches selector
    fn matches(&self, element: NodeId, selector: &str) -> Result<bool, SelectorError>;
}

impl ElementQuery for Document {
    fn query_selector(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        let cx = self.match_context();
        Ok(self.tree().descendants(root).find(|&node| list.matches(node, &cx)))
    }

    fn query_selector_all(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        let cx = self.match_context();
        let found: Vec<_> = self
            .tree()
            .descendants(root)
            .filter(|&node| list.matches(node, &cx))
            .collect();
        tracing::trace!("query_selector_all({:?}) matched {} elements", selector, found.len());
        Ok(found)
    }

    fn matches(&self, element: NodeId, selector: &str) -> Result<bool, SelectorError> {
        let list = SelectorList::parse(selector)?;
        Ok(list.matches(element, &self.match_context()))
    }
}
