//! Focusability
//!
//! Tab index parsing and the native focusable-element rules used for
//! programmatic focus and for the document's own sequential navigation.

use crate::node::ElementData;

/// Tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// Negative tabindex: focusable by script, skipped by Tab
    Programmatic,
    /// tabindex="0" or positive
    Sequential(i32),
}

impl TabIndex {
    /// Parse a `tabindex` attribute value; garbage means "no tabindex"
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Some(Self::Programmatic),
            Ok(n) => Some(Self::Sequential(n)),
            Err(_) => None,
        }
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }

    /// Ordering key for sequential navigation: positive values first in
    /// ascending order, then zero
    pub(crate) fn sequence_key(&self) -> Option<u32> {
        match self {
            Self::Programmatic => None,
            Self::Sequential(0) => Some(u32::MAX),
            Self::Sequential(n) => Some(*n as u32),
        }
    }
}

/// Whether the element is focusable without a tabindex attribute
fn is_natively_focusable(element: &ElementData) -> bool {
    match element.tag_name() {
        "a" | "area" => element.has_attr("href"),
        "input" => !element.get_attr("type").is_some_and(|t| t.eq_ignore_ascii_case("hidden")),
        "button" | "select" | "textarea" | "summary" | "iframe" => true,
        _ => false,
    }
}

fn is_disabled_control(element: &ElementData) -> bool {
    matches!(element.tag_name(), "button" | "input" | "select" | "textarea") && element.has_attr("disabled")
}

/// Effective tab index of an element, `None` when it cannot take focus
///
/// Rendering is not considered here; callers combine this with the
/// document's visibility checks.
pub fn effective_tab_index(element: &ElementData) -> Option<TabIndex> {
    if is_disabled_control(element) {
        return None;
    }
    match element.get_attr("tabindex").and_then(TabIndex::parse) {
        Some(explicit) => Some(explicit),
        None if is_natively_focusable(element) => Some(TabIndex::Sequential(0)),
        None => None,
    }
}
