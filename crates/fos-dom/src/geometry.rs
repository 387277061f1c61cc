//! Geometry APIs
//!
//! DOMRect, offset properties, and the inline-style bits that decide
//! whether an element produces a box at all.

use crate::NodeId;

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Offset geometry of an element, as exposed by `offsetWidth`,
/// `offsetHeight` and `offsetParent`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementGeometry {
    pub offset_top: f64,
    pub offset_left: f64,
    pub offset_width: f64,
    pub offset_height: f64,
    /// `None` when the element is not rendered, is fixed-positioned,
    /// or is `<html>`/`<body>`
    pub offset_parent: Option<NodeId>,
}

/// Parse inline style string into property-value pairs
pub(crate) fn parse_inline_style(style: &str) -> impl Iterator<Item = (&str, &str)> {
    style.split(';').filter_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            return None;
        }
        Some((name, value))
    })
}

/// Value of `property` in an inline style, last declaration wins
pub(crate) fn inline_style_value<'a>(style: &'a str, property: &str) -> Option<&'a str> {
    parse_inline_style(style)
        .filter(|(name, _)| name.eq_ignore_ascii_case(property))
        .last()
        .map(|(_, value)| value.trim_end_matches("!important").trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_rect() {
        let rect = DOMRect::from_xywh(10.0, 20.0, 100.0, 50.0);
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (10.0, 20.0, 100.0, 50.0));
        assert_eq!(DOMRect::default().width, 0.0);
    }

    #[test]
    fn test_inline_style_value() {
        let style = "color: red; display:none ; display: block !important;";
        assert_eq!(inline_style_value(style, "display"), Some("block"));
        assert_eq!(inline_style_value(style, "COLOR"), Some("red"));
        assert_eq!(inline_style_value(style, "position"), None);
        assert_eq!(inline_style_value("garbage;;:", "display"), None);
    }
}
