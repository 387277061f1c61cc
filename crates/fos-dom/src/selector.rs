//! Selector Grammar
//!
//! Parses and matches the CSS selector subset used by `querySelectorAll`:
//!
//! - type, universal, `#id` and `.class` selectors
//! - attribute selectors `[a]`, `[a=v]`, `[a~=v]`, `[a|=v]`, `[a^=v]`,
//!   `[a$=v]`, `[a*=v]` with an optional `i`/`s` flag
//! - pseudo-classes `:not()`, `:is()`, `:where()`, `:disabled`, `:enabled`,
//!   `:checked`, `:first-child`, `:last-child`, `:only-child`, `:empty`,
//!   `:root`, `:focus`, `:link`
//! - descendant (whitespace) and child (`>`) combinators
//! - comma-separated selector lists

use crate::{DomTree, NodeId};

/// Selector parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unexpected character '{found}' at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("Unexpected end of selector")]
    UnexpectedEnd,

    #[error("Unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    #[error("Unsupported pseudo-class :{0}")]
    UnknownPseudoClass(String),
}

/// Comma-separated list of complex selectors
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

/// Compound selectors joined by combinators
///
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

/// Combinator between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
}

/// Simple selectors that must all match one element
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

/// A component of a selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (tag name, lowercased)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :not(), :disabled, etc.
    PseudoClass(PseudoClass),
}

/// Pseudo-class type
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    Link,
    Focus,
    Enabled,
    Disabled,
    Checked,
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    Not(SelectorList),
    Is(SelectorList),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let (matcher, value) = match (&self.matcher, value) {
            (_, None) => return false,
            (None, Some(_)) => return true,
            (Some(matcher), Some(value)) => (matcher, value),
        };

        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        };
        let val = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => val == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                !expected.is_empty() && val.split_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                val == expected || val.starts_with(&format!("{}-", expected))
            }
            // Empty operands never match for the substring family
            AttributeMatcher::Prefix(expected) => !expected.is_empty() && val.starts_with(&fold(expected)),
            AttributeMatcher::Suffix(expected) => !expected.is_empty() && val.ends_with(&fold(expected)),
            AttributeMatcher::Substring(expected) => !expected.is_empty() && val.contains(&fold(expected)),
        }
    }
}

/// Tags whose `disabled` attribute disables them
const FORM_CONTROLS: [&str; 7] = ["button", "input", "select", "textarea", "fieldset", "optgroup", "option"];

/// Everything matching needs beyond the element itself
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub tree: &'a DomTree,
    pub focused: Option<NodeId>,
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser::new(input);
        parser.skip_whitespace();
        if parser.peek().is_none() {
            return Err(SelectorError::Empty);
        }
        let list = parser.parse_list()?;
        parser.skip_whitespace();
        match parser.peek() {
            Some(found) => Err(SelectorError::Unexpected { found, offset: parser.pos }),
            None => Ok(list),
        }
    }

    /// True when any selector in the list matches `element`
    pub fn matches(&self, element: NodeId, cx: &MatchContext<'_>) -> bool {
        self.selectors.iter().any(|s| s.matches(element, cx))
    }
}

impl ComplexSelector {
    pub fn matches(&self, element: NodeId, cx: &MatchContext<'_>) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_at(n - 1, element, cx),
        }
    }

    // Right-to-left with backtracking over descendant combinators
    fn matches_at(&self, index: usize, element: NodeId, cx: &MatchContext<'_>) -> bool {
        if !self.compounds[index].matches(element, cx) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => {
                let parent = cx.tree.parent(element);
                cx.tree.element(parent).is_some() && self.matches_at(index - 1, parent, cx)
            }
            Combinator::Descendant => cx
                .tree
                .ancestors(element)
                .filter(|&a| cx.tree.element(a).is_some())
                .any(|a| self.matches_at(index - 1, a, cx)),
        }
    }
}

impl CompoundSelector {
    pub fn matches(&self, element: NodeId, cx: &MatchContext<'_>) -> bool {
        self.components.iter().all(|c| match_component(c, element, cx))
    }
}

/// Match a selector component against an element
pub fn match_component(component: &SelectorComponent, element: NodeId, cx: &MatchContext<'_>) -> bool {
    let Some(data) = cx.tree.element(element) else {
        return false;
    };
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => data.is(tag),
        SelectorComponent::Id(id) => data.id() == Some(id.as_str()),
        SelectorComponent::Class(class) => data.classes().any(|c| c == class),
        SelectorComponent::Attribute(attr) => attr.matches(data.get_attr(&attr.name)),
        SelectorComponent::PseudoClass(pseudo) => match_pseudo_class(pseudo, element, cx),
    }
}

/// Match a pseudo-class against an element
pub fn match_pseudo_class(pseudo: &PseudoClass, element: NodeId, cx: &MatchContext<'_>) -> bool {
    let Some(data) = cx.tree.element(element) else {
        return false;
    };
    let is_control = FORM_CONTROLS.iter().any(|t| data.is(t));
    let element_siblings = || {
        let parent = cx.tree.parent(element);
        cx.tree
            .children(parent)
            .filter(|(_, n)| n.is_element())
            .map(|(id, _)| id)
            .collect::<Vec<_>>()
    };

    match pseudo {
        PseudoClass::Link => (data.is("a") || data.is("area")) && data.has_attr("href"),
        PseudoClass::Focus => cx.focused == Some(element),
        PseudoClass::Enabled => is_control && !data.has_attr("disabled"),
        PseudoClass::Disabled => is_control && data.has_attr("disabled"),
        PseudoClass::Checked => {
            (data.is("input") && data.has_attr("checked")) || (data.is("option") && data.has_attr("selected"))
        }
        PseudoClass::Root => cx.tree.parent(element) == cx.tree.root(),
        PseudoClass::Empty => cx.tree.children(element).next().is_none(),
        PseudoClass::FirstChild => element_siblings().first() == Some(&element),
        PseudoClass::LastChild => element_siblings().last() == Some(&element),
        PseudoClass::OnlyChild => element_siblings() == [element],
        PseudoClass::Not(list) => !list.matches(element, cx),
        PseudoClass::Is(list) => list.matches(element, cx),
    }
}

/// Recursive-descent selector parser over a `&str`
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(found) => Err(SelectorError::Unexpected { found, offset: self.pos }),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected { found, offset: self.pos },
            None => SelectorError::UnexpectedEnd,
        }
    }

    /// Skip whitespace, returning whether any was consumed
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn parse_list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            if !self.eat(',') {
                break;
            }
        }
        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => {
                    self.bump();
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(c) if had_whitespace && c != ',' && c != ')' => Combinator::Descendant,
                _ => break,
            };
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector { compounds, combinators })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut components = Vec::new();

        if self.eat('*') {
            components.push(SelectorComponent::Universal);
        } else if self.peek().is_some_and(is_ident_start) {
            components.push(SelectorComponent::Type(self.parse_ident()?.to_ascii_lowercase()));
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    components.push(SelectorComponent::Id(self.parse_ident()?));
                }
                Some('.') => {
                    self.bump();
                    components.push(SelectorComponent::Class(self.parse_ident()?));
                }
                Some('[') => {
                    self.bump();
                    components.push(SelectorComponent::Attribute(self.parse_attribute()?));
                }
                Some(':') => {
                    self.bump();
                    components.push(SelectorComponent::PseudoClass(self.parse_pseudo_class()?));
                }
                _ => break,
            }
        }

        if components.is_empty() {
            return Err(self.unexpected());
        }
        Ok(CompoundSelector { components })
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        if !self.peek().is_some_and(is_ident_start) {
            return Err(self.unexpected());
        }
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        if self.eat(']') {
            return Ok(AttributeSelector {
                name,
                matcher: None,
                case_insensitive: false,
            });
        }

        let operator = match self.peek() {
            Some('=') => None,
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                self.bump();
                Some(c)
            }
            _ => return Err(self.unexpected()),
        };
        self.expect('=')?;
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => self.parse_string(quote)?,
            Some(c) if is_ident_char(c) => {
                let start = self.pos;
                while self.peek().is_some_and(is_ident_char) {
                    self.bump();
                }
                self.input[start..self.pos].to_string()
            }
            _ => return Err(self.unexpected()),
        };
        self.skip_whitespace();

        let case_insensitive = match self.peek() {
            Some('i' | 'I') => {
                self.bump();
                true
            }
            Some('s' | 'S') => {
                self.bump();
                false
            }
            _ => false,
        };
        self.skip_whitespace();
        self.expect(']')?;

        let matcher = match operator {
            None => AttributeMatcher::Exact(value),
            Some('~') => AttributeMatcher::Contains(value),
            Some('|') => AttributeMatcher::DashMatch(value),
            Some('^') => AttributeMatcher::Prefix(value),
            Some('$') => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };

        Ok(AttributeSelector {
            name,
            matcher: Some(matcher),
            case_insensitive,
        })
    }

    fn parse_string(&mut self, quote: char) -> Result<String, SelectorError> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(SelectorError::UnterminatedString(start)),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(SelectorError::UnterminatedString(start)),
                },
                Some(c) => value.push(c),
            }
        }
    }

    fn parse_pseudo_class(&mut self) -> Result<PseudoClass, SelectorError> {
        let name = self.parse_ident()?.to_ascii_lowercase();
        let pseudo = match name.as_str() {
            "link" => PseudoClass::Link,
            "focus" => PseudoClass::Focus,
            "enabled" => PseudoClass::Enabled,
            "disabled" => PseudoClass::Disabled,
            "checked" => PseudoClass::Checked,
            "root" => PseudoClass::Root,
            "empty" => PseudoClass::Empty,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "not" | "is" | "where" => {
                self.expect('(')?;
                let list = self.parse_list()?;
                self.skip_whitespace();
                self.expect(')')?;
                if name == "not" {
                    PseudoClass::Not(list)
                } else {
                    PseudoClass::Is(list)
                }
            }
            _ => return Err(SelectorError::UnknownPseudoClass(name)),
        };
        Ok(pseudo)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(tag: &str, attrs: &[(&str, &str)]) -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let el = tree.create_element(tag);
        tree.append_child(tree.root(), el).unwrap();
        for (name, value) in attrs {
            tree.element_mut(el).unwrap().set_attr(name, *value);
        }
        (tree, el)
    }

    fn matches(selector: &str, tree: &DomTree, el: NodeId) -> bool {
        let list = SelectorList::parse(selector).unwrap();
        list.matches(el, &MatchContext { tree, focused: None })
    }

    #[test]
    fn test_parse_default_tabbable_selector() {
        let list = SelectorList::parse(r#"a[href]:not([style*="visibility:hidden"])"#).unwrap();
        assert_eq!(list.selectors.len(), 1);
        let compound = &list.selectors[0].compounds[0];
        assert_eq!(compound.components[0], SelectorComponent::Type("a".into()));
        assert!(matches!(compound.components[2], SelectorComponent::PseudoClass(PseudoClass::Not(_))));
    }

    #[test]
    fn test_selector_list_and_combinators() {
        let list = SelectorList::parse("div > a , .menu  button").unwrap();
        assert_eq!(list.selectors.len(), 2);
        assert_eq!(list.selectors[0].combinators, vec![Combinator::Child]);
        assert_eq!(list.selectors[1].combinators, vec![Combinator::Descendant]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(SelectorList::parse("   "), Err(SelectorError::Empty));
        assert_eq!(SelectorList::parse("a["), Err(SelectorError::UnexpectedEnd));
        assert_eq!(
            SelectorList::parse("a,,b"),
            Err(SelectorError::Unexpected { found: ',', offset: 2 })
        );
        assert_eq!(
            SelectorList::parse("[title='x"),
            Err(SelectorError::UnterminatedString(7))
        );
        assert_eq!(
            SelectorList::parse("a:hover"),
            Err(SelectorError::UnknownPseudoClass("hover".into()))
        );
        assert!(SelectorList::parse("a)").is_err());
    }

    #[test]
    fn test_attribute_matchers() {
        let (tree, el) = tree_with("input", &[("type", "Text"), ("lang", "en-US"), ("class", "a b")]);
        assert!(matches("[type]", &tree, el));
        assert!(!matches("[type=text]", &tree, el));
        assert!(matches("[type=text i]", &tree, el));
        assert!(matches("[lang|=en]", &tree, el));
        assert!(matches("[class~=b]", &tree, el));
        assert!(matches("[lang^='en']", &tree, el));
        assert!(matches("[lang$=US]", &tree, el));
        assert!(matches("[lang*=\"n-U\"]", &tree, el));
        assert!(!matches("[lang*='']", &tree, el));
    }

    #[test]
    fn test_not_disabled() {
        let (tree, button) = tree_with("button", &[("disabled", "")]);
        assert!(!matches("button:not([disabled])", &tree, button));
        assert!(matches("button:disabled", &tree, button));
        assert!(!matches("button:enabled", &tree, button));
    }

    #[test]
    fn test_tabindex_selector() {
        let selector = r#"[tabindex]:not([tabindex="-1"])"#;
        let (tree, div) = tree_with("div", &[("tabindex", "-1")]);
        assert!(!matches(selector, &tree, div));
        let (tree, div) = tree_with("div", &[("tabindex", "0")]);
        assert!(matches(selector, &tree, div));
    }

    #[test]
    fn test_descendant_backtracking() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("section");
        let middle = tree.create_element("div");
        let inner = tree.create_element("a");
        tree.append_child(tree.root(), outer).unwrap();
        tree.append_child(outer, middle).unwrap();
        tree.append_child(middle, inner).unwrap();

        assert!(matches("section a", &tree, inner));
        assert!(matches("section > div > a", &tree, inner));
        assert!(!matches("section > a", &tree, inner));
        assert!(matches(":root a", &tree, inner));
    }

    #[test]
    fn test_structural_pseudo_classes() {
        let mut tree = DomTree::new();
        let list = tree.create_element("ul");
        let first = tree.create_element("li");
        let text = tree.create_text("separator");
        let last = tree.create_element("li");
        tree.append_child(tree.root(), list).unwrap();
        tree.append_child(list, first).unwrap();
        tree.append_child(list, text).unwrap();
        tree.append_child(list, last).unwrap();

        assert!(matches("li:first-child", &tree, first));
        assert!(!matches("li:first-child", &tree, last));
        assert!(matches("li:last-child", &tree, last));
        assert!(matches("li:empty", &tree, first));
        assert!(!matches("ul:empty", &tree, list));
        assert!(matches("ul:only-child", &tree, list));
    }
}
