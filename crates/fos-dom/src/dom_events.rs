//! DOM Events
//!
//! Keyboard and focus events delivered through the document event queue.

use crate::NodeId;

/// Event types the document can dispatch; all of them bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    KeyDown,
    FocusIn,
    FocusOut,
}

impl EventType {
    /// DOM event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeyDown => "keydown",
            Self::FocusIn => "focusin",
            Self::FocusOut => "focusout",
        }
    }
}

/// Key value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Character(char),

    // Navigation
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,

    // Editing
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,

    Space,

    Unidentified(String),
}

impl Key {
    /// Parse from a `KeyboardEvent.key` string
    pub fn parse(s: &str) -> Self {
        match s {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            " " => Self::Space,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Unidentified(s.to_string()),
                }
            }
        }
    }

    /// Legacy `keyCode` for keys that have a well-known one
    pub fn legacy_key_code(&self) -> u32 {
        match self {
            Self::Backspace => 8,
            Self::Tab => 9,
            Self::Enter => 13,
            Self::Escape => 27,
            Self::Space => 32,
            Self::PageUp => 33,
            Self::PageDown => 34,
            Self::End => 35,
            Self::Home => 36,
            Self::ArrowLeft => 37,
            Self::ArrowUp => 38,
            Self::ArrowRight => 39,
            Self::ArrowDown => 40,
            Self::Delete => 46,
            Self::Character(c) if c.is_ascii_alphanumeric() => c.to_ascii_uppercase() as u32,
            _ => 0,
        }
    }
}

/// Key modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyModifiers {
    /// Only Shift held
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }

    /// Create from booleans
    pub fn from_flags(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        Self { shift, ctrl, alt, meta }
    }
}

/// Keyboard event
#[derive(Debug, Clone)]
pub struct KeyboardEvent {
    pub event_type: EventType,
    pub target: NodeId,
    pub key: Key,
    /// Legacy numeric key code
    pub key_code: u32,
    pub modifiers: KeyModifiers,
    pub cancelable: bool,
    default_prevented: bool,
}

impl KeyboardEvent {
    /// Create a `keydown` event aimed at `target`
    pub fn key_down(target: NodeId, key: Key) -> Self {
        Self {
            event_type: EventType::KeyDown,
            target,
            key_code: key.legacy_key_code(),
            key,
            modifiers: KeyModifiers::default(),
            cancelable: true,
            default_prevented: false,
        }
    }

    /// Add modifiers
    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Override the legacy key code
    pub fn with_key_code(mut self, key_code: u32) -> Self {
        self.key_code = key_code;
        self
    }

    /// Tab, by key value or legacy key code 9
    pub fn is_tab(&self) -> bool {
        self.key == Key::Tab || self.key_code == 9
    }

    /// Escape, by key value or legacy key code 27
    pub fn is_escape(&self) -> bool {
        self.key == Key::Escape || self.key_code == 27
    }

    /// Prevent default
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Focus event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusEvent {
    pub event_type: EventType,
    /// Element gaining (focusin) or losing (focusout) focus
    pub target: NodeId,
    /// The other side of the focus move, if any
    pub related_target: Option<NodeId>,
}

impl FocusEvent {
    pub fn new(event_type: EventType, target: NodeId, related_target: Option<NodeId>) -> Self {
        Self {
            event_type,
            target,
            related_target,
        }
    }
}

/// Any event the document queues
#[derive(Debug, Clone)]
pub enum DomEvent {
    Key(KeyboardEvent),
    Focus(FocusEvent),
}

impl DomEvent {
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Key(e) => e.event_type,
            Self::Focus(e) => e.event_type,
        }
    }

    pub fn target(&self) -> NodeId {
        match self {
            Self::Key(e) => e.target,
            Self::Focus(e) => e.target,
        }
    }

    /// Focus events are not cancelable, so this only affects key events
    pub fn prevent_default(&mut self) {
        if let Self::Key(e) = self {
            e.prevent_default();
        }
    }

    pub fn is_default_prevented(&self) -> bool {
        match self {
            Self::Key(e) => e.is_default_prevented(),
            Self::Focus(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parse() {
        assert_eq!(Key::parse("Tab"), Key::Tab);
        assert_eq!(Key::parse("Esc"), Key::Escape);
        assert_eq!(Key::parse("a"), Key::Character('a'));
        assert_eq!(Key::parse("é"), Key::Character('é'));
        assert_eq!(Key::parse("F13"), Key::Unidentified("F13".into()));
    }

    #[test]
    fn test_legacy_key_codes() {
        assert_eq!(KeyboardEvent::key_down(NodeId::ROOT, Key::Tab).key_code, 9);
        assert_eq!(KeyboardEvent::key_down(NodeId::ROOT, Key::Escape).key_code, 27);
        assert_eq!(Key::Character('q').legacy_key_code(), 81);
    }

    #[test]
    fn test_tab_and_escape_by_key_code() {
        let unknown = || Key::Unidentified(String::new());
        assert!(KeyboardEvent::key_down(NodeId::ROOT, Key::Tab).is_tab());
        assert!(KeyboardEvent::key_down(NodeId::ROOT, unknown()).with_key_code(9).is_tab());
        assert!(KeyboardEvent::key_down(NodeId::ROOT, unknown()).with_key_code(27).is_escape());
        assert!(!KeyboardEvent::key_down(NodeId::ROOT, Key::Enter).is_tab());
        assert!(!KeyboardEvent::key_down(NodeId::ROOT, unknown()).is_escape());
    }

    #[test]
    fn test_prevent_default_respects_cancelable() {
        let mut event = KeyboardEvent::key_down(NodeId::ROOT, Key::Tab);
        event.prevent_default();
        assert!(event.is_default_prevented());

        let mut event = KeyboardEvent::key_down(NodeId::ROOT, Key::Tab);
        event.cancelable = false;
        event.prevent_default();
        assert!(!event.is_default_prevented());

        let mut focus = DomEvent::Focus(FocusEvent::new(EventType::FocusIn, NodeId::ROOT, None));
        focus.prevent_default();
        assert!(!focus.is_default_prevented());
    }
}
