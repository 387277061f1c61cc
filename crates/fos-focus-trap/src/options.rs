//! Trap Configuration
//!
//! `Configuration` is the live option set a scope reads on every event.
//! `ScopeOptions` is the partial form callers pass at construction; unset
//! fields fall back to the defaults.

use serde::Deserialize;

use crate::TrapError;

/// Selectors seeded into every new scope
pub const DEFAULT_TABBABLE_SELECTORS: [&str; 7] = [
    r#"a[href]:not([style*="visibility:hidden"])"#,
    r#"input:not([disabled]):not([style*="visibility:hidden"])"#,
    r#"button:not([disabled]):not([style*="visibility:hidden"])"#,
    r#"textarea:not([disabled]):not([style*="visibility:hidden"])"#,
    r#"select:not([disabled]):not([style*="visibility:hidden"])"#,
    r#"details:not([disabled]):not([style*="visibility:hidden"])"#,
    r#"[tabindex]:not([tabindex="-1"]):not([style*="visibility:hidden"])"#,
];

/// Live configuration of one focus scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Whether the trap currently intercepts navigation
    pub active: bool,
    /// Escape deactivates the trap
    pub disable_on_esc: bool,
    /// Activation focuses the first eligible target
    pub focus_on_enable: bool,
    /// Deactivation blurs whatever holds focus
    pub blur_on_disable: bool,
    /// Stop at the first/last target instead of wrapping
    pub disable_loop: bool,
    /// Candidate selectors, joined into one selector list when queried
    pub tabbable_selectors: Vec<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            active: true,
            disable_on_esc: true,
            focus_on_enable: true,
            blur_on_disable: false,
            disable_loop: false,
            tabbable_selectors: DEFAULT_TABBABLE_SELECTORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Construction options; every `Some` field overrides the default
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ScopeOptions {
    pub active: Option<bool>,
    pub disable_on_esc: Option<bool>,
    pub focus_on_enable: Option<bool>,
    pub blur_on_disable: Option<bool>,
    pub disable_loop: Option<bool>,
    #[serde(alias = "tabble")]
    pub tabbable_selectors: Option<Vec<String>>,
}

impl ScopeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON object such as
    /// `{"disableOnEsc": false, "tabbableSelectors": ["button"]}`
    pub fn from_json(json: &str) -> Result<Self, TrapError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    #[must_use]
    pub fn disable_on_esc(mut self, enabled: bool) -> Self {
        self.disable_on_esc = Some(enabled);
        self
    }

    #[must_use]
    pub fn focus_on_enable(mut self, enabled: bool) -> Self {
        self.focus_on_enable = Some(enabled);
        self
    }

    #[must_use]
    pub fn blur_on_disable(mut self, enabled: bool) -> Self {
        self.blur_on_disable = Some(enabled);
        self
    }

    #[must_use]
    pub fn disable_loop(mut self, enabled: bool) -> Self {
        self.disable_loop = Some(enabled);
        self
    }

    #[must_use]
    pub fn tabbable_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tabbable_selectors = Some(selectors.into_iter().map(Into::into).collect());
        self
    }

    /// Shallow merge over the defaults; the selector list is owned by the
    /// result, never shared with another scope
    pub fn into_configuration(self) -> Configuration {
        let defaults = Configuration::default();
        Configuration {
            active: self.active.unwrap_or(defaults.active),
            disable_on_esc: self.disable_on_esc.unwrap_or(defaults.disable_on_esc),
            focus_on_enable: self.focus_on_enable.unwrap_or(defaults.focus_on_enable),
            blur_on_disable: self.blur_on_disable.unwrap_or(defaults.blur_on_disable),
            disable_loop: self.disable_loop.unwrap_or(defaults.disable_loop),
            tabbable_selectors: self.tabbable_selectors.unwrap_or(defaults.tabbable_selectors),
        }
    }
}

impl From<ScopeOptions> for Configuration {
    fn from(options: ScopeOptions) -> Self {
        options.into_configuration()
    }
}
