//! Focus Scope
//!
//! Confines Tab/Shift+Tab navigation to the visible tabbable descendants
//! of one root element.
//!
//! A scope holds two subscriptions on its root with separate lifetimes:
//!
//! - `focusin`, registered at construction and kept until [`FocusScope::detach`].
//!   It only acts while the scope is active, pulling focus back to the
//!   first eligible target when it lands on something else in the root.
//! - `keydown`, registered by [`FocusScope::enable`] and removed by
//!   [`FocusScope::disable`]. Its presence is what "enabled" means.

use fos_dom::KeyboardEvent;
use tracing::{debug, trace};

use crate::host::{FocusHost, ObserverKind};
use crate::options::{Configuration, ScopeOptions};
use crate::TrapError;

/// Scope state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
    Disabled,
    Enabled,
}

/// Cyclic navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Tab is forward, Shift+Tab backward, anything else is not navigation
    pub fn from_key_event(event: &KeyboardEvent) -> Option<Self> {
        if !event.is_tab() {
            return None;
        }
        if event.modifiers.shift {
            Some(Self::Backward)
        } else {
            Some(Self::Forward)
        }
    }
}

/// Selector removal argument: by exact value or by position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorRef<'a> {
    Query(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for SelectorRef<'a> {
    fn from(query: &'a str) -> Self {
        Self::Query(query)
    }
}

impl<'a> From<&'a String> for SelectorRef<'a> {
    fn from(query: &'a String) -> Self {
        Self::Query(query)
    }
}

impl From<usize> for SelectorRef<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A focus trap bound to one root element
#[derive(Debug)]
pub struct FocusScope<H: FocusHost> {
    root: H::Element,
    options: Configuration,
    focus_in_listener: Option<H::Listener>,
    key_down_listener: Option<H::Listener>,
}

impl<H: FocusHost> FocusScope<H> {
    /// Bind a scope to `root`, merging `options` over the defaults
    ///
    /// The focus-in observer is installed unconditionally; when the merged
    /// configuration is active the scope is enabled straight away, which
    /// may query the host. If that fails (invalid selector) both
    /// listeners are released before the error is returned.
    pub fn new(host: &mut H, root: H::Element, options: ScopeOptions) -> Result<Self, TrapError> {
        let options = options.into_configuration();
        let focus_in_listener = Some(host.add_listener(root, ObserverKind::FocusIn));
        let mut scope = Self {
            root,
            options,
            focus_in_listener,
            key_down_listener: None,
        };
        debug!("focus scope bound to {:?}", root);

        if scope.options.active {
            if let Err(err) = scope.enable(host) {
                scope.release_listeners(host);
                return Err(err);
            }
        }
        Ok(scope)
    }

    /// Root element
    pub fn root(&self) -> H::Element {
        self.root
    }

    /// Live configuration
    pub fn options(&self) -> &Configuration {
        &self.options
    }

    /// Mutable live configuration; changes apply on the next event.
    /// Writing `active` directly skips listener bookkeeping, use
    /// [`enable`](Self::enable)/[`disable`](Self::disable) for transitions.
    pub fn options_mut(&mut self) -> &mut Configuration {
        &mut self.options
    }

    /// Whether the trap intercepts navigation
    pub fn is_active(&self) -> bool {
        self.options.active
    }

    pub fn state(&self) -> ScopeState {
        if self.key_down_listener.is_some() {
            ScopeState::Enabled
        } else {
            ScopeState::Disabled
        }
    }

    /// Listener ids this scope currently holds
    pub fn listeners(&self) -> impl Iterator<Item = H::Listener> + '_ {
        self.focus_in_listener.iter().chain(self.key_down_listener.iter()).copied()
    }

    pub(crate) fn key_down_listener(&self) -> Option<H::Listener> {
        self.key_down_listener
    }

    pub(crate) fn focus_in_listener(&self) -> Option<H::Listener> {
        self.focus_in_listener
    }

    /// Activate the trap
    pub fn enable(&mut self, host: &mut H) -> Result<(), TrapError> {
        self.options.active = true;
        if self.key_down_listener.is_none() {
            self.key_down_listener = Some(host.add_listener(self.root, ObserverKind::KeyDown));
            debug!("focus scope {:?} enabled", self.root);
        } else {
            trace!("focus scope {:?} already listening for keydown", self.root);
        }
        if self.options.focus_on_enable {
            self.focus_first(host)?;
        }
        Ok(())
    }

    /// Deactivate the trap; the focus-in observer stays registered
    pub fn disable(&mut self, host: &mut H) {
        self.options.active = false;
        if self.options.blur_on_disable {
            host.blur_active();
        }
        if let Some(listener) = self.key_down_listener.take() {
            host.remove_listener(self.root, ObserverKind::KeyDown, listener);
            debug!("focus scope {:?} disabled", self.root);
        }
    }

    /// Drop both subscriptions; the scope stays usable and `enable`
    /// re-registers the key observer only
    pub fn detach(&mut self, host: &mut H) {
        self.disable(host);
        self.release_listeners(host);
        debug!("focus scope {:?} detached", self.root);
    }

    fn release_listeners(&mut self, host: &mut H) {
        if let Some(listener) = self.key_down_listener.take() {
            host.remove_listener(self.root, ObserverKind::KeyDown, listener);
        }
        if let Some(listener) = self.focus_in_listener.take() {
            host.remove_listener(self.root, ObserverKind::FocusIn, listener);
        }
    }

    /// Focus `target`, reporting it only if it holds focus afterwards
    fn focus_target(host: &mut H, target: H::Element) -> Option<H::Element> {
        if host.focus(target) || host.active_element() == Some(target) {
            Some(target)
        } else {
            trace!("{:?} refused focus", target);
            None
        }
    }

    /// Visible descendants of the root matching any tabbable selector
    pub fn eligible_targets(&self, host: &H) -> Result<Vec<H::Element>, TrapError> {
        if self.options.tabbable_selectors.is_empty() {
            return Ok(Vec::new());
        }
        let selectors = self.options.tabbable_selectors.join(",");
        let candidates = host.query_all(self.root, &selectors)?;
        Ok(candidates.into_iter().filter(|&el| host.is_visible(el)).collect())
    }

    /// Focus the first eligible target
    ///
    /// Returns the element now holding focus, or `None` when the set is
    /// empty or the host refused to focus the target.
    pub fn focus_first(&mut self, host: &mut H) -> Result<Option<H::Element>, TrapError> {
        let Some(first) = self.eligible_targets(host)?.first().copied() else {
            trace!("focus scope {:?} has no eligible targets", self.root);
            return Ok(None);
        };
        Ok(Self::focus_target(host, first))
    }

    /// Step focus one target in `direction`
    ///
    /// When focus is not on an eligible target, forward lands on the first
    /// target and backward on the last. An empty set is a no-op. Returns
    /// the element now holding focus, `None` if the host refused it.
    pub fn move_focus(&mut self, host: &mut H, direction: Direction) -> Result<Option<H::Element>, TrapError> {
        let targets = self.eligible_targets(host)?;
        let Some(last) = targets.len().checked_sub(1) else {
            return Ok(None);
        };
        let current = host
            .active_element()
            .and_then(|active| targets.iter().position(|&t| t == active));

        let next = match (current, direction) {
            (None, Direction::Forward) => 0,
            (None, Direction::Backward) => last,
            (Some(i), Direction::Forward) if i < last => i + 1,
            (Some(i), Direction::Backward) if i > 0 => i - 1,
            (Some(i), _) if self.options.disable_loop => i,
            (Some(_), Direction::Forward) => 0,
            (Some(_), Direction::Backward) => last,
        };

        trace!("move focus {:?} from {:?} to {:?}", direction, current, next);
        Ok(Self::focus_target(host, targets[next]))
    }

    /// Key-down observer body
    pub fn handle_key_down(&mut self, host: &mut H, event: &mut KeyboardEvent) -> Result<(), TrapError> {
        if !self.options.active {
            return Ok(());
        }
        if event.is_escape() && self.options.disable_on_esc {
            self.disable(host);
            return Ok(());
        }
        let Some(direction) = Direction::from_key_event(event) else {
            return Ok(());
        };
        event.prevent_default();
        self.move_focus(host, direction)?;
        Ok(())
    }

    /// Focus-in observer body
    pub fn handle_focus_in(&mut self, host: &mut H, target: H::Element) -> Result<(), TrapError> {
        if !self.options.active {
            return Ok(());
        }
        let targets = self.eligible_targets(host)?;
        if !targets.contains(&target) {
            debug!("focus landed on {:?} outside the eligible set, correcting", target);
            self.focus_first(host)?;
        }
        Ok(())
    }

    /// Tabbable selectors in priority order
    pub fn tabbable_selectors(&self) -> &[String] {
        &self.options.tabbable_selectors
    }

    /// Append a tabbable selector
    pub fn add_tabbable_selector(&mut self, query: impl Into<String>) {
        self.options.tabbable_selectors.push(query.into());
    }

    /// Remove the first selector equal to a query, or the one at an index
    ///
    /// Returns false and leaves the list untouched when nothing matches.
    pub fn remove_tabbable_selector<'a>(&mut self, selector: impl Into<SelectorRef<'a>>) -> bool {
        let selectors = &mut self.options.tabbable_selectors;
        let index = match selector.into() {
            SelectorRef::Query(query) => selectors.iter().position(|s| s == query),
            SelectorRef::Index(index) => Some(index).filter(|&i| i < selectors.len()),
        };
        match index {
            Some(index) => {
                selectors.remove(index);
                true
            }
            None => false,
        }
    }
}
