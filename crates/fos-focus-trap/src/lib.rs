//! fOS Focus Trap
//!
//! Keyboard focus confinement for modal regions. A [`FocusScope`] binds to
//! a root element and, while active, keeps Tab and Shift+Tab cycling over
//! the visible tabbable elements inside it. Escape can release the trap,
//! and focus that lands on an ineligible element in the root is pulled
//! back to the first eligible target.
//!
//! Scopes are generic over a [`FocusHost`]; `fos_dom::Document` is the
//! host used by the engine, driven by [`pump`].

mod dom_host;
mod host;
mod options;
mod scope;

pub use dom_host::{pump, MAX_EVENTS_PER_PUMP};
pub use host::{FocusHost, ObserverKind};
pub use options::{Configuration, ScopeOptions, DEFAULT_TABBABLE_SELECTORS};
pub use scope::{Direction, FocusScope, ScopeState, SelectorRef};

use thiserror::Error;

/// Focus trap errors
#[derive(Debug, Error)]
pub enum TrapError {
    #[error("invalid tabbable selector: {0}")]
    Query(#[from] fos_dom::SelectorError),

    #[error("invalid scope options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("event pump exceeded {0} events")]
    EventStorm(usize),
}
