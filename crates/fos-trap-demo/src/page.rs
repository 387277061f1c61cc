//! Demo Page
//!
//! A modal-style document: page controls around a `#trap` container that
//! a single focus scope guards.

use anyhow::{Context, Result};
use fos_dom::{DOMRect, Document, ElementQuery, Key, KeyModifiers, NodeId};
use fos_focus_trap::{pump, FocusScope, ScopeOptions};
use tracing::{debug, info};

use crate::command::{Command, Flag, Removal};

const ROW_HEIGHT: f64 = 28.0;

struct PageBuilder {
    doc: Document,
    row: f64,
}

impl PageBuilder {
    fn element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> Result<NodeId> {
        let el = self.doc.create_element(tag);
        self.doc.append_child(parent, el)?;
        for (name, value) in attrs {
            self.doc.set_attribute(el, name, value)?;
        }
        self.doc.set_layout(el, DOMRect::from_xywh(16.0, self.row * ROW_HEIGHT, 240.0, ROW_HEIGHT - 4.0));
        self.row += 1.0;
        Ok(el)
    }
}

/// Build the demo document
pub fn build_page() -> Result<Document> {
    let mut page = PageBuilder {
        doc: Document::new("about:focus-trap"),
        row: 0.0,
    };
    let body = page.doc.body();

    page.element(body, "button", &[("id", "open")])?;
    page.element(body, "a", &[("id", "help"), ("href", "#help")])?;

    let trap = page.element(body, "div", &[("id", "trap"), ("role", "dialog")])?;
    page.element(trap, "a", &[("id", "link-1"), ("href", "#one")])?;
    page.element(trap, "a", &[("id", "link-2"), ("href", "#two")])?;
    page.element(trap, "input", &[("id", "name"), ("type", "text")])?;
    page.element(trap, "button", &[("id", "ok")])?;
    page.element(trap, "button", &[("id", "cancel")])?;
    page.element(trap, "button", &[("id", "disabled"), ("disabled", "")])?;
    page.element(trap, "button", &[("id", "hidden"), ("hidden", "")])?;
    page.element(trap, "div", &[("id", "panel"), ("tabindex", "-1")])?;

    page.element(body, "button", &[("id", "outside")])?;
    Ok(page.doc)
}

/// Demo session: the document and the scope on `#trap`
pub struct Demo {
    doc: Document,
    scopes: Vec<FocusScope<Document>>,
}

impl Demo {
    pub fn new(options: ScopeOptions) -> Result<Self> {
        let mut doc = build_page()?;
        let body = doc.body();
        let trap = doc
            .query_selector(body, "#trap")?
            .context("demo page has no #trap container")?;
        let scope = FocusScope::new(&mut doc, trap, options)?;
        let mut demo = Self {
            doc,
            scopes: vec![scope],
        };
        demo.pump()?;
        info!("focus trap ready on #trap, focus on {}", demo.focused());
        Ok(demo)
    }

    fn scope(&mut self) -> &mut FocusScope<Document> {
        &mut self.scopes[0]
    }

    fn pump(&mut self) -> Result<()> {
        let processed = pump(&mut self.doc, &mut self.scopes)?;
        debug!("pumped {} events", processed);
        Ok(())
    }

    /// Run one command; returns false when the session should end
    pub fn run(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Tab => self.doc.press_key(Key::Tab, KeyModifiers::default()),
            Command::ShiftTab => self.doc.press_key(Key::Tab, KeyModifiers::SHIFT),
            Command::Escape => self.doc.press_key(Key::Escape, KeyModifiers::default()),
            Command::Key(key) => self.doc.press_key(key, KeyModifiers::default()),
            Command::Focus(id) => {
                let el = self
                    .doc
                    .get_element_by_id(&id)
                    .with_context(|| format!("no element with id '{id}'"))?;
                if !self.doc.focus(el) {
                    info!("#{} did not take focus", id);
                }
            }
            Command::Toggle(flag) => self.toggle(flag)?,
            Command::Add(selector) => {
                self.scope().add_tabbable_selector(selector);
                self.print_selectors();
            }
            Command::Remove(removal) => {
                let removed = match &removal {
                    Removal::Index(index) => self.scope().remove_tabbable_selector(*index),
                    Removal::Selector(selector) => self.scope().remove_tabbable_selector(selector),
                };
                if !removed {
                    info!("no selector matched {:?}", removal);
                }
                self.print_selectors();
            }
            Command::List => self.print_selectors(),
            Command::Quit => return Ok(false),
        }
        self.pump()?;
        Ok(true)
    }

    /// Flip a flag, then focus the first target as the page's checkboxes do
    fn toggle(&mut self, flag: Flag) -> Result<()> {
        let doc = &mut self.doc;
        let scope = &mut self.scopes[0];
        if flag == Flag::Active {
            if scope.is_active() {
                scope.disable(doc);
            } else {
                scope.enable(doc)?;
            }
        } else if let Some(value) = flag.field(scope.options_mut()) {
            *value = !*value;
        }
        info!("{} = {}", flag.name(), flag.get(scope.options()));
        scope.focus_first(doc)?;
        Ok(())
    }

    fn print_selectors(&self) {
        for (index, selector) in self.scopes[0].tabbable_selectors().iter().enumerate() {
            println!("  [{index}] {selector}");
        }
    }

    /// `#id` of the focused element, or `(none)`
    pub fn focused(&self) -> String {
        match self.doc.active_element() {
            Some(el) => match self.doc.get_attribute(el, "id") {
                Some(id) => format!("#{id}"),
                None => format!("{el:?}"),
            },
            None => "(none)".to_string(),
        }
    }

    /// One status line for the prompt
    pub fn status(&self) -> String {
        let state = if self.scopes[0].is_active() { "trapped" } else { "free" };
        format!("[{state}] focus: {}", self.focused())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(demo: &mut Demo, line: &str) {
        let command = Command::parse(line).unwrap();
        assert!(demo.run(command).unwrap());
    }

    #[test]
    fn test_page_layout() {
        let doc = build_page().unwrap();
        let trap = doc.get_element_by_id("trap").unwrap();
        let hidden = doc.get_element_by_id("hidden").unwrap();
        assert!(doc.tree().contains(trap, hidden));
        assert!(!doc.is_visible(hidden));
    }

    #[test]
    fn test_starts_trapped_on_first_link() {
        let demo = Demo::new(ScopeOptions::default()).unwrap();
        assert_eq!(demo.status(), "[trapped] focus: #link-1");
    }

    #[test]
    fn test_tab_cycles_visible_enabled_targets() {
        let mut demo = Demo::new(ScopeOptions::default()).unwrap();
        let mut seen = Vec::new();
        for _ in 0..5 {
            run(&mut demo, "tab");
            seen.push(demo.focused());
        }
        assert_eq!(seen, ["#link-2", "#name", "#ok", "#cancel", "#link-1"]);
    }

    #[test]
    fn test_escape_then_tab_leaves_trap() {
        let mut demo = Demo::new(ScopeOptions::default()).unwrap();
        run(&mut demo, "focus cancel");
        run(&mut demo, "esc");
        assert!(demo.status().starts_with("[free]"));
        run(&mut demo, "tab");
        assert_eq!(demo.focused(), "#outside");
    }

    #[test]
    fn test_focus_on_panel_is_pulled_back() {
        let mut demo = Demo::new(ScopeOptions::default()).unwrap();
        run(&mut demo, "focus ok");
        run(&mut demo, "focus panel");
        assert_eq!(demo.focused(), "#link-1");
    }

    #[test]
    fn test_toggle_active_and_loop() {
        let mut demo = Demo::new(ScopeOptions::default()).unwrap();
        run(&mut demo, "toggle disableLoop");
        run(&mut demo, "shift-tab");
        assert_eq!(demo.focused(), "#link-1");

        run(&mut demo, "toggle active");
        assert!(demo.status().starts_with("[free]"));
        run(&mut demo, "toggle active");
        assert!(demo.status().starts_with("[trapped]"));
        assert_eq!(demo.doc.listener_count(), 2);
    }

    #[test]
    fn test_remove_selector_by_index() {
        let mut demo = Demo::new(ScopeOptions::default()).unwrap();
        run(&mut demo, "remove 0");
        run(&mut demo, "toggle focusOnEnable");
        assert_eq!(demo.focused(), "#name");
    }

    #[test]
    fn test_other_keys_keep_focus() {
        let mut demo = Demo::new(ScopeOptions::default()).unwrap();
        run(&mut demo, "key Enter");
        run(&mut demo, "key a");
        assert_eq!(demo.focused(), "#link-1");
    }

    #[test]
    fn test_quit() {
        let mut demo = Demo::new(ScopeOptions::default()).unwrap();
        assert!(!demo.run(Command::Quit).unwrap());
    }
}
