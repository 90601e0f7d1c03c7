#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use trellis::prelude::*;

/// Shared record of lifecycle calls, e.g. `"render:a"`.
pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn count(journal: &Journal, entry: &str) -> usize {
    journal.borrow().iter().filter(|e| *e == entry).count()
}

pub fn with_prefix(journal: &Journal, prefix: &str) -> Vec<String> {
    journal
        .borrow()
        .iter()
        .filter(|e| e.starts_with(prefix))
        .cloned()
        .collect()
}

/// A view that records every lifecycle call it receives.
pub struct Probe {
    pub name: String,
    pub journal: Journal,
    pub markup: Option<String>,
    pub events: Vec<EventBinding>,
}

impl Probe {
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: Rc::clone(journal),
            markup: None,
            events: Vec::new(),
        }
    }

    pub fn markup(mut self, markup: &str) -> Self {
        self.markup = Some(markup.to_string());
        self
    }

    pub fn event(mut self, key: &str, handler: &str) -> Self {
        self.events.push(EventBinding::parse(key, handler));
        self
    }

    fn log(&self, what: &str) {
        self.journal.borrow_mut().push(format!("{what}:{}", self.name));
    }
}

impl View for Probe {
    fn element_id(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn events(&self) -> Vec<EventBinding> {
        self.events.clone()
    }

    fn render(&mut self, cx: &mut ViewContext<'_>) -> Result<()> {
        self.log("render");
        if let Some(markup) = &self.markup {
            cx.set_markup(markup)?;
        }
        Ok(())
    }

    fn remove(&mut self, _cx: &mut ViewContext<'_>) {
        self.log("remove");
    }

    fn delegate_events(&mut self, cx: &mut ViewContext<'_>) {
        self.log("bind");
        let events = self.events();
        cx.delegate(&events);
    }

    fn handle(&mut self, handler: &str, _event: &DomEvent, _cx: &mut ViewContext<'_>) {
        self.journal
            .borrow_mut()
            .push(format!("handle:{}:{handler}", self.name));
    }

    fn on_before_render(&mut self, _cx: &mut ViewContext<'_>) {
        self.log("before_render");
    }

    fn on_after_render(&mut self, _cx: &mut ViewContext<'_>) {
        self.log("after_render");
    }

    fn on_before_remove(&mut self, _cx: &mut ViewContext<'_>) {
        self.log("before_remove");
    }

    fn on_after_remove(&mut self, _cx: &mut ViewContext<'_>) {
        self.log("after_remove");
    }
}

/// Insert a probe named `name` into `tree`.
pub fn probe(tree: &mut ViewTree, name: &str, journal: &Journal) -> ViewId {
    tree.insert(Probe::new(name, journal))
}

/// Inner markup of a view's surface.
pub fn inner(tree: &ViewTree, id: ViewId) -> String {
    let surface = tree.surface(id).expect("view is in the tree");
    tree.document().inner_markup(surface)
}
