//! The base view abstraction and the context views act through.

use std::any::Any;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use viewdom::{Document, ElementId, Listener, Selector};

use crate::error::Result;
use crate::id::ViewId;
use crate::options::{self, Defaults, Options};
use crate::template::{TemplateRenderer, TemplateSlot};

/// Downcasting support for boxed views.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A composable view.
///
/// Every method has a default, so an empty `impl View for T {}` is a valid
/// view with a bare `<div>` surface. The tree calls these in a fixed order;
/// see [`ViewTree::render`](crate::ViewTree::render) and
/// [`ViewTree::remove`](crate::ViewTree::remove).
#[allow(unused_variables)]
pub trait View: AsAny {
    /// Tag of the surface element.
    fn tag(&self) -> &str {
        "div"
    }

    /// `id` attribute of the surface element.
    fn element_id(&self) -> Option<String> {
        None
    }

    /// Whitespace-separated classes of the surface element.
    fn class_name(&self) -> Option<String> {
        None
    }

    /// Template source used by `render_template`.
    fn template(&self) -> Option<String> {
        None
    }

    /// Renderer for this view's template. Falls back to the tree's renderer.
    fn renderer(&self) -> Option<Rc<dyn TemplateRenderer>> {
        None
    }

    /// Handlers bound to the surface by the default
    /// [`delegate_events`](View::delegate_events).
    fn events(&self) -> Vec<EventBinding> {
        Vec::new()
    }

    /// Populate the surface. Children are attached after this returns.
    fn render(&mut self, cx: &mut ViewContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Teardown body, run after the children have been removed and before
    /// the surface is detached.
    fn remove(&mut self, cx: &mut ViewContext<'_>) {}

    /// Bind interaction handlers. Re-run every time the view is attached,
    /// so it must be idempotent.
    fn delegate_events(&mut self, cx: &mut ViewContext<'_>) {
        let events = self.events();
        cx.delegate(&events);
    }

    /// Release interaction handlers.
    fn undelegate_events(&mut self, cx: &mut ViewContext<'_>) {
        cx.undelegate();
    }

    /// Invoked for each bound handler when an event is dispatched.
    fn handle(&mut self, handler: &str, event: &DomEvent, cx: &mut ViewContext<'_>) {}

    // Lifecycle hooks

    fn on_before_render(&mut self, cx: &mut ViewContext<'_>) {}

    fn on_after_render(&mut self, cx: &mut ViewContext<'_>) {}

    fn on_before_remove(&mut self, cx: &mut ViewContext<'_>) {}

    fn on_after_remove(&mut self, cx: &mut ViewContext<'_>) {}
}

/// Views that can be built from merged options by
/// [`ViewTree::create`](crate::ViewTree::create).
pub trait Construct: View + Sized {
    fn defaults() -> Defaults {
        Defaults::None
    }

    fn construct(options: &Options) -> Self;
}

/// One `"event selector" -> handler` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBinding {
    pub event: String,
    pub selector: Option<String>,
    pub handler: String,
}

impl EventBinding {
    /// Bind `handler` directly to the surface.
    pub fn new(event: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            selector: None,
            handler: handler.into(),
        }
    }

    /// Bind `handler` for descendants matching `selector`.
    pub fn delegated(
        event: impl Into<String>,
        selector: impl Into<String>,
        handler: impl Into<String>,
    ) -> Self {
        Self {
            event: event.into(),
            selector: Some(selector.into()),
            handler: handler.into(),
        }
    }

    /// Parse a `"click .save"` style key: event name, then an optional
    /// selector after the first whitespace.
    pub fn parse(key: &str, handler: impl Into<String>) -> Self {
        let key = key.trim();
        match key.split_once(char::is_whitespace) {
            Some((event, selector)) => Self::delegated(event, selector.trim(), handler),
            None => Self::new(key, handler),
        }
    }
}

/// An event delivered to [`View::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    pub name: String,
    /// Element the event was dispatched on.
    pub target: ElementId,
    /// Element the handler fires for (the surface, or the delegated match).
    pub current: ElementId,
}

/// What a view can reach while one of its methods runs: its own surface,
/// options and template, and the shared document. The tree itself is not
/// reachable, so a view cannot re-enter its own render or remove.
pub struct ViewContext<'a> {
    id: ViewId,
    surface: ElementId,
    document: &'a mut Document,
    options: &'a Options,
    template: &'a mut TemplateSlot,
}

impl<'a> ViewContext<'a> {
    pub(crate) fn new(
        id: ViewId,
        surface: ElementId,
        document: &'a mut Document,
        options: &'a Options,
        template: &'a mut TemplateSlot,
    ) -> Self {
        Self {
            id,
            surface,
            document,
            options,
            template,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn surface(&self) -> ElementId {
        self.surface
    }

    pub fn options(&self) -> &Options {
        self.options
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Deserialize an option into `T`.
    pub fn option_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        options::option_as(self.options, key)
    }

    pub fn document(&self) -> &Document {
        &*self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut *self.document
    }

    /// First element under the surface matching `selector`. An invalid
    /// selector matches nothing.
    pub fn query(&self, selector: &str) -> Option<ElementId> {
        match Selector::parse(selector) {
            Ok(selector) => self.document.query(self.surface, &selector),
            Err(e) => {
                log::warn!("{}: invalid selector {selector:?}: {e}", self.id);
                None
            }
        }
    }

    /// Replace the surface contents with `markup`.
    pub fn set_markup(&mut self, markup: &str) -> Result<()> {
        self.document.set_markup(self.surface, markup)?;
        Ok(())
    }

    /// Replace the surface contents with text.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        self.document.set_text(self.surface, text)?;
        Ok(())
    }

    /// Render the view's template with `data` into the surface. The template
    /// is compiled on first use and cached on the view.
    pub fn render_template(&mut self, data: &Value) -> Result<()> {
        let markup = self.template.render(data)?;
        self.set_markup(&markup)
    }

    pub fn template(&self) -> &TemplateSlot {
        &*self.template
    }

    pub fn template_mut(&mut self) -> &mut TemplateSlot {
        &mut *self.template
    }

    /// Replace the surface's listeners with `bindings`. Bindings with an
    /// invalid selector are skipped.
    pub fn delegate(&mut self, bindings: &[EventBinding]) {
        self.undelegate();
        for binding in bindings {
            let listener = match &binding.selector {
                None => Listener::new(&binding.event, &binding.handler),
                Some(selector) => match Selector::parse(selector) {
                    Ok(selector) => Listener::delegated(&binding.event, selector, &binding.handler),
                    Err(e) => {
                        log::warn!(
                            "{}: skipping {} binding with selector {selector:?}: {e}",
                            self.id,
                            binding.event
                        );
                        continue;
                    }
                },
            };
            if let Err(e) = self.document.on(self.surface, listener) {
                log::warn!("{}: failed to bind {}: {e}", self.id, binding.event);
            }
        }
    }

    /// Remove every listener bound to the surface.
    pub fn undelegate(&mut self) {
        self.document.clear_listeners(self.surface);
    }
}
