//! The view tree: node storage, construction, child registration and the
//! render lifecycle.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, trace, warn};
use serde_json::Value;
use viewdom::{Document, Element, ElementId, Selector};

use crate::config::{ReparentPolicy, TreeConfig};
use crate::error::{Result, TrellisError};
use crate::id::{LinkId, ViewId};
use crate::node::{ParentLink, ViewNode};
use crate::options::{merge_options, option_as, Options, RawOptions};
use crate::registry::{ChildLink, ChildRegistry, Placement};
use crate::template::{Interpolator, TemplateRenderer, TemplateSlot};
use crate::view::{AsAny, Construct, View, ViewContext};

/// Owns every view node and the document their surfaces live in.
pub struct ViewTree {
    pub(crate) document: Document,
    pub(crate) nodes: HashMap<ViewId, ViewNode>,
    /// Surface element -> owning view, for event dispatch.
    pub(crate) surfaces: HashMap<ElementId, ViewId>,
    pub(crate) config: TreeConfig,
    renderer: Rc<dyn TemplateRenderer>,
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTree {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            document: Document::new(),
            nodes: HashMap::new(),
            surfaces: HashMap::new(),
            config,
            renderer: Rc::new(Interpolator),
        }
    }

    /// Replace the renderer used by views that do not supply their own.
    /// Only affects views inserted afterwards.
    pub fn with_renderer(mut self, renderer: impl TemplateRenderer + 'static) -> Self {
        self.renderer = Rc::new(renderer);
        self
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    // Construction

    /// Build a `V` from `raw` options laid over `V::defaults()` and insert it.
    pub fn create<V: Construct>(&mut self, raw: RawOptions) -> ViewId {
        let options = merge_options(raw, &V::defaults());
        let view = V::construct(&options);
        self.insert_boxed(Box::new(view), options)
    }

    /// Insert an already-built view with no options.
    pub fn insert(&mut self, view: impl View) -> ViewId {
        self.insert_boxed(Box::new(view), Options::new())
    }

    pub fn insert_boxed(&mut self, view: Box<dyn View>, options: Options) -> ViewId {
        let element = surface_element(&*view, &options);
        let surface = self.document.create_element(element);
        let renderer = view.renderer().unwrap_or_else(|| Rc::clone(&self.renderer));
        let template = TemplateSlot::new(view.template(), renderer);

        let id = ViewId::new();
        self.surfaces.insert(surface, id);
        self.nodes
            .insert(id, ViewNode::new(id, view, surface, options, template));
        debug!("created {id} with surface {surface}");
        id
    }

    // Lookup

    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(&id)
    }

    pub fn surface(&self, id: ViewId) -> Option<ElementId> {
        self.nodes.get(&id).map(|node| node.surface)
    }

    /// The view owning `surface`, if it is a view's surface element.
    pub fn view_for_surface(&self, surface: ElementId) -> Option<ViewId> {
        self.surfaces.get(&surface).copied()
    }

    pub fn options(&self, id: ViewId) -> Option<&Options> {
        self.nodes.get(&id).map(|node| &node.options)
    }

    /// The parent `id` would unlink from on removal.
    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.nodes.get(&id)?.parent.map(|link| link.parent)
    }

    /// Child views of `id` in registry order. Empty for unknown ids.
    pub fn children(&self, id: ViewId) -> Vec<ViewId> {
        self.nodes
            .get(&id)
            .map(|node| node.children.children())
            .unwrap_or_default()
    }

    pub fn registry(&self, id: ViewId) -> Option<&ChildRegistry> {
        self.nodes.get(&id).map(|node| &node.children)
    }

    pub fn link(&self, parent: ViewId, link: LinkId) -> Option<&ChildLink> {
        self.nodes.get(&parent)?.children.get(link)
    }

    pub fn has_rendered(&self, id: ViewId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.has_rendered)
    }

    /// Whether `id` has been removed and not rendered since. Any later
    /// [`render`](Self::render) clears this, including one reached through a
    /// stale link in another parent.
    pub fn is_removed(&self, id: ViewId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.removed)
    }

    /// Borrow the view behind `id` as its concrete type.
    pub fn view<V: View>(&self, id: ViewId) -> Option<&V> {
        let node = self.nodes.get(&id)?;
        <dyn View as AsAny>::as_any(&*node.view).downcast_ref()
    }

    pub fn view_mut<V: View>(&mut self, id: ViewId) -> Option<&mut V> {
        let node = self.nodes.get_mut(&id)?;
        <dyn View as AsAny>::as_any_mut(&mut *node.view).downcast_mut()
    }

    /// Deserialize one of `id`'s options.
    pub fn option_as<T: serde::de::DeserializeOwned>(&self, id: ViewId, key: &str) -> Option<T> {
        option_as(self.options(id)?, key)
    }

    /// Run `f` with the view and a context over its node. `None` if `id` is
    /// not in the tree.
    pub(crate) fn with_view<R>(
        &mut self,
        id: ViewId,
        f: impl FnOnce(&mut dyn View, &mut ViewContext<'_>) -> R,
    ) -> Option<R> {
        let node = self.nodes.get_mut(&id)?;
        let mut cx = ViewContext::new(
            id,
            node.surface,
            &mut self.document,
            &node.options,
            &mut node.template,
        );
        Some(f(&mut *node.view, &mut cx))
    }

    // Registration

    /// Register `child` under `parent` with `placement`.
    ///
    /// The child's parent link is pointed at the new registration. Under
    /// [`ReparentPolicy::Permissive`] a previous parent keeps its link to the
    /// child until that parent is emptied or removed.
    pub fn add_child(
        &mut self,
        parent: ViewId,
        child: ViewId,
        placement: Placement,
    ) -> Result<LinkId> {
        if !self.contains(parent) {
            return Err(TrellisError::UnknownView(parent));
        }
        let existing = self
            .nodes
            .get(&child)
            .ok_or(TrellisError::UnknownView(child))?
            .parent;
        if parent == child || self.is_descendant(parent, child) {
            return Err(TrellisError::Cycle { parent, child });
        }
        if let Some(existing) = existing {
            match self.config.reparent {
                ReparentPolicy::Reject => {
                    return Err(TrellisError::AlreadyParented {
                        child,
                        parent: existing.parent,
                    });
                }
                ReparentPolicy::Permissive => debug!(
                    "{child} re-parented from {} to {parent} without removal; old link is now stale",
                    existing.parent
                ),
            }
        }
        let selector = placement
            .selector
            .as_deref()
            .map(Selector::parse)
            .transpose()?;

        let link = ChildLink::new(child, selector, placement.insertion);
        let link_id = link.id();
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(link);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(ParentLink {
                parent,
                link: link_id,
            });
        }
        trace!("{parent} registered {child} as {link_id} ({:?})", placement.insertion);

        if self.config.attach_on_add {
            self.attach_link(parent, link_id);
        }
        Ok(link_id)
    }

    /// Add `child` at the end of `parent`'s surface.
    pub fn append(&mut self, parent: ViewId, child: ViewId) -> Result<&mut Self> {
        self.add_child(parent, child, Placement::append())?;
        Ok(self)
    }

    /// Add `child` at the end of the first element matching `selector`.
    pub fn append_to(&mut self, parent: ViewId, child: ViewId, selector: &str) -> Result<&mut Self> {
        self.add_child(parent, child, Placement::append().at(selector))?;
        Ok(self)
    }

    /// Add `child` at the start of `parent`'s surface.
    pub fn prepend(&mut self, parent: ViewId, child: ViewId) -> Result<&mut Self> {
        self.add_child(parent, child, Placement::prepend())?;
        Ok(self)
    }

    /// Add `child` at the start of the first element matching `selector`.
    pub fn prepend_to(&mut self, parent: ViewId, child: ViewId, selector: &str) -> Result<&mut Self> {
        self.add_child(parent, child, Placement::prepend().at(selector))?;
        Ok(self)
    }

    /// Alias of [`append`](Self::append).
    pub fn add(&mut self, parent: ViewId, child: ViewId) -> Result<&mut Self> {
        self.append(parent, child)
    }

    /// Whether `id` is reachable from `ancestor` through registries,
    /// stale links included.
    fn is_descendant(&self, id: ViewId, ancestor: ViewId) -> bool {
        let mut stack = self.children(ancestor);
        let mut seen = Vec::new();
        while let Some(current) = stack.pop() {
            if current == id {
                return true;
            }
            if !seen.contains(&current) {
                seen.push(current);
                stack.extend(self.children(current));
            }
        }
        false
    }

    // Render

    /// Render `id` and attach its children.
    ///
    /// Order: `on_before_render`, optional pre-detach of children (see
    /// [`TreeConfig::reattach_on_every_render`]), the view's `render` body,
    /// attachment of every child in registry order, `on_after_render`.
    /// An error from the render body is returned before children attach.
    ///
    /// A successful render marks the view live again, so rendering a removed
    /// view revives it.
    pub fn render(&mut self, id: ViewId) -> Result<&mut Self> {
        if !self.contains(id) {
            warn!("render called for unknown view {id}");
            return Ok(self);
        }
        debug!("render {id}");

        self.with_view(id, |view, cx| view.on_before_render(cx));
        if self.config.reattach_on_every_render {
            self.detach_children(id);
        }
        if let Some(result) = self.with_view(id, |view, cx| view.render(cx)) {
            result?;
        }

        let report = self.attach_all(id);
        if !report.is_complete() {
            debug!("{id}: {report}");
        }

        if let Some(node) = self.nodes.get_mut(&id) {
            node.has_rendered = true;
            node.removed = false;
        }
        self.with_view(id, |view, cx| view.on_after_render(cx));
        Ok(self)
    }

    /// Render `id`'s template with `data` into its surface. Does not attach
    /// children; chain [`render`](Self::render) for that, or call
    /// [`ViewContext::render_template`] from the render body.
    pub fn render_template(&mut self, id: ViewId, data: &Value) -> Result<&mut Self> {
        self.with_view(id, |_, cx| cx.render_template(data))
            .ok_or(TrellisError::UnknownView(id))??;
        Ok(self)
    }

    /// Bind `id`'s interaction handlers. Attachment does this for children;
    /// root views are bound explicitly.
    pub fn delegate_events(&mut self, id: ViewId) -> &mut Self {
        self.with_view(id, |view, cx| view.delegate_events(cx));
        self
    }

    /// Release `id`'s interaction handlers.
    pub fn undelegate_events(&mut self, id: ViewId) -> &mut Self {
        self.with_view(id, |view, cx| view.undelegate_events(cx));
        self
    }

    /// [`render_template`](Self::render_template) with an empty object.
    pub fn render_template_default(&mut self, id: ViewId) -> Result<&mut Self> {
        self.render_template(id, &Value::Object(Options::new()))
    }
}

/// Build a view's surface element from the view and its options. The
/// `tag_name`, `id`, `class_name` and `attributes` options override the
/// view's own values.
fn surface_element(view: &dyn View, options: &Options) -> Element {
    let tag = option_as::<String>(options, "tag_name").unwrap_or_else(|| view.tag().to_string());
    let mut element = Element::new(tag);

    if let Some(id) = option_as::<String>(options, "id").or_else(|| view.element_id()) {
        element = element.id(id);
    }
    if let Some(classes) = option_as::<String>(options, "class_name").or_else(|| view.class_name()) {
        element = element.class_list(&classes);
    }
    if let Some(Value::Object(attributes)) = options.get("attributes") {
        for (name, value) in attributes {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            element.set_attribute(name.as_str(), value);
        }
    }
    element
}

impl std::fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewTree")
            .field("nodes", &self.nodes.len())
            .field("elements", &self.document.len())
            .field("config", &self.config)
            .finish()
    }
}
