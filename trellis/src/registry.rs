//! Child links and the ordered registry a parent keeps them in.

use viewdom::Selector;

use crate::id::{LinkId, ViewId};

/// Where in the target a child's surface is inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Insertion {
    /// Insert as the last child of the target.
    #[default]
    Append,
    /// Insert as the first child of the target.
    Prepend,
}

/// Requested placement for a new child: an optional selector inside the
/// parent's surface and an insertion method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub selector: Option<String>,
    pub insertion: Insertion,
}

impl Placement {
    pub fn append() -> Self {
        Self::default()
    }

    pub fn prepend() -> Self {
        Self {
            selector: None,
            insertion: Insertion::Prepend,
        }
    }

    /// Target the first element matching `selector` instead of the surface.
    pub fn at(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }
}

/// A registered child: which view, where it goes, and whether it has been
/// rendered through this link yet.
#[derive(Debug, Clone)]
pub struct ChildLink {
    id: LinkId,
    child: ViewId,
    selector: Option<Selector>,
    insertion: Insertion,
    rendered: bool,
}

impl ChildLink {
    pub fn new(child: ViewId, selector: Option<Selector>, insertion: Insertion) -> Self {
        Self {
            id: LinkId::new(),
            child,
            selector,
            insertion,
            rendered: false,
        }
    }

    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn child(&self) -> ViewId {
        self.child
    }

    pub fn selector(&self) -> Option<&Selector> {
        self.selector.as_ref()
    }

    pub fn insertion(&self) -> Insertion {
        self.insertion
    }

    /// Whether the child has been rendered through this link. Never resets.
    pub fn rendered(&self) -> bool {
        self.rendered
    }

    pub(crate) fn mark_rendered(&mut self) {
        self.rendered = true;
    }
}

/// A parent's children, in registration order.
///
/// Order here is attachment order and the order `children()` reports.
#[derive(Debug, Default)]
pub struct ChildRegistry {
    links: Vec<ChildLink>,
}

impl ChildRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `link` and return its id.
    pub fn push(&mut self, link: ChildLink) -> LinkId {
        let id = link.id;
        self.links.push(link);
        id
    }

    pub fn get(&self, id: LinkId) -> Option<&ChildLink> {
        self.links.iter().find(|link| link.id == id)
    }

    pub fn get_mut(&mut self, id: LinkId) -> Option<&mut ChildLink> {
        self.links.iter_mut().find(|link| link.id == id)
    }

    pub fn links(&self) -> &[ChildLink] {
        &self.links
    }

    pub fn link_ids(&self) -> Vec<LinkId> {
        self.links.iter().map(ChildLink::id).collect()
    }

    /// Child views in registry order.
    pub fn children(&self) -> Vec<ViewId> {
        self.links.iter().map(ChildLink::child).collect()
    }

    pub fn contains_child(&self, child: ViewId) -> bool {
        self.links.iter().any(|link| link.child == child)
    }

    /// Remove exactly the link with `id`. No-op if it is not here.
    pub fn remove_link(&mut self, id: LinkId) -> Option<ChildLink> {
        let index = self.links.iter().position(|link| link.id == id)?;
        Some(self.links.remove(index))
    }

    /// Drop every link without touching the children.
    pub fn clear(&mut self) {
        self.links.clear();
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
