//! A view node as stored in the tree.

use viewdom::ElementId;

use crate::id::{LinkId, ViewId};
use crate::options::Options;
use crate::registry::ChildRegistry;
use crate::template::TemplateSlot;
use crate::view::View;

/// The registration that currently owns a node: which parent, and which of
/// its links. Set when the node is added as a child and cleared when the
/// node removes itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    pub parent: ViewId,
    pub link: LinkId,
}

pub struct ViewNode {
    pub(crate) id: ViewId,
    pub(crate) view: Box<dyn View>,
    pub(crate) surface: ElementId,
    pub(crate) options: Options,
    pub(crate) template: TemplateSlot,
    pub(crate) children: ChildRegistry,
    pub(crate) parent: Option<ParentLink>,
    /// Whether `render` has ever run for this node.
    pub(crate) has_rendered: bool,
    pub(crate) removed: bool,
}

impl ViewNode {
    pub(crate) fn new(
        id: ViewId,
        view: Box<dyn View>,
        surface: ElementId,
        options: Options,
        template: TemplateSlot,
    ) -> Self {
        Self {
            id,
            view,
            surface,
            options,
            template,
            children: ChildRegistry::new(),
            parent: None,
            has_rendered: false,
            removed: false,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn surface(&self) -> ElementId {
        self.surface
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn children(&self) -> &ChildRegistry {
        &self.children
    }

    pub fn parent(&self) -> Option<ParentLink> {
        self.parent
    }

    pub fn has_rendered(&self) -> bool {
        self.has_rendered
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn template(&self) -> &TemplateSlot {
        &self.template
    }
}

impl std::fmt::Debug for ViewNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewNode")
            .field("id", &self.id)
            .field("surface", &self.surface)
            .field("children", &self.children.len())
            .field("parent", &self.parent)
            .field("has_rendered", &self.has_rendered)
            .field("removed", &self.removed)
            .finish()
    }
}
