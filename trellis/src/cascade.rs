//! Removal: unlinking from the parent and tearing down the subtree.

use log::{debug, trace, warn};

use crate::id::ViewId;
use crate::tree::ViewTree;
use crate::view::View;

impl ViewTree {
    /// Remove `id` and, before it, its whole subtree.
    ///
    /// Order: `on_before_remove`, unlink from the current parent's registry,
    /// `remove` every child depth-first in registry order, clear the
    /// registry, the view's `remove` body, base removal (handlers released,
    /// surface detached), `on_after_remove`.
    ///
    /// Safe to call again: the unlink and cascade steps find nothing to do
    /// and only base removal re-runs. The node stays in the tree; use
    /// [`release`](Self::release) to drop it.
    pub fn remove(&mut self, id: ViewId) -> &mut Self {
        if !self.contains(id) {
            warn!("remove called for unknown view {id}");
            return self;
        }
        debug!("remove {id}");

        self.with_view(id, |view, cx| view.on_before_remove(cx));
        self.unlink_from_parent(id);

        for child in self.children(id) {
            self.remove(child);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.children.clear();
        }

        self.with_view(id, |view, cx| {
            view.remove(cx);
            view.undelegate_events(cx);
        });
        if let Some(node) = self.nodes.get_mut(&id) {
            self.document.detach(node.surface);
            node.removed = true;
        }

        self.with_view(id, |view, cx| view.on_after_remove(cx));
        self
    }

    /// Remove every child of `id` (each with its own subtree) and clear the
    /// registry. `id` itself stays where it is.
    pub fn empty(&mut self, id: ViewId) -> &mut Self {
        for child in self.children(id) {
            self.remove(child);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.children.clear();
        }
        self
    }

    /// [`remove`](Self::remove) `id`, then drop it from the tree and free its
    /// surface. Children are removed but stay in the tree; they belong to
    /// whoever created them.
    pub fn release(&mut self, id: ViewId) -> Option<Box<dyn View>> {
        self.remove(id);
        let node = self.nodes.remove(&id)?;
        self.surfaces.remove(&node.surface);
        self.document.free(node.surface);
        debug!("released {id}");
        Some(node.view)
    }

    /// Drop the link the node's parent holds to it, if any.
    fn unlink_from_parent(&mut self, id: ViewId) {
        let Some(link) = self.nodes.get_mut(&id).and_then(|node| node.parent.take()) else {
            return;
        };
        match self.nodes.get_mut(&link.parent) {
            Some(parent) => {
                parent.children.remove_link(link.link);
                trace!("{id} unlinked from {}", link.parent);
            }
            None => trace!("{id}: parent {} already released", link.parent),
        }
    }
}
