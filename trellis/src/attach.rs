//! Attaching children into a parent's surface.

use std::fmt;

use log::{error, trace, warn};

use crate::id::{LinkId, ViewId};
use crate::registry::Insertion;
use crate::tree::ViewTree;

/// Why a link was not attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The link's selector matched nothing inside the parent's surface.
    MissingTarget(String),
    /// The child is no longer in the tree.
    StaleChild(ViewId),
    /// The child's first render failed; it is retried on the next attach.
    RenderFailed(String),
    /// The document refused the insertion.
    Rejected(String),
}

/// Outcome of attaching one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachOutcome {
    Attached,
    Skipped(SkipReason),
}

/// Summary of one [`ViewTree::attach_children`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachReport {
    pub attached: Vec<LinkId>,
    pub skipped: Vec<(LinkId, SkipReason)>,
}

impl AttachReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl fmt::Display for AttachReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attached, {} skipped",
            self.attached.len(),
            self.skipped.len()
        )
    }
}

impl ViewTree {
    /// Attach every child of `parent` in registry order. See
    /// [`attach_link`](Self::attach_link) for the per-link steps; a skipped
    /// link never stops its siblings.
    pub fn attach_children(&mut self, parent: ViewId) -> AttachReport {
        self.attach_all(parent)
    }

    pub(crate) fn attach_all(&mut self, parent: ViewId) -> AttachReport {
        let mut report = AttachReport::default();
        let Some(node) = self.nodes.get(&parent) else {
            return report;
        };

        for link in node.children.link_ids() {
            match self.attach_link(parent, link) {
                AttachOutcome::Attached => report.attached.push(link),
                AttachOutcome::Skipped(reason) => report.skipped.push((link, reason)),
            }
        }
        report
    }

    /// Attach one link:
    ///
    /// 1. resolve the target (selector inside the parent's surface, or the
    ///    surface itself);
    /// 2. render the child if this link has never rendered it;
    /// 3. insert the child's surface at the target;
    /// 4. re-bind the child's handlers.
    pub(crate) fn attach_link(&mut self, parent: ViewId, link_id: LinkId) -> AttachOutcome {
        let Some(node) = self.nodes.get(&parent) else {
            return AttachOutcome::Skipped(SkipReason::StaleChild(parent));
        };
        let Some(link) = node.children.get(link_id) else {
            return AttachOutcome::Skipped(SkipReason::Rejected(format!("{link_id} not registered")));
        };
        let (child, insertion, rendered) = (link.child(), link.insertion(), link.rendered());

        let target = match link.selector() {
            None => node.surface,
            Some(selector) => match self.document.query(node.surface, selector) {
                Some(target) => target,
                None => {
                    warn!("{parent}: no element matches \"{selector}\" for {child}, skipping");
                    return AttachOutcome::Skipped(SkipReason::MissingTarget(
                        selector.as_str().to_string(),
                    ));
                }
            },
        };

        let Some(child_surface) = self.surface(child) else {
            warn!("{parent}: child {child} is no longer in the tree, skipping");
            return AttachOutcome::Skipped(SkipReason::StaleChild(child));
        };

        if !rendered {
            if let Err(e) = self.render(child) {
                error!("{parent}: first render of {child} failed: {e}");
                return AttachOutcome::Skipped(SkipReason::RenderFailed(e.to_string()));
            }
            if let Some(link) = self
                .nodes
                .get_mut(&parent)
                .and_then(|node| node.children.get_mut(link_id))
            {
                link.mark_rendered();
            }
        }

        let inserted = match insertion {
            Insertion::Append => self.document.append(target, child_surface),
            Insertion::Prepend => self.document.prepend(target, child_surface),
        };
        if let Err(e) = inserted {
            warn!("{parent}: cannot attach {child}: {e}");
            return AttachOutcome::Skipped(SkipReason::Rejected(e.to_string()));
        }

        self.with_view(child, |view, cx| view.delegate_events(cx));
        trace!("{parent}: attached {child} ({insertion:?})");
        AttachOutcome::Attached
    }

    /// Detach the surfaces of every registered child of `parent`.
    pub(crate) fn detach_children(&mut self, parent: ViewId) {
        for child in self.children(parent) {
            if let Some(surface) = self.surface(child) {
                self.document.detach(surface);
            }
        }
    }
}
