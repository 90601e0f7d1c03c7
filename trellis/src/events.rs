//! Delivering document events to the views whose surfaces bound them.

use log::trace;
use viewdom::ElementId;

use crate::tree::ViewTree;
use crate::view::DomEvent;

impl ViewTree {
    /// Dispatch `event` on `target`, bubbling to the root, and call
    /// [`View::handle`](crate::View::handle) for every handler bound on a
    /// view surface along the way. Returns how many handlers ran.
    ///
    /// Handlers are collected before any runs, so a handler changing the
    /// document does not affect this dispatch.
    pub fn dispatch(&mut self, target: ElementId, event: &str) -> usize {
        let fired = self.document.dispatch(target, event);
        let mut handled = 0;

        for hit in fired {
            let Some(view) = self.view_for_surface(hit.owner) else {
                trace!("{event}: listener on non-surface {} ignored", hit.owner);
                continue;
            };
            let dom_event = DomEvent {
                name: event.to_string(),
                target,
                current: hit.current,
            };
            if self
                .with_view(view, |v, cx| v.handle(&hit.handler, &dom_event, cx))
                .is_some()
            {
                handled += 1;
            }
        }
        handled
    }
}
