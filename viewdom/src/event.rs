//! Listener bindings and bubbling dispatch.

use crate::document::{Document, ElementId};
use crate::selector::Selector;

/// A named handler bound to an element for one event type.
///
/// With a selector the listener is delegated: it fires for descendants of
/// the bound element that match the selector, not for the element itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub event: String,
    pub selector: Option<Selector>,
    pub handler: String,
}

impl Listener {
    pub fn new(event: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            selector: None,
            handler: handler.into(),
        }
    }

    pub fn delegated(
        event: impl Into<String>,
        selector: Selector,
        handler: impl Into<String>,
    ) -> Self {
        Self {
            event: event.into(),
            selector: Some(selector),
            handler: handler.into(),
        }
    }
}

/// One handler invocation produced by [`dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired {
    /// Element the listener is bound on.
    pub owner: ElementId,
    /// Element the handler fires for: the owner itself, or the matching
    /// descendant for delegated listeners.
    pub current: ElementId,
    pub handler: String,
}

/// Bubble `event` from `target` to the root and collect the handlers to run.
///
/// At each element on the path, delegated listeners fire first (closest
/// matching descendant first), then direct listeners, each in bind order.
pub fn dispatch(document: &Document, target: ElementId, event: &str) -> Vec<Fired> {
    let mut path = Vec::new();
    let mut cursor = document.contains(target).then_some(target);
    while let Some(id) = cursor {
        path.push(id);
        cursor = document.parent(id);
    }

    let mut fired = Vec::new();
    for (depth, &owner) in path.iter().enumerate() {
        let listeners = document.listeners(owner);
        if listeners.is_empty() {
            continue;
        }

        for &current in &path[..depth] {
            for listener in listeners.iter().filter(|l| l.event == event) {
                if let Some(selector) = &listener.selector {
                    if selector.matches(document, current) {
                        fired.push(Fired {
                            owner,
                            current,
                            handler: listener.handler.clone(),
                        });
                    }
                }
            }
        }

        for listener in listeners
            .iter()
            .filter(|l| l.event == event && l.selector.is_none())
        {
            fired.push(Fired {
                owner,
                current: owner,
                handler: listener.handler.clone(),
            });
        }
    }

    log::trace!("dispatch {event} from {target}: {} handler(s)", fired.len());
    fired
}
