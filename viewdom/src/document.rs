//! The element document: an arena of elements with ordered children.
//!
//! Elements created directly through [`Document::create_element`] are
//! *retained*: they belong to whoever created them and survive being
//! cleared out of a parent, only getting detached. Elements produced by
//! [`Document::set_markup`] belong to the document and are dropped when their
//! parent's contents are replaced.

use std::collections::HashMap;
use std::fmt;

use crate::element::{Element, Node};
use crate::error::DomError;
use crate::event::{self, Fired, Listener};
use crate::markup::{self, Fragment};
use crate::selector::Selector;

/// Handle to an element in a [`Document`]. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

#[derive(Debug)]
struct Slot {
    node: Node,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    retained: bool,
    listeners: Vec<Listener>,
}

#[derive(Debug, Default)]
pub struct Document {
    slots: HashMap<ElementId, Slot>,
    next_id: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached, retained element.
    pub fn create_element(&mut self, element: Element) -> ElementId {
        self.insert_slot(Node::Element(element), true)
    }

    /// Create a detached, retained text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> ElementId {
        self.insert_slot(Node::Text(text.into()), true)
    }

    fn insert_slot(&mut self, node: Node, retained: bool) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.slots.insert(
            id,
            Slot {
                node,
                parent: None,
                children: Vec::new(),
                retained,
                listeners: Vec::new(),
            },
        );
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn node(&self, id: ElementId) -> Option<&Node> {
        self.slots.get(&id).map(|slot| &slot.node)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.node(id).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.slots
            .get_mut(&id)
            .and_then(|slot| slot.node.as_element_mut())
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.slots.get(&id).and_then(|slot| slot.parent)
    }

    /// Children in order. Empty for unknown ids and text nodes.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.slots
            .get(&id)
            .map(|slot| slot.children.as_slice())
            .unwrap_or_default()
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    // Insertion

    /// Insert `child` as the last child of `target`, moving it if attached
    /// elsewhere.
    pub fn append(&mut self, target: ElementId, child: ElementId) -> Result<(), DomError> {
        self.insert_child(target, child, false)
    }

    /// Insert `child` as the first child of `target`, moving it if attached
    /// elsewhere.
    pub fn prepend(&mut self, target: ElementId, child: ElementId) -> Result<(), DomError> {
        self.insert_child(target, child, true)
    }

    fn insert_child(
        &mut self,
        target: ElementId,
        child: ElementId,
        front: bool,
    ) -> Result<(), DomError> {
        let target_slot = self
            .slots
            .get(&target)
            .ok_or(DomError::UnknownElement(target))?;
        if target_slot.node.is_text() {
            return Err(DomError::NotAContainer(target));
        }
        if !self.contains(child) {
            return Err(DomError::UnknownElement(child));
        }
        if self.is_inclusive_ancestor(child, target) {
            return Err(DomError::Hierarchy { target, child });
        }

        self.detach(child);
        if let Some(slot) = self.slots.get_mut(&target) {
            if front {
                slot.children.insert(0, child);
            } else {
                slot.children.push(child);
            }
        }
        if let Some(slot) = self.slots.get_mut(&child) {
            slot.parent = Some(target);
        }
        Ok(())
    }

    /// Remove `id` from its parent. Returns false if it was not attached.
    pub fn detach(&mut self, id: ElementId) -> bool {
        let Some(parent) = self.slots.get_mut(&id).and_then(|slot| slot.parent.take()) else {
            return false;
        };
        if let Some(slot) = self.slots.get_mut(&parent) {
            slot.children.retain(|&c| c != id);
        }
        true
    }

    /// Detach and drop `id` with its subtree. Retained descendants are only
    /// detached.
    pub fn free(&mut self, id: ElementId) {
        self.detach(id);
        self.drop_subtree(id);
    }

    fn drop_subtree(&mut self, id: ElementId) {
        let Some(slot) = self.slots.remove(&id) else {
            return;
        };
        for child in slot.children {
            let Some(retained) = self.slots.get(&child).map(|s| s.retained) else {
                continue;
            };
            if retained {
                if let Some(child_slot) = self.slots.get_mut(&child) {
                    child_slot.parent = None;
                }
            } else {
                self.drop_subtree(child);
            }
        }
    }

    // Content replacement

    /// Remove every child of `target`. Retained elements are detached, the
    /// rest dropped.
    ///
    /// Listeners are cleared down to the first retained element on each
    /// path, that element included. Retained elements nested inside it move
    /// with it and keep theirs.
    pub fn clear_children(&mut self, target: ElementId) {
        let children = self.children(target).to_vec();
        for child in children {
            self.clear_listeners_to_retained(child);
            let retained = self.slots.get(&child).is_some_and(|slot| slot.retained);
            if retained {
                self.detach(child);
            } else {
                self.free(child);
            }
        }
    }

    fn clear_listeners_to_retained(&mut self, id: ElementId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self.slots.get_mut(&current) else {
                continue;
            };
            slot.listeners.clear();
            if !slot.retained {
                stack.extend(slot.children.iter().copied());
            }
        }
    }

    /// Replace the contents of `target` with parsed markup.
    ///
    /// The markup is parsed before anything is touched, so a parse error
    /// leaves the document unchanged.
    pub fn set_markup(&mut self, target: ElementId, markup: &str) -> Result<(), DomError> {
        let slot = self
            .slots
            .get(&target)
            .ok_or(DomError::UnknownElement(target))?;
        if slot.node.is_text() {
            return Err(DomError::NotAContainer(target));
        }

        let fragments = markup::parse(markup)?;
        self.clear_children(target);
        for fragment in fragments {
            self.build(target, fragment);
        }
        Ok(())
    }

    /// Replace the contents of `target` with a single text node.
    pub fn set_text(&mut self, target: ElementId, text: impl Into<String>) -> Result<(), DomError> {
        let slot = self
            .slots
            .get(&target)
            .ok_or(DomError::UnknownElement(target))?;
        if slot.node.is_text() {
            return Err(DomError::NotAContainer(target));
        }
        self.clear_children(target);
        self.build(target, Fragment::Text(text.into()));
        Ok(())
    }

    fn build(&mut self, parent: ElementId, fragment: Fragment) {
        let (node, children) = match fragment {
            Fragment::Element { element, children } => (Node::Element(element), children),
            Fragment::Text(text) => (Node::Text(text), Vec::new()),
        };
        let id = self.insert_slot(node, false);
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.parent = Some(parent);
        }
        if let Some(slot) = self.slots.get_mut(&parent) {
            slot.children.push(id);
        }
        for child in children {
            self.build(id, child);
        }
    }

    // Serialization

    /// Outer markup of `id`, including the element itself.
    pub fn markup(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    /// Markup of the children of `id`.
    pub fn inner_markup(&self, id: ElementId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_markup(child, &mut out);
        }
        out
    }

    fn write_markup(&self, id: ElementId, out: &mut String) {
        let Some(slot) = self.slots.get(&id) else {
            return;
        };
        match &slot.node {
            Node::Text(text) => out.push_str(&markup::escape_text(text)),
            Node::Element(element) => {
                markup::write_open_tag(out, element);
                for &child in &slot.children {
                    self.write_markup(child, out);
                }
                markup::write_close_tag(out, element);
            }
        }
    }

    /// Concatenated text of `id` and its descendants.
    pub fn text(&self, id: ElementId) -> String {
        self.subtree(id)
            .into_iter()
            .filter_map(|node| match self.node(node) {
                Some(Node::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    // Queries

    /// `id` followed by its descendants in document order.
    pub fn subtree(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// First descendant of `scope` (not `scope` itself) matching `selector`.
    pub fn query(&self, scope: ElementId, selector: &Selector) -> Option<ElementId> {
        self.subtree(scope)
            .into_iter()
            .skip(1)
            .find(|&id| selector.matches(self, id))
    }

    /// Every descendant of `scope` matching `selector`, in document order.
    pub fn query_all(&self, scope: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.subtree(scope)
            .into_iter()
            .skip(1)
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    // Listeners

    pub fn on(&mut self, id: ElementId, listener: Listener) -> Result<(), DomError> {
        let slot = self.slots.get_mut(&id).ok_or(DomError::UnknownElement(id))?;
        slot.listeners.push(listener);
        Ok(())
    }

    pub fn clear_listeners(&mut self, id: ElementId) {
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.listeners.clear();
        }
    }

    pub fn listeners(&self, id: ElementId) -> &[Listener] {
        self.slots
            .get(&id)
            .map(|slot| slot.listeners.as_slice())
            .unwrap_or_default()
    }

    /// Bubble `event` from `target`; see [`event::dispatch`].
    pub fn dispatch(&self, target: ElementId, event: &str) -> Vec<Fired> {
        event::dispatch(self, target, event)
    }
}
