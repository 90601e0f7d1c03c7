//! Identifiers for view nodes and child links.

use uuid::Uuid;

/// Unique identifier for a view node in a [`ViewTree`](crate::ViewTree).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ViewId(Uuid);

impl ViewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// Identity of one registration of a child under a parent.
///
/// Two links to the same child are distinct, so unlinking one never
/// disturbs the other.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LinkId(Uuid);

impl LinkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LinkId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "link-{}", self.0)
    }
}
