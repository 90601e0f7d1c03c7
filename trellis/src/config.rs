//! Tree-wide configuration.

/// What happens when a view that already has a parent is added to another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReparentPolicy {
    /// Allow it. The new parent becomes the one the child unlinks from on
    /// removal; the old parent keeps a stale link until it is emptied.
    #[default]
    Permissive,

    /// Fail with [`TrellisError::AlreadyParented`](crate::TrellisError::AlreadyParented).
    Reject,
}

/// Behaviour switches for a [`ViewTree`](crate::ViewTree).
#[derive(Debug, Clone, Default)]
pub struct TreeConfig {
    /// Detach every registered child's surface before a parent's render body
    /// runs. Compatibility knob for hosts where re-rendering a parent while
    /// children are still attached corrupts sibling order.
    pub reattach_on_every_render: bool,

    /// Policy for adding an already-parented view.
    pub reparent: ReparentPolicy,

    /// Attach a child as soon as it is added, without waiting for the
    /// parent's next render.
    pub attach_on_add: bool,
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reattach_on_every_render(mut self, enabled: bool) -> Self {
        self.reattach_on_every_render = enabled;
        self
    }

    pub fn reparent(mut self, policy: ReparentPolicy) -> Self {
        self.reparent = policy;
        self
    }

    /// Reject re-parenting without an explicit removal first.
    pub fn strict_parenting(mut self) -> Self {
        self.reparent = ReparentPolicy::Reject;
        self
    }

    pub fn attach_on_add(mut self, enabled: bool) -> Self {
        self.attach_on_add = enabled;
        self
    }
}
