//! Composable view trees.
//!
//! A [`ViewTree`] owns view nodes, each with its own surface element in a
//! shared [`viewdom::Document`]. Parents register children with a placement;
//! rendering a parent attaches its children (rendering each the first time
//! only) and removing a parent tears its subtree down first.

pub mod attach;
pub mod cascade;
pub mod config;
pub mod error;
pub mod events;
pub mod id;
pub mod logging;
pub mod node;
pub mod options;
pub mod registry;
pub mod template;
pub mod tree;
pub mod view;

pub use attach::{AttachReport, SkipReason};
pub use config::{ReparentPolicy, TreeConfig};
pub use error::{Result, TrellisError};
pub use id::{LinkId, ViewId};
pub use options::{Defaults, Options, RawOptions};
pub use registry::{ChildLink, ChildRegistry, Insertion, Placement};
pub use template::{CompiledTemplate, Interpolator, TemplateError, TemplateRenderer};
pub use tree::ViewTree;
pub use view::{Construct, DomEvent, EventBinding, View, ViewContext};

pub mod prelude {
    pub use crate::config::{ReparentPolicy, TreeConfig};
    pub use crate::error::{Result, TrellisError};
    pub use crate::id::ViewId;
    pub use crate::options::{Defaults, Options, RawOptions};
    pub use crate::registry::{Insertion, Placement};
    pub use crate::template::{CompiledTemplate, TemplateRenderer};
    pub use crate::tree::ViewTree;
    pub use crate::view::{Construct, DomEvent, EventBinding, View, ViewContext};

    pub use viewdom::{Document, ElementId};
}
