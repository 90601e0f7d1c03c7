//! Error types for view tree operations.
//!
//! Structural misuse (missing attach targets, double removal, undefined
//! options) never produces an error; it degrades to a logged no-op. Errors
//! are reserved for invalid input: stale ids, cycles, unparsable selectors,
//! markup or templates.

use thiserror::Error;

use crate::id::ViewId;
use crate::template::TemplateError;

pub type Result<T, E = TrellisError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TrellisError {
    /// The id does not refer to a view in this tree.
    #[error("View {0} is not part of this tree")]
    UnknownView(ViewId),

    /// Adding the child would make a view its own ancestor.
    #[error("Cannot add {child} under {parent}: {child} contains {parent}")]
    Cycle { parent: ViewId, child: ViewId },

    /// The child already has a parent and the tree rejects re-parenting.
    #[error("View {child} is already a child of {parent}")]
    AlreadyParented { child: ViewId, parent: ViewId },

    #[error("Invalid selector: {0}")]
    Selector(#[from] viewdom::SelectorError),

    #[error(transparent)]
    Dom(#[from] viewdom::DomError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}
