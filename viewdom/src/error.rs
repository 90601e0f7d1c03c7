//! Error types for document operations.

use thiserror::Error;

use crate::document::ElementId;

/// Structural errors raised by [`Document`](crate::Document) mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The id does not refer to a live element.
    #[error("Element {0} does not exist")]
    UnknownElement(ElementId),

    /// Text nodes cannot hold children.
    #[error("Element {0} is a text node and cannot contain children")]
    NotAContainer(ElementId),

    /// Inserting `child` into `target` would make an element its own ancestor.
    #[error("Cannot insert {child} into {target}: {child} is an ancestor of the target")]
    Hierarchy {
        target: ElementId,
        child: ElementId,
    },

    #[error(transparent)]
    Markup(#[from] MarkupError),
}

/// Errors from parsing markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("Unexpected end of markup inside {0}")]
    UnexpectedEnd(&'static str),

    #[error("Closing tag </{found}> does not match open <{expected}>")]
    MismatchedClose { expected: String, found: String },

    #[error("Closing tag </{0}> has no matching open tag")]
    UnexpectedClose(String),

    #[error("Element <{0}> is never closed")]
    Unclosed(String),

    #[error("Malformed tag at byte {0}")]
    MalformedTag(usize),
}

/// Errors from parsing a selector string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("Selector is empty")]
    Empty,

    #[error("Unexpected character {found:?} at byte {position} in selector")]
    UnexpectedChar { found: char, position: usize },

    #[error("Expected a name after {0:?} in selector")]
    MissingName(char),

    #[error("Unterminated attribute selector")]
    UnterminatedAttribute,
}
