pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod markup;
pub mod selector;

pub use document::{Document, ElementId};
pub use element::{Element, Node};
pub use error::{DomError, MarkupError, SelectorError};
pub use event::{Fired, Listener};
pub use selector::Selector;
