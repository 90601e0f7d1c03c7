mod node;

pub use node::{Element, Node};

/// Tags that never have children or a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Whether `tag` is a void element (no children, no closing tag).
pub fn is_void(tag: &str) -> bool {
    VOID_TAGS.iter().any(|void| void.eq_ignore_ascii_case(tag))
}
