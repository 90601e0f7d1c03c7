//! A small CSS selector subset: compound selectors joined by the descendant
//! combinator.
//!
//! Supported: `tag`, `*`, `#id`, `.class`, `[attr]`, `[attr=value]` and any
//! compound of those (`ul.items[data-role=list]`), separated by whitespace.

use std::fmt;
use std::str::FromStr;

use crate::document::{Document, ElementId};
use crate::element::Element;
use crate::error::SelectorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    /// Outermost ancestor first, matched element last.
    steps: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeMatch {
    name: String,
    value: Option<String>,
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| element.has_class(class)) {
            return false;
        }
        self.attributes.iter().all(|attr| {
            match (element.attribute(&attr.name), &attr.value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == *expected,
                (None, _) => false,
            }
        })
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let chars: Vec<(usize, char)> = source.char_indices().collect();
        let mut steps = Vec::new();
        let mut current = Compound::default();
        let mut started = false;
        let mut i = 0;

        let read_name = |start: usize| -> (String, usize) {
            let mut end = start;
            while end < chars.len() && is_name_char(chars[end].1) {
                end += 1;
            }
            (chars[start..end].iter().map(|(_, c)| c).collect(), end)
        };

        while i < chars.len() {
            let (position, c) = chars[i];
            match c {
                c if c.is_whitespace() => {
                    if started {
                        steps.push(std::mem::take(&mut current));
                        started = false;
                    }
                    i += 1;
                }
                '*' if !started => {
                    started = true;
                    i += 1;
                }
                '#' | '.' => {
                    let (name, end) = read_name(i + 1);
                    if name.is_empty() {
                        return Err(SelectorError::MissingName(c));
                    }
                    if c == '#' {
                        current.id = Some(name);
                    } else {
                        current.classes.push(name);
                    }
                    started = true;
                    i = end;
                }
                '[' => {
                    let close = chars[i..]
                        .iter()
                        .position(|(_, c)| *c == ']')
                        .ok_or(SelectorError::UnterminatedAttribute)?;
                    let body: String = chars[i + 1..i + close].iter().map(|(_, c)| c).collect();
                    current.attributes.push(parse_attribute(&body)?);
                    started = true;
                    i += close + 1;
                }
                c if is_name_char(c) && !started => {
                    let (name, end) = read_name(i);
                    current.tag = Some(name.to_ascii_lowercase());
                    started = true;
                    i = end;
                }
                found => return Err(SelectorError::UnexpectedChar { found, position }),
            }
        }
        if started {
            steps.push(current);
        }
        if steps.is_empty() {
            return Err(SelectorError::Empty);
        }

        Ok(Self {
            source: source.trim().to_string(),
            steps,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the element at `id` matches, with ancestors checked anywhere
    /// above it in the document.
    pub fn matches(&self, document: &Document, id: ElementId) -> bool {
        let Some((last, rest)) = self.steps.split_last() else {
            return false;
        };
        if !document.element(id).is_some_and(|e| last.matches(e)) {
            return false;
        }

        let mut ancestor = document.parent(id);
        for step in rest.iter().rev() {
            loop {
                let Some(current) = ancestor else {
                    return false;
                };
                ancestor = document.parent(current);
                if document.element(current).is_some_and(|e| step.matches(e)) {
                    break;
                }
            }
        }
        true
    }
}

fn parse_attribute(body: &str) -> Result<AttributeMatch, SelectorError> {
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (name.trim(), Some(value.to_string()))
        }
        None => (body.trim(), None),
    };
    if name.is_empty() || !name.chars().all(is_name_char) {
        return Err(SelectorError::MissingName('['));
    }
    Ok(AttributeMatch {
        name: name.to_ascii_lowercase(),
        value,
    })
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound() {
        let selector = Selector::parse("ul.items.open#main[data-role=list]").unwrap();
        assert_eq!(selector.steps.len(), 1);
        let step = &selector.steps[0];
        assert_eq!(step.tag.as_deref(), Some("ul"));
        assert_eq!(step.id.as_deref(), Some("main"));
        assert_eq!(step.classes, vec!["items", "open"]);
        assert_eq!(step.attributes[0].value.as_deref(), Some("list"));
    }

    #[test]
    fn test_parse_descendant_chain() {
        let selector = Selector::parse("  section  .body p ").unwrap();
        assert_eq!(selector.steps.len(), 3);
        assert_eq!(selector.as_str(), "section  .body p");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("div."), Err(SelectorError::MissingName('.')));
        assert_eq!(
            Selector::parse("[data-x"),
            Err(SelectorError::UnterminatedAttribute)
        );
        assert!(matches!(
            Selector::parse("div > p"),
            Err(SelectorError::UnexpectedChar { found: '>', .. })
        ));
        assert!(Selector::parse(".a div").is_ok());
    }
}
