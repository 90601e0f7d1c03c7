//! Markup parsing and serialization.
//!
//! The parser accepts the HTML subset templates produce: elements with
//! quoted or bare attributes, void and self-closing tags, text, comments
//! (dropped) and the common character references. It is strict about
//! nesting and reports mismatched or unclosed tags as errors.

use crate::element::{is_void, Element};
use crate::error::MarkupError;

/// A parsed markup tree, not yet placed in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Element {
        element: Element,
        children: Vec<Fragment>,
    },
    Text(String),
}

/// Parse markup into a list of top-level fragments.
pub fn parse(markup: &str) -> Result<Vec<Fragment>, MarkupError> {
    Parser {
        src: markup,
        pos: 0,
    }
    .run()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn run(mut self) -> Result<Vec<Fragment>, MarkupError> {
        let mut roots = Vec::new();
        let mut stack: Vec<(Element, Vec<Fragment>)> = Vec::new();

        let src = self.src;
        while self.pos < src.len() {
            let rest = &src[self.pos..];
            let fragment = if let Some(comment) = rest.strip_prefix("<!--") {
                let end = comment
                    .find("-->")
                    .ok_or(MarkupError::UnexpectedEnd("comment"))?;
                self.pos += 4 + end + 3;
                continue;
            } else if rest.starts_with("</") {
                let end = rest.find('>').ok_or(MarkupError::UnexpectedEnd("closing tag"))?;
                let found = rest[2..end].trim().to_ascii_lowercase();
                self.pos += end + 1;
                let (element, children) = stack
                    .pop()
                    .ok_or_else(|| MarkupError::UnexpectedClose(found.clone()))?;
                if element.tag != found {
                    return Err(MarkupError::MismatchedClose {
                        expected: element.tag,
                        found,
                    });
                }
                Fragment::Element { element, children }
            } else if rest.starts_with('<')
                && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                let (element, self_closing) = self.open_tag()?;
                if self_closing || is_void(&element.tag) {
                    Fragment::Element {
                        element,
                        children: Vec::new(),
                    }
                } else {
                    stack.push((element, Vec::new()));
                    continue;
                }
            } else {
                // A '<' that does not start a tag is literal text.
                let skip = usize::from(rest.starts_with('<'));
                let end = rest[skip..].find('<').map_or(rest.len(), |i| i + skip);
                self.pos += end;
                Fragment::Text(decode_entities(&rest[..end]))
            };

            match stack.last_mut() {
                Some((_, children)) => children.push(fragment),
                None => roots.push(fragment),
            }
        }

        if let Some((element, _)) = stack.pop() {
            return Err(MarkupError::Unclosed(element.tag));
        }
        Ok(roots)
    }

    /// Parse `<tag attr=...>` starting at `self.pos`. Returns the element and
    /// whether it was written self-closing.
    fn open_tag(&mut self) -> Result<(Element, bool), MarkupError> {
        let start = self.pos;
        self.pos += 1;
        let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '-');
        let mut element = Element::new(name);

        let src = self.src;
        loop {
            self.take_while(char::is_whitespace);
            let rest = &src[self.pos..];
            if rest.is_empty() {
                return Err(MarkupError::UnexpectedEnd("tag"));
            }
            if let Some(after) = rest.strip_prefix("/>") {
                self.pos = src.len() - after.len();
                return Ok((element, true));
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Ok((element, false));
            }

            let attr = self.take_while(|c| !c.is_whitespace() && !matches!(c, '=' | '>' | '/'));
            if attr.is_empty() {
                return Err(MarkupError::MalformedTag(start));
            }
            self.take_while(char::is_whitespace);
            let value = if src[self.pos..].starts_with('=') {
                self.pos += 1;
                self.take_while(char::is_whitespace);
                self.attribute_value()?
            } else {
                String::new()
            };
            element.set_attribute(attr, value);
        }
    }

    fn attribute_value(&mut self) -> Result<String, MarkupError> {
        let src = self.src;
        let rest = &src[self.pos..];
        match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let end = rest[1..]
                    .find(quote)
                    .ok_or(MarkupError::UnexpectedEnd("attribute value"))?;
                self.pos += end + 2;
                Ok(decode_entities(&rest[1..end + 1]))
            }
            Some(_) => {
                let raw = self.take_while(|c| !c.is_whitespace() && c != '>');
                Ok(decode_entities(raw))
            }
            None => Err(MarkupError::UnexpectedEnd("attribute value")),
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let src = self.src;
        let rest = &src[self.pos..];
        let len = rest.find(|c| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }
}

/// Decode `&amp;`-style named and numeric character references.
/// Unknown references are kept verbatim.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let name = &rest[1..semi];
            let c = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            c.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Escape text for use between tags.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for use inside a double-quoted attribute, or for HTML output
/// generally (templates use this for their escaping tag).
pub fn escape_attribute(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// Write an element's opening tag.
pub(crate) fn write_open_tag(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.tag);
    if let Some(id) = &element.id {
        out.push_str(&format!(" id=\"{}\"", escape_attribute(id)));
    }
    if !element.classes.is_empty() {
        out.push_str(&format!(
            " class=\"{}\"",
            escape_attribute(&element.classes.join(" "))
        ));
    }
    for (name, value) in &element.attributes {
        out.push_str(&format!(" {name}=\"{}\"", escape_attribute(value)));
    }
    out.push('>');
}

pub(crate) fn write_close_tag(out: &mut String, element: &Element) {
    if !is_void(&element.tag) {
        out.push_str("</");
        out.push_str(&element.tag);
        out.push('>');
    }
}
