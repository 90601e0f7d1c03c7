//! Template compilation and the per-view compiled-template cache.
//!
//! A [`TemplateRenderer`] turns template source into a [`CompiledTemplate`],
//! a function from data to markup. Each view keeps its own compiled template
//! in a [`TemplateSlot`], compiled on first use and reused afterwards.

use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use viewdom::markup::escape_attribute;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("View has no template source")]
    MissingSource,

    #[error("Unterminated template tag at byte {0}")]
    Unterminated(usize),

    #[error("Unsupported template tag at byte {0}: only <%= %> and <%- %> are supported")]
    Unsupported(usize),

    #[error("Empty template expression at byte {0}")]
    EmptyExpression(usize),

    /// Raised by custom renderers.
    #[error("Template renderer failed: {0}")]
    Renderer(String),
}

/// Compiles template source. Any implementation can be plugged into a tree
/// or a single view type.
pub trait TemplateRenderer {
    fn compile(&self, source: &str) -> Result<CompiledTemplate, TemplateError>;
}

/// A compiled template: `data -> markup`.
#[derive(Clone)]
pub struct CompiledTemplate(Rc<dyn Fn(&Value) -> String>);

impl CompiledTemplate {
    pub fn new(render: impl Fn(&Value) -> String + 'static) -> Self {
        Self(Rc::new(render))
    }

    pub fn render(&self, data: &Value) -> String {
        (self.0)(data)
    }
}

impl fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompiledTemplate(..)")
    }
}

// Interpolator

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<%([=-])([\s\S]*?)%>").expect("template tag pattern is valid")
});

/// The default renderer: value interpolation only.
///
/// - `<%= path %>` inserts the value as-is.
/// - `<%- path %>` inserts the value HTML-escaped, quotes and backticks
///   included.
///
/// `path` is dot-separated and walks objects by key and arrays by index.
/// Strings render without quotes, `null` and missing values render empty,
/// anything else renders as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpolator;

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Value { path: Vec<String>, escape: bool },
}

impl TemplateRenderer for Interpolator {
    fn compile(&self, source: &str) -> Result<CompiledTemplate, TemplateError> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in TAG.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_literal(&mut segments, &source[last..whole.start()], last)?;

            let expr = caps.get(2).map_or("", |m| m.as_str()).trim();
            if expr.is_empty() {
                return Err(TemplateError::EmptyExpression(whole.start()));
            }
            segments.push(Segment::Value {
                path: expr.split('.').map(|key| key.trim().to_string()).collect(),
                escape: caps.get(1).is_some_and(|m| m.as_str() == "-"),
            });
            last = whole.end();
        }
        push_literal(&mut segments, &source[last..], last)?;

        Ok(CompiledTemplate::new(move |data| {
            let mut out = String::new();
            for segment in &segments {
                match segment {
                    Segment::Literal(text) => out.push_str(text),
                    Segment::Value { path, escape } => {
                        let text = lookup(data, path).map(stringify).unwrap_or_default();
                        if *escape {
                            out.push_str(&escape_attribute(&text));
                        } else {
                            out.push_str(&text);
                        }
                    }
                }
            }
            out
        }))
    }
}

fn push_literal(
    segments: &mut Vec<Segment>,
    literal: &str,
    offset: usize,
) -> Result<(), TemplateError> {
    if let Some(i) = literal.find("<%") {
        return Err(if literal[i..].contains("%>") {
            TemplateError::Unsupported(offset + i)
        } else {
            TemplateError::Unterminated(offset + i)
        });
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal.to_string()));
    }
    Ok(())
}

fn lookup<'v>(data: &'v Value, path: &[String]) -> Option<&'v Value> {
    path.iter().try_fold(data, |value, key| match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// Per-view cache

/// A view's template source, its renderer, and the compiled template once
/// it has been needed.
pub struct TemplateSlot {
    source: Option<String>,
    compiled: Option<CompiledTemplate>,
    renderer: Rc<dyn TemplateRenderer>,
}

impl TemplateSlot {
    pub fn new(source: Option<String>, renderer: Rc<dyn TemplateRenderer>) -> Self {
        Self {
            source,
            compiled: None,
            renderer,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Replace the source. The next render compiles it again.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = Some(source.into());
        self.compiled = None;
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// The compiled template, compiling on first call.
    pub fn compiled(&mut self) -> Result<&CompiledTemplate, TemplateError> {
        if self.compiled.is_none() {
            let source = self.source.as_deref().ok_or(TemplateError::MissingSource)?;
            log::debug!("compiling template ({} bytes)", source.len());
            self.compiled = Some(self.renderer.compile(source)?);
        }
        self.compiled.as_ref().ok_or(TemplateError::MissingSource)
    }

    pub fn render(&mut self, data: &Value) -> Result<String, TemplateError> {
        Ok(self.compiled()?.render(data))
    }
}

impl fmt::Debug for TemplateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateSlot")
            .field("source", &self.source)
            .field("compiled", &self.compiled.is_some())
            .finish()
    }
}
