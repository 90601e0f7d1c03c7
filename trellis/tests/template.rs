mod support;

use std::cell::Cell;
use std::rc::Rc;

use serde_json::json;
use support::{inner, journal, probe};
use trellis::prelude::*;
use trellis::{Interpolator, TemplateError};

struct Playlist {
    title: String,
}

impl View for Playlist {
    fn template(&self) -> Option<String> {
        Some(r#"<h1><%- title %></h1><ul class="tracks"></ul>"#.to_string())
    }

    fn render(&mut self, cx: &mut ViewContext<'_>) -> Result<()> {
        cx.render_template(&json!({ "title": self.title }))
    }
}

/// Counts compilations and defers to the interpolator.
struct Counting {
    compiled: Rc<Cell<usize>>,
}

impl TemplateRenderer for Counting {
    fn compile(&self, source: &str) -> Result<CompiledTemplate, TemplateError> {
        self.compiled.set(self.compiled.get() + 1);
        Interpolator.compile(source)
    }
}

// ============================================================================
// Compilation Cache
// ============================================================================

#[test]
fn test_template_compiles_once_per_view() {
    let compiled = Rc::new(Cell::new(0));
    let mut tree = ViewTree::new().with_renderer(Counting {
        compiled: Rc::clone(&compiled),
    });
    let first = tree.insert(Playlist {
        title: "One".into(),
    });
    let second = tree.insert(Playlist {
        title: "Two".into(),
    });

    tree.render(first).unwrap().render(second).unwrap();
    tree.view_mut::<Playlist>(first).unwrap().title = "Uno".into();
    tree.render(first).unwrap().render(first).unwrap();

    assert_eq!(compiled.get(), 2);
    assert_eq!(inner(&tree, first), r#"<h1>Uno</h1><ul class="tracks"></ul>"#);
    assert_eq!(inner(&tree, second), r#"<h1>Two</h1><ul class="tracks"></ul>"#);
    assert!(tree.node(first).unwrap().template().is_compiled());
}

// ============================================================================
// Direct Rendering
// ============================================================================

#[test]
fn test_render_template_escapes_and_replaces() {
    let mut tree = ViewTree::new();
    let id = tree.insert(Playlist {
        title: String::new(),
    });

    tree.render_template(id, &json!({ "title": "A & B" })).unwrap();
    assert_eq!(inner(&tree, id), r#"<h1>A &amp; B</h1><ul class="tracks"></ul>"#);
    assert_eq!(tree.document().text(tree.surface(id).unwrap()), "A & B");

    tree.render_template_default(id).unwrap();
    assert_eq!(inner(&tree, id), r#"<h1></h1><ul class="tracks"></ul>"#);
}

#[test]
fn test_render_template_without_source_fails() {
    let log = journal();
    let mut tree = ViewTree::new();
    let id = probe(&mut tree, "bare", &log);

    assert!(matches!(
        tree.render_template_default(id),
        Err(TrellisError::Template(TemplateError::MissingSource))
    ));
}

#[test]
fn test_render_template_unknown_view() {
    let mut tree = ViewTree::new();
    let ghost = ViewId::new();
    assert!(matches!(
        tree.render_template_default(ghost),
        Err(TrellisError::UnknownView(id)) if id == ghost
    ));
}

#[test]
fn test_compile_error_fails_render() {
    struct Broken;
    impl View for Broken {
        fn template(&self) -> Option<String> {
            Some("<p><%= title</p>".into())
        }

        fn render(&mut self, cx: &mut ViewContext<'_>) -> Result<()> {
            cx.render_template(&json!({}))
        }
    }

    let mut tree = ViewTree::new();
    let id = tree.insert(Broken);

    assert!(matches!(
        tree.render(id),
        Err(TrellisError::Template(TemplateError::Unterminated(3)))
    ));
}

// ============================================================================
// Pluggable Renderers
// ============================================================================

/// Ignores the source and always produces the same markup.
struct Fixed;

impl TemplateRenderer for Fixed {
    fn compile(&self, _source: &str) -> Result<CompiledTemplate, TemplateError> {
        Ok(CompiledTemplate::new(|data| {
            format!("<b>{}</b>", data["n"].as_i64().unwrap_or_default())
        }))
    }
}

struct UsesFixed;

impl View for UsesFixed {
    fn template(&self) -> Option<String> {
        Some("ignored".into())
    }

    fn renderer(&self) -> Option<Rc<dyn TemplateRenderer>> {
        Some(Rc::new(Fixed))
    }
}

#[test]
fn test_view_renderer_overrides_tree_renderer() {
    let mut tree = ViewTree::new();
    let id = tree.insert(UsesFixed);

    tree.render_template(id, &json!({ "n": 7 })).unwrap();

    assert_eq!(inner(&tree, id), "<b>7</b>");
}

#[test]
fn test_children_reattach_after_template_render() {
    let log = journal();
    let mut tree = ViewTree::new();
    let list = tree.insert(Playlist {
        title: "Mix".into(),
    });
    let track = probe(&mut tree, "track", &log);
    tree.append_to(list, track, ".tracks").unwrap();

    tree.render(list).unwrap();
    tree.view_mut::<Playlist>(list).unwrap().title = "Remix".into();
    tree.render(list).unwrap();

    assert_eq!(
        inner(&tree, list),
        r#"<h1>Remix</h1><ul class="tracks"><div id="track"></div></ul>"#
    );
    assert_eq!(support::count(&log, "render:track"), 1);
}
