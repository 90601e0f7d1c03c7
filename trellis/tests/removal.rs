mod support;

use support::{count, inner, journal, probe, with_prefix, Probe};
use trellis::prelude::*;
use trellis::view::AsAny;

// ============================================================================
// Cascade
// ============================================================================

#[test]
fn test_cascade_runs_depth_first_in_registry_order() {
    let log = journal();
    let mut tree = ViewTree::new();
    let p = probe(&mut tree, "p", &log);
    let x = probe(&mut tree, "x", &log);
    let y = probe(&mut tree, "y", &log);
    let z = probe(&mut tree, "z", &log);
    tree.append(p, x).unwrap().append(p, y).unwrap();
    tree.append(x, z).unwrap();
    tree.render(p).unwrap();

    tree.remove(p);

    assert_eq!(
        with_prefix(&log, "remove:"),
        vec!["remove:z", "remove:x", "remove:y", "remove:p"]
    );
    assert_eq!(
        with_prefix(&log, "after_remove:"),
        vec![
            "after_remove:z",
            "after_remove:x",
            "after_remove:y",
            "after_remove:p"
        ]
    );
    assert_eq!(
        with_prefix(&log, "before_remove:"),
        vec![
            "before_remove:p",
            "before_remove:x",
            "before_remove:z",
            "before_remove:y"
        ]
    );
}

#[test]
fn test_cascade_empties_every_registry() {
    let log = journal();
    let mut tree = ViewTree::new();
    let root = probe(&mut tree, "root", &log);
    let mut all = vec![root];
    let mut parent = root;
    for depth in 0..5 {
        let left = probe(&mut tree, &format!("l{depth}"), &log);
        let right = probe(&mut tree, &format!("r{depth}"), &log);
        tree.append(parent, left).unwrap().append(parent, right).unwrap();
        all.extend([left, right]);
        parent = left;
    }
    tree.render(root).unwrap();

    tree.remove(root);

    for id in all {
        assert!(tree.children(id).is_empty());
        assert_eq!(tree.parent(id), None);
        assert!(tree.is_removed(id));
        let surface = tree.surface(id).unwrap();
        assert_eq!(tree.document().parent(surface), None);
    }
}

// ============================================================================
// Self Detach
// ============================================================================

#[test]
fn test_child_removes_itself_from_parent() {
    let log = journal();
    let mut tree = ViewTree::new();
    let parent = probe(&mut tree, "p", &log);
    let a = probe(&mut tree, "a", &log);
    let b = probe(&mut tree, "b", &log);
    tree.append(parent, a).unwrap().append(parent, b).unwrap();
    tree.render(parent).unwrap();

    tree.remove(a);

    assert_eq!(tree.children(parent), vec![b]);
    assert_eq!(tree.parent(a), None);
    assert_eq!(inner(&tree, parent), r#"<div id="b"></div>"#);

    // Later renders no longer touch the removed child.
    tree.render(parent).unwrap();
    assert_eq!(count(&log, "bind:a"), 1);
}

#[test]
fn test_readded_child_renders_again_through_new_link() {
    let log = journal();
    let mut tree = ViewTree::new();
    let parent = probe(&mut tree, "p", &log);
    let child = probe(&mut tree, "c", &log);
    tree.append(parent, child).unwrap();
    tree.render(parent).unwrap();

    tree.remove(child);
    tree.append(parent, child).unwrap();
    tree.render(parent).unwrap();

    assert_eq!(count(&log, "render:c"), 2);
    assert_eq!(inner(&tree, parent), r#"<div id="c"></div>"#);
    assert!(!tree.is_removed(child));
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_double_remove_matches_single_remove() {
    let log = journal();
    let mut tree = ViewTree::new();
    let parent = probe(&mut tree, "p", &log);
    let child = probe(&mut tree, "c", &log);
    tree.append(parent, child).unwrap();
    tree.render(parent).unwrap();

    tree.remove(parent).remove(parent);

    assert!(tree.children(parent).is_empty());
    assert!(tree.is_removed(parent));
    // Only base removal re-runs; the child is not removed a second time.
    assert_eq!(count(&log, "remove:p"), 2);
    assert_eq!(count(&log, "remove:c"), 1);
}

#[test]
fn test_stale_link_render_revives_removed_child() {
    let log = journal();
    let mut tree = ViewTree::new();
    let first = probe(&mut tree, "first", &log);
    let second = probe(&mut tree, "second", &log);
    let child = probe(&mut tree, "c", &log);
    tree.append(first, child).unwrap();
    tree.append(second, child).unwrap();

    tree.remove(child);
    assert!(tree.is_removed(child));

    // `first` still holds a link that never rendered the child.
    tree.render(first).unwrap();

    assert!(!tree.is_removed(child));
    assert_eq!(count(&log, "render:c"), 1);
    assert_eq!(inner(&tree, first), r#"<div id="c"></div>"#);
}

#[test]
fn test_remove_unknown_view_is_noop() {
    let mut tree = ViewTree::new();
    tree.remove(ViewId::new());
    assert!(tree.is_empty());
}

// ============================================================================
// Empty and Release
// ============================================================================

#[test]
fn test_empty_removes_children_but_keeps_parent() {
    let log = journal();
    let mut tree = ViewTree::new();
    let parent = probe(&mut tree, "p", &log);
    let a = probe(&mut tree, "a", &log);
    let b = probe(&mut tree, "b", &log);
    tree.append(parent, a).unwrap().append(parent, b).unwrap();
    tree.render(parent).unwrap();

    tree.empty(parent);

    assert!(tree.children(parent).is_empty());
    assert_eq!(inner(&tree, parent), "");
    assert_eq!(with_prefix(&log, "remove:"), vec!["remove:a", "remove:b"]);
    assert!(!tree.is_removed(parent));
}

#[test]
fn test_empty_clears_stale_links() {
    let log = journal();
    let mut tree = ViewTree::new();
    let first = probe(&mut tree, "first", &log);
    let second = probe(&mut tree, "second", &log);
    let child = probe(&mut tree, "c", &log);
    tree.append(first, child).unwrap();
    tree.append(second, child).unwrap();

    tree.empty(first);

    assert!(tree.children(first).is_empty());
    // The child unlinked from its current parent while being removed.
    assert!(tree.children(second).is_empty());
}

#[test]
fn test_release_drops_node_and_surface() {
    let log = journal();
    let mut tree = ViewTree::new();
    let parent = probe(&mut tree, "p", &log);
    let child = probe(&mut tree, "c", &log);
    tree.append(parent, child).unwrap();
    tree.render(parent).unwrap();
    let surface = tree.surface(child).unwrap();

    let view = tree.release(child).unwrap();

    assert!(!tree.contains(child));
    assert!(!tree.document().contains(surface));
    assert!(tree.children(parent).is_empty());
    let probe = <dyn View as AsAny>::as_any(&*view).downcast_ref::<Probe>();
    assert_eq!(probe.map(|p| p.name.as_str()), Some("c"));
    assert!(tree.release(child).is_none());
}

#[test]
fn test_release_with_stale_link_is_skipped_on_render() {
    let log = journal();
    let mut tree = ViewTree::new();
    let first = probe(&mut tree, "first", &log);
    let second = probe(&mut tree, "second", &log);
    let child = probe(&mut tree, "c", &log);
    let kept = probe(&mut tree, "kept", &log);
    tree.append(first, child).unwrap().append(first, kept).unwrap();
    tree.append(second, child).unwrap();

    tree.release(child);
    tree.render(first).unwrap();

    assert_eq!(tree.children(first), vec![child, kept]);
    assert_eq!(inner(&tree, first), r#"<div id="kept"></div>"#);
}

#[test]
fn test_released_view_keeps_its_state() {
    let log = journal();
    let mut tree = ViewTree::new();
    let id = tree.insert(Probe::new("solo", &log));

    let view = tree.release(id).unwrap();

    assert_eq!(with_prefix(&log, "remove:"), vec!["remove:solo"]);
    assert!(tree.is_empty());
    assert!(tree.document().is_empty());
    assert!(<dyn View as AsAny>::as_any(&*view).is::<Probe>());
}
