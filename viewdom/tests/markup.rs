use viewdom::markup::{decode_entities, escape_attribute, parse, Fragment};
use viewdom::{Element, MarkupError};

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_nested_elements_and_text() {
    let fragments = parse("<ul id=\"list\"><li>one</li><li>two</li></ul>").unwrap();
    assert_eq!(fragments.len(), 1);

    let Fragment::Element { element, children } = &fragments[0] else {
        panic!("expected element");
    };
    assert_eq!(element, &Element::new("ul").id("list"));
    assert_eq!(children.len(), 2);
    assert_eq!(
        children[1],
        Fragment::Element {
            element: Element::new("li"),
            children: vec![Fragment::Text("two".into())],
        }
    );
}

#[test]
fn test_parse_attributes() {
    let fragments =
        parse("<input type=checkbox checked class='a  b' data-id=\"7\" title=\"&quot;x&quot;\">")
            .unwrap();
    let Fragment::Element { element, children } = &fragments[0] else {
        panic!("expected element");
    };
    assert!(children.is_empty());
    assert_eq!(element.classes, vec!["a", "b"]);
    assert_eq!(element.attribute("type").as_deref(), Some("checkbox"));
    assert_eq!(element.attribute("checked").as_deref(), Some(""));
    assert_eq!(element.attribute("data-id").as_deref(), Some("7"));
    assert_eq!(element.attribute("title").as_deref(), Some("\"x\""));
}

#[test]
fn test_parse_void_and_self_closing() {
    let fragments = parse("<br><span/>tail").unwrap();
    assert_eq!(fragments.len(), 3);
    assert_eq!(fragments[2], Fragment::Text("tail".into()));
}

#[test]
fn test_parse_drops_comments_and_keeps_stray_angle() {
    let fragments = parse("<!-- note -->a < b").unwrap();
    assert_eq!(fragments, vec![Fragment::Text("a ".into()), Fragment::Text("< b".into())]);
}

#[test]
fn test_parse_tags_are_case_insensitive() {
    let fragments = parse("<DIV></div>").unwrap();
    assert!(matches!(&fragments[0], Fragment::Element { element, .. } if element.tag == "div"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_parse_mismatched_close() {
    assert_eq!(
        parse("<div><span></div>"),
        Err(MarkupError::MismatchedClose {
            expected: "span".into(),
            found: "div".into()
        })
    );
}

#[test]
fn test_parse_unclosed() {
    assert_eq!(parse("<section><p></p>"), Err(MarkupError::Unclosed("section".into())));
}

#[test]
fn test_parse_unexpected_close() {
    assert_eq!(parse("</p>"), Err(MarkupError::UnexpectedClose("p".into())));
}

#[test]
fn test_parse_unterminated_attribute() {
    assert_eq!(
        parse("<a href=\"x>"),
        Err(MarkupError::UnexpectedEnd("attribute value"))
    );
}

// ============================================================================
// Entities
// ============================================================================

#[test]
fn test_entities_round_trip_through_escape() {
    let raw = r#"<a href="x">Tom & 'Jerry' `sic`</a>"#;
    let escaped = escape_attribute(raw);
    assert!(!escaped.contains('`'));
    assert_eq!(decode_entities(&escaped), raw);
}

#[test]
fn test_decode_numeric_and_unknown_entities() {
    assert_eq!(decode_entities("&#65;&#x42;&bogus;&"), "AB&bogus;&");
}
