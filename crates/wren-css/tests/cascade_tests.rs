//! Integration tests for CSS cascade and style computation.

use wren_css::{
    cascade_rules, parse_stylesheet, sort_rules, style, style_elements, stylesheet_links,
};
use wren_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

/// Parse `html`, then style it with the default rules plus `css`.
fn styled(html: &str, css: &str) -> DomTree {
    let mut tree = wren_html::parse_document(html, false);
    let rules = cascade_rules(parse_stylesheet(css));
    style(&mut tree, &rules);
    tree
}

fn find_element(tree: &DomTree, tag: &str) -> NodeId {
    tree.iter_all()
        .find(|&id| tree.tag_name(id) == Some(tag))
        .unwrap_or_else(|| panic!("no <{tag}> in tree"))
}

fn prop<'a>(tree: &'a DomTree, id: NodeId, name: &str) -> Option<&'a str> {
    tree.computed_style(id)
        .and_then(|s| s.get(name))
        .map(String::as_str)
}

/// Helper to create element node types
fn make_element(tag: &str, style_attr: Option<&str>) -> NodeType {
    let mut attrs = AttributesMap::new();
    if let Some(value) = style_attr {
        let _ = attrs.insert("style".to_string(), value.to_string());
    }
    NodeType::Element(ElementData::new(tag, attrs))
}

#[test]
fn test_later_rule_wins_at_equal_specificity() {
    let tree = styled("<p>x</p>", "p { color: red; } p { color: blue; }");
    let p = find_element(&tree, "p");
    assert_eq!(prop(&tree, p, "color"), Some("blue"));
}

#[test]
fn test_more_specific_rule_wins_regardless_of_order() {
    let tree = styled(
        "<div><p>x</p></div>",
        "div p { color: green; } p { color: red; }",
    );
    let p = find_element(&tree, "p");
    assert_eq!(prop(&tree, p, "color"), Some("green"));
}

#[test]
fn test_inline_style_beats_every_rule() {
    let tree = styled(
        r#"<div><p style="color:purple">x</p></div>"#,
        "html body div p { color: green; }",
    );
    let p = find_element(&tree, "p");
    assert_eq!(prop(&tree, p, "color"), Some("purple"));
}

#[test]
fn test_percentage_font_size_resolves_against_parent() {
    let tree = styled(r#"<p style="font-size:150%">x</p>"#, "");
    let p = find_element(&tree, "p");
    assert_eq!(prop(&tree, p, "font-size"), Some("24px"));
}

#[test]
fn test_inherited_properties_flow_down() {
    let tree = styled(
        "<div><span>x</span></div>",
        "div { color: navy; font-style: italic; background-color: yellow; }",
    );
    let span = find_element(&tree, "span");
    assert_eq!(prop(&tree, span, "color"), Some("navy"));
    assert_eq!(prop(&tree, span, "font-style"), Some("italic"));
    assert_eq!(prop(&tree, span, "background-color"), None);
}

#[test]
fn test_text_node_uses_parent_style() {
    let tree = styled("<b>bold</b>", "");
    let b = find_element(&tree, "b");
    let text = tree.children(b)[0];
    assert_eq!(prop(&tree, text, "font-weight"), Some("bold"));
    assert!(tree.as_element(text).is_none());
}

#[test]
fn test_default_rules_apply_and_author_overrides_them() {
    let tree = styled("<title>t</title><pre>a</pre><a>link</a>", "a { color: red; }");
    let pre = find_element(&tree, "pre");
    let a = find_element(&tree, "a");
    assert_eq!(prop(&tree, pre, "background-color"), Some("gray"));
    assert_eq!(prop(&tree, a, "color"), Some("red"));
    let head = find_element(&tree, "head");
    assert_eq!(prop(&tree, head, "display"), Some("none"));
}

#[test]
fn test_hand_built_tree() {
    let mut tree = DomTree::new();
    let html = tree.alloc(make_element("html", None));
    let body = tree.alloc(make_element("body", Some("font-size: 20px")));
    tree.append_child(html, body);
    let small = tree.alloc(make_element("div", Some("font-size: 50%; color: #333")));
    tree.append_child(body, small);

    let mut rules = parse_stylesheet("body { color: red; }");
    sort_rules(&mut rules);
    style(&mut tree, &rules);

    assert_eq!(prop(&tree, html, "font-size"), Some("16px"));
    assert_eq!(prop(&tree, body, "font-size"), Some("20px"));
    assert_eq!(prop(&tree, small, "font-size"), Some("10px"));
    assert_eq!(prop(&tree, small, "color"), Some("#333"));
}

#[test]
fn test_view_source_tree_is_left_unstyled() {
    let mut tree = wren_html::parse_document("<p>x</p>", true);
    style(&mut tree, &cascade_rules(Vec::new()));
    assert!(tree.computed_style(tree.root()).is_none());
}

#[test]
fn test_stylesheet_links_in_document_order() {
    let tree = wren_html::parse_document(
        r#"<link rel="stylesheet" href="a.css"><link rel=icon href=x.ico>
           <link rel=STYLESHEET href="b.css"><link rel=stylesheet>"#,
        false,
    );
    assert_eq!(stylesheet_links(&tree), vec!["a.css", "b.css"]);
}

#[test]
fn test_style_elements_feed_the_cascade() {
    let tree = wren_html::parse_document(
        "<style>p { color: maroon; }</style><p>x</p>",
        false,
    );
    let sheets = style_elements(&tree);
    assert_eq!(sheets, vec!["p { color: maroon; }"]);

    let mut tree = tree;
    let rules = cascade_rules(sheets.iter().flat_map(|s| parse_stylesheet(s)));
    style(&mut tree, &rules);
    let p = find_element(&tree, "p");
    assert_eq!(prop(&tree, p, "color"), Some("maroon"));
}

#[test]
fn test_deep_nesting_inherits_to_innermost_element() {
    let html = format!(r#"<div style="color:teal">{}x"#, "<div>".repeat(50_000));
    let tree = styled(&html, "");
    let innermost = tree
        .iter_all()
        .filter(|&id| tree.tag_name(id) == Some("div"))
        .last()
        .expect("nested divs");
    assert_eq!(prop(&tree, innermost, "color"), Some("teal"));
}
