//! Tests for DOM tree construction and traversal.

use wren_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag, AttributesMap::new())))
}

fn alloc_text(tree: &mut DomTree, text: &str) -> NodeId {
    tree.alloc(NodeType::Text(text.to_string()))
}

#[test]
fn test_first_allocation_is_root() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    assert_eq!(html, NodeId::ROOT);
    assert_eq!(tree.root(), html);
    assert_eq!(tree.parent(html), None);
}

#[test]
fn test_append_child_links_siblings() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let a = alloc_element(&mut tree, "head");
    let b = alloc_element(&mut tree, "body");
    tree.append_child(html, a);
    tree.append_child(html, b);

    assert_eq!(tree.children(html), &[a, b]);
    assert_eq!(tree.parent(b), Some(html));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.prev_sibling(a), None);
}

#[test]
fn test_ancestors_from_parent_to_root() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let body = alloc_element(&mut tree, "body");
    let p = alloc_element(&mut tree, "p");
    let text = alloc_text(&mut tree, "hi");
    tree.append_child(html, body);
    tree.append_child(body, p);
    tree.append_child(p, text);

    let chain: Vec<NodeId> = tree.ancestors(text).collect();
    assert_eq!(chain, vec![p, body, html]);
    assert_eq!(tree.ancestors(html).count(), 0);
}

#[test]
fn test_iter_all_is_document_order() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let body = alloc_element(&mut tree, "body");
    let p1 = alloc_element(&mut tree, "p");
    let t1 = alloc_text(&mut tree, "one");
    let p2 = alloc_element(&mut tree, "p");
    tree.append_child(html, body);
    tree.append_child(body, p1);
    tree.append_child(p1, t1);
    tree.append_child(body, p2);

    let order: Vec<NodeId> = tree.iter_all().collect();
    assert_eq!(order, vec![html, body, p1, t1, p2]);
}

#[test]
fn test_text_inherits_parent_computed_style() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let text = alloc_text(&mut tree, "hello");
    tree.append_child(html, text);
    let _ = tree
        .as_element_mut(html)
        .unwrap()
        .style
        .insert("color".to_string(), "red".to_string());

    let style = tree.computed_style(text).unwrap();
    assert_eq!(style.get("color").map(String::as_str), Some("red"));
}

#[test]
fn test_text_leaf_tree() {
    let tree = DomTree::text_leaf("<p>raw</p>");
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.as_text(tree.root()), Some("<p>raw</p>"));
    assert!(tree.computed_style(tree.root()).is_none());
}

#[test]
fn test_child_element_lookup() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, body);
    assert_eq!(tree.child_element(html, "body"), Some(body));
    assert_eq!(tree.child_element(html, "head"), None);
}
