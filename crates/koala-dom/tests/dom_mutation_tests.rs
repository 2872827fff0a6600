//! Tests for DOM tree mutation and the element navigation used by selector matching.

use koala_dom::{DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

// ========== append_child / remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);
    assert_eq!(tree.children(parent).len(), 1);

    tree.remove_child(parent, child);

    assert_eq!(tree.children(parent).len(), 0);
    assert_eq!(tree.parent(child), None);
}

#[test]
fn test_remove_child_first_of_three() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    tree.remove_child(parent, a);

    assert_eq!(tree.children(parent), &[b, c]);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

#[test]
fn test_remove_child_of_other_parent_is_noop() {
    let mut tree = DomTree::new();
    let a = alloc_element(&mut tree, "div");
    let b = alloc_element(&mut tree, "div");
    let child = alloc_element(&mut tree, "p");
    tree.append_child(a, child);

    tree.remove_child(b, child);

    assert_eq!(tree.parent(child), Some(a));
}

#[test]
fn test_append_child_moves_from_previous_parent() {
    let mut tree = DomTree::new();
    let a = alloc_element(&mut tree, "div");
    let b = alloc_element(&mut tree, "div");
    let child = alloc_element(&mut tree, "p");
    tree.append_child(a, child);
    tree.append_child(b, child);

    assert!(tree.children(a).is_empty());
    assert_eq!(tree.children(b), &[child]);
    assert_eq!(tree.parent(child), Some(b));
}

// ========== Element handles ==========

#[test]
fn test_element_data_splits_prefix() {
    let data = ElementData::new("svg:rect");
    assert_eq!(data.prefix.as_deref(), Some("svg"));
    assert_eq!(data.local_name, "rect");

    let plain = ElementData::new("div");
    assert_eq!(plain.prefix, None);
    assert_eq!(plain.local_name, "div");
}

#[test]
fn test_element_classes_and_id() {
    let data = ElementData::new("div")
        .with_attr("class", "  one two\tthree ")
        .with_attr("id", "main");
    assert_eq!(data.classes().collect::<Vec<_>>(), vec!["one", "two", "three"]);
    assert_eq!(data.id(), Some("main"));
}

#[test]
fn test_sibling_elements_skip_text() {
    let mut tree = DomTree::new();
    let ul = alloc_element(&mut tree, "ul");
    tree.append_child(NodeId::ROOT, ul);
    let first = alloc_element(&mut tree, "li");
    let text = tree.alloc(NodeType::Text("\n".to_string()));
    let second = alloc_element(&mut tree, "li");
    tree.append_child(ul, first);
    tree.append_child(ul, text);
    tree.append_child(ul, second);

    let second_ref = tree.element(second).unwrap();
    assert_eq!(second_ref.prev_sibling_element().map(|e| e.id()), Some(first));
    let first_ref = tree.element(first).unwrap();
    assert_eq!(first_ref.next_sibling_element().map(|e| e.id()), Some(second));
    assert_eq!(first_ref.prev_sibling_element(), None);
}

#[test]
fn test_root_and_parent_element() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, body);

    let html_ref = tree.element(html).unwrap();
    let body_ref = tree.element(body).unwrap();
    assert!(html_ref.is_root());
    assert!(!body_ref.is_root());
    assert_eq!(body_ref.parent_element().map(|e| e.id()), Some(html));
    assert_eq!(html_ref.parent_element(), None);
}

#[test]
fn test_is_empty_ignores_whitespace_and_comments() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    let ws = tree.alloc(NodeType::Text("   ".to_string()));
    let comment = tree.alloc(NodeType::Comment("x".to_string()));
    tree.append_child(div, ws);
    tree.append_child(div, comment);
    assert!(tree.element(div).unwrap().is_empty());

    let span = alloc_element(&mut tree, "span");
    tree.append_child(div, span);
    assert!(!tree.element(div).unwrap().is_empty());
}

#[test]
fn test_elements_in_tree_order() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, head);
    tree.append_child(html, body);
    let p = alloc_element(&mut tree, "p");
    tree.append_child(body, p);

    let names: Vec<_> = tree
        .elements()
        .map(|e| e.data().local_name.clone())
        .collect();
    assert_eq!(names, vec!["html", "head", "body", "p"]);
}
