//! Tests for registry queries and diagnostic rendering.

use larch_dom::{AttributesMap, DomTree, Node, NodeId};

fn attrs(pairs: &[(&str, &str)]) -> AttributesMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Helper mirroring what the tree builder does for a registered child.
fn push_registered(
    tree: &mut DomTree,
    parent: NodeId,
    tag: &str,
    content: &str,
    pairs: &[(&str, &str)],
) -> NodeId {
    let id = tree.alloc(Node::new(tag, content, attrs(pairs)));
    tree.add_child(parent, id).unwrap();
    tree.register(id);
    id
}

/// `<body id="top"><p class="lead">one</p><P>two</P><p id="x" class="a b">three</p><span id="x"></span></body>`
fn sample() -> (DomTree, Vec<NodeId>) {
    let mut tree = DomTree::new();
    let body = tree.alloc(Node::new("body", "", attrs(&[("id", "top"), ("class", "lead")])));
    tree.set_root(body);
    let ids = vec![
        push_registered(&mut tree, body, "p", "one", &[("class", "lead")]),
        push_registered(&mut tree, body, "P", "two", &[]),
        push_registered(&mut tree, body, "p", "three", &[("id", "x"), ("class", "a b")]),
        push_registered(&mut tree, body, "span", "", &[("id", "x")]),
    ];
    (tree, ids)
}

#[test]
fn test_find_by_tag_is_case_sensitive_and_ordered() {
    let (tree, ids) = sample();

    assert_eq!(tree.find_by_tag("p"), vec![ids[0], ids[2]]);
    assert_eq!(tree.find_by_tag("P"), vec![ids[1]]);
    assert!(tree.find_by_tag("div").is_empty());
}

#[test]
fn test_find_by_id_returns_first_match() {
    let (tree, ids) = sample();

    assert_eq!(tree.find_by_id("x"), Some(ids[2]));
    assert_eq!(tree.find_by_id("missing"), None);
}

#[test]
fn test_find_by_class_exact_match_only() {
    let (tree, ids) = sample();

    assert_eq!(tree.find_by_class("lead"), vec![ids[0]]);
    assert_eq!(tree.find_by_class("a b"), vec![ids[2]]);
    assert!(tree.find_by_class("a").is_empty());
}

#[test]
fn test_root_is_invisible_to_queries() {
    let (tree, _) = sample();

    assert!(tree.find_by_tag("body").is_empty());
    assert_eq!(tree.find_by_id("top"), None);
    assert!(!tree.registry().contains(&tree.root().unwrap()));
}

#[test]
fn test_display_node_format() {
    let (tree, ids) = sample();
    let p = ids[2];

    assert_eq!(
        tree.display_node(p).to_string(),
        format!("{{{p} | Tag: p; Content: three; Parent: 0 body; Attrib: {{\"class\": \"a b\", \"id\": \"x\"}}}}")
    );

    let root = tree.root().unwrap();
    assert_eq!(
        tree.display_node(root).to_string(),
        "{0 | Tag: body; Content: ; Parent: None; Attrib: {\"class\": \"lead\", \"id\": \"top\"}}"
    );
}

#[test]
fn test_tree_display_lists_registry() {
    let (tree, _) = sample();
    let rendered = tree.to_string();

    assert_eq!(rendered.lines().count(), tree.registry().len());
    assert!(rendered.lines().all(|line| line.contains("Parent: 0 body")));
}

#[test]
fn test_node_serializes_to_json() {
    let (tree, ids) = sample();
    let value = serde_json::to_value(&tree[ids[0]]).unwrap();

    assert_eq!(value["tag"], "p");
    assert_eq!(value["content"], "one");
    assert_eq!(value["attributes"]["class"], "lead");
    assert_eq!(value["parent"], 0);
}
