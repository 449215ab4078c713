use digraphdb::{Attributes, Edge, GraphError, GraphStore, NodeKey};
use serde_json::json;

fn graph() -> GraphStore {
    GraphStore::open_in_memory().expect("graph")
}

fn sorted_neighbors(graph: &GraphStore, key: &str) -> Vec<NodeKey> {
    let mut keys: Vec<NodeKey> = graph
        .neighbors(key)
        .expect("neighbors")
        .map(|key| key.expect("key"))
        .collect();
    keys.sort();
    keys
}

#[test]
fn test_add_edge_creates_endpoints() {
    let graph = graph();
    graph.add_node("a", Attributes::new()).expect("a");
    graph.add_edge("a", "b").expect("a->b");
    graph.add_edge("a", "c").expect("a->c");

    assert_eq!(graph.n_nodes().expect("nodes"), 3);
    assert_eq!(graph.n_edges().expect("edges"), 2);
    assert_eq!(
        sorted_neighbors(&graph, "a"),
        vec![NodeKey::from("b"), NodeKey::from("c")]
    );
    assert_eq!(graph.degree("a").expect("degree"), 2);
    assert!(graph.has_node("b").expect("has b"));
    assert!(graph.node("b").expect("b").attributes().is_none());
}

#[test]
fn test_add_edge_keeps_endpoint_attributes() {
    let graph = graph();
    let mut attributes = Attributes::new();
    attributes.insert("color".into(), json!("red"));
    graph.add_node("a", attributes.clone()).expect("a");
    graph.add_edge("a", "b").expect("edge");
    assert_eq!(graph.node("a").expect("a").attributes(), Some(&attributes));
}

#[test]
fn test_duplicate_edge_is_noop() {
    let graph = graph();
    graph.add_edge("u", "v").expect("first");
    graph.add_edge("u", "v").expect("duplicate");
    assert_eq!(graph.n_edges().expect("edges"), 1);
    assert!(graph.has_edge("u", "v").expect("has_edge"));
}

#[test]
fn test_edges_are_directed() {
    let graph = graph();
    graph.add_edge("u", "v").expect("edge");
    assert!(!graph.has_edge("v", "u").expect("reverse"));
    assert_eq!(graph.edge("u", "v").expect("edge"), Edge::new("u", "v"));
    let err = graph.edge("v", "u").expect_err("missing");
    assert!(matches!(err, GraphError::NotFound(_)));
}

#[test]
fn test_remove_edge_only_removes_that_pair() {
    let graph = graph();
    graph
        .add_edges_from([("u", "v"), ("v", "u"), ("u", "w")])
        .expect("edges");
    graph.remove_edge("u", "v").expect("remove");
    graph.remove_edge("x", "y").expect("missing edge is fine");
    assert!(!graph.has_edge("u", "v").expect("removed"));
    assert!(graph.has_edge("v", "u").expect("reverse kept"));
    assert!(graph.has_edge("u", "w").expect("sibling kept"));
    assert_eq!(graph.n_nodes().expect("nodes"), 3);
}

#[test]
fn test_add_edges_from_deduplicates() {
    let graph = graph();
    graph
        .add_edges_from([(1, 2), (2, 3), (1, 2), (3, 1)])
        .expect("bulk");
    assert_eq!(graph.n_nodes().expect("nodes"), 3);
    assert_eq!(graph.n_edges().expect("edges"), 3);
}

#[test]
fn test_add_edges_from_empty_is_noop() {
    let graph = graph();
    graph
        .add_edges_from(Vec::<(&str, &str)>::new())
        .expect("empty");
    assert_eq!(graph.n_nodes().expect("nodes"), 0);
    assert_eq!(graph.n_edges().expect("edges"), 0);
}

#[test]
fn test_add_edges_from_spans_many_insert_chunks() {
    let graph = graph();
    let pairs: Vec<(i64, i64)> = (0..1_750).map(|i| (i, i + 1)).collect();
    graph.add_edges_from(pairs).expect("bulk");
    assert_eq!(graph.n_edges().expect("edges"), 1_750);
    assert_eq!(graph.n_nodes().expect("nodes"), 1_751);
    assert!(graph.has_edge(1_749, 1_750).expect("last edge"));
}

#[test]
fn test_edge_keys_keep_their_type() {
    let graph = graph();
    graph.add_edge(1, "1").expect("mixed");
    assert!(graph.has_edge(1, "1").expect("typed"));
    assert!(!graph.has_edge("1", 1).expect("swapped types"));
    assert!(!graph.has_edge(1, 1).expect("int only"));
}
