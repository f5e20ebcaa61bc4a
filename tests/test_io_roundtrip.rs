// DIMACS and serde round-trips for the graph store.

use std::io::Cursor;

use thorup::core::generators::random_connected_graph;
use thorup::core::graph::Graph;
use thorup::core::io::{read_dimacs_from, write_dimacs};

#[test]
fn test_dimacs_roundtrip() {
    let graph = random_connected_graph(25, 40, 900, 17).unwrap();
    let dir = std::env::temp_dir().join("thorup-io-roundtrip");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("roundtrip.gr");
    let path = path.to_str().unwrap();

    write_dimacs(path, &graph).unwrap();
    let reread = thorup::core::io::read_dimacs(path).unwrap();

    assert_eq!(reread.node_count(), graph.node_count());
    assert_eq!(reread.edge_count(), graph.edge_count());
    for (u, v, w) in graph.undirected_edges() {
        assert!(reread.contains_edge(u, v), "missing edge ({}, {}, {})", u, v, w);
    }
}

#[test]
fn test_dimacs_reader_accepts_bidirectional_listings() {
    // Road-network instances list each edge in both directions; the
    // second copy must be skipped, not fatal.
    let text = "c bidirectional\n\
                p sp 4 6\n\
                a 1 2 3\n\
                a 2 1 3\n\
                a 2 3 5\n\
                a 3 2 5\n\
                a 3 4 1\n\
                a 4 3 1\n";
    let g = read_dimacs_from(Cursor::new(text)).unwrap();
    assert_eq!(g.node_count(), 4);
    assert_eq!(g.edge_count(), 3);
}

#[test]
fn test_graph_serde_roundtrip() {
    let graph = random_connected_graph(12, 8, 100, 3).unwrap();
    let json = serde_json::to_string(&graph).unwrap();
    let back: Graph = serde_json::from_str(&json).unwrap();
    assert_eq!(back.node_count(), graph.node_count());
    let before: Vec<_> = graph.edges().collect();
    let after: Vec<_> = back.edges().collect();
    assert_eq!(before, after);
}
