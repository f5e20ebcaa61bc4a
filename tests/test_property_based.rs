/*!
# Property-Based Tests

Property tests driving the engine against the Dijkstra reference across a
range of random graphs, plus the distance-vector invariants that must
hold for any single-source result.
*/

use proptest::prelude::*;
use thorup::core::engine::ThorupEngine;
use thorup::core::generators::{random_connected_graph, random_layered_graph};
use thorup::core::graph::Graph;
use thorup::core::mst::KruskalMsb;
use thorup::core::paths::dijkstra;
use thorup::core::splitfindmin::GabowSplitFindmin;
use thorup::core::unionfind::ArrayUnionFind;

/// Strategy for vertex counts small enough to keep the suite fast.
fn graph_size() -> impl Strategy<Value = usize> {
    2usize..40usize
}

/// Strategy for random seeds.
fn seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

fn query(graph: &Graph, source: u32) -> Vec<i32> {
    let mut engine = ThorupEngine::new();
    engine.construct_msb_mst(graph.clone(), &KruskalMsb).unwrap();
    engine
        .construct_other_data_structures(&ArrayUnionFind, &GabowSplitFindmin)
        .unwrap();
    engine.find_shortest_paths(source).unwrap()
}

proptest! {
    /// Property: the engine and Dijkstra agree on every vertex.
    #[test]
    fn prop_engine_agrees_with_dijkstra(
        n in graph_size(),
        extra in 0usize..40,
        seed in seed()
    ) {
        let extra = extra.min(n * (n - 1) / 2 - (n - 1));
        let graph = random_connected_graph(n, extra, 10_000, seed).unwrap();
        let source = (seed % n as u64) as u32;
        prop_assert_eq!(query(&graph, source), dijkstra(&graph, source).unwrap());
    }

    /// Property: layered weight distributions agree as well.
    #[test]
    fn prop_engine_agrees_on_layered_weights(
        n in graph_size(),
        seed in seed()
    ) {
        let extra = (n * (n - 1) / 2 - (n - 1)).min(n / 2).min(10);
        let graph = random_layered_graph(n, extra, 14, seed).unwrap();
        prop_assert_eq!(query(&graph, 0), dijkstra(&graph, 0).unwrap());
    }

    /// Property: the source distance is zero and every edge satisfies the
    /// triangle inequality.
    #[test]
    fn prop_distance_vector_invariants(
        n in graph_size(),
        seed in seed()
    ) {
        let extra = (n * (n - 1) / 2 - (n - 1)).min(n / 2);
        let graph = random_connected_graph(n, extra, 1_000, seed).unwrap();
        let source = (seed % n as u64) as u32;
        let d = query(&graph, source);
        prop_assert_eq!(d[source as usize], 0);
        for (u, v, w) in graph.edges() {
            prop_assert!(d[v as usize] as i64 <= d[u as usize] as i64 + w as i64);
        }
    }

    /// Property: a cleaned-up engine reproduces its own result exactly.
    #[test]
    fn prop_queries_are_repeatable(
        n in graph_size(),
        seed in seed()
    ) {
        let graph = random_connected_graph(n, n / 3, 500, seed).unwrap();
        let mut engine = ThorupEngine::new();
        engine.construct_msb_mst(graph, &KruskalMsb).unwrap();
        engine
            .construct_other_data_structures(&ArrayUnionFind, &GabowSplitFindmin)
            .unwrap();
        let first = engine.find_shortest_paths(0).unwrap();
        engine.clean_up_between_queries(&GabowSplitFindmin).unwrap();
        let second = engine.find_shortest_paths(0).unwrap();
        prop_assert_eq!(first, second);
    }
}
