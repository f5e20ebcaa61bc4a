/*!
# Shortest Paths Reference

A classical binary-heap Dijkstra over the crate's graph type, used as the
correctness oracle for the hierarchical engine and as the comparison
baseline in the benchmarks. Distances follow the same conventions as the
engine: 32-bit output, [`UNREACHABLE`](crate::core::engine::UNREACHABLE)
for vertices without a path, and saturating arithmetic so overflowing
relaxations never win.
*/

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::core::engine::UNREACHABLE;
use crate::core::error::{Result, ThorupError};
use crate::core::graph::Graph;

/// Computes single-source shortest-path distances with Dijkstra's
/// algorithm.
///
/// # Arguments
///
/// * `graph` - The graph to search.
/// * `source` - The starting vertex.
///
/// # Complexity
///
/// - **Time:** O((V + E) log V)
/// - **Space:** O(V)
///
/// # Example
///
/// ```rust
/// use thorup::core::graph::Graph;
/// use thorup::core::paths::dijkstra;
///
/// let mut g = Graph::new(3).unwrap();
/// g.add_edge(0, 1, 2).unwrap();
/// g.add_edge(1, 2, 3).unwrap();
/// assert_eq!(dijkstra(&g, 0).unwrap(), vec![0, 2, 5]);
/// ```
pub fn dijkstra(graph: &Graph, source: u32) -> Result<Vec<i32>> {
    let n = graph.node_count();
    if source as usize >= n {
        return Err(ThorupError::invalid_argument(format!(
            "source vertex {} outside [0, {})",
            source, n
        )));
    }

    let mut dist: Vec<i64> = vec![i64::MAX; n];
    let mut heap = BinaryHeap::new();
    dist[source as usize] = 0;
    heap.push(Reverse((0i64, source)));

    while let Some(Reverse((d, u))) = heap.pop() {
        if d > dist[u as usize] {
            continue;
        }
        for arc in graph.arcs(u) {
            let next = d.saturating_add(arc.weight as i64);
            if next < dist[arc.target as usize] {
                dist[arc.target as usize] = next;
                heap.push(Reverse((next, arc.target)));
            }
        }
    }

    Ok(dist
        .into_iter()
        .map(|d| {
            if d >= UNREACHABLE as i64 {
                UNREACHABLE
            } else {
                d as i32
            }
        })
        .collect())
}
