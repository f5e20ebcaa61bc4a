/*!
# Graph Generators

Seeded random generators for connected weighted graphs, used by the tests
and benchmarks. Every generator takes an explicit seed so runs are
reproducible. Invalid parameters (zero vertices, a weight range of zero,
more extra edges than the vertex pairs can hold) return a `Result` with a
relevant error.
*/

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::error::{Result, ThorupError};
use crate::core::graph::Graph;

/// Generates a connected graph: a random spanning tree plus `extra_edges`
/// additional random edges, all with weights drawn uniformly from
/// `1..=max_weight`.
///
/// # Arguments
///
/// * `n` - The number of vertices (must be > 0).
/// * `extra_edges` - Edges added on top of the `n - 1` tree edges.
/// * `max_weight` - Upper bound of the weight range (must be > 0).
/// * `seed` - The seed for the random number generator.
///
/// # Example
///
/// ```rust
/// use thorup::core::generators::random_connected_graph;
///
/// let graph = random_connected_graph(50, 100, 1000, 42)
///     .expect("failed to generate graph");
/// assert_eq!(graph.node_count(), 50);
/// assert_eq!(graph.edge_count(), 149);
/// ```
pub fn random_connected_graph(
    n: usize,
    extra_edges: usize,
    max_weight: u32,
    seed: u64,
) -> Result<Graph> {
    if n == 0 {
        return Err(ThorupError::invalid_argument(
            "number of vertices must be greater than zero",
        ));
    }
    if max_weight == 0 || max_weight > i32::MAX as u32 {
        return Err(ThorupError::invalid_argument(
            "maximum weight must be in 1..=2^31 - 1",
        ));
    }
    let possible = n * (n - 1) / 2;
    if n.saturating_sub(1) + extra_edges > possible {
        return Err(ThorupError::invalid_argument(format!(
            "{} edges requested but {} vertices allow at most {}",
            n - 1 + extra_edges,
            n,
            possible
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new(n)?;

    // Spanning-tree skeleton: each vertex attaches to a random earlier one.
    for v in 1..n as u32 {
        let u = rng.random_range(0..v);
        let w = rng.random_range(1..=max_weight);
        graph.add_edge(u, v, w)?;
    }

    let mut added = 0;
    while added < extra_edges {
        let u = rng.random_range(0..n as u32);
        let v = rng.random_range(0..n as u32);
        if u == v || graph.contains_edge(u, v) {
            continue;
        }
        let w = rng.random_range(1..=max_weight);
        graph.add_edge(u, v, w)?;
        added += 1;
    }
    Ok(graph)
}

/// Generates a connected graph whose weights are spread over the full
/// range of bit levels: each weight is `2^k + r` for a uniformly random
/// level `k` below `max_level`. Wide msb spreads produce deep component
/// hierarchies.
pub fn random_layered_graph(
    n: usize,
    extra_edges: usize,
    max_level: u32,
    seed: u64,
) -> Result<Graph> {
    if max_level == 0 || max_level > 30 {
        return Err(ThorupError::invalid_argument(
            "maximum bit level must be in 1..=30",
        ));
    }
    if n == 0 {
        return Err(ThorupError::invalid_argument(
            "number of vertices must be greater than zero",
        ));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let weight = move |rng: &mut StdRng| {
        let k = rng.random_range(0..max_level);
        (1u32 << k) + rng.random_range(0..(1u32 << k))
    };
    let possible = n * (n - 1) / 2;
    if n.saturating_sub(1) + extra_edges > possible {
        return Err(ThorupError::invalid_argument(format!(
            "{} edges requested but {} vertices allow at most {}",
            n - 1 + extra_edges,
            n,
            possible
        )));
    }

    let mut graph = Graph::new(n)?;
    for v in 1..n as u32 {
        let u = rng.random_range(0..v);
        let w = weight(&mut rng);
        graph.add_edge(u, v, w)?;
    }
    let mut added = 0;
    while added < extra_edges {
        let u = rng.random_range(0..n as u32);
        let v = rng.random_range(0..n as u32);
        if u == v || graph.contains_edge(u, v) {
            continue;
        }
        let w = weight(&mut rng);
        graph.add_edge(u, v, w)?;
        added += 1;
    }
    Ok(graph)
}
