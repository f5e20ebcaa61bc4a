/*!
# Weighted Graph Store

This module defines the adjacency-list graph container used throughout the
crate. Vertices are dense indices `0..n-1`; every undirected edge is stored
as two directed arcs sharing the same weight, so incident-arc iteration
needs no direction bookkeeping.

The container is intended to be populated once and then treated as
read-only by the preparation and query phases. Arcs are iterated in
insertion order; this order is part of the determinism contract of the
engine because it fixes tie-breaking during relaxation.

## Error Handling

Construction and mutation validate their arguments and return a `Result`
with a [`ThorupError`](crate::core::error::ThorupError): zero-vertex
graphs, out-of-range endpoints, self-loops, and zero weights are
`InvalidInput`; duplicate vertex pairs are `ParallelEdge`.
*/

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, ThorupError};

/// A directed arc: target vertex plus edge weight.
///
/// Two arcs with swapped endpoints and the same weight together represent
/// one undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arc {
    /// Target vertex of the arc.
    pub target: u32,
    /// Weight of the underlying undirected edge; always positive.
    pub weight: u32,
}

/// Adjacency-list container for an undirected graph with positive integer
/// edge weights.
///
/// # Example
///
/// ```rust
/// use thorup::core::graph::Graph;
///
/// let mut g = Graph::new(3).unwrap();
/// g.add_edge(0, 1, 4).unwrap();
/// g.add_edge(1, 2, 7).unwrap();
/// assert_eq!(g.node_count(), 3);
/// assert_eq!(g.edge_count(), 2);
/// assert_eq!(g.arc_count(), 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    adjacency: Vec<Vec<Arc>>,
    num_arcs: usize,
}

impl Graph {
    /// Creates a graph with `n` vertices and no edges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `n` is zero or exceeds `2^31 - 1`.
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(ThorupError::invalid_input(
                "graph must have at least one vertex",
            ));
        }
        if n > i32::MAX as usize {
            return Err(ThorupError::invalid_input(format!(
                "vertex count {} exceeds 2^31 - 1",
                n
            )));
        }
        Ok(Self {
            adjacency: vec![Vec::new(); n],
            num_arcs: 0,
        })
    }

    /// Returns the number of vertices.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.num_arcs / 2
    }

    /// Returns the number of directed arcs (twice the edge count).
    pub fn arc_count(&self) -> usize {
        self.num_arcs
    }

    /// Returns true if `v` is a valid vertex index.
    pub fn contains_node(&self, v: u32) -> bool {
        (v as usize) < self.adjacency.len()
    }

    /// Returns true if an edge between `u` and `v` exists in either
    /// direction.
    pub fn contains_edge(&self, u: u32, v: u32) -> bool {
        self.contains_node(u)
            && self
                .adjacency[u as usize]
                .iter()
                .any(|arc| arc.target == v)
    }

    /// Adds an undirected edge between `u` and `v` with weight `w`,
    /// storing two directed arcs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for out-of-range endpoints, self-loops, or a
    /// zero weight, and `ParallelEdge` if the pair is already connected.
    pub fn add_edge(&mut self, u: u32, v: u32, w: u32) -> Result<()> {
        let n = self.adjacency.len();
        if u as usize >= n || v as usize >= n {
            return Err(ThorupError::invalid_input(format!(
                "edge ({}, {}) references a vertex outside [0, {})",
                u, v, n
            )));
        }
        if u == v {
            return Err(ThorupError::invalid_input(format!(
                "self-loop on vertex {}",
                u
            )));
        }
        if w == 0 {
            return Err(ThorupError::invalid_input(format!(
                "edge ({}, {}) has non-positive weight",
                u, v
            )));
        }
        if w > i32::MAX as u32 {
            return Err(ThorupError::invalid_input(format!(
                "edge ({}, {}) weight {} exceeds 2^31 - 1",
                u, v, w
            )));
        }
        if self.contains_edge(u, v) {
            return Err(ThorupError::parallel_edge(format!(
                "edge ({}, {}) already present",
                u, v
            )));
        }
        self.adjacency[u as usize].push(Arc { target: v, weight: w });
        self.adjacency[v as usize].push(Arc { target: u, weight: w });
        self.num_arcs += 2;
        Ok(())
    }

    /// Returns the arcs leaving `v` in insertion order.
    pub fn arcs(&self, v: u32) -> &[Arc] {
        &self.adjacency[v as usize]
    }

    /// Returns an iterator over all directed arcs as `(source, target,
    /// weight)` triples, grouped by source vertex.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(u, arcs)| {
            arcs.iter()
                .map(move |arc| (u as u32, arc.target, arc.weight))
        })
    }

    /// Returns an iterator over undirected edges, yielding each pair once
    /// with `source < target`.
    pub fn undirected_edges(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        self.edges().filter(|(u, v, _)| u < v)
    }

    /// Returns the degree of `v` (number of incident undirected edges).
    pub fn degree(&self, v: u32) -> usize {
        self.adjacency[v as usize].len()
    }
}
