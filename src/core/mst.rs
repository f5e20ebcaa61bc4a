/*!
# Msb-Minimal Spanning Tree Algorithms

This module builds the spanning subgraph that seeds the component tree.
The tree is *not* a conventional minimum spanning tree: edges are compared
by the index of the most significant 1-bit of their weight only, with ties
broken arbitrarily. Two algorithms are provided behind the
[`MstAlgorithm`] seam:

- **Kruskal (bucketed):**
  Bucket-sorts edges by `msb(weight)`, then sweeps the concatenated
  buckets with a union-find structure. This is the default and the one
  whose output ordering the component tree construction is tuned for.

- **Prim:**
  A binary-heap Prim variant keyed on `(msb(weight), weight)`, useful as
  an independent cross-check of the bucketed sweep.

Both produce a graph with `2(n-1)` directed arcs when the input is
connected. A disconnected input yields whatever partial subgraph was
built; callers that need a full tree must guarantee connectivity.
*/

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::core::error::Result;
use crate::core::graph::Graph;
use crate::core::unionfind::UnionFind;

/// Returns the index of the most significant 1-bit of `w`.
///
/// `msb(1) == 0`, `msb(2) == 1`, `msb(3) == 1`, `msb(4) == 2`. Edge
/// weights are strictly positive, so the result is always defined.
#[inline]
pub fn msb(w: u32) -> u32 {
    debug_assert!(w > 0, "msb is undefined for zero");
    31 - w.leading_zeros()
}

/// Strategy interface for building a spanning subgraph that is minimal
/// under the msb-weight ordering.
///
/// Implementations receive a weighted undirected graph and return a
/// spanning subgraph with `2(n-1)` directed arcs; any edge ordering that
/// is non-decreasing in `msb(weight)` is acceptable.
pub trait MstAlgorithm {
    /// Builds the spanning subgraph of `graph`.
    fn spanning_tree(&self, graph: &Graph) -> Result<Graph>;
}

/// Kruskal's algorithm specialized for the msb-weight ordering.
///
/// Edges are distributed into 32 buckets indexed by `msb(weight)`; the
/// concatenation of the buckets in ascending order is a stable sequence
/// with non-decreasing msb, which is all the ordering the sweep needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct KruskalMsb;

impl MstAlgorithm for KruskalMsb {
    fn spanning_tree(&self, graph: &Graph) -> Result<Graph> {
        let n = graph.node_count();
        let mut buckets: Vec<Vec<(u32, u32, u32)>> = vec![Vec::new(); 32];
        for (u, v, w) in graph.undirected_edges() {
            buckets[msb(w) as usize].push((u, v, w));
        }

        let mut uf = UnionFind::new(n);
        let mut tree = Graph::new(n)?;
        let target_arcs = 2 * (n - 1);
        'sweep: for bucket in &buckets {
            for &(u, v, w) in bucket {
                if uf.find(u) != uf.find(v) {
                    uf.union(u, v);
                    tree.add_edge(u, v, w)?;
                    if tree.arc_count() == target_arcs {
                        break 'sweep;
                    }
                }
            }
        }
        Ok(tree)
    }
}

/// Prim's algorithm keyed on `(msb(weight), weight)`.
///
/// Grows the tree from vertex 0, always taking the frontier edge whose
/// weight has the smallest msb. The secondary weight key makes the
/// selection deterministic; it does not change which msb classes appear
/// in the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimMsb;

impl MstAlgorithm for PrimMsb {
    fn spanning_tree(&self, graph: &Graph) -> Result<Graph> {
        let n = graph.node_count();
        let mut tree = Graph::new(n)?;
        let mut in_tree = vec![false; n];
        let mut heap = BinaryHeap::new();

        in_tree[0] = true;
        for arc in graph.arcs(0) {
            heap.push(Reverse((msb(arc.weight), arc.weight, 0u32, arc.target)));
        }

        while let Some(Reverse((_, w, from, to))) = heap.pop() {
            if in_tree[to as usize] {
                continue;
            }
            in_tree[to as usize] = true;
            tree.add_edge(from, to, w)?;
            if tree.arc_count() == 2 * (n - 1) {
                break;
            }
            for arc in graph.arcs(to) {
                if !in_tree[arc.target as usize] {
                    heap.push(Reverse((msb(arc.weight), arc.weight, to, arc.target)));
                }
            }
        }
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Graph {
        // Weights chosen so the msb order differs from the weight order.
        let mut g = Graph::new(4).unwrap();
        g.add_edge(0, 1, 5).unwrap(); // msb 2
        g.add_edge(1, 2, 6).unwrap(); // msb 2
        g.add_edge(2, 3, 1).unwrap(); // msb 0
        g.add_edge(3, 0, 8).unwrap(); // msb 3
        g.add_edge(0, 2, 7).unwrap(); // msb 2
        g
    }

    #[test]
    fn test_msb() {
        assert_eq!(msb(1), 0);
        assert_eq!(msb(2), 1);
        assert_eq!(msb(3), 1);
        assert_eq!(msb(4), 2);
        assert_eq!(msb(7), 2);
        assert_eq!(msb(u32::MAX), 31);
    }

    #[test]
    fn test_kruskal_arc_count() {
        let tree = KruskalMsb.spanning_tree(&diamond()).unwrap();
        assert_eq!(tree.arc_count(), 2 * (4 - 1));
    }

    #[test]
    fn test_kruskal_prefers_low_msb() {
        let tree = KruskalMsb.spanning_tree(&diamond()).unwrap();
        // The msb-0 edge (2,3) must be in the tree; the msb-3 edge (3,0)
        // must not, since vertex 3 is reachable through lower classes.
        assert!(tree.contains_edge(2, 3));
        assert!(!tree.contains_edge(3, 0));
    }

    #[test]
    fn test_prim_spans_same_msb_classes() {
        let g = diamond();
        let kruskal = KruskalMsb.spanning_tree(&g).unwrap();
        let prim = PrimMsb.spanning_tree(&g).unwrap();
        assert_eq!(prim.arc_count(), kruskal.arc_count());
        let classes = |t: &Graph| {
            let mut c: Vec<u32> = t.undirected_edges().map(|(_, _, w)| msb(w)).collect();
            c.sort_unstable();
            c
        };
        assert_eq!(classes(&prim), classes(&kruskal));
    }

    #[test]
    fn test_disconnected_input_yields_partial_tree() {
        let mut g = Graph::new(4).unwrap();
        g.add_edge(0, 1, 3).unwrap();
        g.add_edge(2, 3, 3).unwrap();
        let tree = KruskalMsb.spanning_tree(&g).unwrap();
        assert_eq!(tree.arc_count(), 4); // 2 edges, not the 3 a tree needs
    }

    #[test]
    fn test_single_vertex() {
        let g = Graph::new(1).unwrap();
        let tree = KruskalMsb.spanning_tree(&g).unwrap();
        assert_eq!(tree.arc_count(), 0);
    }
}
