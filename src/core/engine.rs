/*!
# Thorup Engine

The two-phase shortest-paths driver. The *prepare* phase builds the
msb-minimal spanning tree, the component tree derived from it, and the
split-findmin-backed unvisited structure; it is expensive but amortizable
over any number of queries on the same graph. The *query* phase walks the
component tree with the expand/visit recursion, bucketing components by
their tentative distances shifted right by the node level, which replaces
Dijkstra's global priority queue and yields the deterministic linear-time
bound for undirected graphs with positive integer weights.

The spanning-tree algorithm, union-find, and split-findmin structure are
injected: the first through [`MstAlgorithm`], the latter two through
small factory traits, so a fresh split-findmin can be swapped in at every
inter-query reset.

## Error Handling

Queries against an engine that has not completed both preparation steps
return `NotPrepared`, as does a repeated query without an intervening
[`clean_up_between_queries`](ThorupEngine::clean_up_between_queries). A
source vertex outside `[0, n)` is an `InvalidArgument`. Violations of the
structural invariants of the component tree or the bucket discipline
surface as `InternalInvariantViolation` and abort the query; they
indicate bugs, not bad inputs.
*/

use tracing::debug;

use crate::core::components::{ComponentTree, NO_NODE};
use crate::core::error::{Result, ThorupError};
use crate::core::graph::Graph;
use crate::core::mst::MstAlgorithm;
use crate::core::splitfindmin::{INFINITE_COST, SplitFindminFactory};
use crate::core::unionfind::UnionFindFactory;
use crate::core::unvisited::UnvisitedStructure;

/// Distance reported for unreachable vertices; also the saturation point
/// when a true distance exceeds the 32-bit output range.
pub const UNREACHABLE: i32 = i32::MAX;

/// Bit width of the master bucketing window used at the root, which has
/// no parent level to inherit one from.
const MASTER_WIDTH: u32 = 32;

#[derive(Debug, Clone)]
struct Prepared {
    tree: ComponentTree,
    unvisited: UnvisitedStructure,
    visited: Vec<bool>,
    dirty: bool,
}

/// Single-source shortest-paths engine implementing Thorup's algorithm.
///
/// # Example
///
/// ```rust
/// use thorup::core::engine::ThorupEngine;
/// use thorup::core::graph::Graph;
/// use thorup::core::mst::KruskalMsb;
/// use thorup::core::splitfindmin::GabowSplitFindmin;
/// use thorup::core::unionfind::ArrayUnionFind;
///
/// let mut g = Graph::new(3).unwrap();
/// g.add_edge(0, 1, 2).unwrap();
/// g.add_edge(1, 2, 3).unwrap();
///
/// let mut engine = ThorupEngine::new();
/// engine.construct_msb_mst(g, &KruskalMsb).unwrap();
/// engine
///     .construct_other_data_structures(&ArrayUnionFind, &GabowSplitFindmin)
///     .unwrap();
/// assert_eq!(engine.find_shortest_paths(0).unwrap(), vec![0, 2, 5]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ThorupEngine {
    graph: Option<Graph>,
    mst: Option<Graph>,
    prepared: Option<Prepared>,
}

impl ThorupEngine {
    /// Creates an engine with no graph attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// The graph the engine was prepared with, if any.
    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    /// The msb-minimal spanning tree, if built.
    pub fn spanning_tree(&self) -> Option<&Graph> {
        self.mst.as_ref()
    }

    /// Returns true once both preparation steps have succeeded.
    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    /// First preparation step: take ownership of the graph and build its
    /// msb-minimal spanning tree with the injected algorithm.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the graph is disconnected (the spanning
    /// subgraph then has fewer than `2(n-1)` arcs).
    pub fn construct_msb_mst(
        &mut self,
        graph: Graph,
        algorithm: &dyn MstAlgorithm,
    ) -> Result<()> {
        let tree = algorithm.spanning_tree(&graph)?;
        let n = graph.node_count();
        if tree.arc_count() != 2 * (n - 1) {
            return Err(ThorupError::invalid_input(format!(
                "graph is disconnected: spanning subgraph has {} of {} arcs",
                tree.arc_count(),
                2 * (n - 1)
            )));
        }
        debug!(
            vertices = n,
            edges = graph.edge_count(),
            "msb spanning tree built"
        );
        self.graph = Some(graph);
        self.mst = Some(tree);
        self.prepared = None;
        Ok(())
    }

    /// Second preparation step: build the component tree and the
    /// unvisited structure over it.
    pub fn construct_other_data_structures(
        &mut self,
        union_find: &dyn UnionFindFactory,
        split_findmin: &dyn SplitFindminFactory,
    ) -> Result<()> {
        let graph = self.graph.as_ref().ok_or_else(|| {
            ThorupError::not_prepared("construct_msb_mst has not been run")
        })?;
        let mst = self.mst.as_ref().ok_or_else(|| {
            ThorupError::not_prepared("construct_msb_mst has not been run")
        })?;
        let n = graph.node_count();
        let mut tree =
            ComponentTree::from_spanning_tree_with(mst, union_find.create(n))?;
        let unvisited = UnvisitedStructure::new(
            &mut tree,
            split_findmin.create(n, graph.arc_count()),
        )?;
        debug!(nodes = tree.node_count(), "component tree prepared");
        self.prepared = Some(Prepared {
            tree,
            unvisited,
            visited: vec![false; n],
            dirty: false,
        });
        Ok(())
    }

    /// Inter-query reset: clears the visited set, restores every tree
    /// node's counters (bucket storage is reclaimed and re-created lazily
    /// at the next expansion), and swaps in a fresh split-findmin
    /// instance with every cost back at infinity.
    pub fn clean_up_between_queries(
        &mut self,
        split_findmin: &dyn SplitFindminFactory,
    ) -> Result<()> {
        let (n, m) = match self.graph.as_ref() {
            Some(g) => (g.node_count(), g.arc_count()),
            None => {
                return Err(ThorupError::not_prepared(
                    "engine has no graph attached",
                ));
            }
        };
        let prepared = self.prepared.as_mut().ok_or_else(|| {
            ThorupError::not_prepared("engine has no component tree to reset")
        })?;
        prepared.tree.reset();
        prepared.unvisited.rebuild(split_findmin.create(n, m))?;
        prepared.visited.fill(false);
        prepared.dirty = false;
        Ok(())
    }

    /// Computes shortest-path distances from `source` to every vertex.
    /// `d[source]` is 0; unreachable vertices report [`UNREACHABLE`]
    /// (the prepare phase rejects disconnected graphs, so this only
    /// occurs through saturation).
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a source outside `[0, n)`; `NotPrepared` if
    /// either preparation step is missing or a previous query has not
    /// been cleaned up.
    pub fn find_shortest_paths(&mut self, source: u32) -> Result<Vec<i32>> {
        let graph = self.graph.as_ref().ok_or_else(|| {
            ThorupError::not_prepared("construct_msb_mst has not been run")
        })?;
        let prepared = self.prepared.as_mut().ok_or_else(|| {
            ThorupError::not_prepared("construct_other_data_structures has not been run")
        })?;
        let n = graph.node_count();
        if source as usize >= n {
            return Err(ThorupError::invalid_argument(format!(
                "source vertex {} outside [0, {})",
                source, n
            )));
        }
        if prepared.dirty {
            return Err(ThorupError::not_prepared(
                "previous query state present; run clean_up_between_queries first",
            ));
        }
        prepared.dirty = true;

        prepared.visited[source as usize] = true;
        for arc in graph.arcs(source) {
            prepared.unvisited.decrease_d(arc.target, arc.weight as i64)?;
        }

        let mut query = Query {
            graph,
            tree: &mut prepared.tree,
            unvisited: &mut prepared.unvisited,
            visited: &mut prepared.visited,
            source,
        };
        let root = query.tree.root();
        query.visit(root)?;
        if query.tree.node(root).num_unvisited() != 0 {
            return Err(ThorupError::internal(
                "query finished with unvisited leaves remaining",
            ));
        }

        let mut d = vec![0i32; n];
        for v in 0..n as u32 {
            let cost = prepared.unvisited.d(v);
            d[v as usize] = if cost >= UNREACHABLE as i64 {
                UNREACHABLE
            } else {
                cost as i32
            };
        }
        d[source as usize] = 0;
        Ok(d)
    }
}

/// Borrowed per-query state driving the expand/visit recursion.
struct Query<'a> {
    graph: &'a Graph,
    tree: &'a mut ComponentTree,
    unvisited: &'a mut UnvisitedStructure,
    visited: &'a mut Vec<bool>,
    source: u32,
}

impl Query<'_> {
    /// Width of the bucketing window `v` scans under: the parent's level,
    /// or the master width at the root.
    fn window_width(&self, v: u32) -> u32 {
        let parent = self.tree.node(v).parent();
        if parent == NO_NODE {
            MASTER_WIDTH
        } else {
            self.tree.node(parent).level()
        }
    }

    fn visit(&mut self, v: u32) -> Result<()> {
        if self.tree.node(v).is_leaf() {
            return self.visit_leaf(v);
        }
        let j = self.window_width(v);
        let level = self.tree.node(v).level();
        if !self.tree.node(v).visited() {
            self.expand(v)?;
            let node = self.tree.node_mut(v);
            node.ix = node.ix0;
        }

        let old_shifted = self.tree.node(v).ix >> (j - level);
        while self.tree.node(v).num_unvisited() > 0
            && self.tree.node(v).ix >> (j - level) == old_shifted
        {
            let idx = self.tree.node(v).ix - self.tree.node(v).ix0;
            if idx < 0 || self.tree.node(v).ix > self.tree.node(v).ix8 {
                return Err(ThorupError::internal(format!(
                    "scan cursor left the bucket range of node {}",
                    v
                )));
            }
            while let Some(wh) = self.tree.bucket_first(v, idx as usize) {
                self.visit(wh)?;
            }
            self.tree.node_mut(v).ix += 1;
        }

        if self.tree.node(v).num_unvisited() > 0 {
            // Suspended: this component's remaining vertices belong to a
            // later window of the parent's scan.
            let parent = self.tree.node(v).parent();
            if parent == NO_NODE {
                return Err(ThorupError::internal(
                    "root suspended with unvisited leaves; distances exceed the master width",
                ));
            }
            let value = self.tree.node(v).ix >> (j - level);
            let idx = value - self.tree.node(parent).ix0;
            if idx < 0 || idx > self.tree.node(parent).delta() as i64 {
                return Err(ThorupError::internal(format!(
                    "re-bucketing node {} outside its parent's range",
                    v
                )));
            }
            self.tree.move_to_bucket(parent, idx as usize, v);
        } else {
            let parent = self.tree.node(v).parent();
            if parent != NO_NODE {
                self.tree.bucket_remove(parent, v);
            }
        }
        Ok(())
    }

    /// First entry of an internal node: fix its bucket window from the
    /// current subtree minimum, detach its children in the unvisited
    /// structure, and bucket every child with a finite minimum.
    fn expand(&mut self, v: u32) -> Result<()> {
        let min = self
            .unvisited
            .min_d_minus(self.tree, v)?
            .ok_or_else(|| {
                ThorupError::internal(format!(
                    "expanding node {} with no finite distance in its subtree",
                    v
                ))
            })?;
        let level = self.tree.node(v).level();
        let delta = self.tree.node(v).delta();
        {
            let node = self.tree.node_mut(v);
            node.ix0 = min >> (level - 1);
            node.ix8 = node.ix0 + delta as i64;
        }
        self.tree.allocate_buckets(v, delta as usize + 1);
        self.unvisited.delete_root(self.tree, v)?;

        let children: Vec<u32> = self.tree.node(v).children().to_vec();
        let ix0 = self.tree.node(v).ix0;
        for c in children {
            if self.tree.node(c).is_leaf() && c == self.source {
                // The source can never be rediscovered; account for it as
                // already visited.
                self.mark_leaf_done(c);
                continue;
            }
            if let Some(m) = self.unvisited.min_d_minus(self.tree, c)? {
                let idx = (m >> (level - 1)) - ix0;
                if (0..=delta as i64).contains(&idx) {
                    self.tree.bucket_insert(v, idx as usize, c);
                }
            }
        }
        self.tree.node_mut(v).set_expanded();
        Ok(())
    }

    fn visit_leaf(&mut self, leaf: u32) -> Result<()> {
        if leaf != self.source {
            self.visited[leaf as usize] = true;
            let graph = self.graph;
            let base = self.unvisited.d(leaf);
            for arc in graph.arcs(leaf) {
                let u = arc.target;
                if self.visited[u as usize] {
                    continue;
                }
                let new_d = base.saturating_add(arc.weight as i64);
                if new_d > 0 && new_d < INFINITE_COST && new_d < self.unvisited.d(u) {
                    self.relax(u, new_d)?;
                }
            }
        }
        self.mark_leaf_done(leaf);
        let parent = self.tree.node(leaf).parent();
        if parent != NO_NODE {
            self.tree.bucket_remove(parent, leaf);
        }
        Ok(())
    }

    /// Lowers the tentative distance of `u` and re-buckets its component
    /// under the expanded frontier when the shifted minimum improved.
    fn relax(&mut self, u: u32, new_d: i64) -> Result<()> {
        let wh = self.unvisited.unvisited_root_of(self.tree, u);
        let parent = self.tree.node(wh).parent();
        if parent == NO_NODE {
            // Nothing is expanded above u yet; the plain decrease suffices.
            self.unvisited.decrease_d(u, new_d)?;
            return Ok(());
        }
        let shift = self.tree.node(parent).level() - 1;
        let old = self
            .unvisited
            .min_d_minus(self.tree, wh)?
            .map(|m| m >> shift);
        self.unvisited.decrease_d(u, new_d)?;
        let new = self
            .unvisited
            .min_d_minus(self.tree, wh)?
            .map(|m| m >> shift)
            .ok_or_else(|| {
                ThorupError::internal("subtree minimum vanished after a decrease")
            })?;
        if old.map_or(true, |o| new < o) {
            let idx = new - self.tree.node(parent).ix0;
            if idx < 0 {
                return Err(ThorupError::internal(format!(
                    "node {} moved before its parent's scan cursor",
                    wh
                )));
            }
            if idx <= self.tree.node(parent).delta() as i64 {
                self.tree.move_to_bucket(parent, idx as usize, wh);
            }
        }
        Ok(())
    }

    /// Marks one leaf as visited in the counters: itself and every
    /// ancestor lose one unvisited descendant.
    fn mark_leaf_done(&mut self, leaf: u32) {
        let mut node = leaf;
        loop {
            let n = self.tree.node_mut(node);
            n.dec_unvisited();
            let parent = n.parent;
            if parent == NO_NODE {
                break;
            }
            node = parent;
        }
    }
}
