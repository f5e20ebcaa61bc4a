/*!
# Component Tree

The hierarchy that replaces Dijkstra's global priority queue. Leaves are
the vertices of the graph; every internal node stands for a connected
component that appears while the edges of the msb-minimal spanning tree
are swept in order of increasing bit level. A node at level `i` buckets
its children by their tentative distances shifted right by `i - 1` bits,
so scanning its buckets in ascending index order visits vertices in
non-decreasing distance without any comparison-based queue.

Nodes live in an arena: leaves occupy indices `0..n`, internal nodes
follow in order of creation, and the root comes last. Bucket storage is
allocated lazily when a node is first expanded during a query and
reclaimed wholesale at the inter-query reset. Bucket membership is
intrusive: each node carries the index of the bucket it currently sits in
plus its neighbor links, so moves and removals are constant time.
*/

use tracing::debug;

use crate::core::error::{Result, ThorupError};
use crate::core::graph::Graph;
use crate::core::mst::msb;
use crate::core::unionfind::UnionFind;

/// Sentinel for "no node" / "not in any bucket".
pub const NO_NODE: u32 = u32::MAX;

/// One doubly-linked bucket of children; exists only while the owning
/// node is expanded.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bucket {
    pub(crate) head: u32,
    pub(crate) tail: u32,
}

impl Bucket {
    fn empty() -> Self {
        Self {
            head: NO_NODE,
            tail: NO_NODE,
        }
    }
}

/// A node of the component tree.
#[derive(Debug, Clone)]
pub struct ComponentNode {
    pub(crate) parent: u32,
    pub(crate) children: Vec<u32>,
    /// Bit level: 0 for leaves, `msb(w) + 1` for the component closed by
    /// edges of weight class `msb(w)`. Strictly increases from child to
    /// parent.
    pub(crate) level: u32,
    /// Number of buckets this node needs when expanded.
    pub(crate) delta: u64,
    /// Lowest valid bucket index at the current expansion.
    pub(crate) ix0: i64,
    /// Highest valid bucket index (`ix0 + delta`).
    pub(crate) ix8: i64,
    /// Scan cursor in `ix0..=ix8`.
    pub(crate) ix: i64,
    pub(crate) visited: bool,
    pub(crate) num_unvisited: u32,
    pub(crate) num_unvisited_initial: u32,
    /// Split-findmin element index of the rightmost leaf in the subtree.
    pub(crate) last_u: u32,
    /// Bucket index within the parent's bucket array, or `NO_NODE`.
    pub(crate) bucket: u32,
    pub(crate) bucket_prev: u32,
    pub(crate) bucket_next: u32,
    /// Bucket storage, only while expanded.
    pub(crate) buckets: Vec<Bucket>,
}

impl ComponentNode {
    fn leaf() -> Self {
        Self {
            parent: NO_NODE,
            children: Vec::new(),
            level: 0,
            delta: 0,
            ix0: 0,
            ix8: 0,
            ix: 0,
            visited: false,
            num_unvisited: 0,
            num_unvisited_initial: 0,
            last_u: NO_NODE,
            bucket: NO_NODE,
            bucket_prev: NO_NODE,
            bucket_next: NO_NODE,
            buckets: Vec::new(),
        }
    }

    fn internal(level: u32, delta: u64) -> Self {
        Self {
            level,
            delta,
            ..Self::leaf()
        }
    }

    /// Returns true for leaf nodes (level 0).
    pub fn is_leaf(&self) -> bool {
        self.level == 0
    }

    /// The node's bit level.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// The node's bucket count.
    pub fn delta(&self) -> u64 {
        self.delta
    }

    /// The node's children in attachment order.
    pub fn children(&self) -> &[u32] {
        &self.children
    }

    /// Number of descendant leaves not yet visited in the current query.
    pub fn num_unvisited(&self) -> u32 {
        self.num_unvisited
    }

    /// The parent node index, or [`NO_NODE`] at the root.
    pub fn parent(&self) -> u32 {
        self.parent
    }

    /// Split-findmin position of the rightmost leaf in the subtree.
    pub fn last_u(&self) -> u32 {
        self.last_u
    }

    /// Whether this node has been expanded in the current query.
    pub fn visited(&self) -> bool {
        self.visited
    }

    pub(crate) fn set_expanded(&mut self) {
        self.visited = true;
    }

    pub(crate) fn dec_unvisited(&mut self) {
        debug_assert!(self.num_unvisited > 0, "unvisited counter underflow");
        self.num_unvisited -= 1;
    }
}

/// Arena-backed component tree over the vertices of a graph.
#[derive(Debug, Clone)]
pub struct ComponentTree {
    nodes: Vec<ComponentNode>,
    root: u32,
    leaf_count: u32,
}

impl ComponentTree {
    /// Builds the tree from a spanning subgraph that is minimal under the
    /// msb-weight ordering.
    ///
    /// Edges are swept in ascending bit level; each batch of merges at
    /// one level closes a set of components, and every closed component
    /// becomes an internal node whose bucket count is the component's
    /// summed edge weight divided by `2^msb`, rounded up.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the subgraph does not connect all vertices.
    pub fn from_spanning_tree(tree: &Graph) -> Result<Self> {
        Self::from_spanning_tree_with(tree, UnionFind::new(tree.node_count()))
    }

    /// Like [`from_spanning_tree`](Self::from_spanning_tree), with an
    /// injected union-find instance sized for the vertex count.
    pub fn from_spanning_tree_with(tree: &Graph, mut uf: UnionFind) -> Result<Self> {
        let n = tree.node_count();
        if uf.len() != n {
            return Err(ThorupError::invalid_argument(format!(
                "union-find sized for {} elements, graph has {} vertices",
                uf.len(),
                n
            )));
        }
        let mut nodes: Vec<ComponentNode> = (0..n).map(|_| ComponentNode::leaf()).collect();

        if n == 1 {
            nodes[0].num_unvisited_initial = 1;
            nodes[0].num_unvisited = 1;
            return Ok(Self {
                nodes,
                root: 0,
                leaf_count: 1,
            });
        }

        let mut by_level: Vec<Vec<(u32, u32, u32)>> = vec![Vec::new(); 32];
        for (u, v, w) in tree.undirected_edges() {
            by_level[msb(w) as usize].push((u, v, w));
        }

        // canonical[r]: tree node currently standing for the class rooted
        // at vertex r.
        let mut canonical: Vec<u32> = (0..n as u32).collect();
        let mut weight_sum: Vec<u64> = vec![0; n];
        let mut marked = vec![false; n];

        for level in 0..32usize {
            if by_level[level].is_empty() {
                continue;
            }
            // Merge this level's edges, remembering the roots they touched.
            let mut pending: Vec<u32> = Vec::new();
            for &(u, v, w) in &by_level[level] {
                let ru = uf.find(u);
                let rv = uf.find(v);
                if ru == rv {
                    continue;
                }
                pending.push(ru);
                pending.push(rv);
                let sum = weight_sum[ru as usize] + weight_sum[rv as usize] + w as u64;
                let merged = uf.union(ru, rv);
                weight_sum[merged as usize] = sum;
            }
            if pending.is_empty() {
                continue;
            }

            // One new internal node per merged component, in first-touch
            // order.
            let mut new_roots: Vec<u32> = Vec::new();
            for &x in &pending {
                let r = uf.find(x);
                if !marked[r as usize] {
                    marked[r as usize] = true;
                    new_roots.push(r);
                }
            }
            let first_id = nodes.len() as u32;
            for &r in &new_roots {
                let s = weight_sum[r as usize];
                let delta = s.div_ceil(1u64 << level);
                nodes.push(ComponentNode::internal(level as u32 + 1, delta));
            }
            let node_of = |roots: &[u32], r: u32| -> u32 {
                first_id + roots.iter().position(|&x| x == r).unwrap() as u32
            };

            // Hang the old component nodes under their new parents, in
            // the order the sweep touched them.
            for &x in &pending {
                let child = canonical[x as usize];
                if nodes[child as usize].parent != NO_NODE {
                    continue;
                }
                let parent = node_of(&new_roots, uf.find(x));
                nodes[child as usize].parent = parent;
                nodes[parent as usize].children.push(child);
            }
            for &r in &new_roots {
                marked[r as usize] = false;
                canonical[r as usize] = node_of(&new_roots, r);
            }
        }

        let root = canonical[uf.find(0) as usize];
        for v in 1..n as u32 {
            if canonical[uf.find(v) as usize] != root {
                return Err(ThorupError::invalid_input(
                    "spanning subgraph does not connect all vertices",
                ));
            }
        }

        // Children are always allocated before their parents, so one
        // ascending pass accumulates subtree leaf counts.
        for id in 0..nodes.len() {
            if nodes[id].is_leaf() {
                nodes[id].num_unvisited_initial = 1;
            }
            let count = nodes[id].num_unvisited_initial;
            let parent = nodes[id].parent;
            if parent != NO_NODE {
                nodes[parent as usize].num_unvisited_initial += count;
            }
        }
        for node in &mut nodes {
            node.num_unvisited = node.num_unvisited_initial;
        }

        debug!(
            vertices = n,
            internal = nodes.len() - n,
            root_level = nodes[root as usize].level,
            "component tree built"
        );

        Ok(Self {
            nodes,
            root,
            leaf_count: n as u32,
        })
    }

    /// The root node index.
    pub fn root(&self) -> u32 {
        self.root
    }

    /// Number of leaves (vertices).
    pub fn leaf_count(&self) -> usize {
        self.leaf_count as usize
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Read access to a node.
    pub fn node(&self, id: u32) -> &ComponentNode {
        &self.nodes[id as usize]
    }

    pub(crate) fn node_mut(&mut self, id: u32) -> &mut ComponentNode {
        &mut self.nodes[id as usize]
    }

    /// Left-to-right DFS over the tree, assigning every leaf its position
    /// in visit order and every node the position of the rightmost leaf
    /// in its subtree. Returns the vertex-to-position map.
    ///
    /// The positions index the split-findmin universe: because the DFS is
    /// left-to-right, every subtree covers a contiguous range ending at
    /// its node's recorded position.
    pub fn assign_dfs_positions(&mut self) -> Vec<u32> {
        let mut position = vec![NO_NODE; self.leaf_count as usize];
        let mut counter: u32 = 0;
        // (node, next child index); leaves are handled inline.
        let mut stack: Vec<(u32, usize)> = vec![(self.root, 0)];
        while let Some((id, child_idx)) = stack.pop() {
            if self.nodes[id as usize].is_leaf() {
                position[id as usize] = counter;
                self.nodes[id as usize].last_u = counter;
                counter += 1;
                continue;
            }
            if child_idx < self.nodes[id as usize].children.len() {
                let child = self.nodes[id as usize].children[child_idx];
                stack.push((id, child_idx + 1));
                stack.push((child, 0));
            } else {
                self.nodes[id as usize].last_u = counter - 1;
            }
        }
        debug_assert_eq!(counter, self.leaf_count);
        position
    }

    /// Resets all per-query state: visited flags, unvisited counters,
    /// scan cursors, and bucket storage (reclaimed wholesale).
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.visited = false;
            node.num_unvisited = node.num_unvisited_initial;
            node.ix0 = 0;
            node.ix8 = 0;
            node.ix = 0;
            node.bucket = NO_NODE;
            node.bucket_prev = NO_NODE;
            node.bucket_next = NO_NODE;
            node.buckets.clear();
        }
    }

    // ------------------------------------------------------------------
    // Bucket operations
    // ------------------------------------------------------------------

    /// Allocates `count` empty buckets on `id`.
    pub(crate) fn allocate_buckets(&mut self, id: u32, count: usize) {
        let node = &mut self.nodes[id as usize];
        node.buckets.clear();
        node.buckets.resize(count, Bucket::empty());
    }

    /// Appends `child` to bucket `idx` of `parent`. The child must not be
    /// in any bucket.
    pub(crate) fn bucket_insert(&mut self, parent: u32, idx: usize, child: u32) {
        debug_assert_eq!(self.nodes[child as usize].bucket, NO_NODE);
        let tail = self.nodes[parent as usize].buckets[idx].tail;
        {
            let c = &mut self.nodes[child as usize];
            c.bucket = idx as u32;
            c.bucket_prev = tail;
            c.bucket_next = NO_NODE;
        }
        if tail == NO_NODE {
            self.nodes[parent as usize].buckets[idx].head = child;
        } else {
            self.nodes[tail as usize].bucket_next = child;
        }
        self.nodes[parent as usize].buckets[idx].tail = child;
    }

    /// Removes `child` from its bucket in `parent`, if it is in one.
    pub(crate) fn bucket_remove(&mut self, parent: u32, child: u32) {
        let idx = self.nodes[child as usize].bucket;
        if idx == NO_NODE {
            return;
        }
        let (prev, next) = {
            let c = &self.nodes[child as usize];
            (c.bucket_prev, c.bucket_next)
        };
        if prev == NO_NODE {
            self.nodes[parent as usize].buckets[idx as usize].head = next;
        } else {
            self.nodes[prev as usize].bucket_next = next;
        }
        if next == NO_NODE {
            self.nodes[parent as usize].buckets[idx as usize].tail = prev;
        } else {
            self.nodes[next as usize].bucket_prev = prev;
        }
        let c = &mut self.nodes[child as usize];
        c.bucket = NO_NODE;
        c.bucket_prev = NO_NODE;
        c.bucket_next = NO_NODE;
    }

    /// Moves `child` into bucket `idx` of `parent`, removing it from its
    /// current bucket first.
    pub(crate) fn move_to_bucket(&mut self, parent: u32, idx: usize, child: u32) {
        self.bucket_remove(parent, child);
        self.bucket_insert(parent, idx, child);
    }

    /// First child in bucket `idx` of `parent`, if any.
    pub(crate) fn bucket_first(&self, parent: u32, idx: usize) -> Option<u32> {
        let head = self.nodes[parent as usize].buckets[idx].head;
        if head == NO_NODE { None } else { Some(head) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mst::{KruskalMsb, MstAlgorithm};

    fn chain_tree() -> ComponentTree {
        // 0 -3- 1 -5- 2 -1- 3: msb classes 1, 2, 0.
        let mut g = Graph::new(4).unwrap();
        g.add_edge(0, 1, 3).unwrap();
        g.add_edge(1, 2, 5).unwrap();
        g.add_edge(2, 3, 1).unwrap();
        ComponentTree::from_spanning_tree(&g).unwrap()
    }

    #[test]
    fn test_leaves_then_internals() {
        let t = chain_tree();
        assert_eq!(t.leaf_count(), 4);
        for v in 0..4 {
            assert!(t.node(v).is_leaf());
        }
        for id in 4..t.node_count() as u32 {
            assert!(!t.node(id).is_leaf());
        }
        assert_eq!(t.root(), t.node_count() as u32 - 1);
    }

    #[test]
    fn test_levels_increase_towards_root() {
        let t = chain_tree();
        // Edge (2,3) closes at level 1, edge (0,1) at level 2, edge (1,2)
        // at level 3 which must be the root.
        assert_eq!(t.node(t.root()).level(), 3);
        for id in 0..t.node_count() as u32 {
            if id != t.root() {
                let parent = t.node(id).parent;
                assert!(t.node(parent).level() > t.node(id).level());
            }
        }
    }

    #[test]
    fn test_unvisited_counts() {
        let t = chain_tree();
        assert_eq!(t.node(t.root()).num_unvisited(), 4);
        for v in 0..4 {
            assert_eq!(t.node(v).num_unvisited(), 1);
        }
    }

    #[test]
    fn test_delta_covers_component_weight() {
        let t = chain_tree();
        // The root closes at msb 2 with total weight 9: delta = ceil(9/4).
        assert_eq!(t.node(t.root()).delta(), 3);
    }

    #[test]
    fn test_dfs_positions_are_contiguous() {
        let mut t = chain_tree();
        let map = t.assign_dfs_positions();
        let mut sorted = map.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
        // The root's rightmost leaf is the last position.
        assert_eq!(t.node(t.root()).last_u, 3);
        // Every internal node ends a contiguous range.
        for id in 0..t.node_count() as u32 {
            let node = t.node(id);
            if !node.is_leaf() {
                let max_child = node
                    .children()
                    .iter()
                    .map(|&c| t.node(c).last_u)
                    .max()
                    .unwrap();
                assert_eq!(node.last_u, max_child);
            }
        }
    }

    #[test]
    fn test_disconnected_tree_is_rejected() {
        let mut g = Graph::new(4).unwrap();
        g.add_edge(0, 1, 1).unwrap();
        g.add_edge(2, 3, 1).unwrap();
        assert!(matches!(
            ComponentTree::from_spanning_tree(&g),
            Err(ThorupError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_single_vertex_tree() {
        let g = Graph::new(1).unwrap();
        let mut t = ComponentTree::from_spanning_tree(&g).unwrap();
        assert_eq!(t.root(), 0);
        assert_eq!(t.node_count(), 1);
        let map = t.assign_dfs_positions();
        assert_eq!(map, vec![0]);
    }

    #[test]
    fn test_equal_msb_edges_merge_at_one_level() {
        // Weights 5 and 7 share msb 2: both merges happen in one batch
        // and a single internal node covers all three vertices.
        let mut g = Graph::new(3).unwrap();
        g.add_edge(0, 1, 5).unwrap();
        g.add_edge(1, 2, 7).unwrap();
        let t = ComponentTree::from_spanning_tree(&g).unwrap();
        assert_eq!(t.node_count(), 4);
        let root = t.node(t.root());
        assert_eq!(root.level(), 3);
        assert_eq!(root.children().len(), 3);
    }

    #[test]
    fn test_layers_match_msb_connectivity() {
        // Two leaves share an ancestor at level <= L exactly when they
        // are connected using spanning-tree edges of msb < L.
        let mut g = Graph::new(6).unwrap();
        g.add_edge(0, 1, 1).unwrap(); // msb 0
        g.add_edge(1, 2, 2).unwrap(); // msb 1
        g.add_edge(3, 4, 1).unwrap(); // msb 0
        g.add_edge(2, 3, 9).unwrap(); // msb 3
        g.add_edge(4, 5, 4).unwrap(); // msb 2
        let mst = KruskalMsb.spanning_tree(&g).unwrap();
        let t = ComponentTree::from_spanning_tree(&mst).unwrap();

        let ancestor_level = |a: u32, b: u32| -> u32 {
            let mut seen = std::collections::HashSet::new();
            let mut x = a;
            loop {
                seen.insert(x);
                if x == t.root() {
                    break;
                }
                x = t.node(x).parent;
            }
            let mut y = b;
            while !seen.contains(&y) {
                y = t.node(y).parent;
            }
            t.node(y).level()
        };

        for level in 1..=4u32 {
            let mut uf = UnionFind::new(6);
            for (u, v, w) in mst.undirected_edges() {
                if msb(w) < level {
                    uf.union(u, v);
                }
            }
            for a in 0..6u32 {
                for b in (a + 1)..6u32 {
                    let connected = uf.find(a) == uf.find(b);
                    assert_eq!(
                        connected,
                        ancestor_level(a, b) <= level,
                        "vertices {} and {} at level {}",
                        a,
                        b,
                        level
                    );
                }
            }
        }
    }
}
