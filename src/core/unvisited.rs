/*!
# Unvisited Structure

The thin façade coupling the split-findmin structure to the component
tree. A left-to-right DFS over the tree assigns every leaf a position in
visit order; vertices are added to the split-findmin universe in exactly
that order, so the leaves of any subtree occupy a contiguous element
range ending at the subtree's recorded rightmost position. That
contiguity is what lets "detach the children of a component" run as one
split per child.
*/

use crate::core::components::{ComponentTree, NO_NODE};
use crate::core::error::{Result, ThorupError};
use crate::core::splitfindmin::{INFINITE_COST, SplitFindmin};

/// Tentative-distance store for the vertices still to be visited.
#[derive(Debug, Clone)]
pub struct UnvisitedStructure {
    sfm: SplitFindmin,
    /// Vertex index to split-findmin element (its DFS position).
    vertex_to_element: Vec<u32>,
    /// Element position to vertex index; the order vertices are re-added
    /// in at every reset.
    dfs_order: Vec<u32>,
}

impl UnvisitedStructure {
    /// Assigns DFS positions on the tree and populates `sfm` with one
    /// infinite-cost element per vertex, in DFS order.
    pub fn new(tree: &mut ComponentTree, sfm: SplitFindmin) -> Result<Self> {
        let vertex_to_element = tree.assign_dfs_positions();
        let mut dfs_order = vec![0u32; vertex_to_element.len()];
        for (vertex, &pos) in vertex_to_element.iter().enumerate() {
            if pos == NO_NODE {
                return Err(ThorupError::internal(format!(
                    "vertex {} missing from the DFS order",
                    vertex
                )));
            }
            dfs_order[pos as usize] = vertex as u32;
        }
        let mut this = Self {
            sfm,
            vertex_to_element,
            dfs_order,
        };
        this.populate()?;
        Ok(this)
    }

    /// Swaps in a fresh split-findmin instance and re-adds every vertex
    /// in the original DFS order. Part of the inter-query reset.
    pub fn rebuild(&mut self, sfm: SplitFindmin) -> Result<()> {
        self.sfm = sfm;
        self.populate()
    }

    fn populate(&mut self) -> Result<()> {
        if self.sfm.is_initialized() || !self.sfm.is_empty() {
            return Err(ThorupError::invalid_argument(
                "unvisited structure needs an empty, uninitialized split-findmin",
            ));
        }
        for &vertex in &self.dfs_order {
            self.sfm.add(vertex, INFINITE_COST);
        }
        self.sfm.initialize();
        Ok(())
    }

    /// Current tentative distance of `vertex`.
    pub fn d(&self, vertex: u32) -> i64 {
        self.sfm.cost(self.vertex_to_element[vertex as usize])
    }

    /// Lowers the tentative distance of `vertex`.
    pub fn decrease_d(&mut self, vertex: u32, distance: i64) -> Result<()> {
        self.sfm
            .decrease_cost(self.vertex_to_element[vertex as usize], distance)?;
        Ok(())
    }

    /// Minimum tentative distance over the unvisited leaves of `node`'s
    /// subtree, or `None` if every leaf there is still at infinity.
    ///
    /// Valid once the node's element range stands alone, i.e. for the
    /// whole tree before any expansion and for any child of an expanded
    /// node afterwards.
    pub fn min_d_minus(&self, tree: &ComponentTree, node: u32) -> Result<Option<i64>> {
        let cost = self.sfm.list_cost(tree.node(node).last_u())?;
        Ok(if cost == INFINITE_COST { None } else { Some(cost) })
    }

    /// Walks parent pointers from a leaf up to the node whose parent has
    /// already been expanded; that ancestor is the one currently bucketed
    /// (or awaiting bucketing) in an expanded component.
    pub fn unvisited_root_of(&self, tree: &ComponentTree, leaf: u32) -> u32 {
        let mut node = leaf;
        loop {
            let parent = tree.node(node).parent();
            if parent == NO_NODE || tree.node(parent).visited() {
                return node;
            }
            node = parent;
        }
    }

    /// Detaches the children of `node` from each other: one split at the
    /// rightmost position of every child but the last. Afterwards each
    /// child's subtree is an independent top-level list.
    pub fn delete_root(&mut self, tree: &ComponentTree, node: u32) -> Result<()> {
        let children = tree.node(node).children();
        for &child in &children[..children.len().saturating_sub(1)] {
            self.sfm.split(tree.node(child).last_u())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::Graph;
    use crate::core::splitfindmin::GabowSplitFindmin;
    use crate::core::splitfindmin::SplitFindminFactory;

    fn chain_setup() -> (ComponentTree, UnvisitedStructure) {
        // 0 -3- 1 -5- 2 -1- 3
        let mut g = Graph::new(4).unwrap();
        g.add_edge(0, 1, 3).unwrap();
        g.add_edge(1, 2, 5).unwrap();
        g.add_edge(2, 3, 1).unwrap();
        let mut tree = ComponentTree::from_spanning_tree(&g).unwrap();
        let sfm = GabowSplitFindmin.create(4, 12);
        let unvisited = UnvisitedStructure::new(&mut tree, sfm).unwrap();
        (tree, unvisited)
    }

    #[test]
    fn test_min_d_minus_tracks_decreases() {
        let (tree, mut unvisited) = chain_setup();
        assert_eq!(unvisited.min_d_minus(&tree, tree.root()).unwrap(), None);
        unvisited.decrease_d(2, 40).unwrap();
        assert_eq!(
            unvisited.min_d_minus(&tree, tree.root()).unwrap(),
            Some(40)
        );
        unvisited.decrease_d(0, 15).unwrap();
        assert_eq!(
            unvisited.min_d_minus(&tree, tree.root()).unwrap(),
            Some(15)
        );
        assert_eq!(unvisited.d(2), 40);
        assert_eq!(unvisited.d(1), INFINITE_COST);
    }

    #[test]
    fn test_delete_root_isolates_children() {
        let (mut tree, mut unvisited) = chain_setup();
        unvisited.decrease_d(0, 7).unwrap();
        unvisited.decrease_d(3, 9).unwrap();
        let root = tree.root();
        unvisited.delete_root(&tree, root).unwrap();
        // After detaching, each child subtree reports only its own leaves.
        let children: Vec<u32> = tree.node(root).children().to_vec();
        tree.node_mut(root).set_expanded();
        for child in children {
            let expected = if subtree_leaves(&tree, child).contains(&0) {
                Some(7)
            } else if subtree_leaves(&tree, child).contains(&3) {
                Some(9)
            } else {
                None
            };
            assert_eq!(unvisited.min_d_minus(&tree, child).unwrap(), expected);
        }
    }

    #[test]
    fn test_unvisited_root_walks_to_expanded_frontier() {
        let (mut tree, unvisited) = chain_setup();
        let root = tree.root();
        // Nothing expanded: the walk stops at the root.
        assert_eq!(unvisited.unvisited_root_of(&tree, 0), root);
        tree.node_mut(root).set_expanded();
        let top_child = unvisited.unvisited_root_of(&tree, 0);
        assert_eq!(tree.node(top_child).parent(), root);
    }

    fn subtree_leaves(tree: &ComponentTree, node: u32) -> Vec<u32> {
        let mut leaves = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if tree.node(id).is_leaf() {
                leaves.push(id);
            } else {
                stack.extend(tree.node(id).children().iter().copied());
            }
        }
        leaves
    }
}
