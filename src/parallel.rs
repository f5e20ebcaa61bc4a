/*!
Parallel multi-source shortest path queries
*/

use rayon::prelude::*;

use crate::core::engine::ThorupEngine;
use crate::core::error::{Result, ThorupError};
use crate::core::splitfindmin::GabowSplitFindmin;

/// Shortest-path distances from multiple sources, computed in parallel.
///
/// A prepared engine must not serve concurrent queries, so every worker
/// clones the engine and resets its per-query state before querying. The
/// graph, the spanning tree, and the component-tree shape are shared
/// through the clones; only the mutable query state is duplicated.
///
/// # Example
///
/// ```rust
/// use thorup::core::engine::ThorupEngine;
/// use thorup::core::graph::Graph;
/// use thorup::core::mst::KruskalMsb;
/// use thorup::core::splitfindmin::GabowSplitFindmin;
/// use thorup::core::unionfind::ArrayUnionFind;
/// use thorup::parallel::shortest_paths_parallel;
///
/// let mut g = Graph::new(3).unwrap();
/// g.add_edge(0, 1, 1).unwrap();
/// g.add_edge(1, 2, 1).unwrap();
///
/// let mut engine = ThorupEngine::new();
/// engine.construct_msb_mst(g, &KruskalMsb).unwrap();
/// engine
///     .construct_other_data_structures(&ArrayUnionFind, &GabowSplitFindmin)
///     .unwrap();
///
/// let distances = shortest_paths_parallel(&engine, &[0, 2]).unwrap();
/// assert_eq!(distances, vec![vec![0, 1, 2], vec![2, 1, 0]]);
/// ```
pub fn shortest_paths_parallel(
    engine: &ThorupEngine,
    sources: &[u32],
) -> Result<Vec<Vec<i32>>> {
    if !engine.is_prepared() {
        return Err(ThorupError::not_prepared(
            "prepare the engine before querying in parallel",
        ));
    }
    sources
        .par_iter()
        .map(|&source| {
            let mut worker = engine.clone();
            worker.clean_up_between_queries(&GabowSplitFindmin)?;
            worker.find_shortest_paths(source)
        })
        .collect()
}
