/*!
# Graph Validation Utilities

Precondition checks shared by the preparation phase and the tests:
emptiness and connectivity. Centralizing them keeps the checks consistent
across the engine, the generators, and the spanning-tree algorithms.
*/

use crate::core::error::{Result, ThorupError};
use crate::core::graph::Graph;

/// Returns true if the graph is connected.
pub fn is_connected(graph: &Graph) -> bool {
    let n = graph.node_count();
    let mut seen = vec![false; n];
    let mut stack = vec![0u32];
    seen[0] = true;
    let mut count = 1;
    while let Some(v) = stack.pop() {
        for arc in graph.arcs(v) {
            if !seen[arc.target as usize] {
                seen[arc.target as usize] = true;
                count += 1;
                stack.push(arc.target);
            }
        }
    }
    count == n
}

/// Validates the preconditions for preparing an engine on the graph.
///
/// # Returns
///
/// `Ok(())` if the graph is connected, or an `InvalidInput` error naming
/// the algorithm otherwise.
pub fn validate_for_preparation(graph: &Graph, algo_name: &str) -> Result<()> {
    if !is_connected(graph) {
        return Err(ThorupError::invalid_input(format!(
            "{} requires a connected graph",
            algo_name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_connected() {
        let mut g = Graph::new(3).unwrap();
        g.add_edge(0, 1, 1).unwrap();
        assert!(!is_connected(&g));
        g.add_edge(1, 2, 1).unwrap();
        assert!(is_connected(&g));
    }

    #[test]
    fn test_single_vertex_is_connected() {
        let g = Graph::new(1).unwrap();
        assert!(is_connected(&g));
    }

    #[test]
    fn test_validate_names_the_algorithm() {
        let mut g = Graph::new(4).unwrap();
        g.add_edge(0, 1, 1).unwrap();
        let err = validate_for_preparation(&g, "thorup").unwrap_err();
        assert!(format!("{}", err).contains("thorup"));
    }
}
