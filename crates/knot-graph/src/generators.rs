use knot_core::errors::{ErrorInfo, KnotError};
use knot_core::rng::RngHandle;
use knot_core::{Multigraph, NodeId};
use rand::seq::SliceRandom;

use crate::multigraph::MultigraphImpl;

/// Generates a random multigraph in which every node has degree `valence`.
///
/// Nodes are saturated in order. A node missing only its last edge-end picks a
/// partner among the other unsaturated nodes; any other node picks among all
/// unsaturated nodes, itself included, so self-loops appear. A dead end is
/// reported as [`KnotError::Rejected`] and the caller starts over.
pub fn random_regular_multigraph(
    num_nodes: usize,
    valence: usize,
    rng: &mut RngHandle,
) -> Result<MultigraphImpl, KnotError> {
    if num_nodes == 0 {
        return Err(KnotError::Precondition(ErrorInfo::new(
            "empty-graph",
            "regular multigraph generator requires at least one node",
        )));
    }
    if (num_nodes * valence) % 2 != 0 {
        return Err(KnotError::Precondition(
            ErrorInfo::new(
                "odd-degree-sum",
                "num_nodes * valence must be even for a regular multigraph",
            )
            .with_context("num_nodes", num_nodes)
            .with_context("valence", valence),
        ));
    }

    let mut graph = MultigraphImpl::with_nodes(num_nodes);
    let nodes: Vec<NodeId> = graph.nodes().collect();
    let mut degrees = vec![0usize; num_nodes];

    for (idx, &node) in nodes.iter().enumerate() {
        while degrees[idx] < valence {
            let last_slot = degrees[idx] + 1 == valence;
            let candidates: Vec<usize> = (0..num_nodes)
                .filter(|&other| degrees[other] < valence && !(last_slot && other == idx))
                .collect();
            let Some(&partner) = candidates.choose(rng) else {
                return Err(KnotError::Rejected(
                    ErrorInfo::new("dead-end", "no unsaturated partner left for node")
                        .with_context("node", node.as_raw())
                        .with_context("degree", degrees[idx]),
                ));
            };
            graph.add_edge(node, nodes[partner])?;
            degrees[idx] += 1;
            degrees[partner] += 1;
        }
    }

    for &node in &nodes {
        let degree = graph.degree(node)?;
        if degree != valence {
            return Err(KnotError::Invariant(
                ErrorInfo::new("not-regular", "generated multigraph is not regular")
                    .with_context("node", node.as_raw())
                    .with_context("degree", degree)
                    .with_context("valence", valence),
            ));
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_node_gets_two_loops() {
        let mut rng = RngHandle::from_seed(5);
        let graph = random_regular_multigraph(1, 4, &mut rng).unwrap();
        let node = graph.nodes().next().unwrap();
        let edges = graph.edges_touching(node).unwrap();
        assert_eq!(edges.len(), 2);
        for edge in edges {
            assert!(graph.is_loop(edge).unwrap());
        }
    }

    #[test]
    fn odd_degree_sum_is_a_precondition_failure() {
        let mut rng = RngHandle::from_seed(5);
        let err = random_regular_multigraph(3, 3, &mut rng).unwrap_err();
        assert_eq!(err.info().code, "odd-degree-sum");
    }
}
