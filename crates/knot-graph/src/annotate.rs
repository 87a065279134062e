use knot_core::errors::{ErrorInfo, KnotError};
use knot_core::rng::RngHandle;
use knot_core::{Multigraph, Port};
use rand::seq::SliceRandom;

use crate::multigraph::MultigraphImpl;

/// Valence of a crossing.
pub const CROSSING_VALENCE: usize = 4;

/// Returns a copy of `graph` whose edge-ends carry port labels.
///
/// Every node draws from its own shuffled pool of the four ports: an ordinary
/// edge-end takes one label, a loop takes two. The input is left untouched.
pub fn annotate_ports(
    graph: &MultigraphImpl,
    rng: &mut RngHandle,
) -> Result<MultigraphImpl, KnotError> {
    let nodes = graph.node_count();
    let edges = graph.edge_count();
    if 2 * edges != CROSSING_VALENCE * nodes {
        return Err(KnotError::Precondition(
            ErrorInfo::new(
                "weak-regularity",
                "edge count does not match a 4-regular multigraph",
            )
            .with_context("nodes", nodes)
            .with_context("edges", edges),
        ));
    }

    let mut annotated = graph.clone();
    let node_ids: Vec<_> = annotated.nodes().collect();
    for &node in &node_ids {
        for edge in annotated.edges_touching(node)? {
            annotated.ports_at_mut(edge, node)?.clear();
        }
    }

    for &node in &node_ids {
        let mut pool = Port::ALL.to_vec();
        pool.shuffle(rng);
        for edge in annotated.edges_touching(node)? {
            let takes = if annotated.is_loop(edge)? { 2 } else { 1 };
            for _ in 0..takes {
                let Some(port) = pool.pop() else {
                    return Err(KnotError::Precondition(
                        ErrorInfo::new("port-pool-exhausted", "node has more than four edge-ends")
                            .with_context("node", node.as_raw())
                            .with_context("edge", edge.as_raw()),
                    ));
                };
                annotated.ports_at_mut(edge, node)?.push(port);
            }
        }
        if !pool.is_empty() {
            return Err(KnotError::Precondition(
                ErrorInfo::new("ports-unused", "node has fewer than four edge-ends")
                    .with_context("node", node.as_raw())
                    .with_context("unused", pool.len()),
            ));
        }
    }

    Ok(annotated)
}
