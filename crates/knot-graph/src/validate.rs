use std::collections::BTreeMap;

use knot_core::errors::{ErrorInfo, KnotError};
use knot_core::{Multigraph, NodeId, Port};

use crate::flatten::flatten;
use crate::multigraph::MultigraphImpl;
use crate::planarity::{LeftRight, PlanarityOracle};

/// Position of a gadget node inside the expansion of one crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GadgetSlot {
    /// The spoke end attached to a port.
    Port(Port),
    /// The hub joined to all four spoke ends.
    Center,
}

/// Identifies a gadget node by the crossing it replaces and its slot.
pub type GadgetKey = (NodeId, GadgetSlot);

/// Result of replacing every crossing by a five-node "X" gadget.
#[derive(Debug, Clone)]
pub struct CrossingExpansion {
    /// Multigraph made of gadget nodes only.
    pub graph: MultigraphImpl,
    /// Where each gadget node ended up in `graph`.
    pub gadgets: BTreeMap<GadgetKey, NodeId>,
}

impl CrossingExpansion {
    /// Returns the expanded node standing for `slot` of `crossing`.
    pub fn gadget(&self, crossing: NodeId, slot: GadgetSlot) -> Option<NodeId> {
        self.gadgets.get(&(crossing, slot)).copied()
    }
}

/// Expands every crossing of an annotated multigraph into a spoke gadget.
///
/// An ordinary edge with port `p` at `u` and `q` at `v` becomes an edge between
/// `(u, p)` and `(v, q)`. A loop with ports `[a, b]` joins `(u, a)` and `(u, b)`
/// once per recorded end; the resulting double edge disappears on flattening.
pub fn expand_crossings(graph: &MultigraphImpl) -> Result<CrossingExpansion, KnotError> {
    let mut expanded = MultigraphImpl::new();
    let mut gadgets = BTreeMap::new();

    for node in graph.nodes() {
        let center = expanded.add_node();
        gadgets.insert((node, GadgetSlot::Center), center);
        for port in Port::ALL {
            let spoke = expanded.add_node();
            gadgets.insert((node, GadgetSlot::Port(port)), spoke);
            expanded.add_edge(spoke, center)?;
        }
    }

    let lookup = |node: NodeId, port: Port| -> Result<NodeId, KnotError> {
        gadgets
            .get(&(node, GadgetSlot::Port(port)))
            .copied()
            .ok_or_else(|| {
                KnotError::Graph(ErrorInfo::new("unknown-gadget", "crossing has no gadget"))
                    .with_context("node", node.as_raw())
            })
    };

    for edge in graph.edges() {
        let (u, v) = graph.endpoints(edge)?;
        let ports = graph.ports(edge)?;
        if u == v {
            let [a, b] = ports.at_u[..] else {
                return Err(missing_ports(edge.as_raw(), u, &ports.at_u));
            };
            let (ga, gb) = (lookup(u, a)?, lookup(u, b)?);
            expanded.add_edge(ga, gb)?;
            expanded.add_edge(gb, ga)?;
        } else {
            let [p] = ports.at_u[..] else {
                return Err(missing_ports(edge.as_raw(), u, &ports.at_u));
            };
            let [q] = ports.at_v[..] else {
                return Err(missing_ports(edge.as_raw(), v, &ports.at_v));
            };
            expanded.add_edge(lookup(u, p)?, lookup(v, q)?)?;
        }
    }

    Ok(CrossingExpansion {
        graph: expanded,
        gadgets,
    })
}

/// Checks an annotated multigraph with the default left-right planarity oracle.
pub fn is_valid_diagram(graph: &MultigraphImpl) -> Result<bool, KnotError> {
    is_valid_diagram_with(graph, &LeftRight)
}

/// Expands crossings, flattens, and asks `oracle` whether the result is planar.
pub fn is_valid_diagram_with<O: PlanarityOracle + ?Sized>(
    graph: &MultigraphImpl,
    oracle: &O,
) -> Result<bool, KnotError> {
    let expansion = expand_crossings(graph)?;
    let simple = flatten(&expansion.graph)?;
    Ok(oracle.is_planar(&simple))
}

fn missing_ports(edge: u64, node: NodeId, found: &[Port]) -> KnotError {
    KnotError::Precondition(
        ErrorInfo::new("unannotated-edge", "edge-end does not carry the expected ports")
            .with_context("edge", edge)
            .with_context("node", node.as_raw())
            .with_context("found", found.len()),
    )
}
