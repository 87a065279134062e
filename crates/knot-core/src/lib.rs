#![deny(missing_docs)]
#![doc = "Core identifiers, port labels and the multigraph adapter contract for random link diagrams."]

use std::iter::ExactSizeIterator;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod port;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, KnotError};
pub use port::{is_port_permutation, Port};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};

/// Identifier for a node (crossing) within a [`Multigraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Identifier for a multi-edge within a [`Multigraph`].
///
/// Parallel edges and the two loops of a node get distinct identifiers, which is
/// what keeps their port lists apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Describes the structural contract of an undirected multigraph.
///
/// Self-loops are allowed and count twice towards the degree of their node.
pub trait Multigraph {
    /// Returns an iterator over all node identifiers.
    fn nodes(&self) -> Box<dyn ExactSizeIterator<Item = NodeId> + '_>;

    /// Returns an iterator over all edge identifiers.
    fn edges(&self) -> Box<dyn ExactSizeIterator<Item = EdgeId> + '_>;

    /// Returns the endpoints `(u, v)` of an edge; `u == v` for a loop.
    fn endpoints(&self, edge: EdgeId) -> Result<(NodeId, NodeId), KnotError>;

    /// Returns the number of edge-ends at a node.
    fn degree(&self, node: NodeId) -> Result<usize, KnotError>;

    /// Returns the distinct neighbours of a node, excluding the node itself.
    fn neighbors(&self, node: NodeId) -> Result<Vec<NodeId>, KnotError>;

    /// Returns every edge incident to a node, each loop listed once.
    fn edges_touching(&self, node: NodeId) -> Result<Vec<EdgeId>, KnotError>;

    /// Adds a new isolated node.
    fn add_node(&mut self) -> NodeId;

    /// Adds a new edge between `u` and `v`.
    fn add_edge(&mut self, u: NodeId, v: NodeId) -> Result<EdgeId, KnotError>;

    /// Removes a node together with every incident edge.
    fn remove_node(&mut self, node: NodeId) -> Result<(), KnotError>;

    /// Removes a single edge.
    fn remove_edge(&mut self, edge: EdgeId) -> Result<(), KnotError>;

    /// Returns the number of live nodes.
    fn node_count(&self) -> usize {
        self.nodes().len()
    }

    /// Returns the number of live edges.
    fn edge_count(&self) -> usize {
        self.edges().len()
    }
}
