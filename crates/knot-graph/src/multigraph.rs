use std::collections::BTreeSet;

use knot_core::{
    errors::{ErrorInfo, KnotError},
    EdgeId, Multigraph, NodeId, Port,
};
use serde::{Deserialize, Serialize};

/// Ports occupied by the two ends of an edge.
///
/// For a loop (`u == v`) both ports live in `at_u` and `at_v` stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortAssignment {
    /// Ports recorded at the `u` end.
    pub at_u: Vec<Port>,
    /// Ports recorded at the `v` end.
    pub at_v: Vec<Port>,
}

impl PortAssignment {
    /// Assignment for an ordinary edge with one port at each end.
    pub fn between(at_u: Port, at_v: Port) -> Self {
        Self {
            at_u: vec![at_u],
            at_v: vec![at_v],
        }
    }

    /// Assignment for a loop occupying two ports of the same node.
    pub fn looped(first: Port, second: Port) -> Self {
        Self {
            at_u: vec![first, second],
            at_v: Vec::new(),
        }
    }

    /// Returns `true` when no port has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.at_u.is_empty() && self.at_v.is_empty()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeRecord {
    alive: bool,
    edges: BTreeSet<EdgeId>,
}

impl NodeRecord {
    fn new() -> Self {
        Self {
            alive: true,
            edges: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EdgeRecord {
    alive: bool,
    u: NodeId,
    v: NodeId,
    ports: PortAssignment,
}

impl EdgeRecord {
    fn is_loop(&self) -> bool {
        self.u == self.v
    }
}

/// Undirected multigraph with per-edge port data and stable identifiers.
///
/// Removing a node or edge only marks its slot dead, so identifiers handed out
/// earlier keep pointing at the same crossing after resolution.
#[derive(Debug, Clone, Default)]
pub struct MultigraphImpl {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

impl MultigraphImpl {
    /// Creates an empty multigraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a multigraph with `count` isolated nodes numbered `0..count`.
    pub fn with_nodes(count: usize) -> Self {
        let mut graph = Self::new();
        for _ in 0..count {
            graph.add_node();
        }
        graph
    }

    /// Adds an edge carrying an explicit port assignment.
    pub fn add_edge_with_ports(
        &mut self,
        u: NodeId,
        v: NodeId,
        ports: PortAssignment,
    ) -> Result<EdgeId, KnotError> {
        self.node(u)?;
        self.node(v)?;
        let id = edge_at(self.edges.len());
        self.node_mut(u)?.edges.insert(id);
        self.node_mut(v)?.edges.insert(id);
        self.edges.push(EdgeRecord {
            alive: true,
            u,
            v,
            ports,
        });
        Ok(id)
    }

    /// Returns the port assignment stored on an edge.
    pub fn ports(&self, edge: EdgeId) -> Result<&PortAssignment, KnotError> {
        Ok(&self.edge(edge)?.ports)
    }

    /// Returns the ports recorded for the end of `edge` that sits at `node`.
    pub fn ports_at(&self, edge: EdgeId, node: NodeId) -> Result<&[Port], KnotError> {
        let record = self.edge(edge)?;
        if record.u == node {
            Ok(&record.ports.at_u)
        } else if record.v == node {
            Ok(&record.ports.at_v)
        } else {
            Err(not_an_endpoint(edge, node))
        }
    }

    pub(crate) fn ports_at_mut(
        &mut self,
        edge: EdgeId,
        node: NodeId,
    ) -> Result<&mut Vec<Port>, KnotError> {
        let record = self.edge_mut(edge)?;
        if record.u == node {
            Ok(&mut record.ports.at_u)
        } else if record.v == node {
            Ok(&mut record.ports.at_v)
        } else {
            Err(not_an_endpoint(edge, node))
        }
    }

    /// Returns whether the edge is a self-loop.
    pub fn is_loop(&self, edge: EdgeId) -> Result<bool, KnotError> {
        Ok(self.edge(edge)?.is_loop())
    }

    /// Returns the endpoint of `edge` opposite to `node`.
    pub fn other_end(&self, edge: EdgeId, node: NodeId) -> Result<NodeId, KnotError> {
        let record = self.edge(edge)?;
        if record.u == node {
            Ok(record.v)
        } else if record.v == node {
            Ok(record.u)
        } else {
            Err(not_an_endpoint(edge, node))
        }
    }

    /// Returns whether the node exists and is alive.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.node(node).is_ok()
    }

    /// Returns the alive flag of every node slot.
    pub(crate) fn node_states(&self) -> Vec<bool> {
        self.nodes.iter().map(|node| node.alive).collect()
    }

    /// Returns every edge slot, dead ones included, for serialization.
    pub(crate) fn edge_payloads(&self) -> Vec<(bool, NodeId, NodeId, PortAssignment)> {
        self.edges
            .iter()
            .map(|edge| (edge.alive, edge.u, edge.v, edge.ports.clone()))
            .collect()
    }

    pub(crate) fn push_dead_edge(&mut self, u: NodeId, v: NodeId, ports: PortAssignment) {
        self.edges.push(EdgeRecord {
            alive: false,
            u,
            v,
            ports,
        });
    }

    fn node(&self, id: NodeId) -> Result<&NodeRecord, KnotError> {
        self.nodes
            .get(node_slot(id))
            .filter(|record| record.alive)
            .ok_or_else(|| unknown_node(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeRecord, KnotError> {
        self.nodes
            .get_mut(node_slot(id))
            .filter(|record| record.alive)
            .ok_or_else(|| unknown_node(id))
    }

    fn edge(&self, id: EdgeId) -> Result<&EdgeRecord, KnotError> {
        self.edges
            .get(edge_slot(id))
            .filter(|record| record.alive)
            .ok_or_else(|| unknown_edge(id))
    }

    fn edge_mut(&mut self, id: EdgeId) -> Result<&mut EdgeRecord, KnotError> {
        self.edges
            .get_mut(edge_slot(id))
            .filter(|record| record.alive)
            .ok_or_else(|| unknown_edge(id))
    }
}

impl Multigraph for MultigraphImpl {
    fn nodes(&self) -> Box<dyn ExactSizeIterator<Item = NodeId> + '_> {
        let ids: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.alive)
            .map(|(idx, _)| node_at(idx))
            .collect();
        Box::new(ids.into_iter())
    }

    fn edges(&self) -> Box<dyn ExactSizeIterator<Item = EdgeId> + '_> {
        let ids: Vec<EdgeId> = self
            .edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.alive)
            .map(|(idx, _)| edge_at(idx))
            .collect();
        Box::new(ids.into_iter())
    }

    fn endpoints(&self, edge: EdgeId) -> Result<(NodeId, NodeId), KnotError> {
        let record = self.edge(edge)?;
        Ok((record.u, record.v))
    }

    fn degree(&self, node: NodeId) -> Result<usize, KnotError> {
        let record = self.node(node)?;
        let mut degree = 0;
        for edge in &record.edges {
            degree += if self.edge(*edge)?.is_loop() { 2 } else { 1 };
        }
        Ok(degree)
    }

    fn neighbors(&self, node: NodeId) -> Result<Vec<NodeId>, KnotError> {
        let record = self.node(node)?;
        let mut neighbours = BTreeSet::new();
        for edge in &record.edges {
            let other = self.other_end(*edge, node)?;
            if other != node {
                neighbours.insert(other);
            }
        }
        Ok(neighbours.into_iter().collect())
    }

    fn edges_touching(&self, node: NodeId) -> Result<Vec<EdgeId>, KnotError> {
        Ok(self.node(node)?.edges.iter().copied().collect())
    }

    fn add_node(&mut self) -> NodeId {
        let id = node_at(self.nodes.len());
        self.nodes.push(NodeRecord::new());
        id
    }

    fn add_edge(&mut self, u: NodeId, v: NodeId) -> Result<EdgeId, KnotError> {
        self.add_edge_with_ports(u, v, PortAssignment::default())
    }

    fn remove_node(&mut self, node: NodeId) -> Result<(), KnotError> {
        let incident = self.edges_touching(node)?;
        for edge in incident {
            self.remove_edge(edge)?;
        }
        self.node_mut(node)?.alive = false;
        Ok(())
    }

    fn remove_edge(&mut self, edge: EdgeId) -> Result<(), KnotError> {
        let record = self.edge_mut(edge)?;
        record.alive = false;
        let (u, v) = (record.u, record.v);
        for endpoint in [u, v] {
            if let Some(node) = self.nodes.get_mut(node_slot(endpoint)) {
                node.edges.remove(&edge);
            }
        }
        Ok(())
    }
}

fn node_slot(id: NodeId) -> usize {
    id.as_raw() as usize
}

fn edge_slot(id: EdgeId) -> usize {
    id.as_raw() as usize
}

fn node_at(slot: usize) -> NodeId {
    NodeId::from_raw(slot as u64)
}

fn edge_at(slot: usize) -> EdgeId {
    EdgeId::from_raw(slot as u64)
}

fn graph_error(code: &str, message: &str) -> KnotError {
    KnotError::Graph(ErrorInfo::new(code, message))
}

fn unknown_node(id: NodeId) -> KnotError {
    graph_error("unknown-node", "node does not exist").with_context("node", id.as_raw())
}

fn unknown_edge(id: EdgeId) -> KnotError {
    graph_error("unknown-edge", "edge does not exist").with_context("edge", id.as_raw())
}

fn not_an_endpoint(edge: EdgeId, node: NodeId) -> KnotError {
    graph_error("not-an-endpoint", "node is not an endpoint of the edge")
        .with_context("edge", edge.as_raw())
        .with_context("node", node.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loops_count_twice_and_are_not_neighbours() {
        let mut graph = MultigraphImpl::with_nodes(2);
        let a = NodeId::from_raw(0);
        let b = NodeId::from_raw(1);
        graph.add_edge(a, a).unwrap();
        graph.add_edge(a, b).unwrap();
        graph.add_edge(a, b).unwrap();

        assert_eq!(graph.degree(a).unwrap(), 4);
        assert_eq!(graph.degree(b).unwrap(), 2);
        assert_eq!(graph.neighbors(a).unwrap(), vec![b]);
        assert_eq!(graph.edges_touching(a).unwrap().len(), 3);
    }

    #[test]
    fn removing_a_node_drops_incident_edges_and_keeps_ids() {
        let mut graph = MultigraphImpl::with_nodes(3);
        let ids: Vec<NodeId> = graph.nodes().collect();
        graph.add_edge(ids[0], ids[1]).unwrap();
        let kept = graph.add_edge(ids[1], ids[2]).unwrap();

        graph.remove_node(ids[0]).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![kept]);
        assert_eq!(graph.degree(ids[1]).unwrap(), 1);
        assert!(!graph.contains_node(ids[0]));
        assert_eq!(graph.degree(ids[0]).unwrap_err().info().code, "unknown-node");
    }

    #[test]
    fn ports_are_looked_up_per_end() {
        let mut graph = MultigraphImpl::with_nodes(3);
        let ids: Vec<NodeId> = graph.nodes().collect();
        let edge = graph
            .add_edge_with_ports(
                ids[0],
                ids[1],
                PortAssignment::between(Port::TopLeft, Port::BottomRight),
            )
            .unwrap();
        assert_eq!(graph.ports_at(edge, ids[0]).unwrap(), &[Port::TopLeft]);
        assert_eq!(graph.ports_at(edge, ids[1]).unwrap(), &[Port::BottomRight]);
        assert_eq!(
            graph.ports_at(edge, ids[2]).unwrap_err().info().code,
            "not-an-endpoint"
        );
    }
}
