use std::collections::{BTreeMap, BTreeSet};

use knot_core::errors::KnotError;
use knot_core::{Multigraph, NodeId};

/// Simple undirected graph: no parallel edges, no self-loops.
///
/// Nodes are dense indices `0..node_count`; `labels` maps them back to the
/// multigraph node they came from and `index` is its inverse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleGraph {
    labels: Vec<NodeId>,
    index: BTreeMap<NodeId, usize>,
    edges: BTreeSet<(usize, usize)>,
}

impl SimpleGraph {
    /// Creates a simple graph with `count` isolated nodes labelled `0..count`.
    pub fn with_nodes(count: usize) -> Self {
        Self::labelled((0..count as u64).map(NodeId::from_raw).collect())
    }

    fn labelled(labels: Vec<NodeId>) -> Self {
        let index = labels
            .iter()
            .enumerate()
            .map(|(idx, node)| (*node, idx))
            .collect();
        Self {
            labels,
            index,
            edges: BTreeSet::new(),
        }
    }

    /// Inserts an undirected edge. Loops and repeats are ignored.
    pub fn insert_edge(&mut self, a: usize, b: usize) -> bool {
        if a == b || a >= self.labels.len() || b >= self.labels.len() {
            return false;
        }
        self.edges.insert((a.min(b), a.max(b)))
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the edges as ordered index pairs `(low, high)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied()
    }

    /// Returns whether `a` and `b` are adjacent.
    pub fn contains_edge(&self, a: usize, b: usize) -> bool {
        self.edges.contains(&(a.min(b), a.max(b)))
    }

    /// Returns the multigraph node behind a dense index.
    pub fn label(&self, index: usize) -> Option<NodeId> {
        self.labels.get(index).copied()
    }

    /// Returns the dense index of a multigraph node.
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.index.get(&node).copied()
    }
}

/// Collapses parallel edges and drops self-loops.
///
/// The result depends only on which node pairs are adjacent, not on edge
/// multiplicities or enumeration order.
pub fn flatten<G: Multigraph + ?Sized>(graph: &G) -> Result<SimpleGraph, KnotError> {
    let mut simple = SimpleGraph::labelled(graph.nodes().collect());
    for (idx, node) in simple.labels.clone().into_iter().enumerate() {
        for neighbour in graph.neighbors(node)? {
            if let Some(other) = simple.index_of(neighbour) {
                simple.insert_edge(idx, other);
            }
        }
    }
    Ok(simple)
}
