use std::collections::BTreeMap;

use knot_core::errors::{ErrorInfo, KnotError};
use knot_core::{is_port_permutation, EdgeId, Multigraph, NodeId, Port};

use crate::annotate::CROSSING_VALENCE;
use crate::multigraph::MultigraphImpl;

/// A validated, coloured, port-annotated 4-regular multigraph.
///
/// Diagrams are values: resolution builds a new diagram and never touches the
/// one it started from.
#[derive(Debug, Clone)]
pub struct LinkDiagram {
    graph: MultigraphImpl,
    colors: BTreeMap<NodeId, bool>,
    free_loops: usize,
}

impl LinkDiagram {
    pub(crate) fn from_parts(
        graph: MultigraphImpl,
        colors: BTreeMap<NodeId, bool>,
        free_loops: usize,
    ) -> Self {
        Self {
            graph,
            colors,
            free_loops,
        }
    }

    /// Assembles a diagram from its parts and checks every invariant.
    pub fn try_from_parts(
        graph: MultigraphImpl,
        colors: BTreeMap<NodeId, bool>,
        free_loops: usize,
    ) -> Result<Self, KnotError> {
        let diagram = Self::from_parts(graph, colors, free_loops);
        diagram.check_invariants()?;
        Ok(diagram)
    }

    /// Returns the underlying multigraph.
    pub fn graph(&self) -> &MultigraphImpl {
        &self.graph
    }

    /// Returns the crossing identifiers in ascending order.
    pub fn crossings(&self) -> Vec<NodeId> {
        self.graph.nodes().collect()
    }

    /// Returns the number of crossings.
    pub fn crossing_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the sign assigned to a crossing.
    pub fn color(&self, crossing: NodeId) -> Option<bool> {
        self.colors.get(&crossing).copied()
    }

    /// Returns every crossing sign keyed by crossing.
    pub fn colors(&self) -> &BTreeMap<NodeId, bool> {
        &self.colors
    }

    /// Number of closed components that no longer pass through any crossing.
    pub fn free_loops(&self) -> usize {
        self.free_loops
    }

    /// Returns the ports in use at `crossing`, one entry per edge-end, paired
    /// with the edge carrying them.
    pub fn ports_at(&self, crossing: NodeId) -> Result<Vec<(EdgeId, Port)>, KnotError> {
        let mut ports = Vec::with_capacity(CROSSING_VALENCE);
        for edge in self.graph.edges_touching(crossing)? {
            for port in self.graph.ports_at(edge, crossing)? {
                ports.push((edge, *port));
            }
        }
        Ok(ports)
    }

    /// Verifies degree 4, the port permutation and a sign at every crossing.
    pub fn check_invariants(&self) -> Result<(), KnotError> {
        for crossing in self.graph.nodes() {
            let degree = self.graph.degree(crossing)?;
            if degree != CROSSING_VALENCE {
                return Err(invariant("not-regular", "crossing does not have degree 4")
                    .with_context("crossing", crossing.as_raw())
                    .with_context("degree", degree));
            }
            let ports: Vec<Port> = self
                .ports_at(crossing)?
                .into_iter()
                .map(|(_, port)| port)
                .collect();
            if !is_port_permutation(&ports) {
                return Err(invariant(
                    "ports-not-permutation",
                    "crossing ports are not a permutation of tl, tr, bl, br",
                )
                .with_context("crossing", crossing.as_raw())
                .with_context("ports", format!("{ports:?}")));
            }
            if !self.colors.contains_key(&crossing) {
                return Err(invariant("missing-color", "crossing has no sign")
                    .with_context("crossing", crossing.as_raw()));
            }
        }
        if let Some(stray) = self
            .colors
            .keys()
            .find(|crossing| !self.graph.contains_node(**crossing))
        {
            return Err(invariant("stray-color", "sign recorded for a missing crossing")
                .with_context("crossing", stray.as_raw()));
        }
        Ok(())
    }
}

fn invariant(code: &str, message: &str) -> KnotError {
    KnotError::Invariant(ErrorInfo::new(code, message))
}
