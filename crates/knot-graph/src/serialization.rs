use std::collections::BTreeMap;

use knot_core::errors::{ErrorInfo, KnotError};
use knot_core::provenance::SchemaVersion;
use knot_core::{Multigraph, NodeId};
use serde::{Deserialize, Serialize};

use crate::diagram::LinkDiagram;
use crate::multigraph::{MultigraphImpl, PortAssignment};

/// Schema written into every serialized diagram.
pub const DIAGRAM_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Serializes the diagram to a compact binary representation using `bincode`.
pub fn diagram_to_bytes(diagram: &LinkDiagram) -> Result<Vec<u8>, KnotError> {
    let serializable = SerializableDiagram::from_diagram(diagram);
    bincode::serialize(&serializable)
        .map_err(|err| KnotError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a diagram from its binary representation.
pub fn diagram_from_bytes(bytes: &[u8]) -> Result<LinkDiagram, KnotError> {
    let serializable: SerializableDiagram = bincode::deserialize(bytes)
        .map_err(|err| KnotError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    serializable.into_diagram()
}

/// Serializes the diagram to a JSON string.
pub fn diagram_to_json(diagram: &LinkDiagram) -> Result<String, KnotError> {
    serde_json::to_string_pretty(&SerializableDiagram::from_diagram(diagram))
        .map_err(|err| KnotError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Serializes the diagram to a JSON value, for embedding in larger reports.
pub fn diagram_to_value(diagram: &LinkDiagram) -> Result<serde_json::Value, KnotError> {
    serde_json::to_value(SerializableDiagram::from_diagram(diagram))
        .map_err(|err| KnotError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a diagram from a JSON string and re-checks its invariants.
pub fn diagram_from_json(json: &str) -> Result<LinkDiagram, KnotError> {
    let serializable: SerializableDiagram = serde_json::from_str(json)
        .map_err(|err| KnotError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_diagram()
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableDiagram {
    schema_version: SchemaVersion,
    nodes: Vec<bool>,
    edges: Vec<SerializableEdge>,
    colors: BTreeMap<u64, bool>,
    #[serde(default)]
    free_loops: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableEdge {
    alive: bool,
    u: u64,
    v: u64,
    ports: PortAssignment,
}

impl SerializableDiagram {
    fn from_diagram(diagram: &LinkDiagram) -> Self {
        let graph = diagram.graph();
        let edges = graph
            .edge_payloads()
            .into_iter()
            .map(|(alive, u, v, ports)| SerializableEdge {
                alive,
                u: u.as_raw(),
                v: v.as_raw(),
                ports,
            })
            .collect();
        Self {
            schema_version: DIAGRAM_SCHEMA,
            nodes: graph.node_states(),
            edges,
            colors: diagram
                .colors()
                .iter()
                .map(|(node, color)| (node.as_raw(), *color))
                .collect(),
            free_loops: diagram.free_loops(),
        }
    }

    fn into_diagram(self) -> Result<LinkDiagram, KnotError> {
        if !DIAGRAM_SCHEMA.is_compatible_with(&self.schema_version) {
            return Err(KnotError::Serde(
                ErrorInfo::new("schema-mismatch", "diagram schema is not supported")
                    .with_context("found", format!("{:?}", self.schema_version))
                    .with_context("expected", format!("{DIAGRAM_SCHEMA:?}")),
            ));
        }
        let mut graph = MultigraphImpl::new();
        for alive in &self.nodes {
            let node = graph.add_node();
            if !alive {
                graph.remove_node(node)?;
            }
        }
        for edge in self.edges {
            let (u, v) = (NodeId::from_raw(edge.u), NodeId::from_raw(edge.v));
            if edge.alive {
                graph.add_edge_with_ports(u, v, edge.ports)?;
            } else {
                graph.push_dead_edge(u, v, edge.ports);
            }
        }
        let colors = self
            .colors
            .into_iter()
            .map(|(node, color)| (NodeId::from_raw(node), color))
            .collect();
        LinkDiagram::try_from_parts(graph, colors, self.free_loops)
    }
}
