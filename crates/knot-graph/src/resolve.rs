use std::fmt;
use std::str::FromStr;

use knot_core::errors::{ErrorInfo, KnotError};
use knot_core::{Multigraph, NodeId, Port};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagram::LinkDiagram;
use crate::multigraph::PortAssignment;

/// The two ways of smoothing a crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Smoothing {
    /// Joins `tl` with `bl` and `tr` with `br` (type A).
    Vertical,
    /// Joins `tl` with `tr` and `bl` with `br` (type B).
    Horizontal,
}

impl Smoothing {
    /// Port pairs reconnected by this smoothing.
    pub const fn pairs(self) -> [(Port, Port); 2] {
        match self {
            Smoothing::Vertical => [
                (Port::TopLeft, Port::BottomLeft),
                (Port::TopRight, Port::BottomRight),
            ],
            Smoothing::Horizontal => [
                (Port::TopLeft, Port::TopRight),
                (Port::BottomLeft, Port::BottomRight),
            ],
        }
    }

    /// Port joined to `port` by this smoothing.
    pub const fn partner(self, port: Port) -> Port {
        match (self, port) {
            (Smoothing::Vertical, Port::TopLeft) => Port::BottomLeft,
            (Smoothing::Vertical, Port::BottomLeft) => Port::TopLeft,
            (Smoothing::Vertical, Port::TopRight) => Port::BottomRight,
            (Smoothing::Vertical, Port::BottomRight) => Port::TopRight,
            (Smoothing::Horizontal, Port::TopLeft) => Port::TopRight,
            (Smoothing::Horizontal, Port::TopRight) => Port::TopLeft,
            (Smoothing::Horizontal, Port::BottomLeft) => Port::BottomRight,
            (Smoothing::Horizontal, Port::BottomRight) => Port::BottomLeft,
        }
    }
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Smoothing::Vertical => f.write_str("vertical"),
            Smoothing::Horizontal => f.write_str("horizontal"),
        }
    }
}

impl FromStr for Smoothing {
    type Err = KnotError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "vertical" | "a" | "A" => Ok(Smoothing::Vertical),
            "horizontal" | "b" | "B" => Ok(Smoothing::Horizontal),
            other => Err(KnotError::Config(
                ErrorInfo::new("unknown-smoothing", "smoothing must be vertical or horizontal")
                    .with_context("value", other),
            )),
        }
    }
}

/// Where the strand leaving a port of the target crossing arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FarEnd {
    /// At `port` of another crossing.
    External(NodeId, Port),
    /// Back at `port` of the target itself, through a loop.
    Internal(Port),
}

/// Smooths `crossing` vertically: `tl`–`bl` and `tr`–`br`.
pub fn resolve_type_a(diagram: &LinkDiagram, crossing: NodeId) -> Result<LinkDiagram, KnotError> {
    resolve_crossing(diagram, crossing, Smoothing::Vertical)
}

/// Smooths `crossing` horizontally: `tl`–`tr` and `bl`–`br`.
pub fn resolve_type_b(diagram: &LinkDiagram, crossing: NodeId) -> Result<LinkDiagram, KnotError> {
    resolve_crossing(diagram, crossing, Smoothing::Horizontal)
}

/// Returns a new diagram with `crossing` removed and its strands rejoined.
///
/// Each smoothing pair is traced to the crossings at the far ends of its two
/// edges and a fresh edge joins them, forming a loop when both ends land on the
/// same crossing. Strands that close up without leaving the crossing are counted
/// as free loops. The source diagram is not modified.
pub fn resolve_crossing(
    diagram: &LinkDiagram,
    crossing: NodeId,
    smoothing: Smoothing,
) -> Result<LinkDiagram, KnotError> {
    let far = far_ends(diagram, crossing)?;

    let mut visited = [false; 4];
    let mut joins = Vec::with_capacity(2);
    for start in Port::ALL {
        let FarEnd::External(start_node, start_port) = far[start.index()] else {
            continue;
        };
        if visited[start.index()] {
            continue;
        }
        let mut current = start;
        loop {
            visited[current.index()] = true;
            let exit = smoothing.partner(current);
            visited[exit.index()] = true;
            match far[exit.index()] {
                FarEnd::External(node, port) => {
                    joins.push(((start_node, start_port), (node, port)));
                    break;
                }
                FarEnd::Internal(next) => current = next,
            }
        }
    }

    let mut closed = 0;
    for start in Port::ALL {
        if visited[start.index()] {
            continue;
        }
        let mut current = start;
        loop {
            visited[current.index()] = true;
            let exit = smoothing.partner(current);
            visited[exit.index()] = true;
            match far[exit.index()] {
                FarEnd::Internal(next) if visited[next.index()] => break,
                FarEnd::Internal(next) => current = next,
                FarEnd::External(..) => {
                    return Err(malformed(crossing, "strand leaves a closed component"));
                }
            }
        }
        closed += 1;
    }

    let mut graph = diagram.graph().clone();
    for ((a, pa), (b, pb)) in joins {
        let ports = if a == b {
            PortAssignment::looped(pa, pb)
        } else {
            PortAssignment::between(pa, pb)
        };
        graph.add_edge_with_ports(a, b, ports)?;
    }
    graph.remove_node(crossing)?;

    let mut colors = diagram.colors().clone();
    colors.remove(&crossing);

    debug!(
        crossing = crossing.as_raw(),
        %smoothing,
        free_loops = closed,
        "crossing resolved"
    );
    LinkDiagram::try_from_parts(graph, colors, diagram.free_loops() + closed)
}

fn far_ends(diagram: &LinkDiagram, crossing: NodeId) -> Result<[FarEnd; 4], KnotError> {
    let graph = diagram.graph();
    let mut far: [Option<FarEnd>; 4] = [None; 4];
    let mut record = |port: Port, end: FarEnd| -> Result<(), KnotError> {
        let slot = &mut far[port.index()];
        if slot.is_some() {
            return Err(malformed(crossing, "port used twice").with_context("port", port));
        }
        *slot = Some(end);
        Ok(())
    };

    for edge in graph.edges_touching(crossing)? {
        let here = graph.ports_at(edge, crossing)?;
        if graph.is_loop(edge)? {
            let [a, b] = here[..] else {
                return Err(malformed(crossing, "loop does not carry two ports")
                    .with_context("edge", edge.as_raw()));
            };
            record(a, FarEnd::Internal(b))?;
            record(b, FarEnd::Internal(a))?;
        } else {
            let neighbour = graph.other_end(edge, crossing)?;
            let (&[port], &[far_port]) = (here, graph.ports_at(edge, neighbour)?) else {
                return Err(malformed(crossing, "edge does not carry one port per end")
                    .with_context("edge", edge.as_raw()));
            };
            record(port, FarEnd::External(neighbour, far_port))?;
        }
    }

    let mut resolved = [FarEnd::Internal(Port::TopLeft); 4];
    for port in Port::ALL {
        let Some(end) = far[port.index()] else {
            return Err(malformed(crossing, "port is not in use").with_context("port", port));
        };
        resolved[port.index()] = end;
    }
    Ok(resolved)
}

fn malformed(crossing: NodeId, message: &str) -> KnotError {
    KnotError::Precondition(
        ErrorInfo::new("malformed-crossing", message).with_context("crossing", crossing.as_raw()),
    )
}
