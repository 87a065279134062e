use knot_core::errors::KnotError;
use knot_core::{Multigraph, Port};
use sha2::{Digest, Sha256};

use crate::diagram::LinkDiagram;

/// Computes the canonical structural hash of a diagram.
///
/// Covers crossing ids, signs, every edge with its ports and the free loop
/// count. Edge identifiers are left out, so two diagrams that differ only in
/// edge numbering hash the same.
pub fn canonical_hash(diagram: &LinkDiagram) -> Result<String, KnotError> {
    let mut hasher = Sha256::new();
    hasher.update(b"knot-diagram:v1");

    let crossings = diagram.crossings();
    hasher.update((crossings.len() as u64).to_le_bytes());
    for crossing in &crossings {
        hasher.update(crossing.as_raw().to_le_bytes());
        match diagram.color(*crossing) {
            Some(true) => hasher.update([1u8]),
            Some(false) => hasher.update([0u8]),
            None => hasher.update([2u8]),
        }
    }

    let graph = diagram.graph();
    let mut signatures = Vec::new();
    for edge in graph.edges() {
        let (u, v) = graph.endpoints(edge)?;
        let ports = graph.ports(edge)?;
        let a = (u.as_raw(), port_bytes(&ports.at_u));
        let b = (v.as_raw(), port_bytes(&ports.at_v));
        signatures.push(if a <= b { (a, b) } else { (b, a) });
    }
    signatures.sort();
    hasher.update((signatures.len() as u64).to_le_bytes());
    for ((u, at_u), (v, at_v)) in signatures {
        hasher.update(u.to_le_bytes());
        update_slice(&at_u, &mut hasher);
        hasher.update(v.to_le_bytes());
        update_slice(&at_v, &mut hasher);
    }

    hasher.update((diagram.free_loops() as u64).to_le_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

fn port_bytes(ports: &[Port]) -> Vec<u8> {
    ports.iter().map(|port| port.index() as u8).collect()
}

fn update_slice(values: &[u8], hasher: &mut Sha256) {
    hasher.update((values.len() as u64).to_le_bytes());
    hasher.update(values);
}
