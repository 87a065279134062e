#![deny(missing_docs)]
#![doc = include_str!("../docs/diagram-api.md")]

//! Random planar link diagram generation and crossing resolution on top of the
//! `knot-core` contracts.

mod annotate;
mod bracket;
mod builder;
mod diagram;
mod flatten;
mod generators;
mod hash;
mod multigraph;
mod planarity;
mod resolve;
mod serialization;
mod validate;

pub use annotate::{annotate_ports, CROSSING_VALENCE};
pub use bracket::{kauffman_bracket, LaurentPolynomial};
pub use builder::{
    build_link_diagram, BuildConfig, BuildOutcome, BuildPhase, BuildReport, DiagramBuilder,
};
pub use diagram::LinkDiagram;
pub use flatten::{flatten, SimpleGraph};
pub use generators::random_regular_multigraph;
pub use hash::canonical_hash;
pub use multigraph::{MultigraphImpl, PortAssignment};
pub use planarity::{LeftRight, PlanarityOracle};
pub use resolve::{resolve_crossing, resolve_type_a, resolve_type_b, Smoothing};
pub use validate::{
    expand_crossings, is_valid_diagram, is_valid_diagram_with, CrossingExpansion, GadgetKey,
    GadgetSlot,
};

/// Re-export serialization helpers for downstream crates.
pub use serialization::{
    diagram_from_bytes, diagram_from_json, diagram_to_bytes, diagram_to_json, diagram_to_value,
    DIAGRAM_SCHEMA,
};
