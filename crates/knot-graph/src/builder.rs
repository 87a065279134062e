use std::collections::BTreeMap;
use std::path::Path;

use knot_core::errors::{ErrorInfo, KnotError};
use knot_core::rng::RngHandle;
use knot_core::{Multigraph, NodeId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::annotate::{annotate_ports, CROSSING_VALENCE};
use crate::diagram::LinkDiagram;
use crate::generators::random_regular_multigraph;
use crate::multigraph::MultigraphImpl;
use crate::planarity::{LeftRight, PlanarityOracle};
use crate::validate::is_valid_diagram_with;

/// YAML-configurable parameters for diagram generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Number of crossings of the requested diagram.
    pub num_crossings: usize,
    /// Upper bound on generate/annotate/validate cycles; `None` retries forever.
    #[serde(default)]
    pub max_attempts: Option<usize>,
    /// Master seed; batches derive one substream per diagram from it.
    #[serde(default)]
    pub seed: u64,
}

impl BuildConfig {
    /// Unbounded configuration for `num_crossings` crossings and seed 0.
    pub fn new(num_crossings: usize) -> Self {
        Self {
            num_crossings,
            max_attempts: None,
            seed: 0,
        }
    }

    /// Parses a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, KnotError> {
        serde_yaml::from_str(text)
            .map_err(|err| KnotError::Config(ErrorInfo::new("parse-yaml", err.to_string())))
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, KnotError> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            KnotError::Config(
                ErrorInfo::new("read-config", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Self::from_yaml_str(&text)
    }
}

/// Counters describing how a diagram was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Generation cycles started, the accepted one included.
    pub attempts: usize,
    /// Cycles abandoned because the generator dead-ended.
    pub dead_ends: usize,
    /// Cycles rejected by the planarity check.
    pub non_planar: usize,
}

/// Accepted diagram together with its search statistics.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// The accepted diagram.
    pub diagram: LinkDiagram,
    /// Search statistics.
    pub report: BuildReport,
}

/// State of one generation cycle.
#[derive(Debug)]
pub enum BuildPhase {
    /// Drawing a fresh 4-regular multigraph.
    Generating,
    /// Assigning ports to a generated multigraph.
    Annotating(MultigraphImpl),
    /// Checking planarity of an annotated multigraph.
    Validating(MultigraphImpl),
    /// Planar candidate waiting for its crossing signs.
    Accepted(MultigraphImpl),
}

impl BuildPhase {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            BuildPhase::Generating => "generating",
            BuildPhase::Annotating(_) => "annotating",
            BuildPhase::Validating(_) => "validating",
            BuildPhase::Accepted(_) => "accepted",
        }
    }
}

/// Retry-until-planar diagram builder.
#[derive(Debug, Clone)]
pub struct DiagramBuilder<O = LeftRight> {
    config: BuildConfig,
    oracle: O,
}

impl DiagramBuilder<LeftRight> {
    /// Creates a builder using the left-right planarity oracle.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            oracle: LeftRight,
        }
    }
}

impl<O: PlanarityOracle> DiagramBuilder<O> {
    /// Replaces the planarity oracle.
    pub fn with_oracle<P: PlanarityOracle>(self, oracle: P) -> DiagramBuilder<P> {
        DiagramBuilder {
            config: self.config,
            oracle,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Builds one diagram drawing all randomness from `rng`.
    ///
    /// Rejected candidates are dropped whole and the next cycle starts from a
    /// fresh multigraph. Without `max_attempts` the loop has no bound.
    pub fn build(&self, rng: &mut RngHandle) -> Result<BuildOutcome, KnotError> {
        let num_crossings = self.config.num_crossings;
        let mut report = BuildReport::default();
        let mut phase = BuildPhase::Generating;
        loop {
            trace!(phase = phase.name(), attempt = report.attempts, "build step");
            phase = match phase {
                BuildPhase::Generating => {
                    if let Some(cap) = self.config.max_attempts {
                        if report.attempts >= cap {
                            return Err(KnotError::Exhausted(
                                ErrorInfo::new(
                                    "attempt-cap",
                                    "no planar diagram found within the attempt cap",
                                )
                                .with_context("attempts", report.attempts)
                                .with_context("num_crossings", num_crossings)
                                .with_hint("raise max_attempts or leave it unset"),
                            ));
                        }
                    }
                    report.attempts += 1;
                    match random_regular_multigraph(num_crossings, CROSSING_VALENCE, rng) {
                        Ok(graph) => BuildPhase::Annotating(graph),
                        Err(err) if err.is_rejection() => {
                            report.dead_ends += 1;
                            debug!(attempt = report.attempts, reason = %err, "generator dead end");
                            BuildPhase::Generating
                        }
                        Err(err) => return Err(err),
                    }
                }
                BuildPhase::Annotating(graph) => {
                    BuildPhase::Validating(annotate_ports(&graph, rng)?)
                }
                BuildPhase::Validating(graph) => {
                    if is_valid_diagram_with(&graph, &self.oracle)? {
                        BuildPhase::Accepted(graph)
                    } else {
                        report.non_planar += 1;
                        debug!(attempt = report.attempts, "candidate is not planar");
                        BuildPhase::Generating
                    }
                }
                BuildPhase::Accepted(graph) => {
                    let colors = random_coloring(&graph, rng);
                    let diagram = LinkDiagram::from_parts(graph, colors, 0);
                    info!(
                        attempts = report.attempts,
                        num_crossings, "diagram accepted after {} attempts", report.attempts
                    );
                    debug!(colors = ?diagram.colors(), "node data");
                    debug!(edges = ?edge_dump(&diagram), "edge data");
                    return Ok(BuildOutcome { diagram, report });
                }
            };
        }
    }

    /// Builds one diagram from the configured seed.
    pub fn build_seeded(&self) -> Result<BuildOutcome, KnotError> {
        let mut rng = RngHandle::from_seed(self.config.seed);
        self.build(&mut rng)
    }

    /// Builds `count` diagrams, diagram `i` using substream `i` of the seed.
    pub fn build_batch(&self, count: usize) -> Result<Vec<BuildOutcome>, KnotError> {
        (0..count as u64)
            .map(|index| {
                let mut rng = RngHandle::for_substream(self.config.seed, index);
                self.build(&mut rng)
            })
            .collect()
    }
}

/// Builds a diagram with `num_crossings` crossings and no attempt cap.
pub fn build_link_diagram(
    num_crossings: usize,
    rng: &mut RngHandle,
) -> Result<LinkDiagram, KnotError> {
    DiagramBuilder::new(BuildConfig::new(num_crossings))
        .build(rng)
        .map(|outcome| outcome.diagram)
}

fn random_coloring(graph: &MultigraphImpl, rng: &mut RngHandle) -> BTreeMap<NodeId, bool> {
    graph.nodes().map(|node| (node, rng.gen::<bool>())).collect()
}

fn edge_dump(diagram: &LinkDiagram) -> Vec<String> {
    let graph = diagram.graph();
    graph
        .edges()
        .filter_map(|edge| {
            let (u, v) = graph.endpoints(edge).ok()?;
            let ports = graph.ports(edge).ok()?;
            Some(format!(
                "({}, {}) {:?}/{:?}",
                u.as_raw(),
                v.as_raw(),
                ports.at_u,
                ports.at_v
            ))
        })
        .collect()
}
