use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use knot_core::provenance::RunProvenance;
use knot_core::rng::derive_substream_seed;
use knot_graph::{
    canonical_hash, diagram_to_json, diagram_to_value, BuildConfig, BuildOutcome, BuildReport,
    DiagramBuilder,
};
use serde::Serialize;
use tracing::info;

use super::{print_json, write_file};

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Number of crossings per diagram.
    #[arg(long)]
    pub crossings: Option<usize>,
    /// Master seed. Overrides the configuration file.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Give up after this many rejected attempts.
    #[arg(long)]
    pub max_attempts: Option<usize>,
    /// Number of diagrams to generate, each from its own seed substream.
    #[arg(long, default_value_t = 1)]
    pub count: usize,
    /// YAML build configuration; flags take precedence over its fields.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory receiving one `diagram-<i>.json` per diagram and `report.json`.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct DiagramRecord {
    provenance: RunProvenance,
    report: BuildReport,
    free_loops: usize,
    diagram: serde_json::Value,
}

pub fn run(args: &BuildArgs) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(args)?;
    info!(
        num_crossings = config.num_crossings,
        seed = config.seed,
        count = args.count,
        "building diagrams"
    );
    let builder = DiagramBuilder::new(config.clone());

    let outcomes: Vec<(u64, BuildOutcome)> = if args.count == 1 {
        vec![(config.seed, builder.build_seeded()?)]
    } else {
        let seeds = (0..args.count as u64).map(|index| derive_substream_seed(config.seed, index));
        seeds.zip(builder.build_batch(args.count)?).collect()
    };

    let mut records = Vec::with_capacity(outcomes.len());
    for (index, (seed, outcome)) in outcomes.iter().enumerate() {
        let diagram_hash = canonical_hash(&outcome.diagram)?;
        if let Some(dir) = &args.out {
            write_file(
                dir.join(format!("diagram-{index}.json")),
                &diagram_to_json(&outcome.diagram)?,
            )?;
        }
        records.push(DiagramRecord {
            provenance: RunProvenance {
                seed: *seed,
                num_crossings: config.num_crossings,
                attempts: outcome.report.attempts,
                diagram_hash,
                tool_versions: tool_versions(),
            },
            report: outcome.report,
            free_loops: outcome.diagram.free_loops(),
            diagram: diagram_to_value(&outcome.diagram)?,
        });
    }

    if let Some(dir) = &args.out {
        write_file(dir.join("report.json"), &serde_json::to_string_pretty(&records)?)?;
    }
    if records.len() == 1 {
        print_json(&records[0])
    } else {
        print_json(&records)
    }
}

fn resolve_config(args: &BuildArgs) -> Result<BuildConfig, Box<dyn Error>> {
    let mut config = match (&args.config, args.crossings) {
        (Some(path), _) => BuildConfig::from_yaml_file(path)?,
        (None, Some(crossings)) => BuildConfig::new(crossings),
        (None, None) => return Err("either --crossings or --config is required".into()),
    };
    if let Some(crossings) = args.crossings {
        config.num_crossings = crossings;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.max_attempts.is_some() {
        config.max_attempts = args.max_attempts;
    }
    if args.count == 0 {
        return Err("--count must be at least 1".into());
    }
    Ok(config)
}

fn tool_versions() -> BTreeMap<String, String> {
    BTreeMap::from([("knot-sim".to_string(), env!("CARGO_PKG_VERSION").to_string())])
}
