use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use knot_graph::{canonical_hash, is_valid_diagram};
use serde_json::json;
use tracing::warn;

use super::{print_json, read_diagram};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Diagram JSON to check.
    #[arg(long)]
    pub input: PathBuf,
}

/// Loading already re-checks degree, ports and signs; this adds planarity.
pub fn run(args: &ValidateArgs) -> Result<(), Box<dyn Error>> {
    let diagram = read_diagram(&args.input)?;
    let planar = is_valid_diagram(diagram.graph())?;
    print_json(&json!({
        "input": args.input.display().to_string(),
        "crossings": diagram.crossing_count(),
        "free_loops": diagram.free_loops(),
        "planar": planar,
        "diagram_hash": canonical_hash(&diagram)?,
    }))?;
    if !planar {
        warn!(input = %args.input.display(), "diagram is not planar");
        return Err("diagram failed the planarity check".into());
    }
    Ok(())
}
