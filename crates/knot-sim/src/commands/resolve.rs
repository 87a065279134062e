use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use knot_core::NodeId;
use knot_graph::{canonical_hash, diagram_to_json, diagram_to_value, resolve_crossing, Smoothing};
use serde_json::json;
use tracing::info;

use super::{print_json, read_diagram, write_file};

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Diagram JSON produced by `build --out` or an earlier `resolve --out`.
    #[arg(long)]
    pub input: PathBuf,
    /// Identifier of the crossing to smooth.
    #[arg(long)]
    pub crossing: u64,
    /// `vertical` (type A) or `horizontal` (type B).
    #[arg(long)]
    pub smoothing: Smoothing,
    /// Where to write the resolved diagram JSON.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &ResolveArgs) -> Result<(), Box<dyn Error>> {
    let diagram = read_diagram(&args.input)?;
    let resolved = resolve_crossing(&diagram, NodeId::from_raw(args.crossing), args.smoothing)?;
    let diagram_hash = canonical_hash(&resolved)?;
    info!(
        crossing = args.crossing,
        smoothing = %args.smoothing,
        remaining = resolved.crossing_count(),
        "resolved"
    );

    if let Some(path) = &args.out {
        write_file(path, &diagram_to_json(&resolved)?)?;
    }
    print_json(&json!({
        "crossing": args.crossing,
        "smoothing": args.smoothing,
        "crossings_before": diagram.crossing_count(),
        "crossings_after": resolved.crossing_count(),
        "free_loops": resolved.free_loops(),
        "diagram_hash": diagram_hash,
        "diagram": diagram_to_value(&resolved)?,
    }))
}
