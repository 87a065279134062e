use std::error::Error;

use clap::{ArgAction, Parser, Subcommand};
use commands::{
    build::{self, BuildArgs},
    resolve::{self, ResolveArgs},
    validate::{self, ValidateArgs},
};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "knot-sim", about = "Random planar link diagram generator")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one or more planar link diagrams.
    Build(BuildArgs),
    /// Smooth one crossing of a stored diagram.
    Resolve(ResolveArgs),
    /// Re-check invariants and planarity of a stored diagram.
    Validate(ValidateArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.command {
        Command::Build(args) => build::run(&args),
        Command::Resolve(args) => resolve::run(&args),
        Command::Validate(args) => validate::run(&args),
    }
}
