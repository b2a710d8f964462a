//! # dmt CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dmt_cli::inspect::{
    run_example, run_lookup, run_paths, run_schema, ExampleArgs, LookupArgs, PathsArgs, SchemaArgs,
};
use dmt_cli::matching::{run_leaves, run_match, PatternArgs};
use dmt_cli::validate::{run_validate, ValidateArgs};
use dmt_cli::{resolve_limits, EXIT_ERROR, EXIT_REJECTED};
use dmt_core::ValidationReport;

/// Data model tree toolchain.
///
/// Validates IoT payload schemas given as flat node descriptor lists, renders
/// example messages and JSON Schemas, and matches schema patterns.
#[derive(Parser, Debug)]
#[command(name = "dmt", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Largest sibling group the subtree matcher accepts [env: DMT_MAX_FAN_OUT].
    #[arg(long, global = true)]
    max_fan_out: Option<usize>,

    /// Largest pattern the subtree matcher accepts [env: DMT_MAX_PATTERN_NODES].
    #[arg(long, global = true)]
    max_pattern_nodes: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build descriptor files and report every violation.
    Validate(ValidateArgs),

    /// Print the example message of a tree.
    Example(ExampleArgs),

    /// Print the path index of a tree.
    Paths(PathsArgs),

    /// Print the type living at a path.
    Lookup(LookupArgs),

    /// Find every subtree matching a pattern node, up to sibling order.
    #[command(name = "match")]
    Match(PatternArgs),

    /// Find the leaf paths satisfying a chain pattern.
    Leaves(PatternArgs),

    /// Print the JSON Schema of a tree's messages.
    Schema(SchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Example(args) => run_example(&args),
        Commands::Paths(args) => run_paths(&args),
        Commands::Lookup(args) => run_lookup(&args),
        Commands::Match(args) => resolve_limits(cli.max_fan_out, cli.max_pattern_nodes)
            .map_err(anyhow::Error::from)
            .and_then(|limits| run_match(&args, &limits)),
        Commands::Leaves(args) => run_leaves(&args),
        Commands::Schema(args) => run_schema(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            if e.downcast_ref::<ValidationReport>().is_some() {
                ExitCode::from(EXIT_REJECTED)
            } else {
                ExitCode::from(EXIT_ERROR)
            }
        }
    }
}
