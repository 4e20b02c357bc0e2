//! DiyProf CLI
//!
//! Replays recorded call/return event logs through the profiler core
//! and prints call-graph statistics.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use diy_prof::aggregator::Metric;
use diy_prof::commands::{display_schema, display_version, execute_report, validate_args, ReportArgs};
use diy_prof::utils::config::DEFAULT_TOP_NODES;

/// DiyProf - call-graph profiling from call/return events
#[derive(Parser, Debug)]
#[command(name = "diy-prof")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay an event log and report per-routine statistics
    Report {
        /// Event log to replay
        #[arg(short, long)]
        events: PathBuf,

        /// Metric to rank routines by
        #[arg(short, long, value_enum, default_value_t = Metric::Count)]
        metric: Metric,

        /// Number of routines to list
        #[arg(long, default_value_t = DEFAULT_TOP_NODES)]
        top: usize,

        /// Include native (c_call / c_return) events
        #[arg(long)]
        native: bool,

        /// Also list caller -> callee edges
        #[arg(long)]
        edges: bool,

        /// Print the call graph as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Display event log and report schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Report {
            events,
            metric,
            top,
            native,
            edges,
            json,
        } => {
            let args = ReportArgs {
                events_path: events,
                metric,
                top_nodes: top,
                include_native: native,
                show_edges: edges,
                json,
            };

            // Validate args first
            validate_args(&args)?;

            execute_report(args)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
