//! netreach: network coverage from the command line.
//!
//! Loads a network graph (and optionally a list of named origins), computes
//! the nodes reachable from the selected origin within the threshold, and
//! prints or exports the result as GeoJSON for a map surface.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod load;
mod reach;
mod settings;
mod state;
mod status;
mod util;

use settings::{Overrides, Settings};

/// Compute which network nodes are reachable from an origin within a cost budget
#[derive(Parser, Debug)]
#[command(name = "netreach")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML settings file
    #[arg(short, long, global = true, env = "NETREACH_CONFIG")]
    config: Option<PathBuf>,

    /// Network graph document (JSON)
    #[arg(short, long, global = true, env = "NETREACH_GRAPH")]
    graph: Option<PathBuf>,

    /// Origin list document (JSON)
    #[arg(long, global = true, env = "NETREACH_ORIGINS")]
    origins: Option<PathBuf>,

    /// Origin id from the origin list, or a graph node id
    #[arg(short, long, global = true, env = "NETREACH_ORIGIN")]
    origin: Option<String>,

    /// Inclusive cost budget
    #[arg(short, long, global = true, env = "NETREACH_THRESHOLD", allow_negative_numbers = true)]
    threshold: Option<f64>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List reachable nodes with their cost and path
    Reach {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write the reachable nodes as a GeoJSON point collection
    Export {
        /// Output file (defaults to the configured export path)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the node, edge and origin layers plus view bounds as JSON
    Layers {
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Print the coverage snapshot
    Metrics {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show graph and index statistics
    Status,
    /// List the configured origin locations
    Origins,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref())?.apply(Overrides {
        graph: cli.graph,
        origins: cli.origins,
        selected_origin_id: cli.origin,
        threshold: cli.threshold,
    });
    settings.validate()?;
    tracing::debug!(?settings, "settings resolved");

    let state = load::load_network(&settings)?;

    match cli.command {
        Command::Reach { json } => reach::cmd_reach(&state, &settings, json),
        Command::Export { output } => reach::cmd_export(&state, &settings, output),
        Command::Layers { compact } => reach::cmd_layers(&state, &settings, compact),
        Command::Metrics { json } => reach::cmd_metrics(&state, &settings, json),
        Command::Status => status::cmd_status(&state, &settings),
        Command::Origins => status::cmd_origins(&state),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
