//! Detector Simulation Configuration CLI.
//!
//! Renders configuration objects for the simulation engine.
//!
//! # Usage
//!
//! 1. **geometry**: Prints the Hcal readout geometry serving a detector.
//! 2. **resim**: Builds a resimulation producer from event and run numbers.
//! 3. **render**: Builds every object described by a TOML job file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::{error, trace};
use tracing_subscriber::EnvFilter;

extern crate detsim_config;

use detsim_config::common::render;
use detsim_config::config::JobConfig;
use detsim_config::detector::DetectorSetup;
use detsim_config::job::Job;
use detsim_config::resim::ReSimulator;
use detsim_config::{build_selection, lookup_geometry, OutputFormat, Result, RunSelector};

/// Command-line arguments for the configuration renderer.
#[derive(Parser, Debug)]
#[command(author, version, about = "Detector simulation configuration builder")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(short, long, global = true, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Verbosity of the program:
    /// -v for info, -vv for debug, and -vvv for trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the Hcal readout geometry for a detector
    Geometry {
        /// Detector name, e.g. ldmx-det-v12
        detector: String,
    },

    /// Build a resimulation producer
    Resim {
        /// Detector the input events were simulated with
        #[arg(short, long)]
        detector: String,

        /// Events to resimulate; all events if omitted
        #[arg(short, long, value_delimiter = ',')]
        events: Option<Vec<u64>>,

        /// Run constraint: one run shared by all events, or one run per event
        #[arg(short, long, value_delimiter = ',')]
        runs: Option<Vec<u64>>,

        /// Producer instance name
        #[arg(long, default_value = "resim")]
        name: String,
    },

    /// Build every configuration object in a job file
    Render {
        /// Path to the TOML job file
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// A single run is shared by every event; several are paired by position.
fn run_selector(runs: Option<Vec<u64>>) -> RunSelector {
    match runs {
        None => RunSelector::Any,
        Some(runs) if runs.len() == 1 => RunSelector::Shared(runs[0]),
        Some(runs) => RunSelector::Paired(runs),
    }
}

fn run(args: Args) -> Result<String> {
    match args.command {
        Command::Geometry { detector } => render(&lookup_geometry(&detector)?, args.format),
        Command::Resim {
            detector,
            events,
            runs,
            name,
        } => {
            let setup = DetectorSetup::for_detector(&detector, false)?;
            let selection = build_selection(events.as_deref(), run_selector(runs))?;
            render(&ReSimulator::new(&name, &setup, selection), args.format)
        }
        Command::Render { config } => {
            let job = Job::from_config(&JobConfig::load(&config)?)?;
            render(&job, args.format)
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    trace!("{args:?}");

    match run(args) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}
