//! Arden CLI binary.
//!
//! Drives the four analysis pipelines against one holdings file. Every path,
//! the snapshot date, and the year-to-date cutoff are supplied at invocation;
//! the snapshot date defaults to the latest refdate in the loaded table.

mod pipelines;

use arden_data::loader::{self, LoadOptions};
use arden_data::transform;
use arden_output::Exporter;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use pipelines::RunContext;
use polars::prelude::DataFrame;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "arden")]
#[command(about = "Arden: portfolio holdings analytics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Arguments shared by every pipeline.
#[derive(Args)]
struct IoArgs {
    /// Holdings CSV file
    input: PathBuf,

    /// Directory to write charts and exports to
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Snapshot date for "current" figures; defaults to the latest refdate
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// strptime format of the refdate column
    #[arg(long, default_value = "%d/%m/%Y")]
    date_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate daily ESG scores and rating categories
    Esg {
        #[command(flatten)]
        io: IoArgs,
    },

    /// Detect ESG rating upgrades and downgrades
    Changes {
        #[command(flatten)]
        io: IoArgs,
    },

    /// Chart sector/country/cap-bucket exposures through time
    Exposure {
        #[command(flatten)]
        io: IoArgs,
    },

    /// Compute performance contribution and attribution tables
    Perf {
        #[command(flatten)]
        io: IoArgs,

        /// First date of the year-to-date window
        #[arg(long, default_value = "2023-01-01")]
        ytd_start: NaiveDate,
    },

    /// Run every pipeline against one load of the data
    All {
        #[command(flatten)]
        io: IoArgs,

        /// First date of the year-to-date window
        #[arg(long, default_value = "2023-01-01")]
        ytd_start: NaiveDate,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Esg { io } => {
            let (df, context) = load(&io)?;
            pipelines::esg::run(&df, &context)?;
        }
        Commands::Changes { io } => {
            let (df, context) = load(&io)?;
            pipelines::changes::run(&df, &context)?;
        }
        Commands::Exposure { io } => {
            let (df, context) = load(&io)?;
            pipelines::exposure::run(&df, &context)?;
        }
        Commands::Perf { io, ytd_start } => {
            let (df, context) = load(&io)?;
            pipelines::perf::run(&df, &context, ytd_start)?;
        }
        Commands::All { io, ytd_start } => {
            let (df, context) = load(&io)?;
            pipelines::esg::run(&df, &context)?;
            pipelines::changes::run(&df, &context)?;
            pipelines::exposure::run(&df, &context)?;
            pipelines::perf::run(&df, &context, ytd_start)?;
        }
    }
    Ok(())
}

fn load(io: &IoArgs) -> Result<(DataFrame, RunContext), Box<dyn std::error::Error>> {
    let options = LoadOptions {
        date_format: io.date_format.clone(),
        ..Default::default()
    };
    let df = loader::load_holdings(&io.input, &options)?;
    let as_of = match io.as_of {
        Some(date) => date,
        None => transform::max_refdate(&df)?,
    };
    let exporter = Exporter::new(io.output_dir.clone())?;
    println!(
        "Loaded {} rows from {} (as of {})",
        df.height(),
        io.input.display(),
        as_of
    );
    Ok((df, RunContext { as_of, exporter }))
}
