//!
//! Read and validate an AGEPRO input file.
//!
//! Usage: `agepro-check <file> [--config FILE] [--strict]`

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "agepro-check")]
#[command(about = "Read an AGEPRO input file and report validation problems")]
struct Args {
    /// Path to the input file
    input: PathBuf,

    /// YAML file with codec settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reject unknown sections and stray lines
    #[arg(long)]
    strict: bool,
}

fn main() {
    agepro_tools::init_logging();

    let args = Args::parse();

    let config = match agepro_tools::load_config(args.config.as_deref(), args.strict) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    };

    info!("Reading {}", args.input.display());
    let document = match agepro_tools::read_document(&args.input, &config) {
        Ok(document) => document,
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    };

    let report = document.validate(&config);
    if !report.is_valid() {
        warn!("{} validation problems:\n{}", report.len(), report);
        process::exit(1);
    }

    info!("Input file is valid");
    info!("  - Case: {}", document.case_id);
    info!(
        "  - Years: {}-{}",
        document.general.first_year, document.general.last_year
    );
    info!("  - Fleets: {}", document.general.num_fleets);
    info!(
        "  - Recruitment models: {:?}",
        document.recruitment.model_numbers()
    );
    info!("  - Analysis: {:?}", document.analysis_type());
}
