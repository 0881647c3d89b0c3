//!
//! Rewrite an AGEPRO input file in canonical section order.
//!
//! Usage: `agepro-normalize <file> [--output FILE] [--config FILE] [--strict]`

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "agepro-normalize")]
#[command(about = "Rewrite an AGEPRO input file in canonical form")]
struct Args {
    /// Path to the input file
    input: PathBuf,

    /// Output path (defaults to rewriting the input in place)
    #[arg(short, long)]
    output: Option<PathBuf>,

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

    let result = agepro_tools::load_config(args.config.as_deref(), args.strict).and_then(
        |config| {
            let document = agepro_tools::read_document(&args.input, &config)?;
            let report = document.validate(&config);
            if !report.is_valid() {
                warn!("Writing a document with {} validation problems:\n{}", report.len(), report);
            }
            let output = args.output.as_ref().unwrap_or(&args.input);
            agepro_tools::write_document(output, &document)?;
            Ok(output.clone())
        },
    );

    match result {
        Ok(output) => info!("Wrote {}", output.display()),
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}
