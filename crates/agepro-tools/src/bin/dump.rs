//!
//! Print an AGEPRO input file as JSON.
//!
//! Usage: `agepro-dump <file> [--config FILE] [--strict]`

use agepro_input::ScenarioDocument;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "agepro-dump")]
#[command(about = "Print an AGEPRO input file and its validation problems as JSON")]
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

#[derive(Serialize)]
struct Dump<'a> {
    document: &'a ScenarioDocument,
    problems: Vec<String>,
}

fn main() {
    agepro_tools::init_logging();

    let args = Args::parse();

    let result = agepro_tools::load_config(args.config.as_deref(), args.strict).and_then(
        |config| {
            let document = agepro_tools::read_document(&args.input, &config)?;
            let dump = Dump {
                document: &document,
                problems: document.validate(&config).messages,
            };
            Ok(serde_json::to_string_pretty(&dump)?)
        },
    );

    match result {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}
