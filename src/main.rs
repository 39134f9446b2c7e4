//! shamir-recover: print the secret behind each share document.
//!
//! usage:
//!   shamir-recover                         # testcase1.json testcase2.json
//!   shamir-recover a.json b.json --selection highest --verify-surplus
//!
//! secrets go to stdout, one line per document that succeeds; everything
//! else is logged to stderr (set RUST_LOG to tune).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::builder::FalseyValueParser;
use clap::Parser;
use shamir_recover::data::{recover_files, Options};
use shamir_recover::Selection;

#[derive(Parser)]
#[command(name = "shamir-recover")]
#[command(about = "recover threshold-shared secrets by exact interpolation")]
#[command(version)]
struct Args {
    /// share documents to process, each on its own
    #[arg(default_values = ["testcase1.json", "testcase2.json"])]
    files: Vec<PathBuf>,

    /// which k shares to use when more are present (lowest or highest)
    #[arg(long, env = "SHAMIR_SELECTION", default_value = "lowest")]
    selection: Selection,

    /// check every unused share against the recovered polynomial
    #[arg(long, env = "SHAMIR_VERIFY_SURPLUS", value_parser = FalseyValueParser::new())]
    verify_surplus: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shamir_recover=info".into()),
        )
        .init();

    let args = Args::parse();
    let options = Options {
        selection: args.selection,
        verify_surplus: args.verify_surplus,
    };

    let mut failed = false;
    for result in recover_files(&args.files, &options) {
        match result {
            Ok(secret) => println!("{}", secret),
            Err(_) => failed = true,
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
