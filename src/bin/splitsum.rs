//! Splitsum CLI: read seed pairs, solve each, print the best pairs.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use splitsum::search::Incomplete;
use splitsum::{InputData, Solver};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "splitsum", version, about = "Parallel equal-sum subset search")]
struct Cli {
    /// Input file; reads stdin when omitted
    input: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbosity: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    let input = match read_input(cli.input.as_deref()) {
        Ok(input) => input,
        Err(error) => {
            eprintln!("splitsum: {error}");
            return ExitCode::FAILURE;
        }
    };

    let solver = Solver::new(input.d, input.threads);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (seed_a, seed_b) in input.pairs {
        match solver.solve(seed_a, seed_b) {
            Ok(solution) => {
                if write!(out, "{solution}").is_err() {
                    return ExitCode::FAILURE;
                }
            }
            Err(Incomplete { error, best_so_far }) => {
                // Best effort: report what was found, then fail.
                let _ = write!(out, "{best_so_far}");
                let _ = out.flush();
                eprintln!("splitsum: {error}");
                return ExitCode::FAILURE;
            }
        }
    }
    if out.flush().is_err() {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&std::path::Path>) -> splitsum::Result<InputData> {
    match path {
        Some(path) => InputData::read_from(BufReader::new(File::open(path)?)),
        None => InputData::read_from(io::stdin().lock()),
    }
}
