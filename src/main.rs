//! CLI entry point for the rewrite solver.
//!
//! Usage:
//!   rewrite-solver expand <puzzle.txt> [--verbose]
//!   rewrite-solver derive <puzzle.txt> [options]
//!   rewrite-solver derive --stdin [options]
//!
//! Puzzle files list one `<symbol> => <replacement>` rule per line,
//! then a blank line, then one target string per line.
//!
//! Options (derive):
//!   --start <symbol>    Start symbol for every search (default: e)
//!   --timeout <seconds> Maximum search time per target (default: 15)
//!   --verbose           Print per-round frontier traces
//!   --json              One JSON report per target instead of bare counts
//!
//! Exit codes: 0 success, 1 at least one target had no derivation,
//! 2 malformed input or configuration error.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use serde::Serialize;

use rewrite_solver::{Machine, PuzzleInput, Search};

#[derive(Parser)]
#[command(name = "rewrite-solver")]
#[command(about = "Heuristic shortest-derivation solver for string rewrite puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count the distinct one-step derivatives of each target
    Expand {
        /// Path to puzzle file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Print each derivative before the count, marking duplicates
        #[arg(long)]
        verbose: bool,
    },
    /// Find the shortest derivation of each target from the start symbol
    Derive {
        /// Path to puzzle file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Start symbol for every search
        #[arg(long, default_value = "e")]
        start: String,

        /// Maximum search time per target in seconds
        #[arg(long, default_value = "15")]
        timeout: u64,

        /// Print per-round frontier traces
        #[arg(long)]
        verbose: bool,

        /// Emit one JSON report per target instead of bare counts
        #[arg(long)]
        json: bool,
    },
}

/// Output format for one `derive --json` report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DerivationOutput {
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<usize>,
    exhausted: bool,
    rounds: usize,
    time_elapsed_ms: u64,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            2
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Expand {
            file,
            stdin,
            verbose,
        } => {
            let input = PuzzleInput::parse(&read_puzzle_text(file, stdin)?)?;
            let machine = Machine::new(input.rules.clone())?;
            run_expand(&input, &machine, verbose);
            Ok(0)
        }
        Commands::Derive {
            file,
            stdin,
            start,
            timeout,
            verbose,
            json,
        } => {
            let input = PuzzleInput::parse(&read_puzzle_text(file, stdin)?)?;
            let machine = Machine::new(input.rules.clone())?;
            Ok(run_derive(
                &input,
                &machine,
                &start,
                Duration::from_secs(timeout),
                verbose,
                json,
            ))
        }
    }
}

fn read_puzzle_text(file: Option<PathBuf>, stdin: bool) -> io::Result<String> {
    if stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(path)
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "must provide either a file path or --stdin",
        ))
    }
}

/// One-step mode: print the count of distinct derivatives per target.
fn run_expand(input: &PuzzleInput, machine: &Machine, verbose: bool) {
    for target in &input.targets {
        if verbose {
            let seg = machine.segment(target);
            let mut seen: HashSet<String> = HashSet::new();
            for derived in machine.expand_one(&seg) {
                if seen.contains(&derived) {
                    println!("// {derived} (dupe)");
                } else {
                    println!("// {derived}");
                    seen.insert(derived);
                }
            }
            println!("{}", seen.len());
        } else {
            println!("{}", machine.distinct_derivatives(target));
        }
    }
}

/// Shortest-derivation mode: drive one search per target, stepping it
/// under a wall-clock deadline so a slow rule system cannot hang the
/// run.
fn run_derive(
    input: &PuzzleInput,
    machine: &Machine,
    start: &str,
    timeout: Duration,
    verbose: bool,
    json: bool,
) -> i32 {
    let mut exit_code = 0;

    for target in &input.targets {
        let started = Instant::now();

        let (best, rounds, exhausted) = if start == target.as_str() {
            (Some(0), 0, true)
        } else {
            let deadline = started + timeout;
            let mut search = Search::new(machine, start, target);
            let mut best: Option<usize> = None;
            let mut rounds = 0usize;

            while search.frontier_len() > 0 {
                if Instant::now() > deadline {
                    break;
                }
                rounds += 1;
                if verbose {
                    if let Some(d) = search.best_dist() {
                        println!("// rounds:{rounds} {d} #{}", search.frontier_len());
                    }
                }
                if let Some(found) = search.step().found {
                    if best.map_or(true, |b| found < b) {
                        best = Some(found);
                        if verbose {
                            println!("// found #{found}");
                        }
                    }
                }
            }

            (best, rounds, search.frontier_len() == 0)
        };

        if json {
            let output = DerivationOutput {
                target: target.clone(),
                steps: best,
                exhausted,
                rounds,
                time_elapsed_ms: started.elapsed().as_millis() as u64,
            };
            println!("{}", serde_json::to_string(&output).unwrap());
        } else if let Some(steps) = best {
            println!("{steps}");
        } else {
            eprintln!("no derivation found for {target:?}");
        }

        if best.is_none() {
            exit_code = 1;
        }
    }

    exit_code
}
