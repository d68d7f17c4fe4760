//! # Main — CLI Entry Point
//!
//! Parses arguments, initialises logging and routes each subcommand to
//! `cli.rs`.
//!
//! ## Subcommands
//!
//! - `test`: Lucas–Lehmer test for a list of exponents, with optional
//!   benchmarking (`--bench=N`), progress stride and JSON output.
//! - `digits`: write M_p in decimal to a file.
//! - `exponents`: list prime exponents in a range or 1M-wide block.
//! - `sweep`: test every prime exponent in a range on the rayon pool.
//!
//! ## Global Options
//!
//! - `--config` / `LLCORE_CONFIG`: TOML file with engine and export defaults.
//! - `--threads`: rayon pool size for sweeps (default: all cores).
//! - `LOG_FORMAT=json` switches logs to JSON; `RUST_LOG` filters them.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "llcore", version, about = "Lucas-Lehmer primality testing for Mersenne numbers")]
struct Cli {
    /// TOML file with [engine] and [export] defaults
    #[arg(long, env = "LLCORE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Number of rayon worker threads for sweeps (defaults to all logical cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Lucas-Lehmer test on M_p for each exponent p
    Test {
        /// Exponents to test (default: 31)
        exponents: Vec<u32>,
        /// Repeat each test N times and report best/average timings
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        bench: u32,
        /// Iterations between progress checkpoints (0 = ~100 per run)
        #[arg(long)]
        stride: Option<u32>,
        /// Disable progress checkpoints
        #[arg(long)]
        no_progress: bool,
        /// Print progress events and results as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Write M_p = 2^p - 1 in decimal to a file
    Digits {
        /// Exponent p (>= 1)
        #[arg(long)]
        p: u32,
        /// Output file
        #[arg(long)]
        out: PathBuf,
        /// Refuse numbers with more decimal digits than this
        #[arg(long)]
        max_digits: Option<u64>,
        /// Print the export metadata as JSON
        #[arg(long)]
        json: bool,
    },
    /// List prime exponents in [start, end) or in a 1M-wide block
    Exponents {
        /// Start of range (inclusive)
        #[arg(long, requires = "end", conflicts_with = "block")]
        start: Option<u64>,
        /// End of range (exclusive)
        #[arg(long, requires = "start")]
        end: Option<u64>,
        /// Block id: exponents [id*1000000, (id+1)*1000000)
        #[arg(long, required_unless_present = "start")]
        block: Option<u32>,
    },
    /// Test every prime exponent in [start, end) and report Mersenne primes
    Sweep {
        /// Start of range (inclusive)
        #[arg(long)]
        start: u64,
        /// End of range (exclusive)
        #[arg(long)]
        end: u64,
        /// Seconds between progress log lines
        #[arg(long, default_value_t = 30)]
        report_secs: u64,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // LOG_FORMAT=json for log shippers, human-readable otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    let file_config = llcore::config::FileConfig::load_or_default(cli.config.as_deref())?;
    cli::configure_rayon(cli.threads);

    match &cli.command {
        Commands::Test {
            exponents,
            bench,
            stride,
            no_progress,
            json,
        } => {
            let opts = cli::TestOptions {
                repeats: *bench,
                stride: stride.unwrap_or(file_config.engine.stride),
                progress: !no_progress && file_config.engine.progress,
                json: *json,
            };
            cli::run_test(exponents, &opts)
        }
        Commands::Digits {
            p,
            out,
            max_digits,
            json,
        } => {
            let path = file_config.export_path(out);
            let limit = max_digits.unwrap_or(file_config.export.max_digits);
            cli::run_digits(*p, &path, limit, *json)
        }
        Commands::Exponents { start, end, block } => {
            let (lo, hi) = match (start, end, block) {
                (Some(lo), Some(hi), _) => (*lo, *hi),
                (_, _, Some(id)) => llcore::sieve::block_bounds(*id),
                _ => anyhow::bail!("either --start/--end or --block is required"),
            };
            cli::run_exponents(lo, hi)
        }
        Commands::Sweep {
            start,
            end,
            report_secs,
        } => cli::run_sweep(*start, *end, std::time::Duration::from_secs(*report_secs)),
    }
}
