//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. Contains the
//! execution logic for each subcommand and the rayon pool configuration.

use anyhow::{Context, Result};
use llcore::progress::{ProgressEvent, StepReporter, SweepProgress};
use llcore::{engine, export, sieve, sweep, LlConfig, LlResult};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Options for the `test` subcommand after merging flags with the config file.
pub struct TestOptions {
    pub repeats: u32,
    pub stride: u32,
    pub progress: bool,
    pub json: bool,
}

// ── Test ────────────────────────────────────────────────────────

/// Test each exponent, printing one result line (or one bench summary) per
/// exponent. Rejected exponents are reported and make the command fail once
/// all exponents have been processed.
pub fn run_test(exponents: &[u32], opts: &TestOptions) -> Result<()> {
    let exponents: Vec<u32> = if exponents.is_empty() {
        vec![31]
    } else {
        exponents.to_vec()
    };

    let mut rejected = 0usize;
    for &p in &exponents {
        if let Err(e) = test_one(p, opts) {
            error!(p, error = %e, "test failed");
            if opts.json {
                println!("{}", serde_json::json!({ "exponent": p, "error": e.to_string() }));
            } else {
                println!("M_{} → ERROR | {}", p, e);
            }
            rejected += 1;
        }
    }

    if rejected > 0 {
        anyhow::bail!("{} of {} exponents failed", rejected, exponents.len());
    }
    Ok(())
}

fn test_one(p: u32, opts: &TestOptions) -> Result<()> {
    let mut config = LlConfig::new(p).with_stride(opts.stride);
    if !opts.progress {
        config = config.without_progress();
    }

    let mut best = u64::MAX;
    let mut sum: u64 = 0;
    let mut last: Option<LlResult> = None;

    for _ in 0..opts.repeats {
        let start = Instant::now();
        // Every round runs in the same progress mode.
        let result = if config.progress_enabled {
            run_with_progress(&config, opts.json)?
        } else {
            engine::ll_test(&config)?
        };
        let ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        best = best.min(ns);
        sum = sum.saturating_add(ns);
        if opts.repeats == 1 {
            print_result(&result, ns, opts.json)?;
        }
        last = Some(result);
    }

    if opts.repeats > 1 {
        let avg = sum / opts.repeats as u64;
        if opts.json {
            let result = last.context("bench produced no result")?;
            println!(
                "{}",
                serde_json::json!({
                    "exponent": p,
                    "is_prime": result.is_prime,
                    "repeats": opts.repeats,
                    "best_ns": best,
                    "avg_ns": avg,
                })
            );
        } else {
            println!(
                "M_{} bench repeats={} | best(ns)={} | avg(ns)={}",
                p, opts.repeats, best, avg
            );
        }
    }
    Ok(())
}

fn run_with_progress(config: &LlConfig, json: bool) -> Result<LlResult> {
    let p = config.exponent;
    let mut steps = StepReporter::new(p);
    let result = engine::ll_test_with_progress(config, |iteration, digest| {
        if json {
            println!("{}", serde_json::to_string(&ProgressEvent::new(p, iteration, digest))?);
        } else if let Some(pct) = steps.observe(iteration) {
            println!("  p={} {}%", p, pct);
        }
        Ok(())
    })?;
    Ok(result)
}

fn print_result(result: &LlResult, ns: u64, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(result)?);
    } else {
        println!(
            "M_{} → {} | iters={} | core(ns)={} | engine={}",
            result.exponent, result.outcome, result.iterations, ns, result.engine_info
        );
    }
    Ok(())
}

// ── Digits ──────────────────────────────────────────────────────

pub fn run_digits(p: u32, path: &Path, max_digits: u64, json: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    let meta = export::write_mersenne_decimal_with_limit(p, path, max_digits)?;
    if json {
        println!("{}", serde_json::to_string(&meta)?);
    } else {
        println!(
            "M_{} → {} digits | {} | sha256={}",
            meta.exponent,
            meta.digits,
            meta.path.display(),
            meta.sha256
        );
    }
    Ok(())
}

// ── Exponents ───────────────────────────────────────────────────

pub fn run_exponents(start: u64, end: u64) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    let mut count = 0usize;
    for segment in sieve::exponent_segments(start, end) {
        count += segment.len();
        for p in segment {
            writeln!(out, "{}", p)?;
        }
    }
    out.flush()?;
    info!(start, end, count, "prime exponents");
    Ok(())
}

// ── Sweep ───────────────────────────────────────────────────────

pub fn run_sweep(start: u64, end: u64, report_every: Duration) -> Result<()> {
    info!(cores = rayon::current_num_threads(), start, end, "llcore sweep starting");

    let progress = SweepProgress::new();
    let reporter = progress.start_reporter(report_every);

    let result = sweep::sweep(start, end, &progress);

    progress.stop();
    let _ = reporter.join();
    progress.print_status();

    let found = result?;
    for r in &found {
        println!("M_{} → PRIME | iters={} | core(ns)={}", r.exponent, r.iterations, r.elapsed_ns);
    }
    println!(
        "sweep [{}, {}) tested={} found={}",
        start,
        end,
        progress.tested.load(Ordering::Relaxed),
        found.len()
    );
    Ok(())
}

// ── Rayon ───────────────────────────────────────────────────────

pub fn configure_rayon(threads: Option<usize>) {
    let num_threads = threads.unwrap_or(0);
    if num_threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!(error = %e, "Could not configure rayon thread pool");
        }
    }
}
