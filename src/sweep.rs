//! # Sweep — Lucas–Lehmer Over an Exponent Range
//!
//! Tests every prime exponent in `[start, end)` and returns the results of
//! those whose Mersenne number is prime. Each exponent is an independent
//! engine run with its own modulus and residue, so exponents are spread
//! across the rayon pool with no coordination beyond the shared
//! [`SweepProgress`] counters.
//!
//! Exponents are sieved one segment at a time and processed in ascending
//! blocks; within a block the runs are parallel, and the block's finds are
//! logged once the block completes.

use rayon::prelude::*;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info};

use crate::engine::{ll_test, LlConfig};
use crate::error::LlError;
use crate::outcome::LlResult;
use crate::progress::SweepProgress;
use crate::sieve;

/// Adaptive block size: fewer exponents per block as runs get longer.
fn block_size_for_exp(p: u32) -> usize {
    match p {
        0..=2_000 => 256,
        2_001..=10_000 => 64,
        10_001..=50_000 => 16,
        _ => 4,
    }
}

/// Run the LL test for every prime exponent in `[start, end)`.
///
/// The range is sieved one block at a time, so a wide range holds at most
/// one block of exponents in memory. Returns the results for Mersenne primes
/// found, ordered by exponent.
pub fn sweep(start: u64, end: u64, progress: &Arc<SweepProgress>) -> Result<Vec<LlResult>, LlError> {
    info!(start, end, "sweeping Mersenne exponents");

    let mut found = Vec::new();
    let mut tested = 0u64;
    for exponents in sieve::exponent_segments(start, end) {
        debug!(
            count = exponents.len(),
            first = exponents[0],
            last = exponents[exponents.len() - 1],
            "sieved exponent segment"
        );
        found.extend(sweep_segment(&exponents, progress)?);
        tested += exponents.len() as u64;
    }

    if tested == 0 {
        info!(start, end, "no prime exponents in range");
    }
    Ok(found)
}

fn sweep_segment(exponents: &[u32], progress: &SweepProgress) -> Result<Vec<LlResult>, LlError> {
    let mut found = Vec::new();
    let mut pos = 0;
    while pos < exponents.len() {
        let block_end = (pos + block_size_for_exp(exponents[pos])).min(exponents.len());
        let block = &exponents[pos..block_end];
        progress.set_current(format!("p=[{}..{}]", block[0], block[block.len() - 1]));

        let results: Vec<LlResult> = block
            .par_iter()
            .map(|&p| {
                let result = ll_test(&LlConfig::new(p).without_progress())?;
                progress.tested.fetch_add(1, Ordering::Relaxed);
                if result.is_prime {
                    progress.found.fetch_add(1, Ordering::Relaxed);
                }
                Ok(result)
            })
            .collect::<Result<Vec<_>, LlError>>()?;

        for result in results.into_iter().filter(|r| r.is_prime) {
            info!(
                p = result.exponent,
                elapsed_ms = result.elapsed().as_millis() as u64,
                "Mersenne prime found"
            );
            found.push(result);
        }
        pos = block_end;
    }
    Ok(found)
}
